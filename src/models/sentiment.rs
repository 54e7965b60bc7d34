use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentThemes {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

/// Stored sentiment record, at most one per destination.
///
/// `overall` lies in [-1, 1]; the three shares lie in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub id: String,
    pub destination_id: String,
    pub overall: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub themes: SentimentThemes,
    pub confidence: f64,
    pub source_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// The subset of a sentiment record embedded in destination responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub overall: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub keywords: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl From<&SentimentAnalysis> for SentimentSnapshot {
    fn from(analysis: &SentimentAnalysis) -> Self {
        Self {
            overall: analysis.overall,
            positive: analysis.positive,
            negative: analysis.negative,
            neutral: analysis.neutral,
            keywords: analysis.keywords.clone(),
            last_updated: analysis.last_updated,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SentimentAnalysisRequest {
    pub destination_id: String,
    #[serde(default)]
    pub force_refresh: bool,
}
