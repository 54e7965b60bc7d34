use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelerType {
    Solo,
    Couple,
    Family,
    Friends,
    Business,
}

impl TravelerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelerType::Solo => "solo",
            TravelerType::Couple => "couple",
            TravelerType::Family => "family",
            TravelerType::Friends => "friends",
            TravelerType::Business => "business",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }
}

pub const MAX_INTERESTS: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct TravelQueryRequest {
    pub query: String,
    pub destination: Option<String>,
    pub duration: Option<u32>,
    pub budget: Option<f64>,
    pub traveler_count: Option<u32>,
    pub traveler_type: Option<TravelerType>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub start_date: Option<NaiveDate>,
}

impl TravelQueryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let length = self.query.chars().count();
        if !(10..=1000).contains(&length) {
            return Err(ApiError::validation(format!(
                "query must be between 10 and 1000 characters, got {}",
                length
            )));
        }
        if let Some(duration) = self.duration {
            validate_duration(duration)?;
        }
        if let Some(budget) = self.budget {
            validate_budget(budget)?;
        }
        if let Some(count) = self.traveler_count {
            validate_traveler_count(count)?;
        }
        validate_interests(&self.interests)
    }
}

pub fn validate_duration(duration: u32) -> Result<(), ApiError> {
    if !(1..=30).contains(&duration) {
        return Err(ApiError::validation(format!(
            "duration must be between 1 and 30 days, got {}",
            duration
        )));
    }
    Ok(())
}

pub fn validate_budget(budget: f64) -> Result<(), ApiError> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(ApiError::validation("budget must be greater than 0"));
    }
    Ok(())
}

pub fn validate_traveler_count(count: u32) -> Result<(), ApiError> {
    if !(1..=20).contains(&count) {
        return Err(ApiError::validation(format!(
            "traveler_count must be between 1 and 20, got {}",
            count
        )));
    }
    Ok(())
}

pub fn validate_interests(interests: &[String]) -> Result<(), ApiError> {
    if interests.len() > MAX_INTERESTS {
        return Err(ApiError::validation(format!(
            "Maximum {} interests allowed",
            MAX_INTERESTS
        )));
    }
    Ok(())
}

/// Structured reading of a free-text travel query, produced either by a model
/// or by the keyword fallback parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTravelQuery {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub traveler_count: Option<u32>,
    #[serde(default)]
    pub traveler_type: Option<TravelerType>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub extracted_keywords: Vec<String>,
    #[serde(
        default = "default_model_confidence",
        deserialize_with = "deserialize_confidence"
    )]
    pub confidence: f64,
}

/// Confidence assumed when a model answer omits one.
fn default_model_confidence() -> f64 {
    0.5
}

impl ParsedTravelQuery {
    /// Explicit request fields win over whatever was parsed from the text.
    pub fn merge_request(&mut self, request: &TravelQueryRequest) {
        if let Some(destination) = request.destination.as_ref().filter(|d| !d.is_empty()) {
            self.destination = Some(destination.clone());
        }
        if request.duration.is_some() {
            self.duration = request.duration;
        }
        if request.budget.is_some() {
            self.budget = request.budget;
        }
        if request.traveler_count.is_some() {
            self.traveler_count = request.traveler_count;
        }
        if request.traveler_type.is_some() {
            self.traveler_type = request.traveler_type;
        }
        self.interests.extend(request.interests.iter().cloned());
        if request.start_date.is_some() {
            self.start_date = request.start_date;
        }
    }
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let confidence = f64::deserialize(deserializer)?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(serde::de::Error::custom(format!(
            "confidence {} outside [0, 1]",
            confidence
        )));
    }
    Ok(confidence)
}

// Models answer with 3, 3.0 or "3" for the same field
fn deserialize_lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_f64(deserializer)?
        .filter(|value| *value >= 0.0)
        .map(|value| value.round() as u32))
}

fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => Ok(s.trim().parse::<f64>().ok()),
        _ => Ok(None),
    }
}
