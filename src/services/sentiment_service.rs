use std::collections::HashMap;

use chrono::Utc;

use crate::db::Store;
use crate::errors::ServiceError;
use crate::models::review::Review;
use crate::models::sentiment::{SentimentAnalysis, SentimentThemes};
use crate::services::ai::ai_service::AiService;

const KEYWORD_MIN_LEN: usize = 4;
const KEYWORD_LIMIT: usize = 5;
const THEME_LIMIT: usize = 3;

/// Builds (or returns the stored) sentiment record for one destination.
pub async fn analyze_destination_sentiment(
    store: &dyn Store,
    ai: &AiService,
    destination_id: &str,
    force_refresh: bool,
) -> Result<SentimentAnalysis, ServiceError> {
    let destination = store
        .get_destination(destination_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Destination {} not found", destination_id))
        })?;

    let existing = match store.get_sentiment(destination_id).await? {
        Some(analysis) if !force_refresh => return Ok(analysis),
        other => other,
    };

    let reviews = store.reviews_for(destination_id).await?;
    let mut analysis = if reviews.is_empty() {
        default_sentiment(destination_id)
    } else {
        let contents: Vec<String> = reviews.iter().map(|r| r.content.clone()).collect();
        let mut analysis = from_ratings(destination_id, &reviews);
        if let Some(reading) = ai.analyze_review_sentiment(&contents, &destination.name).await {
            log::info!("Using model sentiment for destination {}", destination_id);
            analysis.overall = reading.overall_sentiment.clamp(-1.0, 1.0);
            analysis.positive = reading.sentiment_breakdown.positive.clamp(0.0, 1.0);
            analysis.negative = reading.sentiment_breakdown.negative.clamp(0.0, 1.0);
            analysis.neutral = reading.sentiment_breakdown.neutral.clamp(0.0, 1.0);
            analysis.confidence = reading.confidence.clamp(0.0, 1.0);
            if !reading.key_themes.positive.is_empty() || !reading.key_themes.negative.is_empty() {
                analysis.themes = reading.key_themes;
            }
        }
        analysis
    };

    if let Some(previous) = existing {
        analysis.id = previous.id;
        analysis.created_at = previous.created_at;
    }

    store.upsert_sentiment(&analysis).await?;
    log::info!(
        "Sentiment for destination {} refreshed from {} reviews",
        destination_id,
        analysis.source_count
    );
    Ok(analysis)
}

/// Record used for destinations nobody has reviewed yet.
pub fn default_sentiment(destination_id: &str) -> SentimentAnalysis {
    let now = Utc::now();
    SentimentAnalysis {
        id: uuid::Uuid::new_v4().to_string(),
        destination_id: destination_id.to_string(),
        overall: 0.7,
        positive: 0.6,
        negative: 0.2,
        neutral: 0.2,
        keywords: ["bagus", "indah", "recommended", "mahal"]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        themes: SentimentThemes::default(),
        confidence: 0.5,
        source_count: 0,
        created_at: now,
        last_updated: now,
    }
}

fn from_ratings(destination_id: &str, reviews: &[Review]) -> SentimentAnalysis {
    let n = reviews.len() as f64;
    let share = |pred: fn(u8) -> bool| {
        reviews.iter().filter(|r| pred(r.rating)).count() as f64 / n
    };
    let positive = share(|r| r >= 4);
    let negative = share(|r| r <= 2);
    let neutral = share(|r| r == 3);

    let contents = |pred: fn(u8) -> bool| {
        reviews
            .iter()
            .filter(|r| pred(r.rating))
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
    };

    let now = Utc::now();
    SentimentAnalysis {
        id: uuid::Uuid::new_v4().to_string(),
        destination_id: destination_id.to_string(),
        overall: positive - negative,
        positive,
        negative,
        neutral,
        keywords: top_keywords(reviews.iter().map(|r| r.content.as_str()), KEYWORD_LIMIT),
        themes: SentimentThemes {
            positive: top_keywords(contents(|r| r >= 4), THEME_LIMIT),
            negative: top_keywords(contents(|r| r <= 2), THEME_LIMIT),
        },
        confidence: (0.5 + 0.05 * n).min(0.95),
        source_count: reviews.len() as u32,
        created_at: now,
        last_updated: now,
    }
}

/// Most frequent words of at least four characters; ties break alphabetically.
fn top_keywords<'a>(texts: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= KEYWORD_MIN_LEN)
        {
            *counts.entry(word.to_string()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(word, _)| word).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::{DestinationStore, ReviewStore, SentimentStore};
    use crate::models::destination::fixtures::destination;
    use crate::models::review::NewReview;
    use crate::services::ai::testing::ScriptedGenerator;

    async fn store_with_destination() -> (MemoryStore, String) {
        let store = MemoryStore::new();
        let d = destination("Pantai Kuta", "Badung", "Bali");
        let id = d.id.clone();
        store.insert_destinations(vec![d]).await.unwrap();
        (store, id)
    }

    async fn add_review(store: &MemoryStore, destination_id: &str, user: &str, rating: u8, content: &str) {
        let review = NewReview {
            user_id: user.to_string(),
            rating,
            title: None,
            content: content.to_string(),
            visit_date: None,
        }
        .into_review(destination_id);
        store.insert_review(&review).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_destination() {
        let store = MemoryStore::new();
        let ai = AiService::with_generator(None);
        let err = analyze_destination_sentiment(&store, &ai, "missing", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_default_when_no_reviews_and_persisted() {
        let (store, id) = store_with_destination().await;
        let ai = AiService::with_generator(None);

        let analysis = analyze_destination_sentiment(&store, &ai, &id, false).await.unwrap();
        assert_eq!(analysis.overall, 0.7);
        assert_eq!(analysis.source_count, 0);
        assert_eq!(analysis.keywords, vec!["bagus", "indah", "recommended", "mahal"]);
        assert!(store.get_sentiment(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stored_record_returned_unless_forced() {
        let (store, id) = store_with_destination().await;
        let ai = AiService::with_generator(None);
        let first = analyze_destination_sentiment(&store, &ai, &id, false).await.unwrap();

        add_review(&store, &id, "u1", 5, "Pantai sangat indah sekali").await;
        let cached = analyze_destination_sentiment(&store, &ai, &id, false).await.unwrap();
        assert_eq!(cached.source_count, 0);

        let fresh = analyze_destination_sentiment(&store, &ai, &id, true).await.unwrap();
        assert_eq!(fresh.source_count, 1);
        assert_eq!(fresh.id, first.id);
    }

    #[tokio::test]
    async fn test_rating_shares() {
        let (store, id) = store_with_destination().await;
        let ai = AiService::with_generator(None);
        add_review(&store, &id, "u1", 5, "Pantai indah, sunset indah").await;
        add_review(&store, &id, "u2", 4, "Pantai bersih").await;
        add_review(&store, &id, "u3", 3, "Lumayan ramai").await;
        add_review(&store, &id, "u4", 1, "Parkir mahal dan ramai").await;

        let analysis = analyze_destination_sentiment(&store, &ai, &id, true).await.unwrap();
        assert_eq!(analysis.positive, 0.5);
        assert_eq!(analysis.neutral, 0.25);
        assert_eq!(analysis.negative, 0.25);
        assert_eq!(analysis.overall, 0.25);
        assert!((analysis.confidence - 0.7).abs() < 1e-9);
        assert_eq!(analysis.keywords[0], "indah");
        assert!(analysis.keywords.contains(&"ramai".to_string()));
        assert!(analysis.themes.negative.contains(&"mahal".to_string()));
    }

    #[tokio::test]
    async fn test_model_reading_overrides_shares() {
        let (store, id) = store_with_destination().await;
        add_review(&store, &id, "u1", 3, "Biasa saja").await;
        let ai = AiService::with_generator(Some(ScriptedGenerator::replying(
            "openai",
            r#"{"overall_sentiment": 1.4, "sentiment_breakdown": {"positive": 0.9, "neutral": 0.1, "negative": 0.0}, "key_themes": {"positive": ["pemandangan"], "negative": []}, "confidence": 0.8}"#,
        )));

        let analysis = analyze_destination_sentiment(&store, &ai, &id, true).await.unwrap();
        assert_eq!(analysis.overall, 1.0);
        assert_eq!(analysis.positive, 0.9);
        assert_eq!(analysis.confidence, 0.8);
        assert_eq!(analysis.themes.positive, vec!["pemandangan"]);
        assert_eq!(analysis.source_count, 1);
    }

    #[test]
    fn test_top_keywords_ties_alphabetical() {
        let words = top_keywords(["pantai ombak pantai", "ombak angin di"], 2);
        assert_eq!(words, vec!["ombak", "pantai"]);
    }
}
