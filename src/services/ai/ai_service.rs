use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::json_extract::extract_json_object;
use super::{build_generator, fallback, prompts, GenerationParams, TextGenerator};
use crate::config::{AiProviderKind, Settings};
use crate::models::ai::ModelStatus;
use crate::models::itinerary::ItineraryGenerationRequest;
use crate::models::query::ParsedTravelQuery;
use crate::models::sentiment::SentimentThemes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Ai,
    Fallback,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Ai => "ai",
            ResultSource::Fallback => "fallback",
        }
    }
}

/// An AI task result. `degraded` is set when a provider was configured but
/// its answer could not be used, so the payload is canned data.
#[derive(Debug, Serialize)]
pub struct AiOutcome<T> {
    #[serde(flatten)]
    pub data: T,
    pub source: ResultSource,
    pub degraded: bool,
    pub provider: String,
}

#[derive(Debug, Deserialize)]
pub struct ItineraryNarration {
    pub reasoning: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl ItineraryNarration {
    fn fallback() -> Self {
        Self {
            reasoning: fallback::ITINERARY_REASONING.to_string(),
            alternatives: fallback::ALTERNATIVE_SUGGESTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Model reading of a set of reviews.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSentiment {
    pub overall_sentiment: f64,
    pub sentiment_breakdown: SentimentBreakdown,
    #[serde(default)]
    pub key_themes: SentimentThemes,
    pub confidence: f64,
}

/// Single-provider AI front. Every task calls the configured generator once
/// and falls back to a fixed payload on any failure.
pub struct AiService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AiService {
    pub fn new(settings: &Settings, http: &Client) -> Self {
        let resolved = settings.ai_config();
        let generator = build_generator(
            resolved.provider,
            &settings.ai,
            http,
            GenerationParams::DEFAULT,
        );

        match &generator {
            Some(g) => log::info!("AI provider {} initialized with model {}", g.name(), g.model()),
            None => log::warn!("No AI provider configured. AI features will use fallback data."),
        }

        Self { generator }
    }

    pub fn with_generator(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn provider_name(&self) -> &str {
        self.generator
            .as_ref()
            .map(|g| g.name())
            .unwrap_or(AiProviderKind::None.as_str())
    }

    fn outcome<T>(&self, data: T, source: ResultSource, degraded: bool) -> AiOutcome<T> {
        AiOutcome {
            data,
            source,
            degraded,
            provider: self.provider_name().to_string(),
        }
    }

    /// Runs one task: prompt, generate, extract the first JSON object, decode.
    async fn ask<T, F>(&self, task: &str, prompt: String, fallback: F) -> AiOutcome<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let Some(generator) = &self.generator else {
            return self.outcome(fallback(), ResultSource::Fallback, false);
        };

        let text = match generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                log::error!("{} call failed for {}: {}", generator.name(), task, e);
                return self.outcome(fallback(), ResultSource::Fallback, true);
            }
        };

        let Some(object) = extract_json_object(&text) else {
            log::warn!("{} answer for {} contained no JSON object", generator.name(), task);
            return self.outcome(fallback(), ResultSource::Fallback, true);
        };

        match serde_json::from_value::<T>(object) {
            Ok(data) => self.outcome(data, ResultSource::Ai, false),
            Err(e) => {
                log::warn!("Could not decode {} answer for {}: {}", generator.name(), task, e);
                self.outcome(fallback(), ResultSource::Fallback, true)
            }
        }
    }

    pub async fn parse_travel_query(&self, query: &str) -> AiOutcome<ParsedTravelQuery> {
        self.ask(
            "query parsing",
            prompts::travel_query_parser(query),
            || fallback::fallback_parse_query(query),
        )
        .await
    }

    pub async fn recommend(&self, parsed: &ParsedTravelQuery) -> AiOutcome<Value> {
        let preferences = json!({
            "destination": parsed.destination,
            "interests": parsed.interests,
            "budget": parsed.budget,
            "traveler_type": parsed.traveler_type.map(|t| t.as_str()),
            "activity_level": parsed.activity_level.unwrap_or_default().as_str(),
        });
        self.ask(
            "recommendations",
            prompts::destination_recommender(&preferences, "Indonesia"),
            || fallback::recommendations(parsed.destination.as_deref()),
        )
        .await
    }

    pub async fn optimize_route(
        &self,
        destinations: &[String],
        start_location: &str,
        preferences: &BTreeMap<String, Value>,
    ) -> AiOutcome<Value> {
        self.ask(
            "route optimization",
            prompts::route_optimizer(destinations, start_location, preferences),
            || fallback::route(destinations, start_location),
        )
        .await
    }

    /// Free-text reply; no JSON is expected from the model.
    pub async fn chat(&self, message: &str, context: Option<&Value>) -> AiOutcome<String> {
        let Some(generator) = &self.generator else {
            let reply = fallback::chat_reply(message).to_string();
            return self.outcome(reply, ResultSource::Fallback, false);
        };

        match generator
            .generate(&prompts::chat_assistant(message, context))
            .await
        {
            Ok(text) if !text.trim().is_empty() => {
                self.outcome(text.trim().to_string(), ResultSource::Ai, false)
            }
            Ok(_) => {
                log::warn!("{} returned an empty chat reply", generator.name());
                self.outcome(
                    fallback::CHAT_FAILURE_REPLY.to_string(),
                    ResultSource::Fallback,
                    true,
                )
            }
            Err(e) => {
                log::error!("Error in chat: {}", e);
                self.outcome(
                    fallback::CHAT_FAILURE_REPLY.to_string(),
                    ResultSource::Fallback,
                    true,
                )
            }
        }
    }

    pub async fn estimate_budget(
        &self,
        destination: &str,
        duration: u32,
        traveler_count: u32,
        comfort_level: &str,
    ) -> AiOutcome<Value> {
        self.ask(
            "budget estimation",
            prompts::budget_estimator(destination, duration, traveler_count, comfort_level),
            || fallback::budget(duration, traveler_count, comfort_level),
        )
        .await
    }

    pub async fn narrate_itinerary(
        &self,
        request: &ItineraryGenerationRequest,
    ) -> AiOutcome<ItineraryNarration> {
        let prompt = prompts::itinerary_generator(
            &request.destination,
            request.duration,
            &request.interests,
            request.budget,
            request.traveler_type.as_str(),
        );
        let mut outcome = self
            .ask("itinerary narration", prompt, ItineraryNarration::fallback)
            .await;

        if outcome.data.reasoning.trim().is_empty() {
            outcome.data.reasoning = fallback::ITINERARY_REASONING.to_string();
        }
        if outcome.data.alternatives.is_empty() {
            outcome.data.alternatives = ItineraryNarration::fallback().alternatives;
        }
        outcome
    }

    /// `None` when no provider is configured or its answer is unusable.
    pub async fn analyze_review_sentiment(
        &self,
        reviews: &[String],
        destination_name: &str,
    ) -> Option<ReviewSentiment> {
        if !self.is_configured() || reviews.is_empty() {
            return None;
        }
        self.ask(
            "sentiment analysis",
            prompts::sentiment_analyzer(reviews, destination_name),
            || None,
        )
        .await
        .data
    }

    pub fn model_status(&self) -> ModelStatus {
        let provider = self
            .generator
            .as_ref()
            .map(|g| AiProviderKind::parse(g.name()))
            .unwrap_or(AiProviderKind::None);

        let capabilities: &[&str] = match provider {
            AiProviderKind::IbmWatsonx => &[
                "natural_language_processing",
                "query_parsing",
                "recommendation_generation",
                "route_optimization",
            ],
            AiProviderKind::OpenAi => &[
                "natural_language_processing",
                "query_parsing",
                "recommendation_generation",
            ],
            AiProviderKind::HuggingFace => &["natural_language_processing", "query_parsing"],
            AiProviderKind::IbmWatson | AiProviderKind::Replicate => {
                &["natural_language_processing", "query_parsing", "chat"]
            }
            AiProviderKind::None => &[],
        };

        ModelStatus {
            provider: provider.as_str().to_string(),
            model: self
                .generator
                .as_ref()
                .map(|g| g.model().to_string())
                .unwrap_or_else(|| "none".to_string()),
            available: provider != AiProviderKind::None,
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ai::testing::ScriptedGenerator;

    fn service_with(generator: Arc<ScriptedGenerator>) -> AiService {
        AiService::with_generator(Some(generator))
    }

    #[tokio::test]
    async fn test_unconfigured_parse_is_not_degraded() {
        let service = AiService::with_generator(None);
        let outcome = service.parse_travel_query("Liburan 3 hari ke Bali").await;
        assert_eq!(outcome.source, ResultSource::Fallback);
        assert!(!outcome.degraded);
        assert_eq!(outcome.provider, "none");
        assert_eq!(outcome.data.confidence, 0.6);
    }

    #[tokio::test]
    async fn test_model_answer_is_used() {
        let generator = ScriptedGenerator::replying(
            "openai",
            "Hasil: {\"destination\": \"Lombok\", \"duration\": 4, \"confidence\": 0.9}",
        );
        let service = service_with(generator.clone());
        let outcome = service.parse_travel_query("Liburan 3 hari ke Bali").await;

        assert_eq!(outcome.source, ResultSource::Ai);
        assert!(!outcome.degraded);
        assert_eq!(outcome.data.destination.as_deref(), Some("Lombok"));
        assert_eq!(outcome.data.duration, Some(4));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_provider_degrades_each_task() {
        let service = service_with(ScriptedGenerator::failing("huggingface"));

        let parsed = service.parse_travel_query("Liburan 3 hari ke Bali").await;
        assert!(parsed.degraded);
        assert_eq!(parsed.data.destination.as_deref(), Some("Bali"));

        let route = service
            .optimize_route(&["Ubud".to_string()], "Denpasar", &BTreeMap::new())
            .await;
        assert!(route.degraded);
        assert_eq!(route.data["optimization_score"], 0.7);

        let budget = service.estimate_budget("Bali", 2, 2, "luxury").await;
        assert!(budget.degraded);
        assert_eq!(budget.data["daily_budget"]["recommended"], 1_200_000.0);

        let chat = service.chat("halo", None).await;
        assert!(chat.degraded);
        assert_eq!(chat.data, fallback::CHAT_FAILURE_REPLY);
    }

    #[tokio::test]
    async fn test_prose_only_answer_falls_back() {
        let service = service_with(ScriptedGenerator::replying(
            "ibm_watsonx",
            "Saya sarankan pergi ke Bali.",
        ));
        let outcome = service.recommend(&fallback::fallback_parse_query("ke bali")).await;
        assert_eq!(outcome.source, ResultSource::Fallback);
        assert!(outcome.degraded);
        assert_eq!(
            outcome.data["recommendations"][0]["name"],
            "Destinasi Populer di Bali"
        );
    }

    #[tokio::test]
    async fn test_chat_uses_trimmed_model_text() {
        let service = service_with(ScriptedGenerator::replying("replicate", "  Halo juga!  "));
        let outcome = service.chat("halo", None).await;
        assert_eq!(outcome.source, ResultSource::Ai);
        assert_eq!(outcome.data, "Halo juga!");
    }

    #[test]
    fn test_model_status_capabilities() {
        let status = AiService::with_generator(None).model_status();
        assert!(!status.available);
        assert_eq!(status.model, "none");
        assert!(status.capabilities.is_empty());

        let status = service_with(ScriptedGenerator::replying("ibm_watsonx", "")).model_status();
        assert!(status.available);
        assert_eq!(status.provider, "ibm_watsonx");
        assert_eq!(status.capabilities.len(), 4);

        let status = service_with(ScriptedGenerator::replying("replicate", "")).model_status();
        assert_eq!(status.capabilities[2], "chat");
    }

    #[test]
    fn test_outcome_flattens_payload() {
        let service = AiService::with_generator(None);
        let outcome = service.outcome(json!({"reasoning": "x"}), ResultSource::Fallback, false);
        let body = serde_json::to_value(&outcome).unwrap();
        assert_eq!(body["reasoning"], "x");
        assert_eq!(body["source"], "fallback");
        assert_eq!(body["degraded"], false);
        assert_eq!(body["provider"], "none");
    }
}
