use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};

use super::json_extract::extract_json_object;
use super::{build_generator, fallback, prompts, GenerationParams, TextGenerator};
use crate::config::{AiProviderKind, AiSettings};

const PLAN_TITLE: &str = "Itinerary Wisata Indonesia";
const DESCRIPTION_LIMIT: usize = 200;

/// Free-form travel planner that walks a fixed provider chain until one
/// answers.
pub struct MultiAiService {
    chain: Vec<Arc<dyn TextGenerator>>,
}

impl MultiAiService {
    /// Chain order: Watson Orchestrate, Replicate, Hugging Face. Providers
    /// without credentials are left out.
    pub fn from_settings(ai: &AiSettings, http: &Client) -> Self {
        let mut kinds = Vec::new();
        if ai.provider == AiProviderKind::IbmWatson {
            kinds.push(AiProviderKind::IbmWatson);
        }
        kinds.push(AiProviderKind::Replicate);
        kinds.push(AiProviderKind::HuggingFace);

        let chain: Vec<_> = kinds
            .into_iter()
            .filter_map(|kind| build_generator(kind, ai, http, GenerationParams::PLANNER))
            .collect();

        log::info!(
            "Travel planner chain: [{}]",
            chain.iter().map(|g| g.name()).collect::<Vec<_>>().join(", ")
        );
        Self { chain }
    }

    pub fn with_chain(chain: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { chain }
    }

    pub fn providers(&self) -> Vec<&'static str> {
        self.chain.iter().map(|g| g.name()).collect()
    }

    pub async fn process_travel_query(
        &self,
        query: &str,
        preferences: Option<&BTreeMap<String, Value>>,
    ) -> Value {
        let prompt = prompts::travel_planner(query, preferences);

        for generator in &self.chain {
            log::info!("Trying {} for travel plan", generator.name());
            match generator.generate(&prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    log::info!("Travel plan produced by {}", generator.name());
                    return shape_plan(&text, generator.name());
                }
                Ok(_) => log::warn!("{} returned an empty plan", generator.name()),
                Err(e) => log::warn!("{} failed: {}", generator.name(), e),
            }
        }

        log::warn!("All AI providers failed, using mock data");
        fallback::mock_travel_plan(query)
    }
}

fn shape_plan(text: &str, provider: &str) -> Value {
    let generated_at = Utc::now().to_rfc3339();

    if let Some(Value::Object(mut plan)) = extract_json_object(text) {
        plan.insert("ai_provider".to_string(), Value::from(provider));
        plan.insert("generated_at".to_string(), Value::from(generated_at));
        return Value::Object(plan);
    }

    let mut description: String = text.chars().take(DESCRIPTION_LIMIT).collect();
    if text.chars().count() > DESCRIPTION_LIMIT {
        description.push_str("...");
    }
    json!({
        "title": PLAN_TITLE,
        "description": description,
        "ai_provider": provider,
        "generated_at": generated_at,
        "raw_response": text,
    })
}
