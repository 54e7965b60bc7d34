use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::{AiProviderKind, AiSettings};

pub mod ai_service;
pub mod fallback;
pub mod json_extract;
pub mod multi_ai_service;
pub mod prompts;
pub mod providers;

use providers::{HuggingFace, OpenAi, Replicate, WatsonOrchestrate, Watsonx};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unexpected response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    #[error("{0} did not finish in time")]
    Timeout(&'static str),
}

impl ProviderError {
    pub(crate) fn invalid(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::InvalidResponse {
            provider,
            message: message.into(),
        }
    }
}

/// Sampling parameters sent with every prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: Option<f64>,
}

impl GenerationParams {
    /// Short, near-deterministic answers for the structured tasks.
    pub const DEFAULT: GenerationParams = GenerationParams {
        max_tokens: 500,
        temperature: 0.3,
        top_p: None,
    };

    /// Longer, more varied output for free-form travel plans.
    pub const PLANNER: GenerationParams = GenerationParams {
        max_tokens: 1000,
        temperature: 0.7,
        top_p: Some(0.9),
    };
}

/// A remote model that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// The shared outbound client. All provider calls time out after 30 seconds.
pub fn http_client() -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

/// Builds the generator for `kind`, or `None` when the provider is `none` or
/// its credentials are missing.
pub fn build_generator(
    kind: AiProviderKind,
    ai: &AiSettings,
    http: &Client,
    params: GenerationParams,
) -> Option<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match kind {
        AiProviderKind::IbmWatson => Arc::new(WatsonOrchestrate::new(
            http.clone(),
            ai.watson.api_key.clone()?,
            ai.watson.url.clone(),
            ai.watson.project_id.clone(),
            ai.watson.model.clone(),
            params,
        )),
        AiProviderKind::IbmWatsonx => Arc::new(Watsonx::new(
            http.clone(),
            ai.watsonx.api_key.clone()?,
            ai.watsonx.project_id.clone()?,
            ai.watsonx.url.clone(),
            ai.watsonx.model.clone(),
            params,
        )),
        AiProviderKind::Replicate => Arc::new(Replicate::new(
            http.clone(),
            ai.replicate.token.clone()?,
            ai.replicate.model.clone(),
            params,
        )),
        AiProviderKind::OpenAi => Arc::new(OpenAi::new(
            http.clone(),
            ai.openai.token.clone()?,
            ai.openai.model.clone(),
            params,
        )),
        AiProviderKind::HuggingFace => Arc::new(HuggingFace::new(
            http.clone(),
            ai.huggingface.token.clone()?,
            ai.huggingface.model.clone(),
            params,
        )),
        AiProviderKind::None => return None,
    };
    Some(generator)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generator with a fixed answer, counting how often it was called.
    pub struct ScriptedGenerator {
        pub name: &'static str,
        pub reply: Result<String, String>,
        pub calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        pub fn replying(name: &'static str, text: &str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Err("connection refused".to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn name(&self) -> &'static str {
            self.name
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(ProviderError::invalid(self.name, message.clone())),
            }
        }
    }
}
