use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::{GenerationParams, ProviderError, TextGenerator};

const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const WATSONX_API_VERSION: &str = "2023-05-29";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co/models";
const REPLICATE_URL: &str = "https://api.replicate.com/v1";

const OPENAI_SYSTEM_PROMPT: &str = "You are a travel planning assistant for Indonesia. Extract structured information from natural language travel queries and respond with valid JSON only.";

/// Sends the request and turns any non-success status into `ProviderError::Status`.
async fn send_checked(
    provider: &'static str,
    request: RequestBuilder,
    expected: StatusCode,
) -> Result<Response, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    if status != expected {
        let body = response.text().await.unwrap_or_default();
        log::warn!("{} API error: {} {}", provider, status, body);
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

// ---------------------------------------------------------------------------
// IBM Watson Orchestrate

pub struct WatsonOrchestrate {
    http: Client,
    api_key: String,
    url: String,
    project_id: Option<String>,
    model: String,
    params: GenerationParams,
}

impl WatsonOrchestrate {
    pub fn new(
        http: Client,
        api_key: String,
        url: String,
        project_id: Option<String>,
        model: String,
        params: GenerationParams,
    ) -> Self {
        Self {
            http,
            api_key,
            url,
            project_id,
            model,
            params,
        }
    }

    fn extract_text(body: &Value) -> Result<String, ProviderError> {
        text_at(body, "/generated_text")
            .map(str::to_string)
            .ok_or_else(|| ProviderError::invalid("ibm_watson", "missing generated_text"))
    }
}

#[async_trait]
impl TextGenerator for WatsonOrchestrate {
    fn name(&self) -> &'static str {
        "ibm_watson"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self
            .http
            .post(format!("{}/v1/generate", self.url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "max_tokens": self.params.max_tokens,
                "temperature": self.params.temperature,
                "project_id": self.project_id,
            }));

        let response = send_checked(self.name(), request, StatusCode::OK).await?;
        let body: Value = response.json().await?;
        Self::extract_text(&body)
    }
}

// ---------------------------------------------------------------------------
// IBM watsonx.ai

#[derive(Deserialize)]
struct IamToken {
    access_token: String,
    #[serde(default = "default_token_lifetime")]
    expires_in: u64,
}

fn default_token_lifetime() -> u64 {
    3600
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct Watsonx {
    http: Client,
    api_key: String,
    project_id: String,
    url: String,
    model: String,
    params: GenerationParams,
    token: Mutex<Option<CachedToken>>,
}

impl Watsonx {
    pub fn new(
        http: Client,
        api_key: String,
        project_id: String,
        url: String,
        model: String,
        params: GenerationParams,
    ) -> Self {
        Self {
            http,
            api_key,
            project_id,
            url,
            model,
            params,
            token: Mutex::new(None),
        }
    }

    /// IAM bearer token, refreshed a minute before it expires.
    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let request = self.http.post(IAM_TOKEN_URL).form(&[
            ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
            ("apikey", self.api_key.as_str()),
        ]);
        let response = send_checked(self.name(), request, StatusCode::OK).await?;
        let token: IamToken = response.json().await?;

        let lifetime = Duration::from_secs(token.expires_in.saturating_sub(60));
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model_id": self.model,
            "input": prompt,
            "project_id": self.project_id,
            "parameters": {
                "decoding_method": "greedy",
                "max_new_tokens": self.params.max_tokens,
                "min_new_tokens": 1,
                "temperature": self.params.temperature,
                "stop_sequences": ["\n\n"],
            }
        })
    }

    fn extract_text(body: &Value) -> Result<String, ProviderError> {
        text_at(body, "/results/0/generated_text")
            .map(str::to_string)
            .ok_or_else(|| ProviderError::invalid("ibm_watsonx", "missing results[0].generated_text"))
    }
}

#[async_trait]
impl TextGenerator for Watsonx {
    fn name(&self) -> &'static str {
        "ibm_watsonx"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let token = self.access_token().await?;
        let request = self
            .http
            .post(format!(
                "{}/ml/v1/text/generation?version={}",
                self.url.trim_end_matches('/'),
                WATSONX_API_VERSION
            ))
            .bearer_auth(token)
            .json(&self.request_body(prompt));

        let response = send_checked(self.name(), request, StatusCode::OK).await?;
        let body: Value = response.json().await?;
        Self::extract_text(&body)
    }
}

// ---------------------------------------------------------------------------
// OpenAI

pub struct OpenAi {
    http: Client,
    api_key: String,
    model: String,
    params: GenerationParams,
}

impl OpenAi {
    pub fn new(http: Client, api_key: String, model: String, params: GenerationParams) -> Self {
        Self {
            http,
            api_key,
            model,
            params,
        }
    }

    fn extract_text(body: &Value) -> Result<String, ProviderError> {
        let choices = body["choices"]
            .as_array()
            .ok_or_else(|| ProviderError::invalid("openai", "missing choices"))?;
        if choices.is_empty() {
            return Err(ProviderError::invalid("openai", "no completions returned"));
        }
        text_at(&choices[0], "/message/content")
            .map(str::to_string)
            .ok_or_else(|| ProviderError::invalid("openai", "missing message content"))
    }
}

#[async_trait]
impl TextGenerator for OpenAi {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self.http.post(OPENAI_URL).bearer_auth(&self.api_key).json(&json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": OPENAI_SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": self.params.temperature,
            "max_tokens": self.params.max_tokens,
        }));

        let response = send_checked(self.name(), request, StatusCode::OK).await?;
        let body: Value = response.json().await?;
        Self::extract_text(&body)
    }
}

// ---------------------------------------------------------------------------
// Hugging Face inference API

pub struct HuggingFace {
    http: Client,
    token: String,
    model: String,
    params: GenerationParams,
}

impl HuggingFace {
    pub fn new(http: Client, token: String, model: String, params: GenerationParams) -> Self {
        Self {
            http,
            token,
            model,
            params,
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut parameters = json!({
            "max_new_tokens": self.params.max_tokens,
            "temperature": self.params.temperature,
            "return_full_text": false,
        });
        if let Some(top_p) = self.params.top_p {
            parameters["top_p"] = json!(top_p);
            parameters["do_sample"] = json!(true);
        }
        json!({ "inputs": prompt, "parameters": parameters })
    }

    fn extract_text(body: &Value) -> Result<String, ProviderError> {
        text_at(body, "/0/generated_text")
            .map(str::to_string)
            .ok_or_else(|| ProviderError::invalid("huggingface", "expected [{generated_text}]"))
    }
}

#[async_trait]
impl TextGenerator for HuggingFace {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self
            .http
            .post(format!("{}/{}", HUGGINGFACE_URL, self.model))
            .bearer_auth(&self.token)
            .json(&self.request_body(prompt));

        let response = send_checked(self.name(), request, StatusCode::OK).await?;
        let body: Value = response.json().await?;
        Self::extract_text(&body)
    }
}

// ---------------------------------------------------------------------------
// Replicate

pub struct Replicate {
    http: Client,
    token: String,
    model: String,
    params: GenerationParams,
    poll_interval: Duration,
    max_polls: u32,
}

/// Where a prediction stands after one poll.
#[derive(Debug, PartialEq)]
enum PredictionState {
    Pending,
    Succeeded(String),
    Failed(String),
}

impl Replicate {
    pub fn new(http: Client, token: String, model: String, params: GenerationParams) -> Self {
        Self {
            http,
            token,
            model,
            params,
            poll_interval: Duration::from_secs(1),
            max_polls: 30,
        }
    }

    fn auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Token {}", self.token))
    }

    fn prediction_state(body: &Value) -> PredictionState {
        match body["status"].as_str() {
            Some("succeeded") => {
                let output = match &body["output"] {
                    Value::String(text) => text.clone(),
                    Value::Array(parts) => parts.iter().filter_map(Value::as_str).collect(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                PredictionState::Succeeded(output)
            }
            Some(status @ ("failed" | "canceled")) => PredictionState::Failed(
                body["error"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string()),
            ),
            _ => PredictionState::Pending,
        }
    }
}

#[async_trait]
impl TextGenerator for Replicate {
    fn name(&self) -> &'static str {
        "replicate"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let mut input = json!({
            "prompt": prompt,
            "max_tokens": self.params.max_tokens,
            "temperature": self.params.temperature,
        });
        if let Some(top_p) = self.params.top_p {
            input["top_p"] = json!(top_p);
        }

        let request = self
            .auth(
                self.http
                    .post(format!("{}/models/{}/predictions", REPLICATE_URL, self.model)),
            )
            .json(&json!({ "input": input }));
        let response = send_checked(self.name(), request, StatusCode::CREATED).await?;
        let prediction: Value = response.json().await?;
        let id = prediction["id"]
            .as_str()
            .ok_or_else(|| ProviderError::invalid("replicate", "prediction without id"))?
            .to_string();

        for _ in 0..self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            let request = self.auth(self.http.get(format!("{}/predictions/{}", REPLICATE_URL, id)));
            let response = request.send().await?;
            if response.status() != StatusCode::OK {
                continue;
            }
            let body: Value = response.json().await?;
            match Self::prediction_state(&body) {
                PredictionState::Succeeded(output) => return Ok(output),
                PredictionState::Failed(error) => {
                    log::error!("Replicate prediction failed: {}", error);
                    return Err(ProviderError::PredictionFailed(error));
                }
                PredictionState::Pending => {}
            }
        }

        log::error!("Replicate prediction {} timed out", id);
        Err(ProviderError::Timeout("replicate"))
    }
}
