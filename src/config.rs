use std::env;
use std::fmt;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE: &str = "jelajah_nusantara";

/// Which text-generation backend the AI features talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProviderKind {
    IbmWatson,
    IbmWatsonx,
    Replicate,
    OpenAi,
    HuggingFace,
    None,
}

impl AiProviderKind {
    /// Unknown names resolve to `None` so a typo in the environment disables AI
    /// instead of failing startup.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "ibm_watson" => AiProviderKind::IbmWatson,
            "ibm_watsonx" => AiProviderKind::IbmWatsonx,
            "replicate" => AiProviderKind::Replicate,
            "openai" => AiProviderKind::OpenAi,
            "huggingface" => AiProviderKind::HuggingFace,
            _ => AiProviderKind::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiProviderKind::IbmWatson => "ibm_watson",
            AiProviderKind::IbmWatsonx => "ibm_watsonx",
            AiProviderKind::Replicate => "replicate",
            AiProviderKind::OpenAi => "openai",
            AiProviderKind::HuggingFace => "huggingface",
            AiProviderKind::None => "none",
        }
    }
}

impl fmt::Display for AiProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct WatsonSettings {
    pub api_key: Option<String>,
    pub url: String,
    pub project_id: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct WatsonxSettings {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct TokenModelSettings {
    pub token: Option<String>,
    pub model: String,
}

/// Credentials for every supported provider. Only the selected one is used by
/// `AiService`; the provider chain looks at several of them.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub provider: AiProviderKind,
    pub watson: WatsonSettings,
    pub watsonx: WatsonxSettings,
    pub replicate: TokenModelSettings,
    pub openai: TokenModelSettings,
    pub huggingface: TokenModelSettings,
}

/// The provider that will actually be called, after checking credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAiConfig {
    pub provider: AiProviderKind,
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub debug: bool,
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub allowed_origins: Vec<String>,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub ai: AiSettings,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    var(name).unwrap_or_else(|| default.to_string())
}

impl Settings {
    /// Reads the process environment. Call `dotenv` before this if a `.env`
    /// file should be honoured.
    pub fn from_env() -> Self {
        let port = var("PORT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(default_origins);

        Self {
            app_name: var_or("APP_NAME", "Jelajah Nusantara AI"),
            debug: var("DEBUG").is_some_and(|value| value.eq_ignore_ascii_case("true")),
            environment: var_or("ENVIRONMENT", "development"),
            host: var_or("HOST", DEFAULT_HOST),
            port,
            log_level: var_or("LOG_LEVEL", "info").to_lowercase(),
            allowed_origins,
            mongodb_uri: var("MONGODB_URI"),
            mongodb_database: var_or("MONGODB_DATABASE", DEFAULT_DATABASE),
            ai: AiSettings {
                provider: AiProviderKind::parse(&var_or("AI_PROVIDER", "none")),
                watson: WatsonSettings {
                    api_key: var("IBM_WATSON_API_KEY"),
                    url: var_or("IBM_WATSON_URL", "https://dl.watson-orchestrate.ibm.com"),
                    project_id: var("IBM_WATSON_PROJECT_ID"),
                    model: var_or("IBM_WATSON_MODEL", "granite-13b-chat-v2"),
                },
                watsonx: WatsonxSettings {
                    api_key: var("IBM_WATSONX_API_KEY"),
                    project_id: var("IBM_WATSONX_PROJECT_ID"),
                    url: var_or("IBM_WATSONX_URL", "https://us-south.ml.cloud.ibm.com"),
                    model: var_or("IBM_WATSONX_MODEL", "granite-13b-chat-v2"),
                },
                replicate: TokenModelSettings {
                    token: var("REPLICATE_API_TOKEN"),
                    model: var_or("REPLICATE_MODEL", "ibm-granite/granite-3.3-8b-instruct"),
                },
                openai: TokenModelSettings {
                    token: var("OPENAI_API_KEY"),
                    model: var_or("OPENAI_MODEL", "gpt-3.5-turbo"),
                },
                huggingface: TokenModelSettings {
                    token: var("HUGGINGFACE_API_TOKEN"),
                    model: var_or("HUGGINGFACE_MODEL", "mistralai/Mistral-7B-Instruct-v0.2"),
                },
            },
        }
    }

    /// Resolves the configured provider against the credentials that are
    /// present. A provider without credentials becomes `none`.
    pub fn ai_config(&self) -> ResolvedAiConfig {
        let ai = &self.ai;
        let model = match ai.provider {
            AiProviderKind::IbmWatson if ai.watson.api_key.is_some() => Some(&ai.watson.model),
            AiProviderKind::IbmWatsonx
                if ai.watsonx.api_key.is_some() && ai.watsonx.project_id.is_some() =>
            {
                Some(&ai.watsonx.model)
            }
            AiProviderKind::Replicate if ai.replicate.token.is_some() => Some(&ai.replicate.model),
            AiProviderKind::OpenAi if ai.openai.token.is_some() => Some(&ai.openai.model),
            AiProviderKind::HuggingFace if ai.huggingface.token.is_some() => {
                Some(&ai.huggingface.model)
            }
            _ => None,
        };

        match model {
            Some(model) => ResolvedAiConfig {
                provider: ai.provider,
                model: Some(model.clone()),
            },
            None => ResolvedAiConfig {
                provider: AiProviderKind::None,
                model: None,
            },
        }
    }
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://localhost:8080".to_string(),
    ]
}

impl Default for Settings {
    /// Settings with no external services configured: in-memory store, AI off.
    fn default() -> Self {
        let unset = |model: &str| TokenModelSettings {
            token: None,
            model: model.to_string(),
        };

        Self {
            app_name: "Jelajah Nusantara AI".to_string(),
            debug: false,
            environment: "development".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            allowed_origins: default_origins(),
            mongodb_uri: None,
            mongodb_database: DEFAULT_DATABASE.to_string(),
            ai: AiSettings {
                provider: AiProviderKind::None,
                watson: WatsonSettings {
                    api_key: None,
                    url: "https://dl.watson-orchestrate.ibm.com".to_string(),
                    project_id: None,
                    model: "granite-13b-chat-v2".to_string(),
                },
                watsonx: WatsonxSettings {
                    api_key: None,
                    project_id: None,
                    url: "https://us-south.ml.cloud.ibm.com".to_string(),
                    model: "granite-13b-chat-v2".to_string(),
                },
                replicate: unset("ibm-granite/granite-3.3-8b-instruct"),
                openai: unset("gpt-3.5-turbo"),
                huggingface: unset("mistralai/Mistral-7B-Instruct-v0.2"),
            },
        }
    }
}
