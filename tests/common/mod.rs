#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{web, App};
use async_trait::async_trait;

use jelajah_api::config::Settings;
use jelajah_api::db::memory::MemoryStore;
use jelajah_api::db::seed::seed_database;
use jelajah_api::db::DestinationStore;
use jelajah_api::models::destination::Destination;
use jelajah_api::routes;
use jelajah_api::services::ai::ai_service::AiService;
use jelajah_api::services::ai::multi_ai_service::MultiAiService;
use jelajah_api::services::ai::{ProviderError, TextGenerator};
use jelajah_api::state::AppState;

/// A provider that is configured but never answers.
pub struct UnreachableProvider;

#[async_trait]
impl TextGenerator for UnreachableProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        "gpt-3.5-turbo"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Timeout("openai"))
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// Seeded in-memory store, AI disabled.
    pub async fn new() -> Self {
        Self::with_ai(AiService::with_generator(None), MultiAiService::with_chain(Vec::new())).await
    }

    /// Same as `new`, but every AI call goes to a provider that fails.
    pub async fn with_failing_ai() -> Self {
        let provider: Arc<dyn TextGenerator> = Arc::new(UnreachableProvider);
        Self::with_ai(
            AiService::with_generator(Some(provider.clone())),
            MultiAiService::with_chain(vec![provider]),
        )
        .await
    }

    async fn with_ai(ai: AiService, multi_ai: MultiAiService) -> Self {
        let store = Arc::new(MemoryStore::new());
        seed_database(store.as_ref())
            .await
            .expect("seeding the in-memory store");

        let state = AppState::new(Settings::default(), store.clone(), ai, multi_ai);
        Self { state, store }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .configure(routes::configure)
    }

    pub async fn destination_named(&self, name: &str) -> Destination {
        self.store
            .active_destinations()
            .await
            .expect("listing destinations")
            .into_iter()
            .find(|d| d.name == name)
            .unwrap_or_else(|| panic!("seeded destination {} missing", name))
    }
}
