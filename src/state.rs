use std::sync::Arc;

use crate::config::Settings;
use crate::db::Store;
use crate::services::ai::ai_service::AiService;
use crate::services::ai::multi_ai_service::MultiAiService;

/// Shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn Store>,
    pub ai: Arc<AiService>,
    pub multi_ai: Arc<MultiAiService>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        store: Arc<dyn Store>,
        ai: AiService,
        multi_ai: MultiAiService,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
            ai: Arc::new(ai),
            multi_ai: Arc::new(multi_ai),
        }
    }
}
