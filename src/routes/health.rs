use std::collections::BTreeMap;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    service: String,
    timestamp: String,
    version: String,
    environment: String,
    dependencies: BTreeMap<String, ServiceStatus>,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details.into()),
        }
    }

    fn error(details: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details.into()),
        }
    }
}

/*
    GET /
*/
pub async fn root(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": format!("Welcome to {} API", state.settings.app_name),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
    }))
}

/*
    GET /health
    Always 200; a failing dependency turns the overall status to "degraded".
*/
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut dependencies = BTreeMap::new();

    let store_status = match state.store.ping().await {
        Ok(()) => ServiceStatus::ok(state.store.backend_name()),
        Err(e) => {
            log::error!("Health check: store ping failed: {}", e);
            ServiceStatus::error(format!("{}: {}", state.store.backend_name(), e))
        }
    };
    dependencies.insert("database".to_string(), store_status);

    let model = state.ai.model_status();
    let ai_status = if model.available {
        ServiceStatus::ok(format!("{} ({})", model.provider, model.model))
    } else {
        ServiceStatus {
            status: "disabled".to_string(),
            details: Some("fallback data only".to_string()),
        }
    };
    dependencies.insert("ai_provider".to_string(), ai_status);

    let degraded = dependencies.values().any(|s| s.status == "error");
    let health = HealthStatus {
        status: if degraded { "degraded" } else { "healthy" }.to_string(),
        service: state.settings.app_name.clone(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.settings.environment.clone(),
        dependencies,
    };

    HttpResponse::Ok().json(health)
}
