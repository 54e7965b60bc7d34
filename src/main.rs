use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use jelajah_api::config::Settings;
use jelajah_api::db::memory::MemoryStore;
use jelajah_api::db::mongo::{create_mongo_client, MongoStore};
use jelajah_api::db::seed::seed_database;
use jelajah_api::db::Store;
use jelajah_api::routes;
use jelajah_api::services::ai::ai_service::AiService;
use jelajah_api::services::ai::http_client;
use jelajah_api::services::ai::multi_ai_service::MultiAiService;
use jelajah_api::state::AppState;

fn cors(origins: &[String]) -> Cors {
    let cors = if origins.iter().any(|origin| origin == "*") {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

async fn open_store(settings: &Settings) -> std::io::Result<Arc<dyn Store>> {
    let Some(uri) = settings.mongodb_uri.as_deref() else {
        log::warn!("MONGODB_URI not set, using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    log::info!("Got MongoDB URI, attempting connection...");
    let client = create_mongo_client(uri)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let store = MongoStore::new(&client, &settings.mongodb_database);
    store
        .ensure_indexes()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(Arc::new(store))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let settings = Settings::from_env();
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));
    log::info!(
        "Starting {} ({})",
        settings.app_name,
        settings.environment
    );

    let store = open_store(&settings).await?;
    match seed_database(store.as_ref()).await {
        Ok(true) => log::info!("Seeded sample destinations"),
        Ok(false) => log::info!("Destinations already present, skipping seed"),
        Err(e) => log::error!("Seeding failed: {}", e),
    }

    let http = http_client().map_err(|e| std::io::Error::other(e.to_string()))?;
    let ai = AiService::new(&settings, &http);
    let multi_ai = MultiAiService::from_settings(&settings.ai, &http);

    let host = settings.host.clone();
    let port = settings.port;
    let state = AppState::new(settings, store, ai, multi_ai);

    log::info!("Attempting to bind to {}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&state.settings.allowed_origins))
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
