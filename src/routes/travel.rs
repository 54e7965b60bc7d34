use actix_web::{web, HttpResponse};

use crate::errors::ApiError;
use crate::models::api::ApiResponse;
use crate::models::itinerary::{ItineraryGenerationRequest, ItineraryUpdate};
use crate::models::query::TravelQueryRequest;
use crate::services::itinerary_service;
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/query", web::post().to(process_query))
        .route("/generate-itinerary", web::post().to(generate_itinerary))
        .route("/itinerary/{id}", web::get().to(get_itinerary))
        .route("/itinerary/{id}", web::put().to(update_itinerary))
        .route("/itinerary/{id}", web::delete().to(delete_itinerary));
}

/*
    POST /api/v1/travel/query
    Explicit fields in the body win over what was parsed from the text.
*/
pub async fn process_query(
    state: web::Data<AppState>,
    body: web::Json<TravelQueryRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let preview: String = body.query.chars().take(100).collect();
    log::info!("Processing travel query: {}...", preview);

    let mut parsed = state.ai.parse_travel_query(&body.query).await;
    parsed.data.merge_request(&body);

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Travel query processed successfully",
        parsed,
    )))
}

/*
    POST /api/v1/travel/generate-itinerary
*/
pub async fn generate_itinerary(
    state: web::Data<AppState>,
    body: web::Json<ItineraryGenerationRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    log::info!(
        "Generating itinerary for {}, {} days",
        body.destination,
        body.duration
    );

    let response = itinerary_service::generate(state.store.as_ref(), &state.ai, &body)
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;

    let ids = response.itinerary.destination_ids();
    let store = state.store.clone();
    let ai = state.ai.clone();
    actix_web::rt::spawn(async move {
        itinerary_service::update_destination_sentiments(store.as_ref(), &ai, ids).await;
    });

    Ok(HttpResponse::Ok().json(response))
}

/*
    GET /api/v1/travel/itinerary/{id}
*/
pub async fn get_itinerary(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let itinerary = itinerary_service::get(state.store.as_ref(), &path)
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(itinerary)))
}

/*
    PUT /api/v1/travel/itinerary/{id}
*/
pub async fn update_itinerary(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ItineraryUpdate>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let itinerary = itinerary_service::update(state.store.as_ref(), &path, body.into_inner())
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Itinerary updated successfully",
        itinerary,
    )))
}

/*
    DELETE /api/v1/travel/itinerary/{id}
*/
pub async fn delete_itinerary(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    itinerary_service::delete(state.store.as_ref(), &path)
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Itinerary deleted successfully")))
}
