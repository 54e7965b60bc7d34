use actix_web::{web, HttpResponse};

use crate::errors::ApiError;
use crate::models::ai::{
    BudgetEstimateRequest, ChatReply, ChatRequest, OptimizeRouteRequest, TravelPlanRequest,
};
use crate::models::api::ApiResponse;
use crate::models::query::{ParsedTravelQuery, TravelQueryRequest};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/parse-query", web::post().to(parse_query))
        .route("/recommendations", web::post().to(recommendations))
        .route("/optimize-route", web::post().to(optimize_route))
        .route("/model-status", web::get().to(model_status))
        .route("/chat", web::post().to(chat))
        .route("/budget-estimate", web::post().to(budget_estimate))
        .route("/travel-plan", web::post().to(travel_plan));
}

/*
    POST /api/v1/ai/parse-query
*/
pub async fn parse_query(
    state: web::Data<AppState>,
    body: web::Json<TravelQueryRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let preview: String = body.query.chars().take(100).collect();
    log::info!("Parsing query: {}...", preview);

    let parsed = state.ai.parse_travel_query(&body.query).await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Query parsed successfully",
        parsed,
    )))
}

/*
    POST /api/v1/ai/recommendations
*/
pub async fn recommendations(
    state: web::Data<AppState>,
    body: web::Json<ParsedTravelQuery>,
) -> Result<HttpResponse, ApiError> {
    let result = state.ai.recommend(&body).await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Recommendations generated successfully",
        result,
    )))
}

/*
    POST /api/v1/ai/optimize-route
*/
pub async fn optimize_route(
    state: web::Data<AppState>,
    body: web::Json<OptimizeRouteRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let result = state
        .ai
        .optimize_route(&body.destinations, &body.start_location, &body.preferences)
        .await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Route optimized successfully",
        result,
    )))
}

/*
    GET /api/v1/ai/model-status
*/
pub async fn model_status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Model status retrieved successfully",
        state.ai.model_status(),
    ))
}

/*
    POST /api/v1/ai/chat
*/
pub async fn chat(
    state: web::Data<AppState>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let ChatRequest { message, context } = body.into_inner();

    let outcome = state.ai.chat(&message, context.as_ref()).await;
    let reply = ChatReply {
        response: outcome.data,
        context,
        source: outcome.source.as_str().to_string(),
        degraded: outcome.degraded,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message("Chat response generated", reply)))
}

/*
    POST /api/v1/ai/budget-estimate
*/
pub async fn budget_estimate(
    state: web::Data<AppState>,
    body: web::Json<BudgetEstimateRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let result = state
        .ai
        .estimate_budget(
            &body.destination,
            body.duration,
            body.traveler_count,
            &body.comfort_level,
        )
        .await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Budget estimated successfully",
        result,
    )))
}

/*
    POST /api/v1/ai/travel-plan
*/
pub async fn travel_plan(
    state: web::Data<AppState>,
    body: web::Json<TravelPlanRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let plan = state
        .multi_ai
        .process_travel_query(&body.query, body.preferences.as_ref())
        .await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Travel plan generated successfully",
        plan,
    )))
}
