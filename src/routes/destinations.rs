use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::errors::ApiError;
use crate::models::api::{ApiResponse, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::destination::{DestinationCategory, DestinationFilter, PriceRange};
use crate::models::review::NewReview;
use crate::models::sentiment::SentimentAnalysisRequest;
use crate::services::{destination_service, review_service, sentiment_service};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Fixed paths first so they are not captured by `/{id}`.
    cfg.route("/search", web::get().to(search))
        .route("/categories/list", web::get().to(categories))
        .route("/nearby/{id}", web::get().to(nearby))
        .route("/sentiment-analysis", web::post().to(sentiment_analysis))
        .route("", web::get().to(list))
        .route("/", web::get().to(list))
        .route("/{id}", web::get().to(get_destination))
        .route("/{id}/reviews", web::get().to(list_reviews))
        .route("/{id}/reviews", web::post().to(create_review));
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl PageParams {
    fn validate(&self) -> Result<Page, ApiError> {
        if self.page < 1 {
            return Err(ApiError::validation("page must be at least 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ApiError::validation(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Page::new(self.page, self.page_size))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<DestinationCategory>,
    pub price_range: Option<PriceRange>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub min_rating: Option<f64>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    #[serde(default = "default_radius")]
    pub radius_km: f64,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_radius() -> f64 {
    destination_service::DEFAULT_RADIUS_KM
}

fn default_limit() -> usize {
    destination_service::DEFAULT_NEARBY_LIMIT
}

/*
    GET /api/v1/destinations/search
*/
pub async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();
    let page = PageParams {
        page: params.page,
        page_size: params.page_size,
    }
    .validate()?;
    if params
        .min_rating
        .is_some_and(|r| !(0.0..=5.0).contains(&r))
    {
        return Err(ApiError::validation("min_rating must be between 0 and 5"));
    }

    let filter = DestinationFilter {
        query: params.q,
        category: params.category,
        price_range: params.price_range,
        city: params.city,
        province: params.province,
        min_rating: params.min_rating,
    };
    let response = destination_service::search(state.store.as_ref(), filter, page)
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(response))
}

/*
    GET /api/v1/destinations/categories/list
*/
pub async fn categories() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(destination_service::categories()))
}

/*
    GET /api/v1/destinations/nearby/{id}?radius_km=50&limit=10
*/
pub async fn nearby(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<NearbyParams>,
) -> Result<HttpResponse, ApiError> {
    if !(1.0..=200.0).contains(&params.radius_km) {
        return Err(ApiError::validation("radius_km must be between 1 and 200"));
    }
    if !(1..=50).contains(&params.limit) {
        return Err(ApiError::validation("limit must be between 1 and 50"));
    }

    let hits = destination_service::nearby(
        state.store.as_ref(),
        &path,
        params.radius_km,
        params.limit,
    )
    .await
    .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(hits)))
}

/*
    POST /api/v1/destinations/sentiment-analysis
*/
pub async fn sentiment_analysis(
    state: web::Data<AppState>,
    body: web::Json<SentimentAnalysisRequest>,
) -> Result<HttpResponse, ApiError> {
    let analysis = sentiment_service::analyze_destination_sentiment(
        state.store.as_ref(),
        &state.ai,
        &body.destination_id,
        body.force_refresh,
    )
    .await
    .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        "Sentiment analysis completed",
        analysis,
    )))
}

/*
    GET /api/v1/destinations/
*/
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let page = params.validate()?;
    let response = destination_service::list(state.store.as_ref(), page)
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(response))
}

/*
    GET /api/v1/destinations/{id}
*/
pub async fn get_destination(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let destination = destination_service::get(state.store.as_ref(), &path)
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(destination)))
}

/*
    GET /api/v1/destinations/{id}/reviews
*/
pub async fn list_reviews(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let reviews = review_service::list(state.store.as_ref(), &path)
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(reviews)))
}

/*
    POST /api/v1/destinations/{id}/reviews
*/
pub async fn create_review(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NewReview>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let review = review_service::create(state.store.as_ref(), &path, body.into_inner())
        .await
        .map_err(|e| e.into_api(state.settings.debug))?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message("Review created", review)))
}
