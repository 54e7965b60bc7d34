use crate::db::Store;
use crate::errors::ServiceError;
use crate::models::api::{Page, PaginatedResponse};
use crate::models::destination::{
    non_empty, Destination, DestinationCategory, DestinationFilter, DestinationSearchResponse,
    NearbyDestination,
};
use crate::models::sentiment::SentimentSnapshot;

const EARTH_RADIUS_KM: f64 = 6371.0;

pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_NEARBY_LIMIT: usize = 10;

pub async fn search(
    store: &dyn Store,
    filter: DestinationFilter,
    page: Page,
) -> Result<DestinationSearchResponse, ServiceError> {
    let (destinations, total) = store.search_destinations(&filter, page).await?;
    log::debug!(
        "Destination search {:?} matched {} rows, returning {}",
        filter,
        total,
        destinations.len()
    );

    Ok(DestinationSearchResponse {
        destinations,
        total,
        query: non_empty(&filter.query).unwrap_or_default().to_string(),
        filters_applied: filter.applied(),
    })
}

/// Fetches one destination with its latest sentiment attached.
pub async fn get(store: &dyn Store, id: &str) -> Result<Destination, ServiceError> {
    let mut destination = store
        .get_destination(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Destination {} not found", id)))?;

    if let Some(analysis) = store.get_sentiment(id).await? {
        destination.sentiment = Some(SentimentSnapshot::from(&analysis));
    }
    Ok(destination)
}

pub async fn list(
    store: &dyn Store,
    page: Page,
) -> Result<PaginatedResponse<Destination>, ServiceError> {
    let (items, total) = store
        .search_destinations(&DestinationFilter::default(), page)
        .await?;
    Ok(PaginatedResponse::new(items, total, page))
}

pub fn categories() -> Vec<&'static str> {
    DestinationCategory::ALL.iter().map(|c| c.as_str()).collect()
}

/// Active destinations within `radius_km` of the origin, closest first.
pub async fn nearby(
    store: &dyn Store,
    id: &str,
    radius_km: f64,
    limit: usize,
) -> Result<Vec<NearbyDestination>, ServiceError> {
    let origin = store
        .get_destination(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Destination {} not found", id)))?;
    let from = origin.location.coordinates();

    let mut hits: Vec<NearbyDestination> = store
        .active_destinations()
        .await?
        .into_iter()
        .filter(|d| d.id != origin.id)
        .map(|d| {
            let distance_km = haversine_km(from, d.location.coordinates());
            NearbyDestination {
                destination: d,
                distance_km: (distance_km * 100.0).round() / 100.0,
            }
        })
        .filter(|hit| hit.distance_km <= radius_km)
        .collect();

    hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    hits.truncate(limit);
    Ok(hits)
}

/// Great-circle distance between two (latitude, longitude) points.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let lat1_rad = from.0.to_radians();
    let lat2_rad = to.0.to_radians();
    let delta_lat = (to.0 - from.0).to_radians();
    let delta_lon = (to.1 - from.1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
