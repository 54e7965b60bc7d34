use chrono::{Local, NaiveDate, Utc};

use crate::db::Store;
use crate::errors::ServiceError;
use crate::models::destination::{
    Destination, DestinationCategory, GeoLocation, OpeningHours, PriceRange,
};
use crate::models::itinerary::{
    day_date, Itinerary, ItineraryDay, ItineraryGenerationRequest, ItineraryGenerationResponse,
    ItineraryItem, ItineraryStatus, ItineraryUpdate,
};
use crate::services::ai::ai_service::AiService;
use crate::services::sentiment_service;

const CONFIDENCE_SCORE: f64 = 0.85;
const ITEMS_PER_DAY: usize = 3;
const VISIT_MINUTES: u32 = 120;

struct MockSpot {
    name: &'static str,
    description: &'static str,
    category: DestinationCategory,
    city: &'static str,
    latitude: f64,
    longitude: f64,
}

const BALI_SPOTS: [MockSpot; 3] = [
    MockSpot {
        name: "Pantai Kuta",
        description: "Pantai terkenal dengan sunset yang indah",
        category: DestinationCategory::Beach,
        city: "Badung",
        latitude: -8.7205,
        longitude: 115.1693,
    },
    MockSpot {
        name: "Pura Tanah Lot",
        description: "Pura Hindu yang ikonik di atas batu karang",
        category: DestinationCategory::Religious,
        city: "Tabanan",
        latitude: -8.6211,
        longitude: 115.0868,
    },
    MockSpot {
        name: "Ubud Monkey Forest",
        description: "Hutan suci dengan monyet dan pura kuno",
        category: DestinationCategory::Nature,
        city: "Ubud",
        latitude: -8.5069,
        longitude: 115.2581,
    },
];

/// Places visited by the generated schedule. Bali requests get three fixed
/// spots, anything else a single generic one.
fn mock_destinations(destination_name: &str) -> Vec<Destination> {
    let is_bali = destination_name.to_lowercase().contains("bali");
    let province = if is_bali { "Bali" } else { "Indonesia" };

    let spots: Vec<(String, String, DestinationCategory, String, f64, f64)> = if is_bali {
        BALI_SPOTS
            .iter()
            .map(|s| {
                (
                    s.name.to_string(),
                    s.description.to_string(),
                    s.category,
                    s.city.to_string(),
                    s.latitude,
                    s.longitude,
                )
            })
            .collect()
    } else {
        vec![(
            format!("Destinasi Utama {}", destination_name),
            format!("Tempat wisata populer di {}", destination_name),
            DestinationCategory::Cultural,
            destination_name.to_string(),
            -6.2088,
            106.8456,
        )]
    };

    let now = Utc::now();
    spots
        .into_iter()
        .enumerate()
        .map(|(i, (name, description, category, city, latitude, longitude))| Destination {
            id: uuid::Uuid::new_v4().to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            location: GeoLocation {
                latitude,
                longitude,
                address: format!("Alamat {}", name),
                city,
                province: province.to_string(),
                country: "Indonesia".to_string(),
            },
            name,
            description,
            category,
            images: vec![format!("https://example.com/image{}.jpg", i + 1)],
            rating: 4.2 + 0.2 * i as f64,
            review_count: 150 + 50 * i as u32,
            price_range: PriceRange::Moderate,
            entry_fee: None,
            opening_hours: OpeningHours::new(),
            is_active: true,
            is_featured: false,
            facilities: vec!["Parkir".into(), "Toilet".into(), "Warung".into()],
            tags: vec!["populer".into(), "instagramable".into()],
            sentiment: None,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Lays the places out over the requested number of days. Fails when the
/// trip would run past the last representable date.
pub fn assemble(
    request: &ItineraryGenerationRequest,
    places: &[Destination],
    start: NaiveDate,
) -> Result<Itinerary, ServiceError> {
    let end_date = day_date(start, request.duration.max(1))?;
    let days = (1..=request.duration)
        .map(|n| -> Result<ItineraryDay, ServiceError> {
            let items: Vec<ItineraryItem> = places
                .iter()
                .take(ITEMS_PER_DAY)
                .enumerate()
                .map(|(i, place)| {
                    let slot = 3 * i as u32;
                    ItineraryItem {
                        id: uuid::Uuid::new_v4().to_string(),
                        destination: place.clone(),
                        start_time: format!("{:02}:00", 9 + slot),
                        end_time: format!("{:02}:00", 11 + slot),
                        duration: VISIT_MINUTES,
                        estimated_cost: 100_000.0 + 50_000.0 * i as f64,
                        notes: Some(format!("Kunjungan ke {}", place.name)),
                        transportation_to_next: None,
                    }
                })
                .collect();

            let mut day = ItineraryDay {
                day: n,
                date: day_date(start, n)?,
                items,
                total_cost: 0.0,
                notes: Some(format!("Hari {} - Eksplorasi {}", n, request.destination)),
            };
            day.total_cost = day.items_cost();
            Ok(day)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let now = Utc::now();
    Ok(Itinerary {
        id: uuid::Uuid::new_v4().to_string(),
        title: format!("Perjalanan {} Hari ke {}", request.duration, request.destination),
        description: format!(
            "Itinerary {} hari untuk {} orang di {}",
            request.duration, request.traveler_count, request.destination
        ),
        total_cost: days.iter().map(|d| d.total_cost).sum(),
        days,
        total_duration: request.duration,
        traveler_count: request.traveler_count,
        traveler_type: request.traveler_type,
        start_date: start,
        end_date,
        is_public: false,
        status: ItineraryStatus::Draft,
        ai_generated: true,
        ai_confidence: Some(CONFIDENCE_SCORE),
        ai_reasoning: None,
        user_id: None,
        created_at: now,
        updated_at: now,
    })
}

/// Builds, narrates and stores a new itinerary.
pub async fn generate(
    store: &dyn Store,
    ai: &AiService,
    request: &ItineraryGenerationRequest,
) -> Result<ItineraryGenerationResponse, ServiceError> {
    let mut places = mock_destinations(&request.destination);

    // Places that exist in the catalog keep their catalog id.
    let catalog = store.active_destinations().await?;
    for place in &mut places {
        if let Some(known) = catalog.iter().find(|d| d.name.eq_ignore_ascii_case(&place.name)) {
            place.id = known.id.clone();
        }
    }

    let start = request
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let mut itinerary = assemble(request, &places, start)?;

    let narration = ai.narrate_itinerary(request).await;
    itinerary.ai_reasoning = Some(narration.data.reasoning.clone());

    store.insert_itinerary(&itinerary).await?;
    log::info!(
        "Generated itinerary {} ({} days, {} via {})",
        itinerary.id,
        itinerary.total_duration,
        narration.source.as_str(),
        narration.provider
    );

    Ok(ItineraryGenerationResponse {
        itinerary,
        ai_reasoning: narration.data.reasoning,
        confidence_score: CONFIDENCE_SCORE,
        alternative_suggestions: narration.data.alternatives,
        source: narration.source.as_str().to_string(),
        degraded: narration.degraded,
    })
}

pub async fn get(store: &dyn Store, id: &str) -> Result<Itinerary, ServiceError> {
    store
        .get_itinerary(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Itinerary {} not found", id)))
}

pub async fn update(
    store: &dyn Store,
    id: &str,
    changes: ItineraryUpdate,
) -> Result<Itinerary, ServiceError> {
    let mut itinerary = get(store, id).await?;
    changes.apply(&mut itinerary)?;

    if !store.replace_itinerary(&itinerary).await? {
        return Err(ServiceError::NotFound(format!("Itinerary {} not found", id)));
    }
    Ok(itinerary)
}

pub async fn delete(store: &dyn Store, id: &str) -> Result<(), ServiceError> {
    if store.delete_itinerary(id).await? {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("Itinerary {} not found", id)))
    }
}

/// Refreshes sentiment for each catalog destination in `ids`. Unknown ids
/// are skipped; failures are logged and never returned.
pub async fn update_destination_sentiments(store: &dyn Store, ai: &AiService, ids: Vec<String>) {
    let mut ids = ids;
    ids.sort();
    ids.dedup();
    log::info!("Updating sentiment analysis for {} destinations", ids.len());

    for id in ids {
        match sentiment_service::analyze_destination_sentiment(store, ai, &id, true).await {
            Ok(_) => {}
            Err(ServiceError::NotFound(_)) => {
                log::debug!("Skipping sentiment for {}: not in catalog", id)
            }
            Err(e) => log::error!("Error updating sentiment for {}: {}", id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::seed::seed_database;
    use crate::db::{DestinationStore, SentimentStore};
    use crate::models::query::{ActivityLevel, TravelerType};
    use crate::services::ai::fallback::ITINERARY_REASONING;

    fn request(destination: &str, duration: u32) -> ItineraryGenerationRequest {
        ItineraryGenerationRequest {
            destination: destination.to_string(),
            duration,
            budget: 5_000_000.0,
            traveler_count: 4,
            traveler_type: TravelerType::Family,
            interests: vec!["pantai".to_string()],
            activity_level: ActivityLevel::Moderate,
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1),
        }
    }

    #[test]
    fn test_bali_schedule_totals() {
        let req = request("Bali", 3);
        let places = mock_destinations(&req.destination);
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let itinerary = assemble(&req, &places, start).unwrap();

        assert_eq!(itinerary.days.len(), 3);
        for day in &itinerary.days {
            assert_eq!(day.items.len(), 3);
            assert_eq!(day.total_cost, day.items_cost());
            assert_eq!(day.total_cost, 450_000.0);
        }
        assert_eq!(itinerary.total_cost, 1_350_000.0);
        assert_eq!(itinerary.days[2].date, NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        assert_eq!(itinerary.end_date, NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());

        let first = &itinerary.days[0].items[0];
        assert_eq!(first.start_time, "09:00");
        assert_eq!(first.end_time, "11:00");
        assert_eq!(itinerary.days[0].items[2].start_time, "15:00");
        assert_eq!(itinerary.title, "Perjalanan 3 Hari ke Bali");
        assert_eq!(itinerary.description, "Itinerary 3 hari untuk 4 orang di Bali");
    }

    #[test]
    fn test_assemble_rejects_trip_past_last_date() {
        let req = request("Bali", 3);
        let places = mock_destinations(&req.destination);
        let start = NaiveDate::MAX.pred_opt().unwrap();

        let err = assemble(&req, &places, start).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let one_day = request("Bali", 2);
        assert!(assemble(&one_day, &places, start).is_ok());
    }

    #[test]
    fn test_generic_destination() {
        let places = mock_destinations("Makassar");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Destinasi Utama Makassar");
        assert_eq!(places[0].location.city, "Makassar");
        assert_eq!(places[0].location.province, "Indonesia");
        assert_eq!(places[0].category, DestinationCategory::Cultural);
    }

    #[test]
    fn test_mock_destination_attributes() {
        let places = mock_destinations("bali selatan");
        assert!((places[1].rating - 4.4).abs() < 1e-9);
        assert_eq!(places[2].review_count, 250);
        assert_eq!(places[0].images, vec!["https://example.com/image1.jpg"]);
        assert_eq!(places[0].location.address, "Alamat Pantai Kuta");
    }

    #[tokio::test]
    async fn test_generate_persists_and_reuses_catalog_ids() {
        let store = MemoryStore::new();
        seed_database(&store).await.unwrap();
        let ai = AiService::with_generator(None);

        let response = generate(&store, &ai, &request("Bali", 2)).await.unwrap();
        assert_eq!(response.source, "fallback");
        assert!(!response.degraded);
        assert_eq!(response.ai_reasoning, ITINERARY_REASONING);
        assert_eq!(response.confidence_score, 0.85);
        assert_eq!(response.alternative_suggestions.len(), 2);

        let stored = get(&store, &response.itinerary.id).await.unwrap();
        assert_eq!(stored.days.len(), 2);

        let kuta = store
            .active_destinations()
            .await
            .unwrap()
            .into_iter()
            .find(|d| d.name == "Pantai Kuta")
            .unwrap();
        assert!(stored.destination_ids().contains(&kuta.id));

        update_destination_sentiments(&store, &ai, stored.destination_ids()).await;
        assert!(store.get_sentiment(&kuta.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let ai = AiService::with_generator(None);
        let response = generate(&store, &ai, &request("Lombok", 2)).await.unwrap();
        let id = response.itinerary.id.clone();

        let changes = ItineraryUpdate {
            title: Some("Lombok Santai".to_string()),
            status: Some(ItineraryStatus::Published),
            start_date: NaiveDate::from_ymd_opt(2025, 8, 10),
            ..Default::default()
        };
        let updated = update(&store, &id, changes).await.unwrap();
        assert_eq!(updated.title, "Lombok Santai");
        assert_eq!(updated.days[1].date, NaiveDate::from_ymd_opt(2025, 8, 11).unwrap());
        assert_eq!(get(&store, &id).await.unwrap().status, ItineraryStatus::Published);

        delete(&store, &id).await.unwrap();
        assert!(matches!(get(&store, &id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete(&store, &id).await, Err(ServiceError::NotFound(_))));
    }
}
