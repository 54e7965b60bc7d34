use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{DestinationStore, ItineraryStore, ReviewStore, SentimentStore, Store, StoreError};
use crate::models::api::Page;
use crate::models::destination::{Destination, DestinationFilter, Facility, Tag};
use crate::models::itinerary::Itinerary;
use crate::models::review::Review;
use crate::models::sentiment::SentimentAnalysis;

/// Process-local store used when no MongoDB URI is configured and in tests.
/// Collections keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    destinations: RwLock<Vec<Destination>>,
    tags: RwLock<Vec<Tag>>,
    facilities: RwLock<Vec<Facility>>,
    itineraries: RwLock<Vec<Itinerary>>,
    reviews: RwLock<Vec<Review>>,
    sentiments: RwLock<Vec<SentimentAnalysis>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn tag_count(&self) -> usize {
        self.tags.read().await.len()
    }

    #[cfg(test)]
    pub async fn facility_count(&self) -> usize {
        self.facilities.read().await.len()
    }
}

#[async_trait]
impl DestinationStore for MemoryStore {
    async fn search_destinations(
        &self,
        filter: &DestinationFilter,
        page: Page,
    ) -> Result<(Vec<Destination>, u64), StoreError> {
        let destinations = self.destinations.read().await;
        let matching: Vec<&Destination> =
            destinations.iter().filter(|d| filter.matches(d)).collect();
        let total = matching.len() as u64;

        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn get_destination(&self, id: &str) -> Result<Option<Destination>, StoreError> {
        let destinations = self.destinations.read().await;
        Ok(destinations.iter().find(|d| d.id == id).cloned())
    }

    async fn active_destinations(&self) -> Result<Vec<Destination>, StoreError> {
        let destinations = self.destinations.read().await;
        Ok(destinations.iter().filter(|d| d.is_active).cloned().collect())
    }

    async fn count_destinations(&self) -> Result<u64, StoreError> {
        Ok(self.destinations.read().await.len() as u64)
    }

    async fn insert_destinations(&self, new: Vec<Destination>) -> Result<(), StoreError> {
        let mut destinations = self.destinations.write().await;
        for destination in new {
            if destinations.iter().any(|d| d.slug == destination.slug) {
                return Err(StoreError::Duplicate(format!(
                    "destination slug '{}'",
                    destination.slug
                )));
            }
            destinations.push(destination);
        }
        Ok(())
    }

    async fn update_rating(
        &self,
        id: &str,
        rating: f64,
        review_count: u32,
    ) -> Result<(), StoreError> {
        let mut destinations = self.destinations.write().await;
        if let Some(destination) = destinations.iter_mut().find(|d| d.id == id) {
            destination.rating = rating;
            destination.review_count = review_count;
            destination.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn insert_tags(&self, new: Vec<Tag>) -> Result<(), StoreError> {
        let mut tags = self.tags.write().await;
        for tag in new {
            if !tags.iter().any(|t| t.name == tag.name) {
                tags.push(tag);
            }
        }
        Ok(())
    }

    async fn insert_facilities(&self, new: Vec<Facility>) -> Result<(), StoreError> {
        let mut facilities = self.facilities.write().await;
        for facility in new {
            if !facilities.iter().any(|f| f.name == facility.name) {
                facilities.push(facility);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ItineraryStore for MemoryStore {
    async fn insert_itinerary(&self, itinerary: &Itinerary) -> Result<(), StoreError> {
        self.itineraries.write().await.push(itinerary.clone());
        Ok(())
    }

    async fn get_itinerary(&self, id: &str) -> Result<Option<Itinerary>, StoreError> {
        let itineraries = self.itineraries.read().await;
        Ok(itineraries.iter().find(|i| i.id == id).cloned())
    }

    async fn replace_itinerary(&self, itinerary: &Itinerary) -> Result<bool, StoreError> {
        let mut itineraries = self.itineraries.write().await;
        match itineraries.iter_mut().find(|i| i.id == itinerary.id) {
            Some(existing) => {
                *existing = itinerary.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_itinerary(&self, id: &str) -> Result<bool, StoreError> {
        let mut itineraries = self.itineraries.write().await;
        let before = itineraries.len();
        itineraries.retain(|i| i.id != id);
        Ok(itineraries.len() != before)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn reviews_for(&self, destination_id: &str) -> Result<Vec<Review>, StoreError> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .filter(|r| r.destination_id == destination_id)
            .cloned()
            .collect())
    }

    async fn find_review(
        &self,
        user_id: &str,
        destination_id: &str,
    ) -> Result<Option<Review>, StoreError> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .find(|r| r.user_id == user_id && r.destination_id == destination_id)
            .cloned())
    }

    async fn insert_review(&self, review: &Review) -> Result<(), StoreError> {
        let mut reviews = self.reviews.write().await;
        if reviews
            .iter()
            .any(|r| r.user_id == review.user_id && r.destination_id == review.destination_id)
        {
            return Err(StoreError::Duplicate(format!(
                "review by {} for {}",
                review.user_id, review.destination_id
            )));
        }
        reviews.push(review.clone());
        Ok(())
    }
}

#[async_trait]
impl SentimentStore for MemoryStore {
    async fn get_sentiment(
        &self,
        destination_id: &str,
    ) -> Result<Option<SentimentAnalysis>, StoreError> {
        let sentiments = self.sentiments.read().await;
        Ok(sentiments
            .iter()
            .find(|s| s.destination_id == destination_id)
            .cloned())
    }

    async fn upsert_sentiment(&self, analysis: &SentimentAnalysis) -> Result<(), StoreError> {
        let mut sentiments = self.sentiments.write().await;
        match sentiments
            .iter_mut()
            .find(|s| s.destination_id == analysis.destination_id)
        {
            Some(existing) => *existing = analysis.clone(),
            None => sentiments.push(analysis.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
