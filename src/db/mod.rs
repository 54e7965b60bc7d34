use async_trait::async_trait;
use thiserror::Error;

use crate::models::api::Page;
use crate::models::destination::{Destination, DestinationFilter, Facility, Tag};
use crate::models::itinerary::Itinerary;
use crate::models::review::Review;
use crate::models::sentiment::SentimentAnalysis;

pub mod memory;
pub mod mongo;
pub mod seed;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("BSON serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("Duplicate {0}")]
    Duplicate(String),

    #[error("Store error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// One page of active destinations matching `filter`, plus the number of
    /// rows matching the same predicate.
    async fn search_destinations(
        &self,
        filter: &DestinationFilter,
        page: Page,
    ) -> Result<(Vec<Destination>, u64), StoreError>;

    async fn get_destination(&self, id: &str) -> Result<Option<Destination>, StoreError>;

    async fn active_destinations(&self) -> Result<Vec<Destination>, StoreError>;

    async fn count_destinations(&self) -> Result<u64, StoreError>;

    async fn insert_destinations(&self, destinations: Vec<Destination>) -> Result<(), StoreError>;

    async fn update_rating(
        &self,
        id: &str,
        rating: f64,
        review_count: u32,
    ) -> Result<(), StoreError>;

    async fn insert_tags(&self, tags: Vec<Tag>) -> Result<(), StoreError>;

    async fn insert_facilities(&self, facilities: Vec<Facility>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ItineraryStore: Send + Sync {
    async fn insert_itinerary(&self, itinerary: &Itinerary) -> Result<(), StoreError>;

    async fn get_itinerary(&self, id: &str) -> Result<Option<Itinerary>, StoreError>;

    /// Returns false when no itinerary with that id exists.
    async fn replace_itinerary(&self, itinerary: &Itinerary) -> Result<bool, StoreError>;

    async fn delete_itinerary(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn reviews_for(&self, destination_id: &str) -> Result<Vec<Review>, StoreError>;

    async fn find_review(
        &self,
        user_id: &str,
        destination_id: &str,
    ) -> Result<Option<Review>, StoreError>;

    /// Fails with `StoreError::Duplicate` when the user already reviewed
    /// the destination.
    async fn insert_review(&self, review: &Review) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SentimentStore: Send + Sync {
    async fn get_sentiment(
        &self,
        destination_id: &str,
    ) -> Result<Option<SentimentAnalysis>, StoreError>;

    async fn upsert_sentiment(&self, analysis: &SentimentAnalysis) -> Result<(), StoreError>;
}

/// Everything the services need from persistence.
#[async_trait]
pub trait Store: DestinationStore + ItineraryStore + ReviewStore + SentimentStore {
    async fn ping(&self) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}
