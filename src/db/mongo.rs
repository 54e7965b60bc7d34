use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;

use super::{DestinationStore, ItineraryStore, ReviewStore, SentimentStore, Store, StoreError};
use crate::models::api::Page;
use crate::models::destination::{non_empty, Destination, DestinationFilter, Facility, Tag};
use crate::models::itinerary::Itinerary;
use crate::models::review::Review;
use crate::models::sentiment::SentimentAnalysis;

const DESTINATIONS: &str = "destinations";
const TAGS: &str = "tags";
const FACILITIES: &str = "facilities";
const ITINERARIES: &str = "itineraries";
const REVIEWS: &str = "reviews";
const SENTIMENTS: &str = "sentiment_analyses";

const DUPLICATE_KEY: i32 = 11000;

/// Unique keys backing the one-per-owner rules: one review per user and
/// destination, one sentiment record per destination, unique slugs and
/// unique tag and facility names.
fn unique_indexes() -> Vec<(&'static str, Document)> {
    vec![
        (REVIEWS, doc! { "user_id": 1, "destination_id": 1 }),
        (DESTINATIONS, doc! { "slug": 1 }),
        (TAGS, doc! { "name": 1 }),
        (FACILITIES, doc! { "name": 1 }),
        (SENTIMENTS, doc! { "destination_id": 1 }),
    ]
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY)),
        _ => false,
    }
}

/// Duplicate-key rejections become `StoreError::Duplicate`; anything else
/// stays a driver error.
fn write_error(err: MongoError, what: &str) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::Duplicate(what.to_string())
    } else {
        StoreError::Mongo(err)
    }
}

pub async fn create_mongo_client(uri: &str) -> Result<Client, StoreError> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    // A failed ping is not fatal; the driver reconnects on demand.
    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => log::warn!("Connected to MongoDB but ping failed: {}", e),
    }

    Ok(client)
}

/// Translates a search filter into a MongoDB query. User input is always
/// escaped before it reaches a regex.
pub fn destination_filter_doc(filter: &DestinationFilter) -> Document {
    let mut query = doc! { "is_active": true };

    if let Some(text) = non_empty(&filter.query) {
        let pattern = regex::escape(text.trim());
        query.insert(
            "$or",
            ["name", "description", "location.city", "location.province"]
                .iter()
                .map(|field| {
                    let mut clause = Document::new();
                    clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
                    clause
                })
                .collect::<Vec<Document>>(),
        );
    }

    if let Some(category) = filter.category {
        query.insert("category", category.as_str());
    }

    if let Some(price_range) = filter.price_range {
        query.insert("price_range", price_range.as_str());
    }

    if let Some(city) = non_empty(&filter.city) {
        query.insert("location.city", exact_ignore_case(city));
    }

    if let Some(province) = non_empty(&filter.province) {
        query.insert("location.province", exact_ignore_case(province));
    }

    if let Some(min_rating) = filter.min_rating {
        query.insert("rating", doc! { "$gte": min_rating });
    }

    query
}

fn exact_ignore_case(value: &str) -> Document {
    doc! {
        "$regex": format!("^{}$", regex::escape(value.trim())),
        "$options": "i"
    }
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            db: client.database(database),
        }
    }

    /// Creates the unique indexes. Safe to run on every start.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        for (collection, keys) in unique_indexes() {
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.db
                .collection::<Document>(collection)
                .create_index(model)
                .await?;
        }
        log::info!("Unique indexes in place");
        Ok(())
    }

    fn destinations(&self) -> Collection<Destination> {
        self.db.collection(DESTINATIONS)
    }

    fn itineraries(&self) -> Collection<Itinerary> {
        self.db.collection(ITINERARIES)
    }

    fn reviews(&self) -> Collection<Review> {
        self.db.collection(REVIEWS)
    }

    fn sentiments(&self) -> Collection<SentimentAnalysis> {
        self.db.collection(SENTIMENTS)
    }
}

#[async_trait]
impl DestinationStore for MongoStore {
    async fn search_destinations(
        &self,
        filter: &DestinationFilter,
        page: Page,
    ) -> Result<(Vec<Destination>, u64), StoreError> {
        let query = destination_filter_doc(filter);
        let collection = self.destinations();

        let total = collection.count_documents(query.clone()).await?;
        let items = collection
            .find(query)
            .sort(doc! { "_id": 1 })
            .skip(page.offset())
            .limit(i64::from(page.page_size))
            .await?
            .try_collect::<Vec<Destination>>()
            .await?;

        Ok((items, total))
    }

    async fn get_destination(&self, id: &str) -> Result<Option<Destination>, StoreError> {
        Ok(self.destinations().find_one(doc! { "id": id }).await?)
    }

    async fn active_destinations(&self) -> Result<Vec<Destination>, StoreError> {
        let cursor = self
            .destinations()
            .find(doc! { "is_active": true })
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count_destinations(&self) -> Result<u64, StoreError> {
        Ok(self.destinations().count_documents(doc! {}).await?)
    }

    async fn insert_destinations(&self, destinations: Vec<Destination>) -> Result<(), StoreError> {
        if destinations.is_empty() {
            return Ok(());
        }
        self.destinations()
            .insert_many(destinations)
            .await
            .map_err(|e| write_error(e, "destination slug"))?;
        Ok(())
    }

    async fn update_rating(
        &self,
        id: &str,
        rating: f64,
        review_count: u32,
    ) -> Result<(), StoreError> {
        let update = doc! {
            "$set": {
                "rating": rating,
                "review_count": i64::from(review_count),
                "updated_at": to_bson(&Utc::now())?,
            }
        };
        self.destinations()
            .update_one(doc! { "id": id }, update)
            .await?;
        Ok(())
    }

    async fn insert_tags(&self, tags: Vec<Tag>) -> Result<(), StoreError> {
        if tags.is_empty() {
            return Ok(());
        }
        self.db
            .collection::<Tag>(TAGS)
            .insert_many(tags)
            .await
            .map_err(|e| write_error(e, "tag name"))?;
        Ok(())
    }

    async fn insert_facilities(&self, facilities: Vec<Facility>) -> Result<(), StoreError> {
        if facilities.is_empty() {
            return Ok(());
        }
        self.db
            .collection::<Facility>(FACILITIES)
            .insert_many(facilities)
            .await
            .map_err(|e| write_error(e, "facility name"))?;
        Ok(())
    }
}

#[async_trait]
impl ItineraryStore for MongoStore {
    async fn insert_itinerary(&self, itinerary: &Itinerary) -> Result<(), StoreError> {
        self.itineraries().insert_one(itinerary).await?;
        Ok(())
    }

    async fn get_itinerary(&self, id: &str) -> Result<Option<Itinerary>, StoreError> {
        Ok(self.itineraries().find_one(doc! { "id": id }).await?)
    }

    async fn replace_itinerary(&self, itinerary: &Itinerary) -> Result<bool, StoreError> {
        let result = self
            .itineraries()
            .replace_one(doc! { "id": &itinerary.id }, itinerary)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_itinerary(&self, id: &str) -> Result<bool, StoreError> {
        let result = self.itineraries().delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl ReviewStore for MongoStore {
    async fn reviews_for(&self, destination_id: &str) -> Result<Vec<Review>, StoreError> {
        let cursor = self
            .reviews()
            .find(doc! { "destination_id": destination_id })
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_review(
        &self,
        user_id: &str,
        destination_id: &str,
    ) -> Result<Option<Review>, StoreError> {
        let filter = doc! { "user_id": user_id, "destination_id": destination_id };
        Ok(self.reviews().find_one(filter).await?)
    }

    async fn insert_review(&self, review: &Review) -> Result<(), StoreError> {
        self.reviews()
            .insert_one(review)
            .await
            .map_err(|e| write_error(e, "review for this user and destination"))?;
        Ok(())
    }
}

#[async_trait]
impl SentimentStore for MongoStore {
    async fn get_sentiment(
        &self,
        destination_id: &str,
    ) -> Result<Option<SentimentAnalysis>, StoreError> {
        Ok(self
            .sentiments()
            .find_one(doc! { "destination_id": destination_id })
            .await?)
    }

    async fn upsert_sentiment(&self, analysis: &SentimentAnalysis) -> Result<(), StoreError> {
        self.sentiments()
            .replace_one(doc! { "destination_id": &analysis.destination_id }, analysis)
            .upsert(true)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! {"ping": 1}).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::destination::{DestinationCategory, PriceRange};

    #[test]
    fn test_empty_filter_only_selects_active() {
        let query = destination_filter_doc(&DestinationFilter::default());
        assert_eq!(query, doc! { "is_active": true });
    }

    #[test]
    fn test_query_text_is_escaped() {
        let filter = DestinationFilter {
            query: Some("kuta (bali)".to_string()),
            ..Default::default()
        };
        let query = destination_filter_doc(&filter);
        let or = query.get_array("$or").unwrap();
        assert_eq!(or.len(), 4);
        let first = or[0].as_document().unwrap().get_document("name").unwrap();
        assert_eq!(first.get_str("$regex").unwrap(), r"kuta \(bali\)");
        assert_eq!(first.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_city_is_anchored() {
        let filter = DestinationFilter {
            city: Some("Badung".to_string()),
            category: Some(DestinationCategory::Beach),
            price_range: Some(PriceRange::Budget),
            min_rating: Some(4.0),
            ..Default::default()
        };
        let query = destination_filter_doc(&filter);
        let city = query.get_document("location.city").unwrap();
        assert_eq!(city.get_str("$regex").unwrap(), "^Badung$");
        assert_eq!(query.get_str("category").unwrap(), "beach");
        assert_eq!(query.get_str("price_range").unwrap(), "budget");
        assert_eq!(
            query.get_document("rating").unwrap().get_f64("$gte").unwrap(),
            4.0
        );
    }

    #[test]
    fn test_unique_indexes_cover_owner_rules() {
        let indexes = unique_indexes();
        let keys_for = |name: &str| {
            indexes
                .iter()
                .find(|(collection, _)| *collection == name)
                .map(|(_, keys)| keys.keys().cloned().collect::<Vec<String>>())
                .unwrap()
        };
        assert_eq!(keys_for(REVIEWS), vec!["user_id", "destination_id"]);
        assert_eq!(keys_for(DESTINATIONS), vec!["slug"]);
        assert_eq!(keys_for(TAGS), vec!["name"]);
        assert_eq!(keys_for(FACILITIES), vec!["name"]);
        assert_eq!(keys_for(SENTIMENTS), vec!["destination_id"]);
    }

    #[test]
    fn test_blank_strings_are_ignored() {
        let filter = DestinationFilter {
            query: Some("  ".to_string()),
            province: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(destination_filter_doc(&filter), doc! { "is_active": true });
    }
}
