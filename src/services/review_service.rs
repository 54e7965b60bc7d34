use crate::db::{Store, StoreError};
use crate::errors::ServiceError;
use crate::models::review::{NewReview, Review};

async fn ensure_destination(store: &dyn Store, destination_id: &str) -> Result<(), ServiceError> {
    match store.get_destination(destination_id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::NotFound(format!(
            "Destination {} not found",
            destination_id
        ))),
    }
}

pub async fn list(store: &dyn Store, destination_id: &str) -> Result<Vec<Review>, ServiceError> {
    ensure_destination(store, destination_id).await?;
    Ok(store.reviews_for(destination_id).await?)
}

fn already_reviewed(user_id: &str, destination_id: &str) -> ServiceError {
    ServiceError::Conflict(format!(
        "User {} has already reviewed destination {}",
        user_id, destination_id
    ))
}

/// Stores a review and refreshes the destination's rating and review count.
/// A user may review each destination once. Concurrent duplicates are
/// rejected by the store itself.
pub async fn create(
    store: &dyn Store,
    destination_id: &str,
    new_review: NewReview,
) -> Result<Review, ServiceError> {
    ensure_destination(store, destination_id).await?;

    if store
        .find_review(&new_review.user_id, destination_id)
        .await?
        .is_some()
    {
        return Err(already_reviewed(&new_review.user_id, destination_id));
    }

    let review = new_review.into_review(destination_id);
    match store.insert_review(&review).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Err(already_reviewed(&review.user_id, destination_id))
        }
        Err(e) => return Err(e.into()),
    }

    let reviews = store.reviews_for(destination_id).await?;
    let (rating, count) = mean_rating(&reviews);
    store.update_rating(destination_id, rating, count).await?;
    log::info!(
        "Review {} added to destination {} (rating now {} from {} reviews)",
        review.id,
        destination_id,
        rating,
        count
    );

    Ok(review)
}

/// Mean rating rounded to one decimal, with the review count.
fn mean_rating(reviews: &[Review]) -> (f64, u32) {
    if reviews.is_empty() {
        return (0.0, 0);
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = f64::from(sum) / reviews.len() as f64;
    ((mean * 10.0).round() / 10.0, reviews.len() as u32)
}
