use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub destination_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewReview {
    pub user_id: String,
    pub rating: u8,
    pub title: Option<String>,
    pub content: String,
    pub visit_date: Option<NaiveDate>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.user_id.trim().is_empty() {
            return Err(ApiError::validation("user_id must not be empty"));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ApiError::validation("rating must be between 1 and 5"));
        }
        if self.content.trim().is_empty() {
            return Err(ApiError::validation("content must not be empty"));
        }
        Ok(())
    }

    pub fn into_review(self, destination_id: &str) -> Review {
        let now = Utc::now();
        Review {
            id: uuid::Uuid::new_v4().to_string(),
            destination_id: destination_id.to_string(),
            user_id: self.user_id,
            rating: self.rating,
            title: self.title,
            content: self.content,
            visit_date: self.visit_date,
            created_at: now,
            updated_at: now,
        }
    }
}
