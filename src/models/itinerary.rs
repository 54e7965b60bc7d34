use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ServiceError};
use crate::models::destination::Destination;
use crate::models::query::{
    validate_budget, validate_duration, validate_interests, validate_traveler_count,
    ActivityLevel, TravelerType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportationType {
    Flight,
    Train,
    Bus,
    Car,
    Motorcycle,
    Boat,
    Walking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItineraryStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transportation {
    #[serde(rename = "type")]
    pub kind: TransportationType,
    /// Minutes.
    pub duration: u32,
    pub cost: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryItem {
    pub id: String,
    pub destination: Destination,
    pub start_time: String,
    pub end_time: String,
    /// Minutes, always positive.
    pub duration: u32,
    pub estimated_cost: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub transportation_to_next: Option<Transportation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<ItineraryItem>,
    pub total_cost: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ItineraryDay {
    pub fn items_cost(&self) -> f64 {
        self.items.iter().map(|item| item.estimated_cost).sum()
    }
}

/// A stored itinerary. Days are embedded, so removing the itinerary removes
/// its days and items with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub days: Vec<ItineraryDay>,
    pub total_cost: f64,
    pub total_duration: u32,
    pub traveler_count: u32,
    pub traveler_type: TravelerType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub status: ItineraryStatus,
    #[serde(default)]
    pub ai_generated: bool,
    #[serde(default)]
    pub ai_confidence: Option<f64>,
    #[serde(default)]
    pub ai_reasoning: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Itinerary {
    pub fn destination_ids(&self) -> Vec<String> {
        self.days
            .iter()
            .flat_map(|day| day.items.iter().map(|item| item.destination.id.clone()))
            .collect()
    }

    /// Moves every day so the trip begins on `start`, keeping day offsets.
    /// Nothing changes when the last day would fall past the calendar's end.
    pub fn reschedule(&mut self, start: NaiveDate) -> Result<(), ServiceError> {
        let end_date = day_date(start, self.total_duration.max(1))?;
        let dates = self
            .days
            .iter()
            .map(|day| day_date(start, day.day))
            .collect::<Result<Vec<_>, _>>()?;

        for (day, date) in self.days.iter_mut().zip(dates) {
            day.date = date;
        }
        self.start_date = start;
        self.end_date = end_date;
        Ok(())
    }
}

/// Date of the 1-based `day` of a trip that starts on `start`.
pub fn day_date(start: NaiveDate, day: u32) -> Result<NaiveDate, ServiceError> {
    start
        .checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
        .ok_or_else(|| {
            ServiceError::Validation(format!(
                "start_date {} leaves no room for day {} of the trip",
                start, day
            ))
        })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryGenerationRequest {
    pub destination: String,
    pub duration: u32,
    pub budget: f64,
    pub traveler_count: u32,
    pub traveler_type: TravelerType,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    pub start_date: Option<NaiveDate>,
}

impl ItineraryGenerationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.destination.trim().is_empty() {
            return Err(ApiError::validation("destination must not be empty"));
        }
        validate_duration(self.duration)?;
        validate_budget(self.budget)?;
        validate_traveler_count(self.traveler_count)?;
        validate_interests(&self.interests)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItineraryGenerationResponse {
    pub itinerary: Itinerary,
    pub ai_reasoning: String,
    pub confidence_score: f64,
    pub alternative_suggestions: Vec<String>,
    pub source: String,
    pub degraded: bool,
}

/// Fields a client may change on a stored itinerary. Anything else in the
/// body is rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItineraryUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ItineraryStatus>,
    pub is_public: Option<bool>,
    pub traveler_count: Option<u32>,
    pub traveler_type: Option<TravelerType>,
    pub start_date: Option<NaiveDate>,
}

impl ItineraryUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.as_ref().is_some_and(|title| title.trim().is_empty()) {
            return Err(ApiError::validation("title must not be empty"));
        }
        if let Some(count) = self.traveler_count {
            validate_traveler_count(count)?;
        }
        Ok(())
    }

    /// Writes the changes onto `itinerary`. A new traveler count is carried
    /// into the generated "untuk N orang" phrase unless the same update sets
    /// its own description.
    pub fn apply(self, itinerary: &mut Itinerary) -> Result<(), ServiceError> {
        if let Some(start) = self.start_date {
            itinerary.reschedule(start)?;
        }
        let description_given = self.description.is_some();
        if let Some(title) = self.title {
            itinerary.title = title;
        }
        if let Some(description) = self.description {
            itinerary.description = description;
        }
        if let Some(status) = self.status {
            itinerary.status = status;
        }
        if let Some(is_public) = self.is_public {
            itinerary.is_public = is_public;
        }
        if let Some(count) = self.traveler_count {
            if !description_given {
                itinerary.description = itinerary.description.replacen(
                    &format!("untuk {} orang", itinerary.traveler_count),
                    &format!("untuk {} orang", count),
                    1,
                );
            }
            itinerary.traveler_count = count;
        }
        if let Some(traveler_type) = self.traveler_type {
            itinerary.traveler_type = traveler_type;
        }
        itinerary.updated_at = Utc::now();
        Ok(())
    }
}
