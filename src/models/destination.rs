use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::sentiment::SentimentSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationCategory {
    Beach,
    Mountain,
    Cultural,
    Historical,
    Culinary,
    Adventure,
    Religious,
    Shopping,
    Nightlife,
    Nature,
    Urban,
}

impl DestinationCategory {
    pub const ALL: [DestinationCategory; 11] = [
        DestinationCategory::Beach,
        DestinationCategory::Mountain,
        DestinationCategory::Cultural,
        DestinationCategory::Historical,
        DestinationCategory::Culinary,
        DestinationCategory::Adventure,
        DestinationCategory::Religious,
        DestinationCategory::Shopping,
        DestinationCategory::Nightlife,
        DestinationCategory::Nature,
        DestinationCategory::Urban,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationCategory::Beach => "beach",
            DestinationCategory::Mountain => "mountain",
            DestinationCategory::Cultural => "cultural",
            DestinationCategory::Historical => "historical",
            DestinationCategory::Culinary => "culinary",
            DestinationCategory::Adventure => "adventure",
            DestinationCategory::Religious => "religious",
            DestinationCategory::Shopping => "shopping",
            DestinationCategory::Nightlife => "nightlife",
            DestinationCategory::Nature => "nature",
            DestinationCategory::Urban => "urban",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Budget,
    Moderate,
    Expensive,
    Luxury,
}

impl PriceRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceRange::Budget => "budget",
            PriceRange::Moderate => "moderate",
            PriceRange::Expensive => "expensive",
            PriceRange::Luxury => "luxury",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub province: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "Indonesia".to_string()
}

impl GeoLocation {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// One opening window, both ends as "HH:MM".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub open: String,
    pub close: String,
}

/// Weekday name ("monday" .. "sunday") to its opening windows.
pub type OpeningHours = BTreeMap<String, Vec<OpeningPeriod>>;

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Same window on every day of the week.
pub fn daily_hours(open: &str, close: &str) -> OpeningHours {
    WEEKDAYS
        .iter()
        .map(|day| {
            (
                day.to_string(),
                vec![OpeningPeriod {
                    open: open.to_string(),
                    close: close.to_string(),
                }],
            )
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: GeoLocation,
    pub category: DestinationCategory,
    #[serde(default)]
    pub images: Vec<String>,
    pub rating: f64,
    pub review_count: u32,
    pub price_range: PriceRange,
    #[serde(default)]
    pub entry_fee: Option<f64>,
    #[serde(default)]
    pub opening_hours: OpeningHours,
    pub slug: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Attached on read from the sentiment collection, never stored inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Lookup entity joined to destinations by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Search predicate shared by every store backend. Empty strings are treated
/// as absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DestinationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<DestinationCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

impl DestinationFilter {
    pub fn matches(&self, destination: &Destination) -> bool {
        if !destination.is_active {
            return false;
        }

        if let Some(query) = non_empty(&self.query) {
            let needle = query.trim().to_lowercase();
            let haystacks = [
                &destination.name,
                &destination.description,
                &destination.location.city,
                &destination.location.province,
            ];
            if !haystacks
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            {
                return false;
            }
        }

        if self.category.is_some_and(|category| category != destination.category) {
            return false;
        }

        if self
            .price_range
            .is_some_and(|price_range| price_range != destination.price_range)
        {
            return false;
        }

        if let Some(city) = non_empty(&self.city) {
            if !destination.location.city.eq_ignore_ascii_case(city.trim()) {
                return false;
            }
        }

        if let Some(province) = non_empty(&self.province) {
            if !destination
                .location
                .province
                .eq_ignore_ascii_case(province.trim())
            {
                return false;
            }
        }

        if let Some(min_rating) = self.min_rating {
            if destination.rating < min_rating {
                return false;
            }
        }

        true
    }

    /// The filters that were actually applied, excluding the free-text query.
    pub fn applied(&self) -> serde_json::Value {
        let filters = DestinationFilter {
            query: None,
            ..self.clone()
        };
        serde_json::to_value(filters).unwrap_or_else(|_| serde_json::json!({}))
    }
}

pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DestinationSearchResponse {
    pub destinations: Vec<Destination>,
    pub total: u64,
    pub query: String,
    pub filters_applied: serde_json::Value,
}

/// A nearby-search hit with its great-circle distance from the origin.
#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyDestination {
    #[serde(flatten)]
    pub destination: Destination,
    pub distance_km: f64,
}


#[cfg(test)]
mod tests {
    use super::fixtures::destination;
    use super::*;

    #[test]
    fn test_query_matches_any_text_field() {
        let kuta = destination("Pantai Kuta", "Badung", "Bali");
        let by_province = DestinationFilter {
            query: Some("BALI".to_string()),
            ..Default::default()
        };
        let by_name = DestinationFilter {
            query: Some("kuta".to_string()),
            ..Default::default()
        };
        let miss = DestinationFilter {
            query: Some("toba".to_string()),
            ..Default::default()
        };

        assert!(by_province.matches(&kuta));
        assert!(by_name.matches(&kuta));
        assert!(!miss.matches(&kuta));
    }

    #[test]
    fn test_query_ignores_surrounding_whitespace() {
        let kuta = destination("Pantai Kuta", "Badung", "Bali");
        let padded = DestinationFilter {
            query: Some("  kuta ".to_string()),
            ..Default::default()
        };
        assert!(padded.matches(&kuta));
    }

    #[test]
    fn test_city_is_case_insensitive_equality() {
        let kuta = destination("Pantai Kuta", "Badung", "Bali");
        let exact = DestinationFilter {
            city: Some("badung".to_string()),
            ..Default::default()
        };
        let partial = DestinationFilter {
            city: Some("bad".to_string()),
            ..Default::default()
        };
        assert!(exact.matches(&kuta));
        assert!(!partial.matches(&kuta));
    }

    #[test]
    fn test_inactive_never_matches() {
        let mut kuta = destination("Pantai Kuta", "Badung", "Bali");
        kuta.is_active = false;
        assert!(!DestinationFilter::default().matches(&kuta));
    }

    #[test]
    fn test_min_rating_and_category() {
        let kuta = destination("Pantai Kuta", "Badung", "Bali");
        let filter = DestinationFilter {
            category: Some(DestinationCategory::Beach),
            min_rating: Some(4.0),
            ..Default::default()
        };
        assert!(filter.matches(&kuta));

        let stricter = DestinationFilter {
            min_rating: Some(4.5),
            ..Default::default()
        };
        assert!(!stricter.matches(&kuta));
    }

    #[test]
    fn test_applied_filters_skip_query() {
        let filter = DestinationFilter {
            query: Some("bali".to_string()),
            price_range: Some(PriceRange::Budget),
            ..Default::default()
        };
        assert_eq!(filter.applied(), serde_json::json!({"price_range": "budget"}));
    }
}
