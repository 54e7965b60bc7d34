use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::query::{validate_duration, validate_traveler_count};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<Value>,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.message.trim().is_empty() {
            return Err(ApiError::validation("message must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRouteRequest {
    pub destinations: Vec<String>,
    pub start_location: String,
    #[serde(default)]
    pub preferences: BTreeMap<String, Value>,
}

impl OptimizeRouteRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.destinations.is_empty() {
            return Err(ApiError::validation("destinations must not be empty"));
        }
        if self.start_location.trim().is_empty() {
            return Err(ApiError::validation("start_location must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct BudgetEstimateRequest {
    pub destination: String,
    pub duration: u32,
    pub traveler_count: u32,
    #[serde(default = "default_comfort_level")]
    pub comfort_level: String,
}

fn default_comfort_level() -> String {
    "moderate".to_string()
}

impl BudgetEstimateRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.destination.trim().is_empty() {
            return Err(ApiError::validation("destination must not be empty"));
        }
        validate_duration(self.duration)?;
        validate_traveler_count(self.traveler_count)
    }
}

#[derive(Debug, Deserialize)]
pub struct TravelPlanRequest {
    pub query: String,
    #[serde(default)]
    pub preferences: Option<BTreeMap<String, Value>>,
}

impl TravelPlanRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.query.trim().is_empty() {
            return Err(ApiError::validation("query must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub context: Option<Value>,
    pub source: String,
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelStatus {
    pub provider: String,
    pub model: String,
    pub available: bool,
    pub capabilities: Vec<String>,
}
