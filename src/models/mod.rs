pub mod ai;
pub mod api;
pub mod destination;
pub mod itinerary;
pub mod query;
pub mod review;
pub mod sentiment;
