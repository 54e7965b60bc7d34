pub mod ai;
pub mod destination_service;
pub mod itinerary_service;
pub mod review_service;
pub mod sentiment_service;
