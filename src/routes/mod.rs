use actix_web::web;

use crate::errors;

pub mod ai;
pub mod destinations;
pub mod health;
pub mod travel;

/// Registers every route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1")
                .configure(errors::configure_extractors)
                .service(web::scope("/travel").configure(travel::configure))
                .service(web::scope("/ai").configure(ai::configure))
                .service(web::scope("/destinations").configure(destinations::configure)),
        );
}
