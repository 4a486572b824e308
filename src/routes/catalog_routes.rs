use crate::handlers::catalog_handler;
use axum::{Router, routing::get};

pub fn catalog_routes() -> Router {
    Router::new()
        .route("/divisions", get(catalog_handler::divisions))
        .route("/divisions/prokers", get(catalog_handler::proker_options))
        .route("/timeline", get(catalog_handler::timeline))
}
