use crate::handlers::application_handler;
use axum::{Router, extract::DefaultBodyLimit, routing::post};

pub fn application_routes(submit_body_limit: usize) -> Router {
    Router::new()
        .route(
            "/applications/submit",
            post(application_handler::submit).layer(DefaultBodyLimit::max(submit_body_limit)),
        )
        .route(
            "/applications/check-status",
            post(application_handler::check_status),
        )
}
