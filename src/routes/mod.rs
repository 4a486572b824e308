use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

pub mod admin_routes;
pub mod application_routes;
pub mod auth_routes;
pub mod catalog_routes;

fn cors(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!("Invalid CORS_ORIGIN {:?} ({}), allowing any origin", origin, e);
            cors.allow_origin(Any)
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(catalog_routes::catalog_routes())
        .merge(application_routes::application_routes(
            state.config.submit_body_limit(),
        ))
        .merge(auth_routes::auth_routes())
        .merge(admin_routes::admin_routes())
        .layer(Extension(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors(&state.config.cors_origin))
}
