use crate::{handlers::admin_handler, middlewares::auth_middleware::auth};
use axum::{
    Router, middleware,
    routing::{get, patch},
};

pub fn admin_routes() -> Router {
    Router::new()
        .route("/applications/list", get(admin_handler::index))
        .route("/applications/stats", get(admin_handler::stats))
        .route("/applications/export", get(admin_handler::export_csv))
        .route("/applications/export/xlsx", get(admin_handler::export_xlsx))
        .route("/applications/{id}", get(admin_handler::show))
        .route("/applications/{id}/status", patch(admin_handler::update_status))
        .layer(middleware::from_fn(auth))
}
