use crate::handlers::login_handler::login;
use axum::{Router, routing::post};

pub fn auth_routes() -> Router {
    Router::new().route("/admin/login", post(login))
}
