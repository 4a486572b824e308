use axum::{Extension, Json, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::error::AppError;
use crate::schemas::auth_schema::{LoginRequest, LoginResponse};
use crate::state::AppState;
use crate::utils::{
    jwt::{ADMIN_SUBJECT, generate_token},
    password::verify_password,
    response::ApiResponse,
};

pub const WRONG_PASSWORD: &str = "Password salah!";

pub async fn login(
    Extension(state): Extension<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    // bcrypt is CPU bound, keep it off the async workers
    let hashed = state.config.admin_password_hash.clone();
    let LoginRequest { password } = payload;
    let matched = tokio::task::spawn_blocking(move || verify_password(&password, &hashed))
        .await
        .map_err(|e| AppError::Internal(format!("Password check failed: {}", e)))?;

    if !matched {
        tracing::warn!("Admin login rejected");
        return Err(AppError::Unauthorized(WRONG_PASSWORD.to_string()));
    }

    let token = generate_token(ADMIN_SUBJECT, &state.config.jwt).map_err(|e| {
        AppError::Internal(format!("Token generation failed: {}", e))
    })?;

    tracing::info!("Admin logged in");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_message(
            "Login berhasil",
            LoginResponse {
                token,
                expires_in: state.config.jwt.expiration_secs,
            },
        )),
    ))
}
