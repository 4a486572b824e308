use axum::{
    Extension,
    extract::Request,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{ADMIN_SUBJECT, verify_token};

pub const MISSING_TOKEN: &str = "Sesi admin tidak ditemukan, silakan login";
pub const INVALID_TOKEN: &str = "Sesi admin tidak valid atau kedaluwarsa";

// Bearer token check for admin routes
pub async fn auth(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN.to_string()))?;

    let claims = verify_token(token, &state.config.jwt).map_err(|e| {
        tracing::debug!("JWT verification error: {:?}", e);
        AppError::Unauthorized(INVALID_TOKEN.to_string())
    })?;

    if claims.sub != ADMIN_SUBJECT {
        return Err(AppError::Unauthorized(INVALID_TOKEN.to_string()));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
