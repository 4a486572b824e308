use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

use crate::exports::ExportError;
use crate::repositories::RepositoryError;
use crate::storage::StorageError;
use crate::utils::response::{ApiResponse, FieldErrors};
use crate::utils::validation::field_errors;

pub const VALIDATION_FAILED: &str = "Validasi gagal";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validasi gagal")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Ukuran permintaan terlalu besar")]
    PayloadTooLarge,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(field_errors(&errors))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Repository(RepositoryError::Duplicate(_)) => StatusCode::CONFLICT,
            AppError::Repository(_)
            | AppError::Storage(_)
            | AppError::Export(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body: ApiResponse<Value> = match self {
            AppError::Validation(errors) => ApiResponse::validation(VALIDATION_FAILED, errors),
            error if status.is_server_error() => {
                tracing::error!("{}", error);
                ApiResponse::error("Terjadi kesalahan pada server")
            }
            error => ApiResponse::error(&error.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
