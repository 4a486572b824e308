use axum::{
    Extension, Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
};
use chrono::Utc;
use futures::future::try_join_all;
use validator::Validate;

use crate::error::AppError;
use crate::models::application::Documents;
use crate::schemas::application_schema::{
    CheckStatusRequest, CheckStatusResponse, StatusLookup, SubmitApplicationRequest,
    SubmitApplicationResponse,
};
use crate::state::AppState;
use crate::utils::{
    attachment::AttachmentKind,
    identifier::application_id,
    response::{ApiResponse, FieldErrors},
    validation::{field_errors, merge, push},
};


pub const SUBMITTED: &str = "Pendaftaran berhasil dikirim";
pub const EMPTY_IDENTIFIER: &str = "Masukkan NIM atau Email";

/// Best effort: the original error is what the applicant sees.
async fn discard_attachments(state: &AppState, application_id: &str) {
    if let Err(e) = state.attachments.discard(application_id).await {
        tracing::warn!(application_id, "failed to discard attachments: {}", e);
    }
}

pub async fn submit(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SubmitApplicationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitApplicationResponse>>), AppError> {
    let Json(payload) = payload?;
    let payload = payload.normalized();

    // Collect every violation so the applicant sees them all at once
    let mut errors = match payload.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => field_errors(&e),
    };
    merge(&mut errors, payload.rule_violations());
    let files = match payload.decode_attachments(state.config.max_attachment_bytes) {
        Ok(files) => files,
        Err(attachment_errors) => {
            merge(&mut errors, attachment_errors);
            Vec::new()
        }
    };
    if !errors.is_empty() {
        tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "submission rejected");
        return Err(AppError::Validation(errors));
    }

    if let Some(field) = state
        .repository
        .find_duplicate(&payload.nim, &payload.email)
        .await?
    {
        return Err(AppError::Conflict(field.message().to_string()));
    }

    let submitted_at = Utc::now();
    let id = application_id(&payload.nim, &payload.email, submitted_at);

    let id_ref = id.as_str();
    let attachments = state.attachments.as_ref();
    let stored = match try_join_all(files.iter().map(|(kind, file)| async move {
        attachments
            .store(id_ref, *kind, file)
            .await
            .map(|location| (*kind, location))
    }))
    .await
    {
        Ok(stored) => stored,
        Err(e) => {
            discard_attachments(&state, &id).await;
            return Err(e.into());
        }
    };

    let location = |kind: AttachmentKind| {
        stored
            .iter()
            .find(|(stored_kind, _)| *stored_kind == kind)
            .map(|(_, location)| location.clone())
    };
    let documents = Documents {
        ktm: location(AttachmentKind::Ktm).unwrap_or_default(),
        commitment_letter: location(AttachmentKind::CommitmentLetter).unwrap_or_default(),
        cv: location(AttachmentKind::Cv).unwrap_or_default(),
        portfolio: location(AttachmentKind::Portfolio),
    };

    let application = payload
        .into_new_application()
        .into_application(id, documents, submitted_at);
    if let Err(e) = state.repository.insert(&application).await {
        discard_attachments(&state, &application.id).await;
        return Err(e.into());
    }

    tracing::info!(
        application_id = %application.id,
        department = %application.department1,
        "application submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            SUBMITTED,
            SubmitApplicationResponse {
                application_id: application.id,
            },
        )),
    ))
}

pub async fn check_status(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CheckStatusRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CheckStatusResponse>>), AppError> {
    let Json(payload) = payload?;
    let identifier = payload.identifier.trim();
    if identifier.is_empty() {
        let mut errors = FieldErrors::new();
        push(&mut errors, "identifier", EMPTY_IDENTIFIER);
        return Err(AppError::Validation(errors));
    }

    let result = match state.repository.find_by_identifier(identifier).await? {
        Some(application) => StatusLookup::found(application),
        None => StatusLookup::not_found(),
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(CheckStatusResponse { result })),
    ))
}
