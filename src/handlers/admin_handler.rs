use axum::{
    Extension, Json,
    extract::{Path, Query, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;

use crate::error::AppError;
use crate::exports::{applications_csv, applications_xlsx, export_filename};
use crate::models::application::Application;
use crate::schemas::application_schema::{
    ApplicationFilterQuery, ApplicationListResponse, ApplicationResponse, StatsResponse,
    UpdateStatusRequest,
};
use crate::state::AppState;
use crate::utils::response::ApiResponse;


pub const NOT_FOUND: &str = "Pendaftaran tidak ditemukan";
pub const STATUS_UPDATED: &str = "Status pendaftaran diperbarui";

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn index(
    Extension(state): Extension<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationListResponse>>), AppError> {
    let applications = state.repository.list().await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(ApplicationListResponse { applications })),
    ))
}

pub async fn stats(
    Extension(state): Extension<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<StatsResponse>>), AppError> {
    let stats = state.repository.stats().await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(StatsResponse { stats })),
    ))
}

pub async fn show(
    Path(id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationResponse>>), AppError> {
    let application = state
        .repository
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(ApplicationResponse { application })),
    ))
}

pub async fn update_status(
    Path(id): Path<String>,
    Extension(state): Extension<AppState>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationResponse>>), AppError> {
    let Json(payload) = payload?;
    let (status, assigned_division) = payload.parse().map_err(AppError::Validation)?;

    let application = state
        .repository
        .update_status(&id, status, assigned_division)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    tracing::info!(
        application_id = %id,
        status = %status,
        assigned_division,
        "application decided"
    );

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_message(
            STATUS_UPDATED,
            ApplicationResponse { application },
        )),
    ))
}

async fn filtered(
    state: &AppState,
    query: ApplicationFilterQuery,
) -> Result<Vec<Application>, AppError> {
    let filter = query.into_filter().map_err(AppError::Validation)?;
    let applications = state.repository.list().await?;

    Ok(applications
        .into_iter()
        .filter(|application| filter.matches(application))
        .collect())
}

fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}

pub async fn export_csv(
    Extension(state): Extension<AppState>,
    Query(query): Query<ApplicationFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let applications = filtered(&state, query).await?;
    let body = applications_csv(&applications)?;
    let filename = export_filename(Utc::now().date_naive(), "csv");

    tracing::info!(rows = applications.len(), %filename, "csv export");

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(&filename)),
        ],
        body,
    ))
}

pub async fn export_xlsx(
    Extension(state): Extension<AppState>,
    Query(query): Query<ApplicationFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let applications = filtered(&state, query).await?;
    let rows: Vec<&Application> = applications.iter().collect();
    let body = applications_xlsx(&rows)?;
    let filename = export_filename(Utc::now().date_naive(), "xlsx");

    tracing::info!(rows = rows.len(), %filename, "xlsx export");

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(&filename)),
        ],
        body,
    ))
}
