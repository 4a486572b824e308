use axum::{Json, extract::Query, http::StatusCode};

use crate::models::catalog::{self, DEPARTMENTS, SEKBEN_ROLES, TIMELINE};
use crate::schemas::catalog_schema::{
    DivisionsResponse, ProkerOptionsQuery, ProkerOptionsResponse, TimelineResponse,
};
use crate::utils::response::ApiResponse;

pub async fn divisions() -> (StatusCode, Json<ApiResponse<DivisionsResponse>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(DivisionsResponse {
            divisions: &DEPARTMENTS,
        })),
    )
}

pub async fn timeline() -> (StatusCode, Json<ApiResponse<TimelineResponse>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(TimelineResponse {
            timeline: &TIMELINE,
        })),
    )
}

pub async fn proker_options(
    Query(query): Query<ProkerOptionsQuery>,
) -> (StatusCode, Json<ApiResponse<ProkerOptionsResponse>>) {
    let options: Vec<String> = if query.sekben {
        SEKBEN_ROLES.iter().map(|role| role.to_string()).collect()
    } else {
        catalog::proker_options(&query.department, &query.other_department, &query.other_proker)
            .into_iter()
            .map(String::from)
            .collect()
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(ProkerOptionsResponse { options })),
    )
}
