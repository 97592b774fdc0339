use axum::{Json, extract::State, http::HeaderMap};
use std::sync::Arc;

use super::validation::{bearer_token, validate_vacancy_id};
use super::{ApiError, ApiResponse, AppState};
use crate::clients::recruiting::ResumeSummary;
use crate::services::{ApplyOutcome, ApplyRequest};

pub async fn list_resumes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<ResumeSummary>>>, ApiError> {
    let token = bearer_token(&headers)?;
    let resumes = state.applications().resumes(token).await?;
    Ok(Json(ApiResponse::success(resumes)))
}

pub async fn submit_application(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApiResponse<ApplyOutcome>>, ApiError> {
    let token = bearer_token(&headers)?;
    validate_vacancy_id(&request.vacancy_id)?;

    let outcome = state.applications().apply(token, request).await?;
    Ok(Json(ApiResponse::success(outcome)))
}
