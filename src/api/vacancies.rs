use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::validate_vacancy_id;
use super::{ApiError, ApiResponse, AppState};
use crate::models::NormalizedJob;

pub async fn get_vacancy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NormalizedJob>>, ApiError> {
    let id = validate_vacancy_id(&id)?;
    let job = state.search_service().vacancy(id).await?;
    Ok(Json(ApiResponse::success(job)))
}
