use axum::{Json, extract::State};
use std::sync::Arc;

use super::validation::validate_search_request;
use super::{ApiError, AppState};
use crate::models::{SearchRequest, SearchResponse};

/// `POST /api/search`
///
/// Upstream failures do not fail the request: they come back as an empty
/// result whose `error` field carries the message. Only invalid input is
/// rejected with an error status.
pub async fn search_vacancies(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let per_page = state.config().read().await.recruiting.per_page;
    validate_search_request(&request, per_page)?;

    let response = match state.search_service().search(&request).await {
        Ok(result) => result,
        Err(e) => SearchResponse::empty_with_error(request.page(), per_page, e.to_string()),
    };

    Ok(Json(response))
}
