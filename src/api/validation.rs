use axum::http::{HeaderMap, header};

use super::ApiError;
use crate::models::SearchRequest;

pub const MAX_SEARCH_TEXT_CHARS: usize = 500;

/// The recruiting platform refuses to page past this many results.
const MAX_RESULT_DEPTH: u32 = 2000;

pub fn validate_vacancy_id(id: &str) -> Result<&str, ApiError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::validation(format!(
            "Invalid vacancy ID: {}. ID must be numeric",
            id
        )));
    }
    Ok(id)
}

pub fn validate_search_request(request: &SearchRequest, per_page: u32) -> Result<(), ApiError> {
    if let Some(text) = &request.text
        && text.chars().count() > MAX_SEARCH_TEXT_CHARS
    {
        return Err(ApiError::validation(format!(
            "Search text must be {} characters or less",
            MAX_SEARCH_TEXT_CHARS
        )));
    }

    let max_page = (MAX_RESULT_DEPTH - 1) / per_page.max(1);
    if request.page() > max_page {
        return Err(ApiError::validation(format!(
            "Invalid page: {}. Page must be between 0 and {}",
            request.page(),
            max_page
        )));
    }

    Ok(())
}

/// Token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))
}
