//! AI career endpoints.
//!
//! None of these fail because of the model: when it is unreachable or
//! answers garbage, the deterministic fallback is returned with
//! `fallback: true`.

use axum::{Json, extract::State};
use base64::Engine;
use std::sync::Arc;

use super::validation::validate_vacancy_id;
use super::{
    AiResult, ApiError, ApiResponse, AppState, CoverLetterRequest, ProfileRequest,
    ResumeAnalysisRequest,
};
use crate::models::{CoverLetter, NewsItem, Profession, Recommendations, ResumeProfile};
use crate::services::ResumeInput;

/// Largest accepted PDF after decoding.
const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

fn resume_input(request: ResumeAnalysisRequest) -> Result<ResumeInput, ApiError> {
    if let Some(encoded) = request.pdf_base64.filter(|s| !s.trim().is_empty()) {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| ApiError::validation(format!("pdf_base64 is not valid base64: {e}")))?;
        if bytes.len() > MAX_PDF_BYTES {
            return Err(ApiError::validation("PDF must be 10 MB or smaller"));
        }
        return Ok(ResumeInput::Pdf(bytes));
    }

    match request.text {
        Some(text) if !text.trim().is_empty() => Ok(ResumeInput::Text(text)),
        _ => Err(ApiError::validation("Either text or pdf_base64 is required")),
    }
}

pub async fn analyze_resume(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResumeAnalysisRequest>,
) -> Result<Json<ApiResponse<AiResult<ResumeProfile>>>, ApiError> {
    let input = resume_input(request)?;
    let outcome = state.advisor().analyze_resume(&input).await;
    Ok(Json(ApiResponse::success(outcome.into())))
}

pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ApiResponse<AiResult<Recommendations>>>, ApiError> {
    let outcome = state.advisor().recommend(&request.profile).await;
    Ok(Json(ApiResponse::success(outcome.into())))
}

pub async fn cover_letter(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<ApiResponse<AiResult<CoverLetter>>>, ApiError> {
    let job = match (request.job, request.vacancy_id) {
        (Some(job), _) => job,
        (None, Some(id)) => {
            let id = validate_vacancy_id(&id)?;
            state.search_service().vacancy(id).await?
        }
        (None, None) => return Err(ApiError::validation("Either job or vacancyId is required")),
    };

    let outcome = state.advisor().cover_letter(&request.profile, &job).await;
    Ok(Json(ApiResponse::success(outcome.into())))
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ApiResponse<AiResult<Vec<NewsItem>>>>, ApiError> {
    let outcome = state.advisor().news(&request.profile).await;
    Ok(Json(ApiResponse::success(outcome.into())))
}

pub async fn professions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ApiResponse<AiResult<Vec<Profession>>>>, ApiError> {
    let outcome = state.advisor().professions(&request.profile).await;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_takes_precedence_over_text() {
        let input = resume_input(ResumeAnalysisRequest {
            text: Some("text".to_string()),
            pdf_base64: Some("JVBERi0xLjQ=".to_string()),
        })
        .unwrap();
        assert!(matches!(input, ResumeInput::Pdf(ref b) if b.starts_with(b"%PDF")));
    }

    #[test]
    fn rejects_empty_and_malformed_input() {
        assert!(
            resume_input(ResumeAnalysisRequest {
                text: Some("  ".to_string()),
                pdf_base64: None,
            })
            .is_err()
        );
        assert!(
            resume_input(ResumeAnalysisRequest {
                text: None,
                pdf_base64: Some("not base64!".to_string()),
            })
            .is_err()
        );
    }
}
