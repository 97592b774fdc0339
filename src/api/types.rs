use serde::{Deserialize, Serialize};

use crate::models::{NormalizedJob, ResumeProfile};
use crate::services::AiOutcome;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// An AI answer plus whether it came from the deterministic fallback.
#[derive(Debug, Serialize)]
pub struct AiResult<T> {
    pub result: T,
    pub fallback: bool,
}

impl<T> From<AiOutcome<T>> for AiResult<T> {
    fn from(outcome: AiOutcome<T>) -> Self {
        let fallback = outcome.is_fallback();
        Self {
            result: outcome.into_inner(),
            fallback,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResumeAnalysisRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub pdf_base64: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub profile: ResumeProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub profile: ResumeProfile,
    #[serde(default)]
    pub job: Option<NormalizedJob>,
    #[serde(default)]
    pub vacancy_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeUrlQuery {
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthorizeUrlDto {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenExchangeRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: String,
    pub uptime: u64,
    pub cache_entries: usize,
}
