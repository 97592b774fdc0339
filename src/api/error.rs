use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::clients::recruiting::RecruitingError;
use crate::services::{ApplicationError, SearchError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ExternalApiError { service: String, message: String },

    RateLimited(String),

    ValidationError(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{} service is unavailable", service),
                )
            }
            ApiError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<RecruitingError> for ApiError {
    fn from(err: RecruitingError) -> Self {
        match err {
            RecruitingError::RateLimited => ApiError::RateLimited(err.to_string()),
            RecruitingError::Status { status: 404, .. } => {
                ApiError::NotFound("Resource not found on the recruiting platform".to_string())
            }
            RecruitingError::Status {
                status: 401 | 403, ..
            } => ApiError::Unauthorized("The recruiting platform rejected the token".to_string()),
            RecruitingError::NotConfigured(_) => ApiError::internal(err.to_string()),
            other => ApiError::recruiting_error(other.to_string()),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Upstream(e) => e.into(),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation(msg) => ApiError::validation(msg),
            ApplicationError::Upstream(e) => e.into(),
        }
    }
}

impl ApiError {
    pub fn recruiting_error(msg: impl Into<String>) -> Self {
        ApiError::ExternalApiError {
            service: "Recruiting".to_string(),
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recruiting_errors_map_to_statuses() {
        let cases = [
            (RecruitingError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                RecruitingError::Status {
                    status: 404,
                    body: String::new(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                RecruitingError::Status {
                    status: 403,
                    body: String::new(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (RecruitingError::Timeout, StatusCode::BAD_GATEWAY),
            (
                RecruitingError::NotConfigured("client_id"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn application_validation_is_bad_request() {
        let err = ApiError::from(ApplicationError::Validation("x".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
