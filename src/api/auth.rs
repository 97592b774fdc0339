//! OAuth authorization-code flow against the recruiting platform.
//!
//! The server only holds the client secret; tokens are handed back to the
//! caller and never stored.

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, AuthorizeUrlDto, AuthorizeUrlQuery, TokenExchangeRequest,
    TokenRefreshRequest,
};
use crate::clients::recruiting::OAuthToken;

pub async fn authorize_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthorizeUrlQuery>,
) -> Result<Json<ApiResponse<AuthorizeUrlDto>>, ApiError> {
    let url = state
        .applications()
        .authorize_url(query.state.as_deref())?;
    Ok(Json(ApiResponse::success(AuthorizeUrlDto { url })))
}

pub async fn exchange_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenExchangeRequest>,
) -> Result<Json<ApiResponse<OAuthToken>>, ApiError> {
    let token = state.applications().exchange_code(&request.code).await?;
    Ok(Json(ApiResponse::success(token)))
}

pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRefreshRequest>,
) -> Result<Json<ApiResponse<OAuthToken>>, ApiError> {
    let token = state
        .applications()
        .refresh_token(&request.refresh_token)
        .await?;
    Ok(Json(ApiResponse::success(token)))
}
