use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthStatus};

/// `GET /api/system/health`
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthStatus>> {
    let cache_entries = state.shared.cache.len().await;

    Json(ApiResponse::success(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        cache_entries,
    }))
}
