use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod ai;
mod applications;
mod auth;
mod error;
mod observability;
mod search;
mod system;
mod types;
mod validation;
mod vacancies;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{ApplicationService, CareerAdvisor, VacancySearchService};
use metrics_exporter_prometheus::PrometheusHandle;

/// Base64 PDFs in résumé uploads need more than axum's 2 MB default.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn search_service(&self) -> &Arc<VacancySearchService> {
        &self.shared.search_service
    }

    #[must_use]
    pub fn advisor(&self) -> &Arc<CareerAdvisor> {
        &self.shared.advisor
    }

    #[must_use]
    pub fn applications(&self) -> &Arc<ApplicationService> {
        &self.shared.applications
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config)?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().read().await.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/search", post(search::search_vacancies))
        .route("/vacancies/{id}", get(vacancies::get_vacancy))
        .route("/resumes", get(applications::list_resumes))
        .route("/negotiations", post(applications::submit_application))
        .route("/auth/url", get(auth::authorize_url))
        .route("/auth/token", post(auth::exchange_token))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/ai/resume", post(ai::analyze_resume))
        .route("/ai/recommendations", post(ai::recommendations))
        .route("/ai/cover-letter", post(ai::cover_letter))
        .route("/ai/news", post(ai::news))
        .route("/ai/professions", post(ai::professions))
        .route("/system/health", get(system::get_health))
        .route("/metrics", get(observability::get_metrics))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .route_layer(middleware::from_fn(observability::request_logging))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::hardening_headers))
        .layer(TraceLayer::new_for_http())
}
