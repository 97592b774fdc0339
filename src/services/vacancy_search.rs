//! The vacancy search proxy: cache lookup, upstream fetch, normalization.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{Span, debug, info, warn};

use crate::cache::SearchCache;
use crate::clients::recruiting::{RecruitingClient, RecruitingError, Vacancy, VacancyPage};
use crate::models::{NormalizedJob, SearchRequest, SearchResponse};
use crate::services::normalize::normalize_vacancy;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Upstream(#[from] RecruitingError),
}

impl SearchError {
    #[must_use]
    pub const fn upstream(&self) -> &RecruitingError {
        match self {
            Self::Upstream(e) => e,
        }
    }
}

/// Where vacancies come from. Implemented by [`RecruitingClient`]; tests
/// plug in fakes.
#[async_trait::async_trait]
pub trait VacancySource: Send + Sync {
    async fn search_vacancies(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<VacancyPage, RecruitingError>;

    async fn vacancy(&self, id: &str) -> Result<Vacancy, RecruitingError>;
}

#[async_trait::async_trait]
impl VacancySource for RecruitingClient {
    async fn search_vacancies(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<VacancyPage, RecruitingError> {
        Self::search_vacancies(self, params).await
    }

    async fn vacancy(&self, id: &str) -> Result<Vacancy, RecruitingError> {
        Self::vacancy(self, id).await
    }
}

pub struct VacancySearchService {
    source: Arc<dyn VacancySource>,
    cache: Arc<dyn SearchCache>,
    ttl: Duration,
    per_page: u32,
}

impl VacancySearchService {
    #[must_use]
    pub fn new(
        source: Arc<dyn VacancySource>,
        cache: Arc<dyn SearchCache>,
        ttl: Duration,
        per_page: u32,
    ) -> Self {
        Self {
            source,
            cache,
            ttl,
            per_page,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn SearchCache> {
        &self.cache
    }

    /// Answers a search from the cache when fresh, otherwise from upstream.
    ///
    /// A rate-limited upstream never produces an error: the last cached
    /// result for the key is served regardless of age, or an empty result
    /// carrying [`RATE_LIMITED_MESSAGE`]. Any other upstream failure is
    /// returned as [`SearchError::Upstream`].
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let key = request.cache_key();

        if let Some(entry) = self.cache.get(&key).await
            && entry.is_fresh(self.ttl)
        {
            metrics::counter!("search_cache_hits_total").increment(1);
            Span::current().record("cache", "hit");
            debug!(%key, "Search cache hit");
            return Ok(entry.result);
        }
        metrics::counter!("search_cache_misses_total").increment(1);
        Span::current().record("cache", "miss");

        let params = request.query_params(self.per_page);
        match self.source.search_vacancies(&params).await {
            Ok(page) => {
                Span::current().record("upstream", "ok");
                let result = self.normalize_page(page, request.page());
                info!(
                    %key,
                    found = result.found,
                    items = result.items.len(),
                    "Fetched vacancies from upstream"
                );
                self.cache.set(&key, result.clone()).await;
                Ok(result)
            }
            Err(RecruitingError::RateLimited) => {
                metrics::counter!("search_rate_limited_total").increment(1);
                Span::current().record("upstream", "rate_limited");
                if let Some(stale) = self.cache.get(&key).await {
                    Span::current().record("cache", "stale");
                    warn!(%key, "Upstream rate limited, serving cached result");
                    Ok(stale.result)
                } else {
                    warn!(%key, "Upstream rate limited and nothing cached");
                    Ok(SearchResponse::empty_with_error(
                        request.page(),
                        self.per_page,
                        RATE_LIMITED_MESSAGE,
                    ))
                }
            }
            Err(e) => {
                metrics::counter!("search_upstream_errors_total").increment(1);
                Span::current().record("upstream", "error");
                warn!(%key, "Vacancy search failed: {}", e);
                Err(SearchError::Upstream(e))
            }
        }
    }

    /// Full details for one vacancy, normalized. Not cached.
    pub async fn vacancy(&self, id: &str) -> Result<NormalizedJob, SearchError> {
        let vacancy = self.source.vacancy(id).await.inspect_err(|_| {
            Span::current().record("upstream", "error");
        })?;
        Span::current().record("upstream", "ok");
        Ok(normalize_vacancy(&vacancy, &mut rand::rng()))
    }

    fn normalize_page(&self, page: VacancyPage, requested_page: u32) -> SearchResponse {
        let mut rng = rand::rng();
        SearchResponse {
            items: page
                .items
                .iter()
                .map(|v| normalize_vacancy(v, &mut rng))
                .collect(),
            found: page.found,
            pages: page.pages,
            per_page: if page.per_page == 0 {
                self.per_page
            } else {
                page.per_page
            },
            page: requested_page,
            error: None,
        }
    }
}
