use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::{MemorySearchCache, SearchCache};
use crate::clients::genai::{GenAiClient, TextGenerator};
use crate::clients::recruiting::RecruitingClient;
use crate::config::Config;
use crate::services::{
    AccountGateway, ApplicationService, CareerAdvisor, VacancySearchService, VacancySource,
};

/// One pooled client for the recruiting platform and the generative API. Its
/// timeout is the longer of the two; the recruiting client tightens it per
/// request.
fn build_shared_http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    let timeout = config
        .recruiting
        .request_timeout_seconds
        .max(config.ai.request_timeout_seconds);

    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout))
        .user_agent(&config.recruiting.client_identifier)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub cache: Arc<dyn SearchCache>,

    pub search_service: Arc<VacancySearchService>,

    pub advisor: Arc<CareerAdvisor>,

    pub applications: Arc<ApplicationService>,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(&config)?;

        let recruiting = Arc::new(RecruitingClient::with_shared_client(
            http_client.clone(),
            config.recruiting.clone(),
        ));
        let genai = Arc::new(GenAiClient::with_shared_client(
            http_client,
            config.ai.clone(),
        ));

        Ok(Self::from_parts(
            config,
            recruiting.clone(),
            recruiting,
            genai,
        ))
    }

    /// Wires the services around the given upstream collaborators.
    pub fn from_parts(
        config: Config,
        source: Arc<dyn VacancySource>,
        gateway: Arc<dyn AccountGateway>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let cache: Arc<dyn SearchCache> = Arc::new(MemorySearchCache::new(
            config.cache.max_entries,
            config.cache.eviction,
        ));

        let search_service = Arc::new(VacancySearchService::new(
            source,
            cache.clone(),
            config.cache.ttl(),
            config.recruiting.per_page,
        ));

        let advisor = Arc::new(CareerAdvisor::new(generator));

        let applications = Arc::new(ApplicationService::new(
            gateway,
            search_service.clone(),
            advisor.clone(),
        ));

        Self {
            config: Arc::new(RwLock::new(config)),
            cache,
            search_service,
            advisor,
            applications,
        }
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
