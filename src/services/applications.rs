//! Résumés, applications ("negotiations") and the OAuth flow against the
//! recruiting platform.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::recruiting::{
    NegotiationRequest, OAuthToken, RecruitingClient, RecruitingError, ResumeSummary, Vacancy,
};
use crate::models::{NormalizedJob, ResumeProfile};
use crate::services::ai::CareerAdvisor;
use crate::services::ai::fallback::DEFAULT_TITLE;
use crate::services::normalize::normalize_vacancy;
use crate::services::vacancy_search::VacancySearchService;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Upstream(#[from] RecruitingError),
}

/// Calls that act on behalf of a signed-in user.
#[async_trait::async_trait]
pub trait AccountGateway: Send + Sync {
    async fn my_resumes(&self, access_token: &str) -> Result<Vec<ResumeSummary>, RecruitingError>;

    async fn apply(
        &self,
        access_token: &str,
        negotiation: &NegotiationRequest,
    ) -> Result<(), RecruitingError>;

    async fn exchange_code(&self, code: &str) -> Result<OAuthToken, RecruitingError>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<OAuthToken, RecruitingError>;

    fn authorize_url(&self, state: Option<&str>) -> Result<String, RecruitingError>;
}

#[async_trait::async_trait]
impl AccountGateway for RecruitingClient {
    async fn my_resumes(&self, access_token: &str) -> Result<Vec<ResumeSummary>, RecruitingError> {
        Self::my_resumes(self, access_token).await
    }

    async fn apply(
        &self,
        access_token: &str,
        negotiation: &NegotiationRequest,
    ) -> Result<(), RecruitingError> {
        Self::apply(self, access_token, negotiation).await
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthToken, RecruitingError> {
        Self::exchange_code(self, code).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<OAuthToken, RecruitingError> {
        Self::refresh_token(self, refresh_token).await
    }

    fn authorize_url(&self, state: Option<&str>) -> Result<String, RecruitingError> {
        Self::authorize_url(self, state)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplyRequest {
    pub vacancy_id: String,
    pub resume_id: String,
    pub message: Option<String>,
    pub generate_cover_letter: bool,
    pub profile: Option<ResumeProfile>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub vacancy_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub cover_letter_fallback: bool,
}

pub struct ApplicationService {
    gateway: Arc<dyn AccountGateway>,
    search: Arc<VacancySearchService>,
    advisor: Arc<CareerAdvisor>,
}

impl ApplicationService {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn AccountGateway>,
        search: Arc<VacancySearchService>,
        advisor: Arc<CareerAdvisor>,
    ) -> Self {
        Self {
            gateway,
            search,
            advisor,
        }
    }

    pub async fn resumes(&self, access_token: &str) -> Result<Vec<ResumeSummary>, ApplicationError> {
        Ok(self.gateway.my_resumes(access_token).await?)
    }

    /// Submits an application. With `generate_cover_letter` and no explicit
    /// message, a letter is written for the vacancy first.
    pub async fn apply(
        &self,
        access_token: &str,
        request: ApplyRequest,
    ) -> Result<ApplyOutcome, ApplicationError> {
        if request.vacancy_id.trim().is_empty() || request.resume_id.trim().is_empty() {
            return Err(ApplicationError::Validation(
                "vacancyId and resumeId are required".to_string(),
            ));
        }

        let explicit = request
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        let (message, generated, fallback) = match explicit {
            Some(message) => (Some(message), false, false),
            None if request.generate_cover_letter => {
                let job = self.job_for_letter(&request.vacancy_id).await;
                let profile = request.profile.clone().unwrap_or_else(|| ResumeProfile {
                    title: DEFAULT_TITLE.to_string(),
                    ..Default::default()
                });
                let outcome = self.advisor.cover_letter(&profile, &job).await;
                let fallback = outcome.is_fallback();
                (Some(outcome.into_inner().text), true, fallback)
            }
            None => (None, false, false),
        };

        let negotiation = NegotiationRequest {
            vacancy_id: request.vacancy_id.clone(),
            resume_id: request.resume_id,
            message: message.clone(),
        };
        self.gateway.apply(access_token, &negotiation).await?;

        info!(
            vacancy_id = %request.vacancy_id,
            with_letter = negotiation.message.is_some(),
            "Application submitted"
        );

        Ok(ApplyOutcome {
            vacancy_id: request.vacancy_id,
            cover_letter: if generated { message } else { None },
            cover_letter_fallback: fallback,
        })
    }

    /// The vacancy to write a letter for. A failed lookup degrades to a
    /// placeholder job so the letter still falls back to a template.
    async fn job_for_letter(&self, vacancy_id: &str) -> NormalizedJob {
        match self.search.vacancy(vacancy_id).await {
            Ok(job) => job,
            Err(e) => {
                warn!(%vacancy_id, "Vacancy lookup for cover letter failed: {}", e);
                let placeholder = Vacancy {
                    id: vacancy_id.to_string(),
                    ..Default::default()
                };
                normalize_vacancy(&placeholder, &mut rand::rng())
            }
        }
    }

    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken, ApplicationError> {
        if code.trim().is_empty() {
            return Err(ApplicationError::Validation("code is required".to_string()));
        }
        Ok(self.gateway.exchange_code(code).await?)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<OAuthToken, ApplicationError> {
        if refresh_token.trim().is_empty() {
            return Err(ApplicationError::Validation(
                "refresh_token is required".to_string(),
            ));
        }
        Ok(self.gateway.refresh_token(refresh_token).await?)
    }

    pub fn authorize_url(&self, state: Option<&str>) -> Result<String, ApplicationError> {
        Ok(self.gateway.authorize_url(state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EvictionPolicy, MemorySearchCache};
    use crate::clients::genai::{Attachment, GenAiError, TextGenerator};
    use crate::clients::recruiting::VacancyPage;
    use crate::services::vacancy_search::VacancySource;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingGateway {
        submitted: Mutex<Vec<(String, NegotiationRequest)>>,
    }

    #[async_trait::async_trait]
    impl AccountGateway for RecordingGateway {
        async fn my_resumes(&self, _token: &str) -> Result<Vec<ResumeSummary>, RecruitingError> {
            Ok(vec![ResumeSummary {
                id: "r1".to_string(),
                title: Some("Rust developer".to_string()),
                ..Default::default()
            }])
        }

        async fn apply(
            &self,
            access_token: &str,
            negotiation: &NegotiationRequest,
        ) -> Result<(), RecruitingError> {
            self.submitted
                .lock()
                .await
                .push((access_token.to_string(), negotiation.clone()));
            Ok(())
        }

        async fn exchange_code(&self, _code: &str) -> Result<OAuthToken, RecruitingError> {
            Err(RecruitingError::NotConfigured("client_id"))
        }

        async fn refresh_token(&self, _token: &str) -> Result<OAuthToken, RecruitingError> {
            Err(RecruitingError::NotConfigured("client_id"))
        }

        fn authorize_url(&self, _state: Option<&str>) -> Result<String, RecruitingError> {
            Ok("https://example.test/authorize".to_string())
        }
    }

    struct OneVacancy;

    #[async_trait::async_trait]
    impl VacancySource for OneVacancy {
        async fn search_vacancies(
            &self,
            _params: &[(&'static str, String)],
        ) -> Result<VacancyPage, RecruitingError> {
            Ok(VacancyPage::default())
        }

        async fn vacancy(&self, id: &str) -> Result<Vacancy, RecruitingError> {
            if id == "gone" {
                return Err(RecruitingError::Status {
                    status: 404,
                    body: String::new(),
                });
            }
            Ok(Vacancy {
                id: id.to_string(),
                name: Some("Rust developer".to_string()),
                ..Default::default()
            })
        }
    }

    struct Offline;

    #[async_trait::async_trait]
    impl TextGenerator for Offline {
        async fn generate(&self, _prompt: &str) -> Result<String, GenAiError> {
            Err(GenAiError::MissingApiKey)
        }

        async fn generate_with_attachment(
            &self,
            _prompt: &str,
            _attachment: &Attachment,
        ) -> Result<String, GenAiError> {
            Err(GenAiError::MissingApiKey)
        }
    }

    fn service(gateway: Arc<RecordingGateway>) -> ApplicationService {
        let cache = Arc::new(MemorySearchCache::new(10, EvictionPolicy::Fifo));
        let search = Arc::new(VacancySearchService::new(
            Arc::new(OneVacancy),
            cache,
            Duration::from_secs(300),
            20,
        ));
        let advisor = Arc::new(CareerAdvisor::new(Arc::new(Offline)));
        ApplicationService::new(gateway, search, advisor)
    }

    #[tokio::test]
    async fn explicit_message_is_sent_as_is() {
        let gateway = Arc::new(RecordingGateway::default());
        let svc = service(gateway.clone());

        let outcome = svc
            .apply(
                "token",
                ApplyRequest {
                    vacancy_id: "10".to_string(),
                    resume_id: "r1".to_string(),
                    message: Some("Здравствуйте!".to_string()),
                    generate_cover_letter: true,
                    profile: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.cover_letter, None);
        assert!(!outcome.cover_letter_fallback);

        let submitted = gateway.submitted.lock().await;
        assert_eq!(submitted[0].0, "token");
        assert_eq!(submitted[0].1.message.as_deref(), Some("Здравствуйте!"));
    }

    #[tokio::test]
    async fn generated_letter_falls_back_when_model_is_offline() {
        let gateway = Arc::new(RecordingGateway::default());
        let svc = service(gateway.clone());

        let outcome = svc
            .apply(
                "token",
                ApplyRequest {
                    vacancy_id: "10".to_string(),
                    resume_id: "r1".to_string(),
                    generate_cover_letter: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(outcome.cover_letter_fallback);
        let letter = outcome.cover_letter.unwrap();
        assert!(letter.contains("Rust developer"));
        assert_eq!(
            gateway.submitted.lock().await[0].1.message.as_deref(),
            Some(letter.as_str())
        );
    }

    #[tokio::test]
    async fn failed_vacancy_lookup_still_gets_a_letter() {
        let gateway = Arc::new(RecordingGateway::default());
        let svc = service(gateway.clone());

        let outcome = svc
            .apply(
                "token",
                ApplyRequest {
                    vacancy_id: "gone".to_string(),
                    resume_id: "r1".to_string(),
                    generate_cover_letter: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(outcome.cover_letter_fallback);
        assert!(!outcome.cover_letter.unwrap().trim().is_empty());

        let submitted = gateway.submitted.lock().await;
        assert_eq!(submitted[0].1.vacancy_id, "gone");
        assert!(submitted[0].1.message.is_some());
    }

    #[tokio::test]
    async fn plain_application_has_no_message() {
        let gateway = Arc::new(RecordingGateway::default());
        let svc = service(gateway.clone());

        svc.apply(
            "token",
            ApplyRequest {
                vacancy_id: "10".to_string(),
                resume_id: "r1".to_string(),
                message: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(gateway.submitted.lock().await[0].1.message.is_none());
    }

    #[tokio::test]
    async fn missing_ids_are_rejected() {
        let svc = service(Arc::new(RecordingGateway::default()));
        let err = svc.apply("token", ApplyRequest::default()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
    }

    #[tokio::test]
    async fn oauth_passthrough() {
        let svc = service(Arc::new(RecordingGateway::default()));
        assert_eq!(
            svc.authorize_url(None).unwrap(),
            "https://example.test/authorize"
        );
        assert!(matches!(
            svc.exchange_code("abc").await.unwrap_err(),
            ApplicationError::Upstream(RecruitingError::NotConfigured(_))
        ));
        assert!(matches!(
            svc.refresh_token("").await.unwrap_err(),
            ApplicationError::Validation(_)
        ));
        assert_eq!(svc.resumes("t").await.unwrap()[0].id, "r1");
    }
}
