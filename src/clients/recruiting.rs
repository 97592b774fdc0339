//! Client for the recruiting platform's REST API (hh.ru-compatible).

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RecruitingConfig;

const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum RecruitingError {
    #[error("Too many requests")]
    RateLimited,

    #[error("Recruiting API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Recruiting API request timed out")]
    Timeout,

    #[error("Recruiting API request failed: {0}")]
    Transport(String),

    #[error("Failed to decode recruiting API response: {0}")]
    Decode(String),

    #[error("OAuth is not configured: missing {0}")]
    NotConfigured(&'static str),
}

impl From<reqwest::Error> for RecruitingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Accepts strings, numbers and null, so one odd id doesn't sink a page.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A field of the wrong shape becomes `None` instead of failing the vacancy.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Amounts sometimes arrive as strings like `"100000"`.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(' ', "").parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Salary {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub from: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub to: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub gross: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Employer {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub logo_urls: Option<HashMap<String, String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub alternate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Snippet {
    #[serde(default, deserialize_with = "lenient")]
    pub requirement: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub responsibility: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct KeySkill {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// A vacancy as the recruiting platform returns it, from search results or
/// from the detail endpoint. Everything except `id` may be missing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Vacancy {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub employer: Option<Employer>,
    #[serde(default, deserialize_with = "lenient")]
    pub salary: Option<Salary>,
    #[serde(default, deserialize_with = "lenient")]
    pub area: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub snippet: Option<Snippet>,
    #[serde(default, deserialize_with = "lenient")]
    pub key_skills: Option<Vec<KeySkill>>,
    #[serde(default, deserialize_with = "lenient")]
    pub employment: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub experience: Option<NamedRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub schedule: Option<NamedRef>,
    /// HTML, only on the detail endpoint.
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub alternate_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VacancyPage {
    pub items: Vec<Vacancy>,
    pub found: u64,
    pub pages: u32,
    pub per_page: u32,
    pub page: u32,
}

impl VacancyPage {
    /// Decodes a search page field by field. Malformed vacancy fields become
    /// `None`; only items without an object shape are skipped. Missing
    /// counters become zero.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        let counter = |name: &str| value.get(name).and_then(serde_json::Value::as_u64);

        let items = value
            .get("items")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match Vacancy::deserialize(item) {
                        Ok(vacancy) => Some(vacancy),
                        Err(e) => {
                            warn!("Skipping undecodable vacancy: {}", e);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            items,
            found: counter("found").unwrap_or(0),
            pages: counter("pages").and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
            per_page: counter("per_page")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0),
            page: counter("page").and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ResumeSummary {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResumeList {
    #[serde(default)]
    items: Vec<ResumeSummary>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// A "negotiation" is the platform's name for an application.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NegotiationRequest {
    pub vacancy_id: String,
    pub resume_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct RecruitingClient {
    client: Client,
    config: RecruitingConfig,
}

impl RecruitingClient {
    pub fn new(config: RecruitingConfig) -> Result<Self, RecruitingError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub const fn with_shared_client(client: Client, config: RecruitingConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("User-Agent", &self.config.client_identifier)
            .header("HH-User-Agent", &self.config.client_identifier)
            .timeout(self.config.request_timeout())
    }

    async fn check(response: Response) -> Result<Response, RecruitingError> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RecruitingError::RateLimited);
        }
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(RecruitingError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    pub async fn search_vacancies(
        &self,
        params: &[(&str, String)],
    ) -> Result<VacancyPage, RecruitingError> {
        let url = format!("{}/vacancies", self.base_url());
        debug!(?params, "Searching vacancies");

        let response = self
            .request(self.client.get(&url))
            .query(params)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body: serde_json::Value = response.json().await?;
        Ok(VacancyPage::from_value(&body))
    }

    pub async fn vacancy(&self, id: &str) -> Result<Vacancy, RecruitingError> {
        let url = format!("{}/vacancies/{}", self.base_url(), urlencode(id));

        let response = self.request(self.client.get(&url)).send().await?;
        let response = Self::check(response).await?;

        response
            .json()
            .await
            .map_err(|e| RecruitingError::Decode(e.to_string()))
    }

    pub async fn my_resumes(&self, access_token: &str) -> Result<Vec<ResumeSummary>, RecruitingError> {
        let url = format!("{}/resumes/mine", self.base_url());

        let response = self
            .request(self.client.get(&url))
            .bearer_auth(access_token)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let list: ResumeList = response
            .json()
            .await
            .map_err(|e| RecruitingError::Decode(e.to_string()))?;
        Ok(list.items)
    }

    pub async fn apply(
        &self,
        access_token: &str,
        negotiation: &NegotiationRequest,
    ) -> Result<(), RecruitingError> {
        let url = format!("{}/negotiations", self.base_url());

        let response = self
            .request(self.client.post(&url))
            .bearer_auth(access_token)
            .form(negotiation)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    fn oauth_credentials(&self) -> Result<(&str, &str), RecruitingError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or(RecruitingError::NotConfigured("client_id"))?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or(RecruitingError::NotConfigured("client_secret"))?;
        Ok((client_id, client_secret))
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<OAuthToken, RecruitingError> {
        let response = self
            .request(self.client.post(&self.config.oauth_token_url))
            .form(form)
            .send()
            .await?;
        let response = Self::check(response).await?;

        response
            .json()
            .await
            .map_err(|e| RecruitingError::Decode(e.to_string()))
    }

    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken, RecruitingError> {
        let (client_id, client_secret) = self.oauth_credentials()?;

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
        ];
        if let Some(redirect_uri) = self.config.redirect_uri.as_deref() {
            form.push(("redirect_uri", redirect_uri));
        }

        self.token_request(&form).await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<OAuthToken, RecruitingError> {
        let (client_id, client_secret) = self.oauth_credentials()?;

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ];

        self.token_request(&form).await
    }

    /// URL the frontend sends the user to for the authorization-code flow.
    pub fn authorize_url(&self, state: Option<&str>) -> Result<String, RecruitingError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or(RecruitingError::NotConfigured("client_id"))?;

        let mut params = vec![("response_type", "code"), ("client_id", client_id)];
        if let Some(redirect_uri) = self.config.redirect_uri.as_deref() {
            params.push(("redirect_uri", redirect_uri));
        }
        if let Some(state) = state {
            params.push(("state", state));
        }

        url::Url::parse_with_params(&self.config.oauth_authorize_url, &params)
            .map(String::from)
            .map_err(|e| RecruitingError::Transport(format!("Invalid authorize URL: {e}")))
    }
}

fn urlencode(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}
