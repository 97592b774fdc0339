//! Client for the generative-language API (Gemini `generateContent`).

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Generative API key is not configured")]
    MissingApiKey,

    #[error("Generative API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generative API request failed: {0}")]
    Transport(String),

    #[error("Generative API returned no text")]
    EmptyReply,
}

impl From<reqwest::Error> for GenAiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Binary content sent next to the prompt, e.g. a PDF résumé the model
/// should read.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    #[must_use]
    pub fn pdf(data: Vec<u8>) -> Self {
        Self {
            mime_type: "application/pdf".to_string(),
            data,
        }
    }
}

/// Anything that turns a prompt into free-form text.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError>;

    async fn generate_with_attachment(
        &self,
        prompt: &str,
        attachment: &Attachment,
    ) -> Result<String, GenAiError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Clone)]
pub struct GenAiClient {
    client: Client,
    config: AiConfig,
}

impl GenAiClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: AiConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send(&self, parts: Vec<Part<'_>>) -> Result<String, GenAiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenAiError::MissingApiKey)?;

        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        debug!(model = %self.config.model, "Sending prompt to generative API");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .timeout(std::time::Duration::from_secs(
                self.config.request_timeout_seconds,
            ))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Generative API error {}: {}", status, body);
            return Err(GenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateResponse = response.json().await?;
        reply.into_text().ok_or(GenAiError::EmptyReply)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        self.send(vec![Part::Text { text: prompt }]).await
    }

    async fn generate_with_attachment(
        &self,
        prompt: &str,
        attachment: &Attachment,
    ) -> Result<String, GenAiError> {
        let data = base64::engine::general_purpose::STANDARD.encode(&attachment.data);
        self.send(vec![
            Part::Text { text: prompt },
            Part::Inline {
                inline_data: InlineData {
                    mime_type: &attachment.mime_type,
                    data,
                },
            },
        ])
        .await
    }
}
