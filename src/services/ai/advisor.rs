use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{Span, debug, warn};

use super::fallback;
use super::json::extract_json;
use super::outcome::AiOutcome;
use super::prompts::{
    CoverLetterPrompt, NewsPrompt, ProfessionPrompt, PromptTemplate, RecommendationPrompt,
    ResumeAnalysisPrompt,
};
use crate::clients::genai::{Attachment, TextGenerator};
use crate::models::{
    CoverLetter, NewsItem, NormalizedJob, Profession, Recommendations, ResumeProfile,
};

const MAX_JOB_SUGGESTIONS: usize = 5;
const MAX_COURSES: usize = 3;
const NEWS_COUNT: usize = 5;
const PROFESSION_COUNT: usize = 4;

pub enum ResumeInput {
    Text(String),
    Pdf(Vec<u8>),
}

/// Lists may come back bare or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListReply<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "news", alias = "professions", alias = "data")]
        items: Vec<T>,
    },
}

impl<T> ListReply<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { items } => items,
        }
    }
}

pub struct CareerAdvisor {
    generator: Arc<dyn TextGenerator>,
}

impl CareerAdvisor {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    async fn ask<T: DeserializeOwned>(
        &self,
        task: &'static str,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Option<T> {
        let reply = match attachment {
            Some(attachment) => {
                self.generator
                    .generate_with_attachment(prompt, attachment)
                    .await
            }
            None => self.generator.generate(prompt).await,
        };

        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                warn!(task, "Generative API call failed: {}", e);
                return None;
            }
        };

        match extract_json::<T>(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(task, "Could not parse model reply: {}", e);
                debug!(task, reply = %text, "Unparseable model reply");
                None
            }
        }
    }

    fn settle<T>(
        task: &'static str,
        parsed: Option<T>,
        fallback: impl FnOnce() -> T,
    ) -> AiOutcome<T> {
        if let Some(value) = parsed {
            Span::current().record("ai", "model");
            AiOutcome::Parsed(value)
        } else {
            metrics::counter!("ai_fallbacks_total", "task" => task).increment(1);
            Span::current().record("ai", "fallback");
            AiOutcome::Fallback(fallback())
        }
    }

    pub async fn analyze_resume(&self, input: &ResumeInput) -> AiOutcome<ResumeProfile> {
        let parsed = match input {
            ResumeInput::Text(text) => {
                let prompt = ResumeAnalysisPrompt {
                    resume_text: Some(text),
                }
                .render();
                self.ask::<ResumeProfile>("resume", &prompt, None).await
            }
            ResumeInput::Pdf(bytes) => {
                let prompt = ResumeAnalysisPrompt { resume_text: None }.render();
                let attachment = Attachment::pdf(bytes.clone());
                self.ask::<ResumeProfile>("resume", &prompt, Some(&attachment))
                    .await
            }
        }
        .filter(|p| !p.title.trim().is_empty() || !p.skills.is_empty());

        Self::settle("resume", parsed, || match input {
            ResumeInput::Text(text) => fallback::resume_profile(text),
            ResumeInput::Pdf(_) => fallback::resume_profile(""),
        })
    }

    pub async fn recommend(&self, profile: &ResumeProfile) -> AiOutcome<Recommendations> {
        let prompt = RecommendationPrompt {
            profile,
            max_jobs: MAX_JOB_SUGGESTIONS,
            max_courses: MAX_COURSES,
        }
        .render();

        let parsed = self
            .ask::<Recommendations>("recommendations", &prompt, None)
            .await
            .filter(|r| !r.jobs.is_empty());

        Self::settle("recommendations", parsed, || {
            fallback::recommendations(profile)
        })
    }

    pub async fn cover_letter(
        &self,
        profile: &ResumeProfile,
        job: &NormalizedJob,
    ) -> AiOutcome<CoverLetter> {
        let prompt = CoverLetterPrompt { profile, job }.render();

        let parsed = self
            .ask::<CoverLetter>("cover_letter", &prompt, None)
            .await
            .filter(|l| !l.text.trim().is_empty());

        Self::settle("cover_letter", parsed, || {
            fallback::cover_letter(profile, job)
        })
    }

    pub async fn news(&self, profile: &ResumeProfile) -> AiOutcome<Vec<NewsItem>> {
        let prompt = NewsPrompt {
            profile,
            count: NEWS_COUNT,
        }
        .render();

        let parsed = self
            .ask::<ListReply<NewsItem>>("news", &prompt, None)
            .await
            .map(ListReply::into_vec)
            .filter(|items| !items.is_empty());

        Self::settle("news", parsed, || fallback::news(profile))
    }

    pub async fn professions(&self, profile: &ResumeProfile) -> AiOutcome<Vec<Profession>> {
        let prompt = ProfessionPrompt {
            profile,
            count: PROFESSION_COUNT,
        }
        .render();

        let parsed = self
            .ask::<ListReply<Profession>>("professions", &prompt, None)
            .await
            .map(ListReply::into_vec)
            .filter(|items| !items.is_empty());

        Self::settle("professions", parsed, || fallback::professions(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::genai::GenAiError;
    use std::sync::Mutex;

    /// Returns a fixed reply and remembers whether an attachment was sent.
    struct CannedGenerator {
        reply: Result<String, ()>,
        saw_attachment: Mutex<bool>,
    }

    impl CannedGenerator {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                saw_attachment: Mutex::new(false),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                saw_attachment: Mutex::new(false),
            })
        }

        fn answer(&self) -> Result<String, GenAiError> {
            self.reply.clone().map_err(|()| GenAiError::EmptyReply)
        }
    }

    #[async_trait::async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenAiError> {
            self.answer()
        }

        async fn generate_with_attachment(
            &self,
            _prompt: &str,
            attachment: &Attachment,
        ) -> Result<String, GenAiError> {
            assert_eq!(attachment.mime_type, "application/pdf");
            *self.saw_attachment.lock().unwrap() = true;
            self.answer()
        }
    }

    fn profile() -> ResumeProfile {
        ResumeProfile {
            title: "Разработчик".to_string(),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn parsed_resume_from_fenced_reply() {
        let generator = CannedGenerator::ok(
            "```json\n{\"title\": \"Data engineer\", \"skills\": [\"Python\"], \"experienceYears\": 3}\n```",
        );
        let advisor = CareerAdvisor::new(generator);

        let outcome = advisor
            .analyze_resume(&ResumeInput::Text("...".to_string()))
            .await;

        assert!(!outcome.is_fallback());
        let profile = outcome.into_inner();
        assert_eq!(profile.title, "Data engineer");
        assert_eq!(profile.experience_years, Some(3));
    }

    #[tokio::test]
    async fn pdf_resume_goes_as_attachment() {
        let generator = CannedGenerator::ok(r#"{"title": "QA", "skills": []}"#);
        let advisor = CareerAdvisor::new(generator.clone());

        let outcome = advisor
            .analyze_resume(&ResumeInput::Pdf(b"%PDF-1.4".to_vec()))
            .await;

        assert!(!outcome.is_fallback());
        assert!(*generator.saw_attachment.lock().unwrap());
    }

    #[tokio::test]
    async fn failing_model_falls_back_to_keyword_scan() {
        let advisor = CareerAdvisor::new(CannedGenerator::failing());

        let outcome = advisor
            .analyze_resume(&ResumeInput::Text("Python developer, 3 года".to_string()))
            .await;

        assert!(outcome.is_fallback());
        let profile = outcome.into_inner();
        assert_eq!(profile.skills, vec!["Python"]);
        assert_eq!(profile.experience_years, Some(3));
    }

    #[tokio::test]
    async fn empty_profile_from_model_counts_as_failure() {
        let advisor = CareerAdvisor::new(CannedGenerator::ok(r#"{"title": "", "skills": []}"#));
        let outcome = advisor
            .analyze_resume(&ResumeInput::Text("Rust".to_string()))
            .await;
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn prose_reply_falls_back() {
        let advisor = CareerAdvisor::new(CannedGenerator::ok("Я не могу ответить."));
        let outcome = advisor.recommend(&profile()).await;
        assert!(outcome.is_fallback());
        assert!(!outcome.value().jobs.is_empty());
    }

    #[tokio::test]
    async fn news_accepts_bare_and_wrapped_lists() {
        let bare = CareerAdvisor::new(CannedGenerator::ok(
            r#"[{"title": "a", "summary": "b", "category": "c"}]"#,
        ));
        let outcome = bare.news(&profile()).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.value().len(), 1);

        let wrapped = CareerAdvisor::new(CannedGenerator::ok(
            r#"{"news": [{"title": "a"}, {"title": "b"}]}"#,
        ));
        let outcome = wrapped.news(&profile()).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.value().len(), 2);
    }

    #[tokio::test]
    async fn professions_wrapped_under_their_own_key() {
        let advisor = CareerAdvisor::new(CannedGenerator::ok(
            r#"{"professions": [{"title": "SRE", "salaryRange": "300k"}]}"#,
        ));
        let outcome = advisor.professions(&profile()).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.value()[0].salary_range, "300k");
    }

    #[tokio::test]
    async fn blank_cover_letter_falls_back() {
        let advisor = CareerAdvisor::new(CannedGenerator::ok(r#"{"text": "  "}"#));
        let job = crate::services::normalize::normalize_vacancy(
            &crate::clients::recruiting::Vacancy {
                id: "1".to_string(),
                name: Some("Rust developer".to_string()),
                ..Default::default()
            },
            &mut rand::rng(),
        );

        let outcome = advisor.cover_letter(&profile(), &job).await;
        assert!(outcome.is_fallback());
        assert!(outcome.value().text.contains("Rust developer"));
    }
}
