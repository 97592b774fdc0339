//! Prompt templates: each input struct renders to one prompt string.

use std::fmt::Write;

use crate::models::{NormalizedJob, ResumeProfile};

const JSON_ONLY: &str =
    "Ответь строго одним JSON-значением без пояснений и без markdown. Пиши по-русски.";

/// Largest résumé excerpt sent to the model.
const MAX_RESUME_CHARS: usize = 12_000;

pub trait PromptTemplate {
    fn render(&self) -> String;
}

fn profile_block(profile: &ResumeProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Должность: {}", profile.title);
    if !profile.skills.is_empty() {
        let _ = writeln!(out, "Навыки: {}", profile.skills.join(", "));
    }
    if let Some(years) = profile.experience_years {
        let _ = writeln!(out, "Опыт (лет): {years}");
    }
    if let Some(location) = &profile.location {
        let _ = writeln!(out, "Город: {location}");
    }
    if !profile.summary.is_empty() {
        let _ = writeln!(out, "О себе: {}", profile.summary);
    }
    out
}

/// Résumé analysis. Without `resume_text` the résumé is expected as an
/// attachment next to the prompt.
pub struct ResumeAnalysisPrompt<'a> {
    pub resume_text: Option<&'a str>,
}

impl PromptTemplate for ResumeAnalysisPrompt<'_> {
    fn render(&self) -> String {
        let source = match self.resume_text {
            Some(text) => {
                let excerpt: String = text.chars().take(MAX_RESUME_CHARS).collect();
                format!("Текст резюме:\n\"\"\"\n{excerpt}\n\"\"\"")
            }
            None => "Резюме приложено к сообщению в виде файла.".to_string(),
        };

        format!(
            "Ты карьерный консультант. Извлеки из резюме профиль кандидата.\n\
             {source}\n\n\
             Формат ответа:\n\
             {{\"fullName\": string|null, \"title\": string, \"skills\": [string], \
             \"experienceYears\": number|null, \"location\": string|null, \"summary\": string}}\n\
             {JSON_ONLY}"
        )
    }
}

pub struct RecommendationPrompt<'a> {
    pub profile: &'a ResumeProfile,
    pub max_jobs: usize,
    pub max_courses: usize,
}

impl PromptTemplate for RecommendationPrompt<'_> {
    fn render(&self) -> String {
        format!(
            "Ты карьерный консультант. Подбери кандидату до {jobs} подходящих направлений \
             поиска работы и до {courses} онлайн-курсов для развития.\n\n\
             Профиль кандидата:\n{profile}\n\
             Формат ответа:\n\
             {{\"jobs\": [{{\"title\": string, \"reason\": string, \"searchQuery\": string}}], \
             \"courses\": [{{\"title\": string, \"provider\": string, \"url\": string, \"reason\": string}}]}}\n\
             {JSON_ONLY}",
            jobs = self.max_jobs,
            courses = self.max_courses,
            profile = profile_block(self.profile),
        )
    }
}

pub struct CoverLetterPrompt<'a> {
    pub profile: &'a ResumeProfile,
    pub job: &'a NormalizedJob,
}

impl PromptTemplate for CoverLetterPrompt<'_> {
    fn render(&self) -> String {
        let skills = if self.job.required_skill_names.is_empty() {
            "не указаны".to_string()
        } else {
            self.job.required_skill_names.join(", ")
        };

        format!(
            "Напиши короткое (до 1200 символов) сопроводительное письмо на вакансию.\n\n\
             Вакансия: {title}\nКомпания: {company}\nТребуемые навыки: {skills}\n\
             Описание:\n{description}\n\n\
             Кандидат:\n{profile}\n\
             Формат ответа: {{\"text\": string}}\n\
             {JSON_ONLY}",
            title = self.job.title,
            company = self.job.company_name,
            description = self.job.description,
            profile = profile_block(self.profile),
        )
    }
}

pub struct NewsPrompt<'a> {
    pub profile: &'a ResumeProfile,
    pub count: usize,
}

impl PromptTemplate for NewsPrompt<'_> {
    fn render(&self) -> String {
        format!(
            "Составь {count} коротких новостей о рынке труда и трендах, интересных \
             специалисту с таким профилем:\n{profile}\n\
             Формат ответа: [{{\"title\": string, \"summary\": string, \"category\": string}}]\n\
             {JSON_ONLY}",
            count = self.count,
            profile = profile_block(self.profile),
        )
    }
}

pub struct ProfessionPrompt<'a> {
    pub profile: &'a ResumeProfile,
    pub count: usize,
}

impl PromptTemplate for ProfessionPrompt<'_> {
    fn render(&self) -> String {
        format!(
            "Предложи {count} профессий, в которые кандидат может перейти, опираясь на \
             его навыки:\n{profile}\n\
             Формат ответа: [{{\"title\": string, \"description\": string, \
             \"demand\": string, \"salaryRange\": string}}]\n\
             {JSON_ONLY}",
            count = self.count,
            profile = profile_block(self.profile),
        )
    }
}
