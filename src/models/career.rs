//! Career data produced by the AI advisor (or by its deterministic fallbacks).
//!
//! All fields default on decode: the model is free-form, so anything it
//! leaves out becomes empty instead of failing the whole reply.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeProfile {
    pub full_name: Option<String>,
    pub title: String,
    pub skills: Vec<String>,
    pub experience_years: Option<u32>,
    pub location: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct JobSuggestion {
    pub title: String,
    pub reason: String,
    /// Free text suitable for the search proxy's `text` filter.
    pub search_query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    pub provider: String,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Recommendations {
    pub jobs: Vec<JobSuggestion>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoverLetter {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Profession {
    pub title: String,
    pub description: String,
    pub demand: String,
    pub salary_range: String,
}
