pub mod career;
pub mod search;

pub use career::{
    Course, CoverLetter, JobSuggestion, NewsItem, Profession, Recommendations, ResumeProfile,
};
pub use search::{NormalizedJob, SearchRequest, SearchResponse};
