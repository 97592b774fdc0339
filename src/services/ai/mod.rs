//! AI-backed career helpers.
//!
//! Every operation asks the generative model for JSON and, when the call or
//! the parse fails, answers with deterministic content instead, so callers
//! always get something to render.

pub mod advisor;
pub mod fallback;
pub mod json;
pub mod outcome;
pub mod prompts;

pub use advisor::{CareerAdvisor, ResumeInput};
pub use json::{JsonExtractError, extract_json};
pub use outcome::AiOutcome;
pub use prompts::PromptTemplate;
