pub mod genai;
pub mod recruiting;

pub use genai::{Attachment, GenAiClient, GenAiError, TextGenerator};
pub use recruiting::{RecruitingClient, RecruitingError};
