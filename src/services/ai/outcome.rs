/// Result of an AI-backed operation: either the model's parsed answer or
/// deterministic fallback content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiOutcome<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> AiOutcome<T> {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AiOutcome<U> {
        match self {
            Self::Parsed(v) => AiOutcome::Parsed(f(v)),
            Self::Fallback(v) => AiOutcome::Fallback(f(v)),
        }
    }
}
