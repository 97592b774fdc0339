use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonExtractError {
    #[error("no JSON found in model reply")]
    NotFound,

    #[error("invalid JSON in model reply: {0}")]
    Invalid(#[from] serde_json::Error),
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"```[A-Za-z]*[ \t]*").expect("Invalid regex pattern defined in code")
    })
}

fn strip_code_fences(reply: &str) -> String {
    fence_regex().replace_all(reply, "").trim().to_string()
}

/// Slice from the first `{`/`[` to the last matching closer.
fn outermost_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let closer = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(closer)?;
    (end > start).then(|| &text[start..=end])
}

/// Pulls a JSON value out of free-form model output.
///
/// Markdown code fences are removed first; if the remainder is not valid
/// JSON on its own, the outermost object or array inside it is tried.
pub fn extract_json<T: DeserializeOwned>(reply: &str) -> Result<T, JsonExtractError> {
    let cleaned = strip_code_fences(reply);

    if let Ok(value) = serde_json::from_str(&cleaned) {
        return Ok(value);
    }

    let candidate = outermost_json(&cleaned).ok_or(JsonExtractError::NotFound)?;
    Ok(serde_json::from_str(candidate)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Answer {
        title: String,
    }

    #[test]
    fn plain_json() {
        let a: Answer = extract_json(r#"{"title":"ok"}"#).unwrap();
        assert_eq!(a.title, "ok");
    }

    #[test]
    fn fenced_json() {
        let reply = "```json\n{\"title\": \"fenced\"}\n```";
        let a: Answer = extract_json(reply).unwrap();
        assert_eq!(a.title, "fenced");
    }

    #[test]
    fn json_surrounded_by_prose() {
        let reply = "Конечно! Вот ответ:\n{\"title\": \"inner\"}\nУдачи!";
        let a: Answer = extract_json(reply).unwrap();
        assert_eq!(a.title, "inner");
    }

    #[test]
    fn arrays_are_supported() {
        let reply = "```\n[{\"title\": \"a\"}, {\"title\": \"b\"}]\n```";
        let list: Vec<Answer> = extract_json(reply).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn no_json_at_all() {
        let err = extract_json::<Answer>("Извините, не могу помочь").unwrap_err();
        assert!(matches!(err, JsonExtractError::NotFound));
    }

    #[test]
    fn broken_json() {
        let err = extract_json::<Answer>("{\"title\": }").unwrap_err();
        assert!(matches!(err, JsonExtractError::Invalid(_)));
    }
}
