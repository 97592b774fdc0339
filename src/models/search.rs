use serde::{Deserialize, Serialize};

/// Filters accepted by the search proxy. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Recruiting-platform area code (e.g. "1" for Moscow)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl SearchRequest {
    /// Canonical serialization used as the cache key.
    ///
    /// Field order is fixed by the struct definition and absent fields are
    /// omitted, so equal requests always map to the same key.
    #[must_use]
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    /// Outbound query parameters. Blank filters are left out; paging and
    /// ordering are always present.
    #[must_use]
    pub fn query_params(&self, per_page: u32) -> Vec<(&'static str, String)> {
        let filters = [
            ("text", &self.text),
            ("area", &self.area),
            ("experience", &self.experience),
            ("employment", &self.employment),
            ("schedule", &self.schedule),
        ];

        let mut params: Vec<(&'static str, String)> = filters
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (name, v.to_string()))
            })
            .collect();

        params.push(("per_page", per_page.to_string()));
        params.push(("page", self.page().to_string()));
        params.push(("order_by", "publication_time".to_string()));
        params
    }
}

/// Flat card-ready representation of a vacancy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedJob {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub location_name: String,
    pub salary_display_string: String,
    pub description: String,
    pub required_skill_names: Vec<String>,
    /// Presentation placeholder, not a computed score.
    pub match_percentage: u8,
    pub logo_url: String,
    pub employment_type_name: String,
    pub experience_name: String,
    pub company_description: String,
    pub benefits: Vec<String>,
    /// Presentation placeholder.
    pub display_color: String,
    pub external_url: String,
    pub published_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub items: Vec<NormalizedJob>,
    pub found: u64,
    pub pages: u32,
    pub per_page: u32,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    #[must_use]
    pub fn empty_with_error(page: u32, per_page: u32, message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            found: 0,
            pages: 0,
            per_page,
            page,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_stable_and_skips_absent_fields() {
        let a = SearchRequest {
            text: Some("rust".to_string()),
            area: Some("1".to_string()),
            ..Default::default()
        };
        let b: SearchRequest = serde_json::from_str(r#"{"area":"1","text":"rust"}"#).unwrap();

        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), r#"{"text":"rust","area":"1"}"#);
        assert_eq!(SearchRequest::default().cache_key(), "{}");
    }

    #[test]
    fn cache_key_distinguishes_pages() {
        let first = SearchRequest {
            page: Some(0),
            ..Default::default()
        };
        let second = SearchRequest {
            page: Some(1),
            ..Default::default()
        };
        assert_ne!(first.cache_key(), second.cache_key());
    }

    #[test]
    fn query_params_only_include_present_filters() {
        let request = SearchRequest {
            text: Some("  developer ".to_string()),
            schedule: Some(String::new()),
            page: Some(3),
            ..Default::default()
        };

        let params = request.query_params(20);
        assert_eq!(
            params,
            vec![
                ("text", "developer".to_string()),
                ("per_page", "20".to_string()),
                ("page", "3".to_string()),
                ("order_by", "publication_time".to_string()),
            ]
        );
    }

    #[test]
    fn empty_with_error_omits_nothing_but_items() {
        let response = SearchResponse::empty_with_error(2, 20, "Too many requests");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["error"], "Too many requests");
        assert_eq!(json["page"], 2);

        let ok = SearchResponse {
            error: None,
            ..response
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("error").is_none());
    }
}
