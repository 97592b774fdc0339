//! Maps the recruiting platform's nested vacancy shape onto [`NormalizedJob`].

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

use crate::clients::recruiting::{NamedRef, Salary, Vacancy};
use crate::models::NormalizedJob;

pub const NOT_SPECIFIED: &str = "Не указано";
pub const SALARY_NOT_SPECIFIED: &str = "Зарплата не указана";
pub const NO_DESCRIPTION: &str = "Описание не указано";
pub const NO_COMPANY_DESCRIPTION: &str = "Информация о компании отсутствует";

const LOGO_SIZES: [&str; 3] = ["90", "240", "original"];

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid regex pattern defined in code"))
}

fn strip_tags(text: &str) -> String {
    tag_regex().replace_all(text, "").trim().to_string()
}

fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 120)
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|_| strip_tags(html))
}

#[must_use]
pub fn currency_symbol(code: &str) -> &str {
    match code {
        "RUR" | "RUB" => "₽",
        "USD" => "$",
        "EUR" => "€",
        "KZT" => "₸",
        "UAH" => "₴",
        "BYR" | "BYN" => "Br",
        other => other,
    }
}

/// `1234567.0` -> `"1 234 567"`
#[must_use]
pub fn group_thousands(amount: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = amount.max(0.0).round() as u64;
    let digits = whole.to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Three-way from/to salary formatter.
#[must_use]
pub fn format_salary(salary: Option<&Salary>) -> String {
    let Some(salary) = salary else {
        return SALARY_NOT_SPECIFIED.to_string();
    };

    let symbol = currency_symbol(salary.currency.as_deref().unwrap_or("RUR"));

    match (salary.from, salary.to) {
        (Some(from), Some(to)) => format!(
            "{} - {} {}",
            group_thousands(from),
            group_thousands(to),
            symbol
        ),
        (Some(from), None) => format!("от {} {}", group_thousands(from), symbol),
        (None, Some(to)) => format!("до {} {}", group_thousands(to), symbol),
        (None, None) => SALARY_NOT_SPECIFIED.to_string(),
    }
}

fn name_or_default(named: Option<&NamedRef>) -> String {
    named
        .and_then(|n| n.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(NOT_SPECIFIED)
        .to_string()
}

fn description(vacancy: &Vacancy) -> String {
    if let Some(html) = vacancy.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let text = html_to_text(html);
        if !text.is_empty() {
            return text;
        }
    }

    let parts: Vec<String> = vacancy
        .snippet
        .as_ref()
        .map(|s| {
            [s.responsibility.as_deref(), s.requirement.as_deref()]
                .into_iter()
                .flatten()
                .map(strip_tags)
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if parts.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        parts.join("\n\n")
    }
}

fn logo_url(vacancy: &Vacancy) -> String {
    vacancy
        .employer
        .as_ref()
        .and_then(|e| e.logo_urls.as_ref())
        .and_then(|urls| LOGO_SIZES.iter().find_map(|size| urls.get(*size)))
        .cloned()
        .unwrap_or_default()
}

fn benefits(vacancy: &Vacancy) -> Vec<String> {
    [vacancy.schedule.as_ref(), vacancy.employment.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(|n| n.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Random `#rrggbb` card colour.
pub fn random_color<R: Rng>(rng: &mut R) -> String {
    format!("#{:06x}", rng.random_range(0..=0x00FF_FFFF_u32))
}

/// Builds a card from an upstream vacancy, defaulting every missing field.
///
/// `match_percentage` and `display_color` are random presentation
/// placeholders drawn from `rng`.
pub fn normalize_vacancy<R: Rng>(vacancy: &Vacancy, rng: &mut R) -> NormalizedJob {
    let employer = vacancy.employer.as_ref();

    NormalizedJob {
        id: vacancy.id.clone(),
        title: vacancy
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(NOT_SPECIFIED)
            .to_string(),
        company_name: employer
            .and_then(|e| e.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(NOT_SPECIFIED)
            .to_string(),
        location_name: name_or_default(vacancy.area.as_ref()),
        salary_display_string: format_salary(vacancy.salary.as_ref()),
        description: description(vacancy),
        required_skill_names: vacancy
            .key_skills
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|s| s.name.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        match_percentage: rng.random_range(75..=95),
        logo_url: logo_url(vacancy),
        employment_type_name: name_or_default(vacancy.employment.as_ref()),
        experience_name: name_or_default(vacancy.experience.as_ref()),
        company_description: employer
            .and_then(|e| e.description.as_deref())
            .map(html_to_text)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| NO_COMPANY_DESCRIPTION.to_string()),
        benefits: benefits(vacancy),
        display_color: random_color(rng),
        external_url: vacancy.alternate_url.clone().unwrap_or_default(),
        published_at: vacancy.published_at.clone().unwrap_or_default(),
    }
}
