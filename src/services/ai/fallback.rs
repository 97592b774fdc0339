//! Deterministic content used when the model is unavailable or its reply
//! cannot be parsed.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::models::{
    Course, CoverLetter, JobSuggestion, NewsItem, NormalizedJob, Profession, Recommendations,
    ResumeProfile,
};

pub const DEFAULT_TITLE: &str = "Специалист";

/// Lower-case token -> display name.
const SKILL_KEYWORDS: &[(&str, &str)] = &[
    ("rust", "Rust"),
    ("python", "Python"),
    ("java", "Java"),
    ("kotlin", "Kotlin"),
    ("swift", "Swift"),
    ("go", "Go"),
    ("golang", "Go"),
    ("c++", "C++"),
    ("c#", "C#"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("react", "React"),
    ("vue", "Vue"),
    ("angular", "Angular"),
    ("node.js", "Node.js"),
    ("php", "PHP"),
    ("sql", "SQL"),
    ("postgresql", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("linux", "Linux"),
    ("git", "Git"),
    ("figma", "Figma"),
    ("excel", "Excel"),
    ("1с", "1С"),
    ("photoshop", "Photoshop"),
    ("tableau", "Tableau"),
    ("agile", "Agile"),
    ("scrum", "Scrum"),
];

/// Title keyword -> normalized job title.
const TITLE_KEYWORDS: &[(&str, &str)] = &[
    ("разработчик", "Разработчик"),
    ("developer", "Разработчик"),
    ("программист", "Разработчик"),
    ("engineer", "Инженер"),
    ("инженер", "Инженер"),
    ("аналитик", "Аналитик"),
    ("analyst", "Аналитик"),
    ("дизайнер", "Дизайнер"),
    ("designer", "Дизайнер"),
    ("тестировщик", "Инженер по тестированию"),
    ("qa", "Инженер по тестированию"),
    ("менеджер", "Менеджер"),
    ("manager", "Менеджер"),
    ("маркетолог", "Маркетолог"),
    ("бухгалтер", "Бухгалтер"),
];

/// Skill -> adjacent profession.
const SKILL_PROFESSIONS: &[(&str, &str, &str)] = &[
    ("Python", "Data Scientist", "Анализ данных и построение ML-моделей"),
    ("SQL", "Аналитик данных", "Работа с отчётностью и метриками бизнеса"),
    ("Docker", "DevOps-инженер", "Автоматизация доставки и эксплуатации сервисов"),
    ("Kubernetes", "SRE-инженер", "Надёжность и масштабирование инфраструктуры"),
    ("Figma", "Продуктовый дизайнер", "Проектирование интерфейсов и пользовательских сценариев"),
    ("Rust", "Системный разработчик", "Высоконагруженные и низкоуровневые сервисы"),
    ("JavaScript", "Frontend-разработчик", "Разработка веб-интерфейсов"),
    ("TypeScript", "Fullstack-разработчик", "Разработка клиентской и серверной части"),
    ("Excel", "Финансовый аналитик", "Планирование и анализ финансовых показателей"),
];

fn experience_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2})\+?\s*(?:лет|года|год|years?)")
            .expect("Invalid regex pattern defined in code")
    })
}

fn tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Skills mentioned in `text`, in dictionary order, without duplicates.
#[must_use]
pub fn detect_skills(text: &str) -> Vec<String> {
    let tokens = tokens(text);
    let mut seen = BTreeSet::new();
    SKILL_KEYWORDS
        .iter()
        .filter(|(needle, _)| tokens.contains(*needle))
        .filter(|(_, display)| seen.insert(*display))
        .map(|(_, display)| (*display).to_string())
        .collect()
}

fn detect_title(text: &str) -> String {
    let tokens = tokens(text);
    TITLE_KEYWORDS
        .iter()
        .find(|(needle, _)| tokens.contains(*needle))
        .map_or(DEFAULT_TITLE, |(_, title)| *title)
        .to_string()
}

fn detect_experience_years(text: &str) -> Option<u32> {
    experience_regex()
        .captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .filter(|years| *years <= 50)
        .max()
}

#[must_use]
pub fn resume_profile(text: &str) -> ResumeProfile {
    let skills = detect_skills(text);
    let summary = if skills.is_empty() {
        "Профиль составлен автоматически: ключевые навыки в резюме не распознаны.".to_string()
    } else {
        format!(
            "Профиль составлен автоматически по ключевым словам резюме: {}.",
            skills.join(", ")
        )
    };

    ResumeProfile {
        full_name: None,
        title: detect_title(text),
        skills,
        experience_years: detect_experience_years(text),
        location: None,
        summary,
    }
}

fn search_link(provider_search_url: &str, query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{provider_search_url}{encoded}")
}

#[must_use]
pub fn recommendations(profile: &ResumeProfile) -> Recommendations {
    let title = if profile.title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        profile.title.trim()
    };

    let mut jobs = vec![JobSuggestion {
        title: title.to_string(),
        reason: "Соответствует вашей текущей специализации".to_string(),
        search_query: title.to_string(),
    }];
    jobs.extend(profile.skills.iter().take(2).map(|skill| JobSuggestion {
        title: format!("{title} ({skill})"),
        reason: format!("В резюме указан навык {skill}"),
        search_query: format!("{title} {skill}"),
    }));

    let mut courses: Vec<Course> = profile
        .skills
        .iter()
        .take(3)
        .map(|skill| Course {
            title: format!("{skill}: продвинутый уровень"),
            provider: "Stepik".to_string(),
            url: search_link("https://stepik.org/catalog/search?q=", skill),
            reason: format!("Углубит ваш навык {skill}"),
        })
        .collect();
    if courses.is_empty() {
        courses.push(Course {
            title: "Как составить резюме и пройти собеседование".to_string(),
            provider: "Stepik".to_string(),
            url: search_link("https://stepik.org/catalog/search?q=", "карьера"),
            reason: "Поможет увереннее проходить отбор".to_string(),
        });
    }

    Recommendations { jobs, courses }
}

fn years_word(years: u32) -> &'static str {
    match (years % 10, years % 100) {
        (_, 11..=14) => "лет",
        (1, _) => "год",
        (2..=4, _) => "года",
        _ => "лет",
    }
}

#[must_use]
pub fn cover_letter(profile: &ResumeProfile, job: &NormalizedJob) -> CoverLetter {
    let mut text = format!(
        "Здравствуйте!\n\nМеня заинтересовала вакансия «{}» в компании {}. ",
        job.title, job.company_name
    );

    let matching: Vec<&str> = job
        .required_skill_names
        .iter()
        .filter(|req| profile.skills.iter().any(|s| s.eq_ignore_ascii_case(req)))
        .map(String::as_str)
        .collect();

    match profile.experience_years {
        Some(years) => text.push_str(&format!(
            "Мой опыт по специальности «{}» составляет {} {}.",
            profile.title,
            years,
            years_word(years)
        )),
        None => text.push_str(&format!(
            "Мой профиль: {}.",
            if profile.title.is_empty() {
                DEFAULT_TITLE
            } else {
                profile.title.as_str()
            }
        )),
    }

    if !matching.is_empty() {
        text.push_str(&format!(
            " Мой опыт совпадает с требованиями вакансии: {}.",
            matching.join(", ")
        ));
    } else if !profile.skills.is_empty() {
        text.push_str(&format!(
            " Мои ключевые навыки: {}.",
            profile.skills.join(", ")
        ));
    }

    text.push_str(
        "\n\nБуду рад обсудить, чем могу быть полезен вашей команде.\n\nС уважением,",
    );
    if let Some(name) = profile.full_name.as_deref().filter(|n| !n.is_empty()) {
        text.push('\n');
        text.push_str(name);
    }

    CoverLetter { text }
}

#[must_use]
pub fn news(profile: &ResumeProfile) -> Vec<NewsItem> {
    let title = if profile.title.is_empty() {
        DEFAULT_TITLE
    } else {
        profile.title.as_str()
    };
    let skill = profile.skills.first().map_or("цифровых навыков", String::as_str);

    vec![
        NewsItem {
            title: format!("Спрос на профессию «{title}» остаётся стабильным"),
            summary: "Работодатели продолжают активно публиковать вакансии, \
                      особенно в крупных городах и на удалённом формате."
                .to_string(),
            category: "Рынок труда".to_string(),
        },
        NewsItem {
            title: format!("Компании всё чаще ищут специалистов со знанием {skill}"),
            summary: "Практический опыт и портфолио ценятся выше формальных сертификатов."
                .to_string(),
            category: "Навыки".to_string(),
        },
        NewsItem {
            title: "Сопроводительное письмо повышает шанс на отклик".to_string(),
            summary: "Персонализированное письмо помогает выделиться среди кандидатов."
                .to_string(),
            category: "Карьера".to_string(),
        },
    ]
}

#[must_use]
pub fn professions(profile: &ResumeProfile) -> Vec<Profession> {
    let mut out: Vec<Profession> = SKILL_PROFESSIONS
        .iter()
        .filter(|(skill, _, _)| profile.skills.iter().any(|s| s == skill))
        .map(|(_, title, description)| Profession {
            title: (*title).to_string(),
            description: (*description).to_string(),
            demand: "Высокий".to_string(),
            salary_range: "Зависит от региона и опыта".to_string(),
        })
        .collect();

    if out.is_empty() {
        out.push(Profession {
            title: "Project-менеджер".to_string(),
            description: "Координация команды и сроков проекта".to_string(),
            demand: "Средний".to_string(),
            salary_range: "Зависит от региона и опыта".to_string(),
        });
        out.push(Profession {
            title: "Аналитик данных".to_string(),
            description: "Работа с отчётностью и метриками бизнеса".to_string(),
            demand: "Высокий".to_string(),
            salary_range: "Зависит от региона и опыта".to_string(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Иван Петров\nBackend developer\n\
                          Опыт работы 5 лет. Стек: Rust, PostgreSQL, Docker.\n\
                          Ранее 2 года писал на Java и JavaScript.";

    #[test]
    fn skills_are_detected_by_whole_tokens() {
        let skills = detect_skills(RESUME);
        assert_eq!(
            skills,
            vec!["Rust", "Java", "JavaScript", "PostgreSQL", "Docker"]
        );
        assert!(detect_skills("Gopher enthusiast").is_empty());
    }

    #[test]
    fn golang_and_go_collapse() {
        assert_eq!(detect_skills("go, golang"), vec!["Go"]);
    }

    #[test]
    fn profile_from_resume_text() {
        let profile = resume_profile(RESUME);
        assert_eq!(profile.title, "Разработчик");
        assert_eq!(profile.experience_years, Some(5));
        assert!(profile.summary.contains("Rust"));
    }

    #[test]
    fn empty_resume_still_yields_profile() {
        let profile = resume_profile("");
        assert_eq!(profile.title, DEFAULT_TITLE);
        assert!(profile.skills.is_empty());
        assert!(profile.experience_years.is_none());
        assert!(!profile.summary.is_empty());
    }

    #[test]
    fn recommendations_cover_title_and_skills() {
        let profile = resume_profile(RESUME);
        let recs = recommendations(&profile);
        assert_eq!(recs.jobs.len(), 3);
        assert_eq!(recs.jobs[0].search_query, "Разработчик");
        assert_eq!(recs.courses.len(), 3);
        assert!(recs.courses[0].url.starts_with("https://stepik.org/"));

        let empty = recommendations(&ResumeProfile::default());
        assert_eq!(empty.jobs[0].title, DEFAULT_TITLE);
        assert_eq!(empty.courses.len(), 1);
    }

    #[test]
    fn cover_letter_mentions_job_and_matching_skills() {
        let profile = ResumeProfile {
            full_name: Some("Иван Петров".to_string()),
            title: "Backend-разработчик".to_string(),
            skills: vec!["Rust".to_string(), "Docker".to_string()],
            experience_years: Some(5),
            ..Default::default()
        };
        let job = NormalizedJob {
            id: "1".to_string(),
            title: "Rust developer".to_string(),
            company_name: "Ferris LLC".to_string(),
            location_name: String::new(),
            salary_display_string: String::new(),
            description: String::new(),
            required_skill_names: vec!["rust".to_string(), "Kafka".to_string()],
            match_percentage: 80,
            logo_url: String::new(),
            employment_type_name: String::new(),
            experience_name: String::new(),
            company_description: String::new(),
            benefits: vec![],
            display_color: "#000000".to_string(),
            external_url: String::new(),
            published_at: String::new(),
        };

        let letter = cover_letter(&profile, &job);
        assert!(letter.text.contains("«Rust developer»"));
        assert!(letter.text.contains("Ferris LLC"));
        assert!(letter.text.contains("совпадает с требованиями вакансии: rust"));
        assert!(letter.text.contains("составляет 5 лет"));
        assert!(letter.text.ends_with("Иван Петров"));
    }

    #[test]
    fn russian_year_forms() {
        assert_eq!(years_word(1), "год");
        assert_eq!(years_word(3), "года");
        assert_eq!(years_word(5), "лет");
        assert_eq!(years_word(11), "лет");
        assert_eq!(years_word(21), "год");
    }

    #[test]
    fn news_and_professions_are_never_empty() {
        assert_eq!(news(&ResumeProfile::default()).len(), 3);
        assert_eq!(professions(&ResumeProfile::default()).len(), 2);

        let profile = ResumeProfile {
            skills: vec!["Python".to_string(), "SQL".to_string()],
            ..Default::default()
        };
        let titles: Vec<String> = professions(&profile).into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Data Scientist", "Аналитик данных"]);
    }
}
