use crate::config::Config;
use crate::models::SearchRequest;
use crate::state::SharedState;

pub async fn cmd_search(
    config: Config,
    query: &str,
    area: Option<String>,
    page: Option<u32>,
) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let state = SharedState::new(config)?;
    let request = SearchRequest {
        text: Some(query.to_string()).filter(|q| !q.trim().is_empty()),
        area,
        page,
        ..Default::default()
    };

    let result = state.search_service.search(&request).await?;

    if let Some(error) = &result.error {
        println!("Search degraded: {error}");
    }

    if result.items.is_empty() {
        println!("No vacancies found matching '{query}'");
        return Ok(());
    }

    println!();
    println!(
        "Found {} vacancies (page {} of {}):",
        result.found,
        result.page + 1,
        result.pages.max(1)
    );
    println!("{:-<60}", "");

    for job in &result.items {
        println!("• {} ({})", job.title, job.company_name);
        println!(
            "  {} | {} | ID: {}",
            job.salary_display_string, job.location_name, job.id
        );
        if !job.external_url.is_empty() {
            println!("  {}", job.external_url);
        }
        println!();
    }

    Ok(())
}
