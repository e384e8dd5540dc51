use std::sync::Arc;

use anyhow::Result;
use slidepane::catalog::CatalogCache;
use slidepane::config::SlidepaneConfig;
use slidepane::taskpane::filters::FilterState;
use slidepane::taskpane::search::{SearchOrchestrator, SearchOutcome, SearchStrategy};
use slidepane::taskpane::status::StatusLine;
use slidepane::taskpane::Pane;

use super::{anon_client, ConsolePane};

/// Run one search from the terminal with the same rules as the task pane.
pub async fn search(
    config: &SlidepaneConfig,
    query: &str,
    template: Option<&str>,
    section: Option<&str>,
    local: bool,
) -> Result<()> {
    anyhow::ensure!(
        section.is_none() || template.is_some(),
        "--section needs --template"
    );

    let client = anon_client(config)?;
    let catalog = Arc::new(CatalogCache::new());
    let strategy = if local {
        SearchStrategy::LocalSubstring
    } else {
        config.search.strategy
    };

    // local matching and the empty-query view both need the snapshot
    if strategy == SearchStrategy::LocalSubstring || (query.trim().is_empty() && template.is_none()) {
        catalog.refresh(client.as_ref()).await?;
    }

    let pane: Arc<dyn Pane> = Arc::new(ConsolePane);
    let orchestrator = SearchOrchestrator::new(
        client,
        catalog,
        Arc::clone(&pane),
        Arc::new(StatusLine::new(pane)),
        strategy,
        &config.search.placeholder_query,
        config.search.debounce(),
    );

    let filters = FilterState {
        template_type: template.map(str::to_string),
        section_name: section.map(str::to_string),
    };

    match orchestrator.execute(query, &filters).await {
        SearchOutcome::Failed => anyhow::bail!("search failed"),
        _ => Ok(()),
    }
}
