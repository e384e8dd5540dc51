//! CLI `list` and `filters` commands.

use anyhow::{Context, Result};
use slidepane::catalog::{CatalogBackend, CatalogCache};
use slidepane::config::SlidepaneConfig;
use slidepane::taskpane::render::{cards, render_markup};

use super::{anon_client, print_cards};

/// Print the full catalog, as a table or as task-pane markup.
pub async fn list(config: &SlidepaneConfig, html: bool) -> Result<()> {
    let client = anon_client(config)?;
    let catalog = CatalogCache::new();
    let slides = catalog
        .refresh(client.as_ref())
        .await
        .context("could not load slides")?;

    let cards = cards(&slides);
    if html {
        println!("{}", render_markup(&cards));
    } else {
        println!("{} slide(s)\n", cards.len());
        print_cards(&cards);
    }

    Ok(())
}

/// Print the template/section vocabulary.
pub async fn filters(config: &SlidepaneConfig) -> Result<()> {
    let client = anon_client(config)?;
    let options = client
        .list_filter_options()
        .await
        .context("could not load filter options")?;

    if options.template_types.is_empty() {
        println!("No template types defined.");
        return Ok(());
    }

    for template in &options.template_types {
        println!("{template}");
        for section in options.sections_for(template) {
            println!("  - {section}");
        }
    }

    Ok(())
}
