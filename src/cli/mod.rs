pub mod insert;
pub mod list;
pub mod migrate;
pub mod re_embed;
pub mod search;

use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use slidepane::catalog::SupabaseClient;
use slidepane::config::SlidepaneConfig;
use slidepane::taskpane::render::SlideCard;
use slidepane::taskpane::Pane;

/// Prints pane updates to the terminal: the status line to stderr, result
/// lists to stdout.
pub struct ConsolePane;

impl Pane for ConsolePane {
    fn show_slides(&self, cards: &[SlideCard]) {
        print_cards(cards);
    }

    fn set_status(&self, text: &str) {
        if !text.is_empty() {
            eprintln!("{text}");
        }
    }

    fn set_template_choices(&self, _templates: &[String]) {}

    fn set_section_choices(&self, _sections: &[String]) {}
}

pub fn print_cards(cards: &[SlideCard]) {
    if cards.is_empty() {
        println!("No matches.");
        return;
    }

    for card in cards {
        println!("  [{}] {}", card.id, card.title);
        if !card.description.is_empty() {
            println!("     {}", card.description);
        }
        if !card.tags.is_empty() {
            println!("     {}", card.tags);
        }
    }
}

/// Backend client with the public key.
pub fn anon_client(config: &SlidepaneConfig) -> Result<Arc<SupabaseClient>> {
    let client = SupabaseClient::from_config(&config.backend)
        .context("failed to create backend client")?;
    Ok(Arc::new(client))
}

/// Backend client with the service-role key.
pub fn service_client(config: &SlidepaneConfig) -> Result<SupabaseClient> {
    anyhow::ensure!(
        !config.backend.service_key.is_empty(),
        "service key not set. Set SUPABASE_SERVICE_KEY or [backend] service_key."
    );
    SupabaseClient::service_from_config(&config.backend).context("failed to create backend client")
}

pub fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("##-"),
    );
    pb
}
