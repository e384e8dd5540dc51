mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use slidepane::config::SlidepaneConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slidepane", version, about = "Browse, search and insert slide templates")]
struct Cli {
    /// Config file (defaults to ~/.slidepane/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the whole catalog
    List {
        /// Print the rendered task-pane markup instead of a table
        #[arg(long)]
        html: bool,
    },
    /// Show template types and their sections
    Filters,
    /// Search the catalog
    Search {
        /// Free-text query (may be empty when a filter is given)
        #[arg(default_value = "")]
        query: String,
        /// Restrict to a template type
        #[arg(long)]
        template: Option<String>,
        /// Restrict to a section of the chosen template
        #[arg(long)]
        section: Option<String>,
        /// Match locally by substring instead of asking the backend
        #[arg(long)]
        local: bool,
    },
    /// Insert a slide into an output directory
    Insert {
        /// Slide id
        id: String,
        /// Directory receiving the inserted deck
        #[arg(long)]
        out: PathBuf,
        /// Resolve public asset URLs instead of signed ones
        #[arg(long)]
        public: bool,
    },
    /// Regenerate embeddings for every slide (service key required)
    ReEmbed,
    /// Upload local decks and thumbnails to storage (service key required)
    Migrate {
        /// Directory with slide_<id>.pptx files
        #[arg(long)]
        templates: PathBuf,
        /// Directory with slide_<id>.png files
        #[arg(long)]
        thumbnails: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SlidepaneConfig::load_from(path)?,
        None => SlidepaneConfig::load()?,
    };

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.log.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    config.require_backend()?;

    match cli.command {
        Command::List { html } => cli::list::list(&config, html).await?,
        Command::Filters => cli::list::filters(&config).await?,
        Command::Search {
            query,
            template,
            section,
            local,
        } => {
            cli::search::search(
                &config,
                &query,
                template.as_deref(),
                section.as_deref(),
                local,
            )
            .await?
        }
        Command::Insert { id, out, public } => cli::insert::insert(&config, &id, &out, public).await?,
        Command::ReEmbed => cli::re_embed::re_embed(&config).await?,
        Command::Migrate {
            templates,
            thumbnails,
        } => cli::migrate::migrate(&config, &templates, &thumbnails).await?,
    }

    Ok(())
}
