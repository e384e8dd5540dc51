//! CLI `insert` command: run the insertion flow against a directory host.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use slidepane::catalog::types::SlideId;
use slidepane::config::SlidepaneConfig;
use slidepane::host::{DirectoryHost, HostEnvironment};
use slidepane::taskpane::insert::AssetResolution;
use slidepane::taskpane::{Pane, TaskPane};

use super::{anon_client, ConsolePane};

pub async fn insert(config: &SlidepaneConfig, id: &str, out: &Path, public: bool) -> Result<()> {
    let mut config = config.clone();
    if public {
        config.insert.asset_resolution = AssetResolution::PublicUrl;
    }

    let id: SlideId = id.parse().context("invalid slide id")?;
    let host = Arc::new(DirectoryHost::new(out));
    host.when_ready()
        .await
        .with_context(|| format!("cannot use {} as output", out.display()))?;

    let client = anon_client(&config)?;
    let pane: Arc<dyn Pane> = Arc::new(ConsolePane);
    let task_pane = TaskPane::new(&config, client.clone(), host.clone(), pane);

    if config.insert.asset_resolution == AssetResolution::PublicUrl {
        // public mode reads file_url from the catalog
        task_pane
            .catalog()
            .refresh(client.as_ref())
            .await
            .context("could not load slides")?;
    }

    task_pane.on_insert_clicked(&id).await?;
    println!("Inserted slide {id} into {}", host.dir().display());
    Ok(())
}
