//! CLI `migrate` command: move local slide decks and thumbnails into
//! storage buckets and point the catalog rows at them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use slidepane::catalog::types::SlideId;
use slidepane::catalog::SupabaseClient;
use slidepane::config::SlidepaneConfig;

use super::{progress_bar, service_client};

const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// One `slide_<id>.pptx` with its `slide_<id>.png` thumbnail.
#[derive(Debug, PartialEq)]
struct LocalSlide {
    id: SlideId,
    deck: PathBuf,
    thumb: PathBuf,
}

/// Pull the id out of `slide_<id>.pptx`.
fn slide_id_from_file_name(name: &str) -> Option<SlideId> {
    let id = name.strip_prefix("slide_")?.strip_suffix(".pptx")?;
    if id.is_empty() {
        return None;
    }
    id.parse().ok()
}

fn discover(templates: &Path, thumbnails: &Path) -> Result<Vec<LocalSlide>> {
    let entries = std::fs::read_dir(templates)
        .with_context(|| format!("failed to read {}", templates.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(id) = file_name.to_str().and_then(slide_id_from_file_name) else {
            continue;
        };

        let thumb = thumbnails.join(format!("slide_{id}.png"));
        if !thumb.exists() {
            tracing::warn!(slide = %id, thumb = %thumb.display(), "thumbnail missing, skipping");
            continue;
        }

        found.push(LocalSlide {
            id,
            deck: entry.path(),
            thumb,
        });
    }

    found.sort_by(|a, b| a.deck.cmp(&b.deck));
    Ok(found)
}

async fn migrate_one(client: &SupabaseClient, config: &SlidepaneConfig, slide: &LocalSlide) -> Result<()> {
    let deck_name = format!("slide_{}.pptx", slide.id);
    let thumb_name = format!("slide_{}.png", slide.id);

    let deck = tokio::fs::read(&slide.deck)
        .await
        .with_context(|| format!("failed to read {}", slide.deck.display()))?;
    let file_url = client
        .upload_object(&config.storage.slides_bucket, &deck_name, deck, PPTX_CONTENT_TYPE)
        .await
        .with_context(|| format!("upload of {deck_name} failed"))?;

    let thumb = tokio::fs::read(&slide.thumb)
        .await
        .with_context(|| format!("failed to read {}", slide.thumb.display()))?;
    let thumb_url = client
        .upload_object(&config.storage.thumbnails_bucket, &thumb_name, thumb, "image/png")
        .await
        .with_context(|| format!("upload of {thumb_name} failed"))?;

    client
        .update_slide_urls(&slide.id, &file_url, &thumb_url)
        .await
        .context("failed to update slide row")?;

    Ok(())
}

/// Upload every local slide found and update its catalog row.
pub async fn migrate(config: &SlidepaneConfig, templates: &Path, thumbnails: &Path) -> Result<()> {
    let client = service_client(config)?;
    let slides = discover(templates, thumbnails)?;

    if slides.is_empty() {
        println!("No slide_<id>.pptx files found in {}.", templates.display());
        return Ok(());
    }

    println!("Migrating {} slides to storage...", slides.len());
    let pb = progress_bar(slides.len());
    let mut failed = 0usize;

    for slide in &slides {
        match migrate_one(&client, config, slide).await {
            Ok(()) => tracing::info!(slide = %slide.id, "migrated"),
            Err(err) => {
                failed += 1;
                pb.suspend(|| eprintln!("  slide {}: {err:#}", slide.id));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    println!("Migrated {} of {} slides.", slides.len() - failed, slides.len());
    Ok(())
}
