//! CLI `re-embed` command: regenerate all slide embeddings with the current model.

use anyhow::{Context, Result};
use slidepane::catalog::types::Slide;
use slidepane::catalog::CatalogBackend;
use slidepane::config::SlidepaneConfig;
use slidepane::embedding::{self, embedding_text};

use super::{progress_bar, service_client};

/// Re-embed every slide that has a name and a description.
pub async fn re_embed(config: &SlidepaneConfig) -> Result<()> {
    let client = service_client(config)?;
    let provider = embedding::create_provider(&config.embedding)
        .context("failed to create embedding provider")?;

    let slides = client.list_slides().await.context("failed to fetch slides")?;

    let (ready, skipped): (Vec<(&Slide, String)>, Vec<&Slide>) = {
        let mut ready = Vec::new();
        let mut skipped = Vec::new();
        for slide in &slides {
            match embedding_text(slide) {
                Some(text) => ready.push((slide, text)),
                None => skipped.push(slide),
            }
        }
        (ready, skipped)
    };

    for slide in &skipped {
        tracing::warn!(slide = %slide.id, "missing name or description, not embedded");
    }

    let total = ready.len();
    if total == 0 {
        println!("No slides to embed.");
        return Ok(());
    }

    println!("Embedding {total} slides with model '{}'...", provider.model());

    let pb = progress_bar(total);
    let mut failed = 0usize;

    // Process in batches of 32
    const BATCH_SIZE: usize = 32;
    for chunk in ready.chunks(BATCH_SIZE) {
        let texts: Vec<&str> = chunk.iter().map(|(_, text)| text.as_str()).collect();

        let embeddings = match provider.embed_batch(&texts).await {
            Ok(embeddings) => embeddings,
            Err(err) => {
                tracing::error!(%err, "embedding batch failed");
                failed += chunk.len();
                pb.inc(chunk.len() as u64);
                continue;
            }
        };

        for ((slide, _), emb) in chunk.iter().zip(embeddings.iter()) {
            if let Err(err) = client.update_embedding(&slide.id, emb).await {
                tracing::error!(slide = %slide.id, %err, "failed to save embedding");
                failed += 1;
            }
            pb.inc(1);
        }
    }

    pb.finish_and_clear();

    println!(
        "Embedded {} of {total} slides ({} skipped, {failed} failed).",
        total - failed,
        skipped.len()
    );
    Ok(())
}
