//! Text-to-vector embedding for the catalog maintenance job.
//!
//! Provides the [`EmbeddingProvider`] trait and an OpenAI-compatible HTTP
//! implementation. The provider is created via [`create_provider`] from
//! configuration. Vectors are only ever written to the backend; ranking
//! happens server-side.

pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

use crate::catalog::types::Slide;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut results = self.embed_batch(&[text]).await?;
        results
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedding response was empty"))
    }

    /// Embed a batch of text strings, preserving input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;
}

/// Create an embedding provider from config.
///
/// Currently only `"openai"` is supported (any endpoint speaking the
/// OpenAI embeddings request/response shape).
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let provider = openai::OpenAiEmbeddings::new(config)?;
            Ok(Box::new(provider))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: openai"),
    }
}

/// The text a slide is embedded from: `"{name}. {description}. Tags: a, b"`.
///
/// Returns `None` when the name or description is missing, since there is no
/// agreed text for such slides.
pub fn embedding_text(slide: &Slide) -> Option<String> {
    let name = slide.name.as_deref().filter(|s| !s.trim().is_empty())?;
    let description = slide.description.as_deref().filter(|s| !s.trim().is_empty())?;
    Some(format!(
        "{name}. {description}. Tags: {}",
        slide.tags().join(", ")
    ))
}
