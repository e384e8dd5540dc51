//! OpenAI-compatible embeddings over HTTP.
//!
//! `POST {api_url}` with `{ model, input: [..] }`, answered by
//! `{ data: [{ index, embedding }] }`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::EmbeddingProvider;
use crate::config::EmbeddingConfig;

pub struct OpenAiEmbeddings {
    api_url: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        anyhow::ensure!(
            !config.api_key.is_empty(),
            "embedding API key not set. Set OPENAI_API_KEY or [embedding] api_key."
        );

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            http: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.model, "input": texts }))
            .send()
            .await
            .with_context(|| format!("embedding request to {} failed", self.api_url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("embedding API returned HTTP {status}: {body}");
        }

        let mut parsed: EmbeddingResponse = resp
            .json()
            .await
            .context("malformed embedding response")?;

        anyhow::ensure!(
            parsed.data.len() == texts.len(),
            "embedding API returned {} vectors for {} inputs",
            parsed.data.len(),
            texts.len()
        );

        parsed.data.sort_by_key(|item| item.index);
        tracing::debug!(count = parsed.data.len(), model = %self.model, "embeddings received");
        Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
