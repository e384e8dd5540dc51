//! Slide insertion: resolve a fetchable URL, download and base64-encode the
//! deck, hand it to the host.
//!
//! There are no retries. A failed insertion leaves an error on the status line
//! until the user tries again.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use serde::Deserialize;

use super::status::{Status, StatusLine};
use crate::catalog::types::SlideId;
use crate::catalog::{CatalogBackend, CatalogCache};
use crate::error::InsertError;
use crate::host::{InsertOptions, SlideHost};

/// How a slide id becomes a downloadable URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetResolution {
    /// Assets are public: use the catalog's `file_url` or the URL template.
    PublicUrl,
    /// Assets are private: exchange the id for a signed URL on every insert.
    SignedUrl,
}

/// A URL ready for download plus the host slide to pick, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub url: String,
    pub host_slide_id: Option<String>,
    pub slide_index: Option<u32>,
}

pub struct InsertFlow {
    backend: Arc<dyn CatalogBackend>,
    catalog: Arc<CatalogCache>,
    host: Arc<dyn SlideHost>,
    status: Arc<StatusLine>,
    resolution: AssetResolution,
    public_url_template: String,
    clear_after: Duration,
}

impl InsertFlow {
    pub fn new(
        backend: Arc<dyn CatalogBackend>,
        catalog: Arc<CatalogCache>,
        host: Arc<dyn SlideHost>,
        status: Arc<StatusLine>,
        resolution: AssetResolution,
    ) -> Self {
        Self {
            backend,
            catalog,
            host,
            status,
            resolution,
            public_url_template: String::new(),
            clear_after: Duration::from_millis(2000),
        }
    }

    pub fn with_public_url_template(mut self, template: &str) -> Self {
        self.public_url_template = template.to_string();
        self
    }

    pub fn with_clear_after(mut self, delay: Duration) -> Self {
        self.clear_after = delay;
        self
    }

    /// Insert one slide into the presentation, reporting progress on the
    /// status line. The error is also returned for callers that want it.
    pub async fn insert(&self, id: &SlideId) -> Result<(), InsertError> {
        self.status.set(Status::Fetching);

        match self.run(id).await {
            Ok(()) => {
                tracing::info!(slide = %id, "slide inserted");
                let generation = self.status.set(Status::Inserted);
                self.status.clear_after(generation, self.clear_after);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(slide = %id, %err, "slide insertion failed");
                self.status.set(Status::Error(err.to_string()));
                Err(err)
            }
        }
    }

    async fn run(&self, id: &SlideId) -> Result<(), InsertError> {
        let asset = self.resolve(id).await?;
        tracing::debug!(
            slide = %id,
            host_slide = ?asset.host_slide_id,
            index = ?asset.slide_index,
            "asset resolved"
        );

        let bytes = self.backend.fetch_asset(&asset.url).await?;
        let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);

        self.status.set(Status::Inserting);

        let mut options = InsertOptions::keep_source_formatting();
        if let Some(host_slide_id) = &asset.host_slide_id {
            options = options.only_slide(host_slide_id);
        }

        let mut ctx = self.host.begin().await?;
        let inserted = ctx.insert_slides_from_base64(&payload, &options).await;
        // the context is closed on every path before reporting
        let synced = ctx.sync().await;
        inserted?;
        synced?;
        Ok(())
    }

    pub async fn resolve(&self, id: &SlideId) -> Result<ResolvedAsset, InsertError> {
        match self.resolution {
            AssetResolution::SignedUrl => {
                let signed = self.backend.get_insertable_url(id).await?;
                Ok(ResolvedAsset {
                    url: signed.url,
                    host_slide_id: signed.host_slide_id,
                    slide_index: signed.slide_index,
                })
            }
            AssetResolution::PublicUrl => {
                let url = self
                    .catalog
                    .find(id)
                    .and_then(|slide| slide.file_url)
                    .filter(|url| !url.is_empty())
                    .or_else(|| {
                        (!self.public_url_template.is_empty())
                            .then(|| self.public_url_template.replace("{id}", &id.to_string()))
                    })
                    .ok_or_else(|| InsertError::NoAssetUrl(id.to_string()))?;

                Ok(ResolvedAsset {
                    url,
                    host_slide_id: None,
                    slide_index: None,
                })
            }
        }
    }
}
