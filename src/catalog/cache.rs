//! Owned catalog snapshot.
//!
//! The last successful `list_slides` result, shared read-only with everyone
//! who renders or filters locally. Only [`CatalogCache::refresh`] writes it.

use std::sync::{Arc, RwLock};

use super::types::{Slide, SlideId};
use super::CatalogBackend;
use crate::error::CatalogError;

#[derive(Default)]
pub struct CatalogCache {
    slides: RwLock<Arc<Vec<Slide>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the snapshot from the backend. On failure the previous snapshot
    /// stays in place and the error is returned to the caller.
    pub async fn refresh(&self, backend: &dyn CatalogBackend) -> Result<Arc<Vec<Slide>>, CatalogError> {
        let slides = Arc::new(backend.list_slides().await?);
        tracing::info!(count = slides.len(), "catalog refreshed");

        let mut guard = self.slides.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&slides);
        Ok(slides)
    }

    /// The current snapshot. Empty until the first successful refresh.
    pub fn get(&self) -> Arc<Vec<Slide>> {
        let guard = self.slides.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    pub fn find(&self, id: &SlideId) -> Option<Slide> {
        self.get().iter().find(|slide| &slide.id == id).cloned()
    }
}
