//! Remote slide catalog.
//!
//! Provides the [`CatalogBackend`] trait (listing, filter vocabulary, search,
//! signed-URL exchange and asset download), the Supabase implementation in
//! [`remote`], the owned snapshot in [`cache`], and the service-key
//! maintenance calls in [`admin`].

pub mod admin;
pub mod cache;
pub mod remote;
pub mod types;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::taskpane::filters::FilterState;
use types::{FilterOptions, Slide, SlideId, SlideUrl};

pub use cache::CatalogCache;
pub use remote::SupabaseClient;

/// Everything the task pane needs from the backend.
///
/// None of the methods retry: a failed call is reported once and the user
/// triggers the next attempt.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Fetch the full catalog.
    async fn list_slides(&self) -> Result<Vec<Slide>, CatalogError>;

    /// Fetch the template/section vocabulary.
    async fn list_filter_options(&self) -> Result<FilterOptions, CatalogError>;

    /// Ranked lookup. `query` is never empty when filters are active; the
    /// caller substitutes a placeholder. No match is an empty list, not an error.
    async fn search(&self, query: &str, filters: &FilterState) -> Result<Vec<Slide>, CatalogError>;

    /// Exchange a slide id for a short-lived download URL. Each call mints a
    /// fresh URL, so the result must not be cached.
    async fn get_insertable_url(&self, id: &SlideId) -> Result<SlideUrl, CatalogError>;

    /// Download an asset as raw bytes.
    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}
