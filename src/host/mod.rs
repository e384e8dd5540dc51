//! Presentation host seam.
//!
//! The task pane never talks to a presentation engine directly. It waits for
//! the host via [`HostEnvironment`] and inserts slides through a
//! [`SlideHost`], which hands out one [`HostContext`] per batch of edits. A
//! context must always be closed with [`HostContext::sync`], whether the
//! queued insertion succeeded or not.

pub mod directory;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::HostApiError;

pub use directory::DirectoryHost;

/// How inserted slides are styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Formatting {
    KeepSourceFormatting,
    UseDestinationTheme,
}

/// Options passed along with the base64 deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOptions {
    pub formatting: Formatting,
    /// When set, only these slides of the source deck are inserted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_slide_ids: Option<Vec<String>>,
}

impl InsertOptions {
    pub fn keep_source_formatting() -> Self {
        Self {
            formatting: Formatting::KeepSourceFormatting,
            source_slide_ids: None,
        }
    }

    pub fn only_slide(mut self, host_slide_id: &str) -> Self {
        self.source_slide_ids = Some(vec![host_slide_id.to_string()]);
        self
    }
}

/// One-time readiness signal from the host.
#[async_trait]
pub trait HostEnvironment: Send + Sync {
    /// Resolves once the host is ready to accept calls.
    async fn when_ready(&self) -> Result<(), HostApiError>;
}

#[async_trait]
pub trait SlideHost: Send + Sync {
    /// Open a synchronization context for a batch of edits.
    async fn begin(&self) -> Result<Box<dyn HostContext>, HostApiError>;
}

#[async_trait]
pub trait HostContext: Send {
    /// Queue insertion of slides from a base64-encoded deck.
    async fn insert_slides_from_base64(
        &mut self,
        payload: &str,
        options: &InsertOptions,
    ) -> Result<(), HostApiError>;

    /// Apply queued edits and close the context.
    async fn sync(self: Box<Self>) -> Result<(), HostApiError>;
}
