//! Error taxonomy shared by the catalog client, the host seam and the
//! insertion flow.
//!
//! Every error here is recovered at the call site that issued the request and
//! turned into a short status line; none of them is meant to escape the task
//! pane.

/// Failures talking to the catalog backend.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Connection, timeout or body-read failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status or an `{ "error": ... }` payload.
    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The backend does not know the requested slide.
    #[error("slide not found: {0}")]
    NotFound(String),
}

/// Failures reported by the presentation host.
#[derive(thiserror::Error, Debug)]
pub enum HostApiError {
    #[error("host rejected the insertion: {0}")]
    Rejected(String),

    #[error("host is not available: {0}")]
    Unavailable(String),

    #[error("host io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the slide insertion flow, whichever step produced them.
#[derive(thiserror::Error, Debug)]
pub enum InsertError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Host(#[from] HostApiError),

    #[error("no asset URL for slide {0}")]
    NoAssetUrl(String),
}

/// Rejected filter selections.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("select a template before choosing a section")]
    NoTemplate,

    #[error("section {section:?} is not available for template {template:?}")]
    UnknownSection { template: String, section: String },
}
