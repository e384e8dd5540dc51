//! Search orchestration: decides between the unfiltered catalog, a remote
//! search and a local substring match, debounces keystrokes, and makes sure
//! only the newest request ever reaches the screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;

use super::debounce::Debouncer;
use super::filters::{FilterManager, FilterState};
use super::render::cards;
use super::status::{Status, StatusLine};
use super::Pane;
use crate::catalog::types::{FilterOptions, Slide};
use crate::catalog::{CatalogBackend, CatalogCache};
use crate::error::FilterError;

/// Where matching happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    /// Substring match over the cached catalog.
    LocalSubstring,
    /// Ranked search by the backend.
    RemoteSemantic,
}

impl SearchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalSubstring => "local-substring",
            Self::RemoteSemantic => "remote-semantic",
        }
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local-substring" => Ok(Self::LocalSubstring),
            "remote-semantic" => Ok(Self::RemoteSemantic),
            _ => Err(format!("unknown search strategy: {s}")),
        }
    }
}

/// How a single search execution ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query, no filters: the full snapshot is showing again.
    Restored(usize),
    /// Results replaced the displayed set.
    Applied(usize),
    /// The search failed; the displayed set was left alone.
    Failed,
    /// A newer request started meanwhile; this result was dropped.
    Stale,
}

/// Case-insensitive substring match over name, description and tags, plus
/// exact template/section filters.
pub fn local_matches(slides: &[Slide], query: &str, filters: &FilterState) -> Vec<Slide> {
    let needle = query.trim().to_lowercase();

    slides
        .iter()
        .filter(|slide| {
            filters
                .template_type
                .as_deref()
                .is_none_or(|t| slide.template_type.as_deref() == Some(t))
        })
        .filter(|slide| {
            filters
                .section_name
                .as_deref()
                .is_none_or(|s| slide.section_name.as_deref() == Some(s))
        })
        .filter(|slide| {
            needle.is_empty()
                || slide.name().to_lowercase().contains(&needle)
                || slide.description().to_lowercase().contains(&needle)
                || slide.tags().iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

struct SearchInputs {
    query: String,
    filters: FilterManager,
}

pub struct SearchOrchestrator {
    backend: Arc<dyn CatalogBackend>,
    catalog: Arc<CatalogCache>,
    pane: Arc<dyn Pane>,
    status: Arc<StatusLine>,
    strategy: SearchStrategy,
    placeholder: String,
    debouncer: Debouncer,
    latest: AtomicU64,
    inputs: Mutex<SearchInputs>,
}

impl SearchOrchestrator {
    pub fn new(
        backend: Arc<dyn CatalogBackend>,
        catalog: Arc<CatalogCache>,
        pane: Arc<dyn Pane>,
        status: Arc<StatusLine>,
        strategy: SearchStrategy,
        placeholder: &str,
        debounce: Duration,
    ) -> Self {
        Self {
            backend,
            catalog,
            pane,
            status,
            strategy,
            placeholder: placeholder.to_string(),
            debouncer: Debouncer::new(debounce),
            latest: AtomicU64::new(0),
            inputs: Mutex::new(SearchInputs {
                query: String::new(),
                filters: FilterManager::new(),
            }),
        }
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    pub fn set_filter_options(&self, options: FilterOptions) {
        self.lock_inputs().filters.set_options(options);
    }

    pub fn template_types(&self) -> Vec<String> {
        self.lock_inputs().filters.template_types().to_vec()
    }

    pub fn filters(&self) -> FilterState {
        self.lock_inputs().filters.state().clone()
    }

    pub fn query(&self) -> String {
        self.lock_inputs().query.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_armed()
    }

    /// Keystroke in the search box. Only the value present when the input
    /// has been quiet for the debounce delay is searched.
    pub fn on_input(self: &Arc<Self>, text: &str) {
        self.lock_inputs().query = text.to_string();

        let this = Arc::clone(self);
        self.debouncer.arm(async move {
            this.search_current().await;
        });
    }

    /// Template dropdown changed. Clears the section and searches right away.
    pub async fn select_template(&self, template: &str) -> SearchOutcome {
        let sections = self.lock_inputs().filters.set_template(template).to_vec();
        self.pane.set_section_choices(&sections);
        self.debouncer.cancel();
        self.search_current().await
    }

    /// Section dropdown changed. Rejected values leave everything untouched.
    pub async fn select_section(&self, section: &str) -> Result<SearchOutcome, FilterError> {
        self.lock_inputs().filters.set_section(section)?;
        self.debouncer.cancel();
        Ok(self.search_current().await)
    }

    /// Search with whatever query and filters are current right now.
    pub async fn search_current(&self) -> SearchOutcome {
        let (query, filters) = {
            let inputs = self.lock_inputs();
            (inputs.query.clone(), inputs.filters.state().clone())
        };
        self.execute(&query, &filters).await
    }

    /// Run one search. Every call takes a new request token; if another call
    /// starts before this one completes, this result is discarded.
    pub async fn execute(&self, query: &str, filters: &FilterState) -> SearchOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim();

        if query.is_empty() && !filters.has_active_filters() {
            let snapshot = self.catalog.get();
            self.pane.show_slides(&cards(&snapshot));
            self.status.clear();
            return SearchOutcome::Restored(snapshot.len());
        }

        self.status.set(Status::Searching);

        let result = match self.strategy {
            SearchStrategy::RemoteSemantic => {
                let term = if query.is_empty() {
                    self.placeholder.as_str()
                } else {
                    query
                };
                self.backend.search(term, filters).await
            }
            SearchStrategy::LocalSubstring => Ok(local_matches(&self.catalog.get(), query, filters)),
        };

        if self.latest.load(Ordering::SeqCst) != token {
            tracing::debug!(token, query, "discarding stale search response");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(slides) => {
                tracing::info!(query, count = slides.len(), strategy = %self.strategy, "search complete");
                self.pane.show_slides(&cards(&slides));
                self.status.set(Status::Found(slides.len()));
                SearchOutcome::Applied(slides.len())
            }
            Err(err) => {
                tracing::warn!(%err, query, "search failed");
                self.status.set(Status::SearchFailed);
                SearchOutcome::Failed
            }
        }
    }

    fn lock_inputs(&self) -> std::sync::MutexGuard<'_, SearchInputs> {
        self.inputs.lock().unwrap_or_else(|e| e.into_inner())
    }
}
