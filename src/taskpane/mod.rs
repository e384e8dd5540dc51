//! The task pane controller.
//!
//! [`TaskPane`] owns the catalog snapshot, the search orchestrator and the
//! insertion flow, and forwards UI events to them. What the user sees is
//! written through the [`Pane`] trait.

pub mod debounce;
pub mod filters;
pub mod insert;
pub mod render;
pub mod search;
pub mod status;

use std::sync::Arc;

use crate::catalog::types::SlideId;
use crate::catalog::{CatalogBackend, CatalogCache};
use crate::config::SlidepaneConfig;
use crate::error::{FilterError, HostApiError, InsertError};
use crate::host::{HostEnvironment, SlideHost};
use insert::InsertFlow;
use render::{cards, SlideCard};
use search::{SearchOrchestrator, SearchOutcome};
use status::{Status, StatusLine};

/// Display sink. Implementations only draw; they must not call back into the
/// task pane.
pub trait Pane: Send + Sync {
    /// Replace the result list.
    fn show_slides(&self, cards: &[SlideCard]);

    /// Replace the status line. Empty text hides it.
    fn set_status(&self, text: &str);

    /// Populate the template dropdown. Empty disables it.
    fn set_template_choices(&self, templates: &[String]);

    /// Populate the section dropdown. Empty disables it.
    fn set_section_choices(&self, sections: &[String]);
}

pub struct TaskPane {
    backend: Arc<dyn CatalogBackend>,
    catalog: Arc<CatalogCache>,
    pane: Arc<dyn Pane>,
    status: Arc<StatusLine>,
    search: Arc<SearchOrchestrator>,
    inserter: InsertFlow,
}

impl TaskPane {
    pub fn new(
        config: &SlidepaneConfig,
        backend: Arc<dyn CatalogBackend>,
        host: Arc<dyn SlideHost>,
        pane: Arc<dyn Pane>,
    ) -> Self {
        let catalog = Arc::new(CatalogCache::new());
        let status = Arc::new(StatusLine::new(Arc::clone(&pane)));

        let search = Arc::new(SearchOrchestrator::new(
            Arc::clone(&backend),
            Arc::clone(&catalog),
            Arc::clone(&pane),
            Arc::clone(&status),
            config.search.strategy,
            &config.search.placeholder_query,
            config.search.debounce(),
        ));

        let inserter = InsertFlow::new(
            Arc::clone(&backend),
            Arc::clone(&catalog),
            host,
            Arc::clone(&status),
            config.insert.asset_resolution,
        )
        .with_public_url_template(&config.insert.public_url_template)
        .with_clear_after(config.insert.status_clear_delay());

        Self {
            backend,
            catalog,
            pane,
            status,
            search,
            inserter,
        }
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    pub fn search(&self) -> &Arc<SearchOrchestrator> {
        &self.search
    }

    pub fn status(&self) -> &Arc<StatusLine> {
        &self.status
    }

    /// Wait for the host once, then load the catalog and filter vocabulary.
    pub async fn initialize(&self, env: &dyn HostEnvironment) -> Result<(), HostApiError> {
        env.when_ready().await?;
        tracing::info!("host ready");
        self.load().await;
        Ok(())
    }

    /// Load catalog and vocabulary concurrently. Neither failure blocks the
    /// other: without a catalog the list is empty, without a vocabulary the
    /// filters stay disabled.
    pub async fn load(&self) {
        let (slides, options) = tokio::join!(
            self.catalog.refresh(self.backend.as_ref()),
            self.backend.list_filter_options()
        );

        match options {
            Ok(options) => {
                tracing::info!(templates = options.template_types.len(), "filter options loaded");
                self.search.set_filter_options(options);
            }
            Err(err) => tracing::warn!(%err, "filter options unavailable, filters disabled"),
        }
        self.pane.set_template_choices(&self.search.template_types());
        self.pane.set_section_choices(&[]);

        match slides {
            Ok(slides) => {
                self.pane.show_slides(&cards(&slides));
                self.status.clear();
            }
            Err(err) => {
                tracing::warn!(%err, "could not load catalog");
                self.pane.show_slides(&cards(&self.catalog.get()));
                self.status.set(Status::LoadFailed);
            }
        }
    }

    pub fn on_query_input(&self, text: &str) {
        self.search.on_input(text);
    }

    pub async fn on_template_selected(&self, template: &str) -> SearchOutcome {
        self.search.select_template(template).await
    }

    pub async fn on_section_selected(&self, section: &str) -> Result<SearchOutcome, FilterError> {
        self.search.select_section(section).await
    }

    pub async fn on_insert_clicked(&self, id: &SlideId) -> Result<(), InsertError> {
        self.inserter.insert(id).await
    }
}
