#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use slidepane::catalog::types::{FilterOptions, Slide, SlideId, SlideUrl};
use slidepane::catalog::{CatalogBackend, CatalogCache};
use slidepane::error::{CatalogError, HostApiError};
use slidepane::host::{HostContext, HostEnvironment, InsertOptions, SlideHost};
use slidepane::taskpane::filters::FilterState;
use slidepane::taskpane::render::SlideCard;
use slidepane::taskpane::search::{SearchOrchestrator, SearchStrategy};
use slidepane::taskpane::status::StatusLine;
use slidepane::taskpane::Pane;
use tokio::sync::Notify;

/// Build a catalog slide with the fields the tests care about.
pub fn slide(id: i64, name: &str, template: &str, section: &str) -> Slide {
    let mut s = Slide::new(id);
    s.name = Some(name.to_string());
    s.template_type = Some(template.to_string());
    s.section_name = Some(section.to_string());
    s.thumb_url = Some(format!("https://cdn.example.com/thumb_{id}.png"));
    s
}

pub fn sample_catalog() -> Vec<Slide> {
    vec![
        slide(1, "Intro", "Sales", "Opening"),
        slide(2, "Pricing", "Sales", "Offer"),
        slide(3, "Team", "HR", "Onboarding"),
    ]
}

pub fn sample_options() -> FilterOptions {
    let mut sections_by_template = BTreeMap::new();
    sections_by_template.insert("Sales".to_string(), vec!["Opening".into(), "Offer".into()]);
    sections_by_template.insert("HR".to_string(), vec!["Onboarding".into()]);
    FilterOptions {
        template_types: vec!["Sales".into(), "HR".into()],
        sections_by_template,
    }
}

fn backend_error() -> CatalogError {
    CatalogError::Backend {
        status: 500,
        message: "boom".into(),
    }
}

/// In-memory backend with scripted answers and call recording.
#[derive(Default)]
pub struct FakeBackend {
    pub slides: Mutex<Vec<Slide>>,
    pub fail_list: AtomicBool,
    pub options: Mutex<Option<FilterOptions>>,
    /// Results per query; queries without an entry return the whole catalog.
    pub results: Mutex<HashMap<String, Vec<Slide>>>,
    pub fail_search: AtomicBool,
    pub gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub search_calls: Mutex<Vec<(String, FilterState)>>,
    pub urls: Mutex<HashMap<SlideId, SlideUrl>>,
    pub url_calls: AtomicUsize,
    pub assets: Mutex<HashMap<String, Vec<u8>>>,
    pub asset_calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_catalog(slides: Vec<Slide>) -> Self {
        let backend = Self::default();
        *backend.slides.lock().unwrap() = slides;
        *backend.options.lock().unwrap() = Some(sample_options());
        backend
    }

    pub fn set_results(&self, query: &str, slides: Vec<Slide>) {
        self.results.lock().unwrap().insert(query.to_string(), slides);
    }

    /// Make searches for `query` wait until the returned notify fires.
    pub fn gate(&self, query: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(query.to_string(), Arc::clone(&notify));
        notify
    }

    pub fn set_url(&self, id: i64, url: &str, host_slide_id: Option<&str>) {
        self.urls.lock().unwrap().insert(
            SlideId::Int(id),
            SlideUrl {
                url: url.to_string(),
                host_slide_id: host_slide_id.map(str::to_string),
                slide_index: Some(0),
            },
        );
    }

    pub fn set_asset(&self, url: &str, bytes: &[u8]) {
        self.assets
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.to_vec());
    }

    pub fn searches(&self) -> Vec<(String, FilterState)> {
        self.search_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogBackend for FakeBackend {
    async fn list_slides(&self) -> Result<Vec<Slide>, CatalogError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(backend_error());
        }
        Ok(self.slides.lock().unwrap().clone())
    }

    async fn list_filter_options(&self) -> Result<FilterOptions, CatalogError> {
        self.options.lock().unwrap().clone().ok_or_else(backend_error)
    }

    async fn search(&self, query: &str, filters: &FilterState) -> Result<Vec<Slide>, CatalogError> {
        self.search_calls
            .lock()
            .unwrap()
            .push((query.to_string(), filters.clone()));

        let gate = self.gates.lock().unwrap().get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_search.load(Ordering::SeqCst) {
            return Err(backend_error());
        }

        let scripted = self.results.lock().unwrap().get(query).cloned();
        Ok(scripted.unwrap_or_else(|| self.slides.lock().unwrap().clone()))
    }

    async fn get_insertable_url(&self, id: &SlideId) -> Result<SlideUrl, CatalogError> {
        self.url_calls.fetch_add(1, Ordering::SeqCst);
        self.urls
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.asset_calls.lock().unwrap().push(url.to_string());
        self.assets
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::Backend {
                status: 404,
                message: format!("no asset at {url}"),
            })
    }
}

/// Pane that records everything drawn on it.
#[derive(Default)]
pub struct RecordingPane {
    pub renders: Mutex<Vec<Vec<SlideCard>>>,
    pub statuses: Mutex<Vec<String>>,
    pub templates: Mutex<Vec<String>>,
    pub sections: Mutex<Vec<String>>,
}

impl RecordingPane {
    pub fn last_titles(&self) -> Vec<String> {
        self.renders
            .lock()
            .unwrap()
            .last()
            .map(|cards| cards.iter().map(|c| c.title.clone()).collect())
            .unwrap_or_default()
    }

    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn last_status(&self) -> String {
        self.statuses.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }
}

impl Pane for RecordingPane {
    fn show_slides(&self, cards: &[SlideCard]) {
        self.renders.lock().unwrap().push(cards.to_vec());
    }

    fn set_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }

    fn set_template_choices(&self, templates: &[String]) {
        *self.templates.lock().unwrap() = templates.to_vec();
    }

    fn set_section_choices(&self, sections: &[String]) {
        *self.sections.lock().unwrap() = sections.to_vec();
    }
}

/// Host that records insertions and how often contexts were closed.
#[derive(Default)]
pub struct FakeHost {
    pub ready_calls: AtomicUsize,
    pub reject: AtomicBool,
    pub inserted: Arc<Mutex<Vec<(String, InsertOptions)>>>,
    pub synced: Arc<AtomicUsize>,
}

struct FakeContext {
    reject: bool,
    inserted: Arc<Mutex<Vec<(String, InsertOptions)>>>,
    synced: Arc<AtomicUsize>,
    queued: Vec<(String, InsertOptions)>,
}

#[async_trait]
impl HostEnvironment for FakeHost {
    async fn when_ready(&self) -> Result<(), HostApiError> {
        self.ready_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SlideHost for FakeHost {
    async fn begin(&self) -> Result<Box<dyn HostContext>, HostApiError> {
        Ok(Box::new(FakeContext {
            reject: self.reject.load(Ordering::SeqCst),
            inserted: Arc::clone(&self.inserted),
            synced: Arc::clone(&self.synced),
            queued: Vec::new(),
        }))
    }
}

#[async_trait]
impl HostContext for FakeContext {
    async fn insert_slides_from_base64(
        &mut self,
        payload: &str,
        options: &InsertOptions,
    ) -> Result<(), HostApiError> {
        if self.reject {
            return Err(HostApiError::Rejected("presentation is read-only".into()));
        }
        self.queued.push((payload.to_string(), options.clone()));
        Ok(())
    }

    async fn sync(self: Box<Self>) -> Result<(), HostApiError> {
        let FakeContext {
            inserted,
            synced,
            queued,
            ..
        } = *self;
        synced.fetch_add(1, Ordering::SeqCst);
        inserted.lock().unwrap().extend(queued);
        Ok(())
    }
}

pub struct SearchHarness {
    pub backend: Arc<FakeBackend>,
    pub pane: Arc<RecordingPane>,
    pub catalog: Arc<CatalogCache>,
    pub orchestrator: Arc<SearchOrchestrator>,
}

/// Orchestrator over a fake backend with a loaded catalog snapshot.
pub async fn search_harness(strategy: SearchStrategy) -> SearchHarness {
    let backend = Arc::new(FakeBackend::with_catalog(sample_catalog()));
    let pane = Arc::new(RecordingPane::default());
    let catalog = Arc::new(CatalogCache::new());
    catalog.refresh(backend.as_ref()).await.unwrap();

    let status = Arc::new(StatusLine::new(pane.clone()));
    let orchestrator = Arc::new(SearchOrchestrator::new(
        backend.clone(),
        catalog.clone(),
        pane.clone(),
        status,
        strategy,
        "slide",
        Duration::from_millis(500),
    ));
    orchestrator.set_filter_options(sample_options());

    SearchHarness {
        backend,
        pane,
        catalog,
        orchestrator,
    }
}
