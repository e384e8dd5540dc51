mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use helpers::{sample_catalog, FakeBackend, FakeHost, RecordingPane};
use slidepane::catalog::types::SlideId;
use slidepane::catalog::CatalogCache;
use slidepane::error::{CatalogError, HostApiError, InsertError};
use slidepane::host::Formatting;
use slidepane::taskpane::insert::{AssetResolution, InsertFlow};
use slidepane::taskpane::status::StatusLine;

const SIGNED: &str = "https://storage.example.com/signed/slide_7.pptx?token=abc";

struct Harness {
    backend: Arc<FakeBackend>,
    host: Arc<FakeHost>,
    pane: Arc<RecordingPane>,
    catalog: Arc<CatalogCache>,
    status: Arc<StatusLine>,
}

impl Harness {
    fn new() -> Self {
        let pane = Arc::new(RecordingPane::default());
        Self {
            backend: Arc::new(FakeBackend::with_catalog(sample_catalog())),
            host: Arc::new(FakeHost::default()),
            status: Arc::new(StatusLine::new(pane.clone())),
            catalog: Arc::new(CatalogCache::new()),
            pane,
        }
    }

    fn flow(&self, resolution: AssetResolution) -> InsertFlow {
        InsertFlow::new(
            self.backend.clone(),
            self.catalog.clone(),
            self.host.clone(),
            self.status.clone(),
            resolution,
        )
    }
}

#[tokio::test(start_paused = true)]
async fn signed_url_insert_reports_success_then_clears() {
    let h = Harness::new();
    h.backend.set_url(7, SIGNED, Some("256#"));
    h.backend.set_asset(SIGNED, b"PK\x03\x04deck");

    h.flow(AssetResolution::SignedUrl)
        .insert(&SlideId::Int(7))
        .await
        .unwrap();

    assert_eq!(
        h.pane.statuses(),
        vec!["Fetching template...", "Inserting slide...", "Slide inserted!"]
    );

    let inserted = h.host.inserted.lock().unwrap().clone();
    assert_eq!(inserted.len(), 1);
    let (payload, options) = &inserted[0];
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    assert_eq!(decoded, b"PK\x03\x04deck");
    assert_eq!(options.formatting, Formatting::KeepSourceFormatting);
    assert_eq!(options.source_slide_ids, Some(vec!["256#".to_string()]));
    assert_eq!(h.host.synced.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(1999)).await;
    assert_eq!(h.status.text(), "Slide inserted!");
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(h.status.text(), "");
    assert_eq!(h.pane.last_status(), "");
}

#[tokio::test(start_paused = true)]
async fn newer_status_survives_pending_clear() {
    let h = Harness::new();
    h.backend.set_url(7, SIGNED, None);
    h.backend.set_asset(SIGNED, b"deck");
    let flow = h.flow(AssetResolution::SignedUrl);

    flow.insert(&SlideId::Int(7)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    // a second click fails before the first clear fires
    let err = flow.insert(&SlideId::Int(99)).await.unwrap_err();
    assert!(matches!(err, InsertError::Catalog(CatalogError::NotFound(_))));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(h.status.text().starts_with("Error: "));
}

#[tokio::test]
async fn missing_slide_shows_error_without_touching_host() {
    let h = Harness::new();

    let err = h
        .flow(AssetResolution::SignedUrl)
        .insert(&SlideId::Int(42))
        .await
        .unwrap_err();

    assert!(matches!(err, InsertError::Catalog(CatalogError::NotFound(_))));
    assert!(h.pane.last_status().starts_with("Error: "));
    assert!(h.backend.asset_calls.lock().unwrap().is_empty());
    assert!(h.host.inserted.lock().unwrap().is_empty());
    assert_eq!(h.host.synced.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn download_failure_is_reported() {
    let h = Harness::new();
    h.backend.set_url(7, SIGNED, None);

    let err = h
        .flow(AssetResolution::SignedUrl)
        .insert(&SlideId::Int(7))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InsertError::Catalog(CatalogError::Backend { status: 404, .. })
    ));
    assert_eq!(h.host.synced.load(Ordering::SeqCst), 0);
    assert!(h.pane.last_status().starts_with("Error: "));
}

#[tokio::test]
async fn host_rejection_still_closes_context() {
    let h = Harness::new();
    h.backend.set_url(7, SIGNED, None);
    h.backend.set_asset(SIGNED, b"deck");
    h.host.reject.store(true, Ordering::SeqCst);

    let err = h
        .flow(AssetResolution::SignedUrl)
        .insert(&SlideId::Int(7))
        .await
        .unwrap_err();

    assert!(matches!(err, InsertError::Host(HostApiError::Rejected(_))));
    assert_eq!(h.host.synced.load(Ordering::SeqCst), 1);
    assert!(h.host.inserted.lock().unwrap().is_empty());
    assert_eq!(
        h.pane.last_status(),
        "Error: host rejected the insertion: presentation is read-only"
    );
}

#[tokio::test]
async fn without_host_slide_id_all_slides_are_inserted() {
    let h = Harness::new();
    h.backend.set_url(7, SIGNED, None);
    h.backend.set_asset(SIGNED, b"deck");

    h.flow(AssetResolution::SignedUrl)
        .insert(&SlideId::Int(7))
        .await
        .unwrap();

    let inserted = h.host.inserted.lock().unwrap();
    assert_eq!(inserted[0].1.source_slide_ids, None);
}

#[tokio::test]
async fn public_mode_prefers_catalog_file_url() {
    let h = Harness::new();
    let mut slides = sample_catalog();
    slides[1].file_url = Some("https://cdn.example.com/decks/pricing.pptx".into());
    *h.backend.slides.lock().unwrap() = slides;
    h.catalog.refresh(h.backend.as_ref()).await.unwrap();
    h.backend
        .set_asset("https://cdn.example.com/decks/pricing.pptx", b"deck");

    h.flow(AssetResolution::PublicUrl)
        .with_public_url_template("https://cdn.example.com/slides/slide_{id}.pptx")
        .insert(&SlideId::Int(2))
        .await
        .unwrap();

    assert_eq!(h.backend.url_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        *h.backend.asset_calls.lock().unwrap(),
        vec!["https://cdn.example.com/decks/pricing.pptx"]
    );
}

#[tokio::test]
async fn public_mode_falls_back_to_url_template() {
    let h = Harness::new();
    let flow = h
        .flow(AssetResolution::PublicUrl)
        .with_public_url_template("https://cdn.example.com/slides/slide_{id}.pptx");

    let asset = flow.resolve(&SlideId::Int(3)).await.unwrap();

    assert_eq!(asset.url, "https://cdn.example.com/slides/slide_3.pptx");
    assert_eq!(asset.host_slide_id, None);
}

#[tokio::test]
async fn public_mode_without_any_url_fails() {
    let h = Harness::new();

    let err = h
        .flow(AssetResolution::PublicUrl)
        .insert(&SlideId::Int(3))
        .await
        .unwrap_err();

    assert!(matches!(err, InsertError::NoAssetUrl(id) if id == "3"));
    assert!(h.host.inserted.lock().unwrap().is_empty());
}
