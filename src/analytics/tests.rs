//! Tests for consent and event tracking

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

struct FailingSink;

#[async_trait]
impl AnalyticsSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn requires_consent(&self) -> bool {
        false
    }

    async fn record(&self, _event: &AnalyticsEvent) -> Result<()> {
        Err(Error::Other("collector offline".to_string()))
    }
}

struct BrokenStore;

#[async_trait]
impl ConsentStore for BrokenStore {
    async fn read(&self) -> Result<Option<ConsentState>> {
        Err(Error::consent("disk on fire"))
    }

    async fn write(&self, _state: ConsentState) -> Result<()> {
        Err(Error::consent("read-only"))
    }
}

async fn context(state: Option<bool>) -> Arc<ConsentContext> {
    let store = match state {
        Some(analytics) => MemoryConsentStore::with_state(ConsentState { analytics }),
        None => MemoryConsentStore::new(),
    };
    Arc::new(ConsentContext::init(Arc::new(store)).await)
}

struct Harness {
    dispatcher: Arc<EventDispatcher>,
    gated: Arc<RecordingSink>,
    cookieless: Arc<RecordingSink>,
}

fn harness() -> Harness {
    let gated = Arc::new(RecordingSink::consent_gated());
    let cookieless = Arc::new(RecordingSink::cookieless());
    let dispatcher = Arc::new(
        EventDispatcher::new()
            .with_sink(gated.clone())
            .with_sink(cookieless.clone()),
    );
    Harness {
        dispatcher,
        gated,
        cookieless,
    }
}

// ============================================================================
// Consent
// ============================================================================

#[tokio::test]
async fn test_consent_defaults_to_enabled() {
    let consent = context(None).await;
    assert!(!consent.has_chosen().await);
    assert!(consent.analytics_enabled().await);
    assert_eq!(consent.consent().await, None);
}

#[tokio::test]
async fn test_consent_reads_stored_choice() {
    let consent = context(Some(false)).await;
    assert!(consent.has_chosen().await);
    assert!(!consent.analytics_enabled().await);
}

#[tokio::test]
async fn test_consent_writes_through() {
    let store = Arc::new(MemoryConsentStore::new());
    let consent = ConsentContext::init(store.clone()).await;

    consent.set_analytics(false).await.unwrap();
    assert!(!consent.analytics_enabled().await);
    assert_eq!(
        store.read().await.unwrap(),
        Some(ConsentState { analytics: false })
    );

    consent.accept_all().await.unwrap();
    assert!(consent.analytics_enabled().await);
    assert_eq!(
        store.read().await.unwrap(),
        Some(ConsentState { analytics: true })
    );
}

#[tokio::test]
async fn test_consent_broken_store() {
    let consent = ConsentContext::init(Arc::new(BrokenStore)).await;
    assert!(!consent.has_chosen().await);

    let err = consent.set_analytics(false).await.unwrap_err();
    assert!(matches!(err, Error::Consent { .. }));
    // failed write leaves the cached choice alone
    assert!(!consent.has_chosen().await);
    assert!(consent.analytics_enabled().await);
}

#[tokio::test]
async fn test_file_consent_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("consent.json");
    let store = FileConsentStore::new(&path);

    assert_eq!(store.read().await.unwrap(), None);

    store.write(ConsentState { analytics: false }).await.unwrap();
    assert!(path.exists());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"analytics":false}"#
    );

    // a fresh context over the same file sees the choice
    let consent = ConsentContext::init(Arc::new(FileConsentStore::new(&path))).await;
    assert!(consent.has_chosen().await);
    assert!(!consent.analytics_enabled().await);
}

#[tokio::test]
async fn test_file_consent_store_ignores_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("consent.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = FileConsentStore::new(&path);
    assert_eq!(store.read().await.unwrap(), None);
}

// ============================================================================
// Dispatcher
// ============================================================================

#[tokio::test]
async fn test_track_with_consent_reaches_every_sink() {
    let h = harness();
    let consent = context(Some(true)).await;

    let params = EventParams::from([("plan".to_string(), ParamValue::from("growth"))]);
    let delivered = h.dispatcher.track("pricing_view", params, &consent).await;

    assert_eq!(delivered, 2);
    assert_eq!(h.gated.names().await, vec!["pricing_view"]);
    assert_eq!(h.cookieless.names().await, vec!["pricing_view"]);
}

#[tokio::test]
async fn test_track_without_consent_only_reaches_cookieless() {
    let h = harness();
    let consent = context(Some(false)).await;

    let delivered = h
        .dispatcher
        .track("pricing_view", EventParams::new(), &consent)
        .await;

    assert_eq!(delivered, 1);
    assert!(h.gated.events().await.is_empty());
    assert_eq!(h.cookieless.names().await, vec!["pricing_view"]);
}

#[tokio::test]
async fn test_track_survives_failing_sink() {
    let recording = Arc::new(RecordingSink::cookieless());
    let dispatcher = EventDispatcher::new()
        .with_sink(Arc::new(FailingSink))
        .with_sink(recording.clone());
    let consent = context(None).await;

    let delivered = dispatcher.track("cta", EventParams::new(), &consent).await;
    assert_eq!(delivered, 1);
    assert_eq!(recording.names().await, vec!["cta"]);
}

#[tokio::test]
async fn test_performance_mark_sink() {
    assert_eq!(PerformanceMarkSink::mark_name("jargon_click"), "sabako:jargon_click");

    let dispatcher = EventDispatcher::new().with_sink(Arc::new(PerformanceMarkSink));
    let consent = context(Some(false)).await;
    assert_eq!(dispatcher.track("cta", EventParams::new(), &consent).await, 1);
}

#[test]
fn test_param_value_serialization() {
    let params = EventParams::from([
        ("a".to_string(), ParamValue::from("x")),
        ("b".to_string(), ParamValue::from(3_i64)),
        ("c".to_string(), ParamValue::from(true)),
        ("d".to_string(), ParamValue::from(None::<String>)),
    ]);
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "a": "x", "b": 3.0, "c": true, "d": null })
    );
}

#[tokio::test]
async fn test_collector_sink_posts_events() {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collect"))
        .and(body_partial_json(serde_json::json!({ "name": "cta" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = crate::http::HttpClientConfig::builder()
        .max_retries(0)
        .no_rate_limit()
        .build();
    let http = Arc::new(crate::http::HttpClient::with_config(config).unwrap());
    let sink = CollectorSink::new(http, format!("{}/collect", server.uri()));
    assert!(sink.requires_consent());

    let dispatcher = EventDispatcher::new().with_sink(Arc::new(sink));
    // opted out: never posted
    let declined = context(Some(false)).await;
    assert_eq!(dispatcher.track("cta", EventParams::new(), &declined).await, 0);

    let accepted = context(Some(true)).await;
    assert_eq!(dispatcher.track("cta", EventParams::new(), &accepted).await, 1);
}

// ============================================================================
// Click tracking
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_click_debounce_per_label_and_section() {
    let h = harness();
    let tracker = ClickTracker::new(h.dispatcher.clone(), context(None).await).page("/pricing");

    assert!(tracker.track("Get Started", "pricing", EventParams::new()).await);
    assert!(!tracker.track("Get Started", "pricing", EventParams::new()).await);
    // different section is a different button
    assert!(tracker.track("Get Started", "hero", EventParams::new()).await);

    tokio::time::advance(Duration::from_millis(499)).await;
    assert!(!tracker.track("Get Started", "pricing", EventParams::new()).await);

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(tracker.track("Get Started", "pricing", EventParams::new()).await);

    assert_eq!(h.cookieless.events().await.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_click_debounce_forgets_expired_buttons() {
    let h = harness();
    let tracker = ClickTracker::new(h.dispatcher.clone(), context(None).await);

    for section in ["hero", "pricing", "footer"] {
        assert!(tracker.track("Contact", section, EventParams::new()).await);
    }
    assert_eq!(tracker.debouncing().await, 3);

    tokio::time::advance(Duration::from_millis(600)).await;
    assert!(tracker.track("Contact", "hero", EventParams::new()).await);
    assert_eq!(tracker.debouncing().await, 1);
}

#[tokio::test]
async fn test_click_params() {
    let h = harness();
    let tracker = ClickTracker::new(h.dispatcher.clone(), context(None).await).page("/pricing");

    let extra = EventParams::from([
        ("tier".to_string(), ParamValue::from("growth")),
        ("section".to_string(), ParamValue::from("override")),
    ]);
    tracker.track("Get Started", "pricing", extra).await;

    let events = h.gated.events().await;
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.name, BUTTON_CLICK);
    assert_eq!(event.params["label"], ParamValue::from("Get Started"));
    assert_eq!(event.params["page"], ParamValue::from("/pricing"));
    assert_eq!(event.params["tier"], ParamValue::from("growth"));
    assert_eq!(event.params["section"], ParamValue::from("override"));
    assert!(matches!(event.params["timestamp"], ParamValue::Text(_)));
}

#[tokio::test]
async fn test_click_without_page_sends_null() {
    let h = harness();
    let tracker = ClickTracker::new(h.dispatcher.clone(), context(None).await)
        .debounce(Duration::ZERO);

    tracker.track("Menu", "nav", EventParams::new()).await;
    let events = h.cookieless.events().await;
    assert_eq!(events[0].params["page"], ParamValue::Null);
}

// ============================================================================
// Jargon
// ============================================================================

#[test]
fn test_jargon_pick() {
    let set = ["Let's build.", "Time to ship.", "Imagine it."];
    for _ in 0..20 {
        let jargon = Jargon::pick(&set, "cta-section", "homepage-cta").unwrap();
        assert!(set.contains(&jargon.text()));
    }
    assert!(Jargon::pick(&[], "cta-section", "homepage-cta").is_none());
    assert!(Jargon::pick_at(&set, 3, "cta-section", "homepage-cta").is_none());
}

#[tokio::test]
async fn test_jargon_impression_and_click() {
    let h = harness();
    let consent = context(None).await;
    let set = ["Let's build.", "Time to ship."];
    let mut jargon = Jargon::pick_at(&set, 1, "cta-section", "homepage-cta").unwrap();

    jargon.track_impression(&h.dispatcher, &consent).await;
    assert!(!jargon.clicked());
    jargon.track_click(&h.dispatcher, &consent).await;
    assert!(jargon.clicked());

    let events = h.cookieless.events().await;
    assert_eq!(h.cookieless.names().await, vec![JARGON_IMPRESSION, JARGON_CLICK]);
    assert_eq!(events[0].params["jargon_text"], ParamValue::from("Time to ship."));
    assert_eq!(events[0].params["jargon_set_id"], ParamValue::from("cta-section"));
    assert_eq!(events[0].params["page_section"], ParamValue::from("homepage-cta"));
    assert!(!events[0].params.contains_key("converted"));
    assert_eq!(events[1].params["converted"], ParamValue::Bool(true));
}
