//! Tests for the contact pipeline

use super::*;
use crate::error::Error;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use test_case::test_case;
use tokio::sync::Notify;

fn valid_body() -> Value {
    json!({
        "name": "Ayu Lestari",
        "email": "ayu@example.co.id",
        "service": "IoT",
        "companySize": "50-200",
        "message": "We need a fleet tracking pilot."
    })
}

/// Counts notifications, optionally holding each one until released
#[derive(Default)]
struct CountingNotifier {
    seen: AtomicUsize,
    fail: bool,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl Notifier for CountingNotifier {
    fn name(&self) -> &str {
        "counting"
    }

    async fn notify(&self, _submission: &ContactSubmission) -> crate::error::Result<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.seen.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::notification("webhook returned 500"));
        }
        Ok(())
    }
}

// ============================================================================
// Sanitizing and validation
// ============================================================================

#[test_case("  Ayu  ", "Ayu")]
#[test_case("<b>Ayu</b>", "Ayu")]
#[test_case("<script>alert(1)</script>hi", "alert(1)hi")]
#[test_case("a < b", "a < b")]
#[test_case("", "")]
fn test_sanitize(raw: &str, expected: &str) {
    assert_eq!(sanitize(raw), expected);
}

#[test]
fn test_sanitize_truncates() {
    let long = "é".repeat(MAX_FIELD_LEN + 50);
    assert_eq!(sanitize(&long).chars().count(), MAX_FIELD_LEN);
}

#[test_case("ayu@example.com", true)]
#[test_case("a@b.c", true)]
#[test_case("ayu@example", false)]
#[test_case("ayu example@x.com", false)]
#[test_case("@example.com", false)]
#[test_case("", false)]
fn test_email(email: &str, valid: bool) {
    assert_eq!(is_valid_email(email), valid);
}

#[test]
fn test_non_string_fields_read_as_empty() {
    let form = sanitize_form(&json!({ "name": 42, "email": ["x"], "message": null }));
    assert_eq!(form, ContactForm::default());

    let form = sanitize_form(&json!([1, 2, 3]));
    assert_eq!(form, ContactForm::default());
}

#[test_case(json!({"name": "A", "email": "a@b.co", "message": "long enough message"}), "Name must be at least 2 characters.")]
#[test_case(json!({"name": "<i></i>", "email": "a@b.co", "message": "long enough message"}), "Name must be at least 2 characters.")]
#[test_case(json!({"name": "Ayu", "email": "nope", "message": "long enough message"}), "A valid email address is required.")]
#[test_case(json!({"name": "Ayu", "email": "a@b.co", "message": "short"}), "Message must be at least 10 characters.")]
#[test_case(json!({}), "Name must be at least 2 characters.")]
fn test_validation_errors(body: Value, message: &str) {
    let err = parse_form(&body).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(err.to_string(), message);
}

#[test]
fn test_parse_valid_form() {
    let form = parse_form(&valid_body()).unwrap();
    assert_eq!(form.name, "Ayu Lestari");
    assert_eq!(form.company_size, "50-200");
    assert_eq!(form.preference, "");
}

// ============================================================================
// Stores
// ============================================================================

#[tokio::test]
async fn test_memory_store() {
    let store = MemorySubmissionStore::new();
    let first = ContactSubmission::new(parse_form(&valid_body()).unwrap(), None);
    let second = ContactSubmission::new(parse_form(&valid_body()).unwrap(), None);

    store.save(&first).await.unwrap();
    store.save(&second).await.unwrap();

    let all = store.list().await.unwrap();
    assert_eq!(all, vec![first, second]);
}

#[tokio::test]
async fn test_jsonl_store_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("submissions.jsonl");
    let store = JsonlSubmissionStore::new(&path);
    assert!(store.list().await.unwrap().is_empty());

    let first = ContactSubmission::new(
        parse_form(&valid_body()).unwrap(),
        Some("Mozilla/5.0".to_string()),
    );
    let second = ContactSubmission::new(parse_form(&valid_body()).unwrap(), None);
    store.save(&first).await.unwrap();
    store.save(&second).await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.lines().next().unwrap().contains("\"companySize\":\"50-200\""));

    // a second handle on the same file sees both
    let reopened = JsonlSubmissionStore::new(&path);
    assert_eq!(reopened.list().await.unwrap(), vec![first, second]);
}

#[tokio::test]
async fn test_jsonl_store_reports_corrupt_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("submissions.jsonl");
    std::fs::write(&path, "{\"id\": 1}\n").unwrap();

    let err = JsonlSubmissionStore::new(&path).list().await.unwrap_err();
    assert!(err.to_string().contains("line 1"));
}

#[tokio::test]
async fn test_jsonl_corrupt_line_number_counts_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("submissions.jsonl");
    let store = JsonlSubmissionStore::new(&path);
    let submission = ContactSubmission::new(parse_form(&valid_body()).unwrap(), None);
    store.save(&submission).await.unwrap();

    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("\n\n{\"id\": 1}\n");
    std::fs::write(&path, contents).unwrap();

    let err = store.list().await.unwrap_err();
    assert!(err.to_string().contains("line 4"), "{err}");
}

#[test]
fn test_submission_wire_shape() {
    let submission = ContactSubmission::new(
        parse_form(&valid_body()).unwrap(),
        Some("curl/8".to_string()),
    );
    let json = serde_json::to_value(&submission).unwrap();
    assert_eq!(json["name"], "Ayu Lestari");
    assert_eq!(json["meta"]["userAgent"], "curl/8");
    assert!(json["receivedAt"].is_string());
    assert_eq!(json["id"].as_str().unwrap().len(), 36);
}

// ============================================================================
// Service and queue
// ============================================================================

#[tokio::test]
async fn test_submit_persists_and_notifies() {
    let store = Arc::new(MemorySubmissionStore::new());
    let notifier = Arc::new(CountingNotifier::default());
    let (queue, worker) = NotificationQueue::start(notifier.clone(), 8);
    let service = ContactService::new(store.clone()).with_queue(queue);

    let submission = service
        .submit(&valid_body(), Some("Mozilla/5.0".to_string()))
        .await
        .unwrap();
    assert_eq!(submission.meta.user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(store.list().await.unwrap().len(), 1);

    drop(service);
    worker.await.unwrap();
    assert_eq!(notifier.seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_submit_rejects_invalid_without_storing() {
    let store = Arc::new(MemorySubmissionStore::new());
    let service = ContactService::new(store.clone());

    let err = service
        .submit(&json!({ "name": "Ayu" }), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_submit() {
    let notifier = Arc::new(CountingNotifier {
        fail: true,
        ..CountingNotifier::default()
    });
    let (queue, worker) = NotificationQueue::start(notifier.clone(), 8);
    let service = ContactService::new(Arc::new(MemorySubmissionStore::new())).with_queue(queue);

    assert!(service.submit(&valid_body(), None).await.is_ok());
    assert!(service.submit(&valid_body(), None).await.is_ok());

    drop(service);
    worker.await.unwrap();
    assert_eq!(notifier.seen.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_full_queue_drops_instead_of_blocking() {
    let gate = Arc::new(Notify::new());
    let notifier = Arc::new(CountingNotifier {
        gate: Some(gate.clone()),
        ..CountingNotifier::default()
    });
    let (queue, worker) = NotificationQueue::start(notifier.clone(), 1);
    let submission = || ContactSubmission::new(parse_form(&valid_body()).unwrap(), None);

    // worker takes the first and blocks on the gate
    assert!(queue.enqueue(submission()));
    tokio::time::timeout(Duration::from_secs(1), async {
        while queue.pending() > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    // one slot buffered, the next is dropped
    assert!(queue.enqueue(submission()));
    assert!(!queue.enqueue(submission()));

    drop(queue);
    gate.notify_one();
    gate.notify_one();
    worker.await.unwrap();
    assert_eq!(notifier.seen.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_webhook_notifier() {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/ok"))
        .and(body_partial_json(json!({
            "event": "contact.submitted",
            "submission": { "name": "Ayu Lestari" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/hooks/broken"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let config = crate::http::HttpClientConfig::builder()
        .max_retries(0)
        .no_rate_limit()
        .build();
    let http = Arc::new(HttpClient::with_config(config).unwrap());
    let submission = ContactSubmission::new(parse_form(&valid_body()).unwrap(), None);

    let ok = WebhookNotifier::new(http.clone(), vec![format!("{}/hooks/ok", server.uri())]);
    ok.notify(&submission).await.unwrap();

    let mixed = WebhookNotifier::new(
        http,
        vec![
            format!("{}/hooks/ok", server.uri()),
            format!("{}/hooks/broken", server.uri()),
        ],
    );
    let err = mixed.notify(&submission).await.unwrap_err();
    assert!(matches!(err, Error::Notification { .. }));
    assert!(err.to_string().contains("/hooks/broken"));
    assert!(!err.to_string().contains("/hooks/ok:"));
}
