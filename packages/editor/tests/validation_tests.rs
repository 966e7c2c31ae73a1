//! Debounced validation driven by the edit session

use apistudio_editor::{
    EditSession, EditorConfig, NodePath, Severity, ValidationScheduler, Validator,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DOC: &str = "\
openapi: 3.0.3
info:
  title: Pets
  version: 1.0.0
servers:
  - url: /
paths: {}
";

fn counting(runs: Arc<AtomicUsize>) -> Validator {
    Arc::new(move |text: &str| {
        runs.fetch_add(1, Ordering::SeqCst);
        apistudio_linter::validate(text)
    })
}

fn session_with(runs: Arc<AtomicUsize>) -> EditSession {
    let config = EditorConfig::default();
    let scheduler = ValidationScheduler::with_validator(config.validation_delay(), counting(runs));
    EditSession::with_scheduler(config, scheduler)
}

#[tokio::test(start_paused = true)]
async fn test_open_schedules_validation() {
    let mut session = EditSession::new();
    session.open("pets.yaml", DOC).unwrap();
    assert!(session.validation_result().is_none());

    let result = session.next_validation().await.unwrap();
    assert!(result.is_clean(), "{:?}", result.errors);
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_validates_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut session = session_with(runs.clone());
    session.open("pets.yaml", DOC).unwrap();

    for i in 0..5 {
        session
            .update_field(&NodePath::from(["info", "title"]), Some(json!(format!("T{i}"))))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    session.next_validation().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_edit_result_is_located() {
    let mut session = EditSession::new();
    session.open("pets.yaml", DOC).unwrap();
    session.next_validation().await;

    session.update_field(&NodePath::from(["info", "version"]), None).unwrap();
    let result = session.next_validation().await.unwrap().clone();

    assert_eq!(result.counts.errors, 1);
    let error = &result.errors[0];
    assert_eq!(error.severity, Severity::Error);
    assert_eq!(error.rule.as_deref(), Some("info-required"));
    assert_eq!(error.path, NodePath::from(["info", "version"]));
    // Falls back to the `info` key
    assert_eq!(error.source_location.map(|l| l.line), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_undo_revalidates() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut session = session_with(runs.clone());
    session.open("pets.yaml", DOC).unwrap();
    session.next_validation().await;

    session.update_field(&NodePath::from(["info"]), Some(json!(1))).unwrap();
    assert!(session.next_validation().await.unwrap().has_errors());

    assert!(session.undo());
    assert!(session.next_validation().await.unwrap().is_clean());
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}

#[test]
fn test_polling_keeps_newest_result() {
    // Without a runtime every schedule validates on the spot
    let mut session = EditSession::new();
    session.open("pets.yaml", DOC).unwrap();
    session.update_field(&NodePath::from(["info", "version"]), None).unwrap();

    assert!(session.apply_validation_results());
    assert_eq!(session.validation_result().unwrap().counts.errors, 1);
    assert!(!session.apply_validation_results());
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_late_results() {
    let mut session = EditSession::new();
    session.open("pets.yaml", DOC).unwrap();
    session.reset();

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!session.apply_validation_results());
    assert!(session.validation_result().is_none());
}
