//! Media Analysis Lifecycle Tests
//!
//! The registry's pending -> analyzing -> terminal flow, polled from
//! the outside, plus image consensus through the detector.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::StubBackend;
use deepcheck::backend::BackendId;
use deepcheck::media::{
    AnalysisRegistry, AnalysisStatus, DeepfakeDetector, DeepfakeVerdict, MediaKind,
};
use tempfile::TempDir;

const FAKE_REPLY: &str = r#"{
  "verdict": "fake",
  "confidence": 0.95,
  "is_deepfake": true,
  "reasoning": "Six fingers on the left hand.",
  "artifacts_detected": ["six fingers"]
}"#;

const REAL_REPLY: &str = r#"{
  "verdict": "real",
  "confidence": 0.7,
  "is_deepfake": false,
  "reasoning": "No anomalies found.",
  "artifacts_detected": []
}"#;

fn detector(primary_reply: &str, secondary_reply: &str) -> Arc<DeepfakeDetector> {
    Arc::new(DeepfakeDetector::new(
        Arc::new(StubBackend::fixed(BackendId::Gemini, primary_reply)),
        Arc::new(StubBackend::fixed(BackendId::OpenAi, secondary_reply)),
        true,
    ))
}

/// Write a small stand-in image file
fn image_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("upload.jpg");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
    path
}

async fn poll_until_terminal(registry: &AnalysisRegistry, id: uuid::Uuid) -> AnalysisStatus {
    for _ in 0..200 {
        let status = registry.status(id).await.expect("record exists");
        if status.is_terminal() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("analysis never reached a terminal state");
}

/// The happy path: registered pending, spawned, completed with a
/// consensus verdict.
#[tokio::test]
async fn test_image_analysis_reaches_completed() {
    let dir = TempDir::new().unwrap();
    let registry = AnalysisRegistry::new();
    let id = registry.register(image_file(&dir), MediaKind::Image).await;
    assert_eq!(registry.status(id).await, Some(AnalysisStatus::Pending));

    registry
        .spawn_analysis(id, detector(FAKE_REPLY, FAKE_REPLY), true)
        .await
        .unwrap();

    let status = poll_until_terminal(&registry, id).await;
    assert_eq!(status, AnalysisStatus::Completed);

    let record = registry.get(id).await.unwrap();
    let outcome = record.outcome.expect("completed records carry an outcome");
    assert_eq!(outcome.consensus_verdict, DeepfakeVerdict::Fake);
    assert!(outcome.is_deepfake);
    assert_eq!(outcome.primary_verdict, Some(DeepfakeVerdict::Fake));
}

/// Disagreeing providers still complete, with the discounted consensus.
#[tokio::test]
async fn test_disagreeing_providers_complete_with_discount() {
    let dir = TempDir::new().unwrap();
    let registry = AnalysisRegistry::new();
    let id = registry.register(image_file(&dir), MediaKind::Image).await;

    registry
        .spawn_analysis(id, detector(FAKE_REPLY, REAL_REPLY), true)
        .await
        .unwrap();
    poll_until_terminal(&registry, id).await;

    let outcome = registry.get(id).await.unwrap().outcome.unwrap();
    assert_eq!(outcome.consensus_verdict, DeepfakeVerdict::Fake);
    // 0.95 discounted by the disagreement penalty
    assert!((outcome.confidence - 0.76).abs() < 1e-12);
}

/// A video pointing at a missing file lands in failed, not completed,
/// and the error is recorded.
#[tokio::test]
async fn test_missing_video_lands_in_failed() {
    let registry = AnalysisRegistry::new();
    let id = registry
        .register("/nonexistent/clip.mp4", MediaKind::Video)
        .await;

    registry
        .spawn_analysis(id, detector(REAL_REPLY, REAL_REPLY), true)
        .await
        .unwrap();

    let status = poll_until_terminal(&registry, id).await;
    assert_eq!(status, AnalysisStatus::Failed);

    let record = registry.get(id).await.unwrap();
    assert!(record.outcome.is_none());
    assert!(record.error.is_some());
}

/// Spawning twice is rejected: the second call sees a non-pending
/// record.
#[tokio::test]
async fn test_double_spawn_is_rejected() {
    let dir = TempDir::new().unwrap();
    let registry = AnalysisRegistry::new();
    let id = registry.register(image_file(&dir), MediaKind::Image).await;

    registry
        .spawn_analysis(id, detector(REAL_REPLY, REAL_REPLY), true)
        .await
        .unwrap();
    let second = registry
        .spawn_analysis(id, detector(REAL_REPLY, REAL_REPLY), true)
        .await;
    assert!(second.is_err());
}

/// Spawning an unregistered id is an error.
#[tokio::test]
async fn test_spawn_unknown_id_is_rejected() {
    let registry = AnalysisRegistry::new();
    let result = registry
        .spawn_analysis(uuid::Uuid::new_v4(), detector(REAL_REPLY, REAL_REPLY), true)
        .await;
    assert!(result.is_err());
}

/// An unreadable image never fails the task: it completes uncertain.
#[tokio::test]
async fn test_unreadable_image_completes_uncertain() {
    let registry = AnalysisRegistry::new();
    let id = registry
        .register("/nonexistent/photo.jpg", MediaKind::Image)
        .await;

    registry
        .spawn_analysis(id, detector(REAL_REPLY, REAL_REPLY), true)
        .await
        .unwrap();

    let status = poll_until_terminal(&registry, id).await;
    assert_eq!(status, AnalysisStatus::Completed);

    let outcome = registry.get(id).await.unwrap().outcome.unwrap();
    assert_eq!(outcome.consensus_verdict, DeepfakeVerdict::Uncertain);
    assert_eq!(outcome.confidence, 0.0);
}
