//! # Background Analysis Tasks
//!
//! Fire-and-forget analysis over a shared record registry. Callers
//! poll status by id; there is no cancellation and no timeout. A task
//! always runs to one of the terminal states, and its failure never
//! reaches a caller.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event, Logger};

use super::analysis::MediaAnalysisResult;
use super::detector::DeepfakeDetector;
use super::errors::{MediaError, MediaResult};
use super::record::{AnalysisOutcome, AnalysisStatus, MediaKind, MediaRecord};
use super::video::VideoReport;

/// Shared registry of media records and their analysis tasks
#[derive(Clone, Default)]
pub struct AnalysisRegistry {
    records: Arc<RwLock<HashMap<Uuid, MediaRecord>>>,
}

impl AnalysisRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an uploaded file, pending analysis
    pub async fn register(&self, file_path: impl Into<PathBuf>, kind: MediaKind) -> Uuid {
        let record = MediaRecord::new(file_path, kind);
        let id = record.id;
        self.records.write().await.insert(id, record);
        id
    }

    /// Current status of a record
    pub async fn status(&self, id: Uuid) -> Option<AnalysisStatus> {
        self.records.read().await.get(&id).map(|record| record.status)
    }

    /// Snapshot of a record
    pub async fn get(&self, id: Uuid) -> Option<MediaRecord> {
        self.records.read().await.get(&id).cloned()
    }

    /// Start analysis of a registered record in the background.
    ///
    /// Moves the record to `Analyzing` before returning; the spawned
    /// task lands it in `Completed` or `Failed`. Starting an unknown
    /// record or one past `Pending` is an error; the task itself
    /// cannot fail the caller.
    pub async fn spawn_analysis(
        &self,
        id: Uuid,
        detector: Arc<DeepfakeDetector>,
        use_consensus: bool,
    ) -> MediaResult<()> {
        let (file_path, kind) = {
            let mut records = self.records.write().await;
            let record = records.get_mut(&id).ok_or(MediaError::UnknownAnalysis(id))?;
            record.begin_analysis()?;
            (record.file_path.clone(), record.kind)
        };

        log_event_with_fields(
            Event::MediaAnalysisStart,
            &[("id", &id.to_string()), ("kind", kind_str(kind))],
        );

        let registry = self.clone();
        tokio::spawn(async move {
            let outcome = match kind {
                MediaKind::Image => {
                    let (result, primary) =
                        detector.analyze_image(&file_path, use_consensus).await;
                    Ok(image_outcome(result, primary))
                }
                MediaKind::Video => detector
                    .analyze_video(&file_path)
                    .await
                    .map(video_outcome),
            };

            registry.finish(id, outcome).await;
        });

        Ok(())
    }

    /// Land a record in its terminal state
    async fn finish(&self, id: Uuid, outcome: MediaResult<AnalysisOutcome>) {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&id) else {
            Logger::error("MEDIA_RECORD_MISSING", &[("id", &id.to_string())]);
            return;
        };

        let landed = match outcome {
            Ok(outcome) => {
                let verdict = outcome.consensus_verdict.as_str();
                record.complete(outcome).map(|()| {
                    log_event_with_fields(
                        Event::MediaAnalysisComplete,
                        &[("id", &id.to_string()), ("verdict", verdict)],
                    );
                })
            }
            Err(error) => record.fail(error.to_string()).map(|()| {
                log_event_with_fields(
                    Event::MediaAnalysisFailed,
                    &[("id", &id.to_string()), ("error", &error.to_string())],
                );
            }),
        };

        if let Err(error) = landed {
            Logger::error(
                "MEDIA_TRANSITION_REJECTED",
                &[("id", &id.to_string()), ("error", &error.to_string())],
            );
        }
    }
}

fn kind_str(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image",
        MediaKind::Video => "video",
    }
}

fn image_outcome(
    result: MediaAnalysisResult,
    primary: Option<MediaAnalysisResult>,
) -> AnalysisOutcome {
    AnalysisOutcome {
        consensus_verdict: result.verdict,
        is_deepfake: result.is_deepfake,
        confidence: result.confidence,
        primary_verdict: primary.as_ref().map(|r| r.verdict),
        primary_confidence: primary.as_ref().map(|r| r.confidence),
        secondary_verdict: None,
        secondary_confidence: None,
        artifacts: result.artifacts,
        metadata_issues: result.metadata_issues,
        frame_results: Vec::new(),
        temporal_analysis: None,
        report: result.reasoning,
    }
}

fn video_outcome(report: VideoReport) -> AnalysisOutcome {
    let summary = format!(
        "{} of {} analyzed frames judged fake; average confidence {:.2}",
        report
            .frame_analysis
            .iter()
            .filter(|frame| frame.is_deepfake)
            .count(),
        report.frames_analyzed,
        report.confidence
    );

    AnalysisOutcome {
        consensus_verdict: report.verdict,
        is_deepfake: report.is_deepfake,
        confidence: report.confidence,
        primary_verdict: None,
        primary_confidence: None,
        secondary_verdict: None,
        secondary_confidence: None,
        artifacts: Vec::new(),
        metadata_issues: Vec::new(),
        frame_results: report.frame_analysis,
        temporal_analysis: Some(report.temporal_analysis),
        report: summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_starts_pending() {
        let registry = AnalysisRegistry::new();
        let id = registry.register("/tmp/a.jpg", MediaKind::Image).await;
        assert_eq!(registry.status(id).await, Some(AnalysisStatus::Pending));
    }

    #[tokio::test]
    async fn test_unknown_record_is_an_error() {
        let registry = AnalysisRegistry::new();
        assert_eq!(registry.status(Uuid::new_v4()).await, None);
        assert!(registry.get(Uuid::new_v4()).await.is_none());
    }
}
