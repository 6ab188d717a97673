//! # Media Records
//!
//! The tracked state of an uploaded media item. Status moves
//! pending -> analyzing -> (completed | failed) exactly once; the
//! terminal states accept no further transitions, and a completed
//! record always carries a consensus verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use super::analysis::{DeepfakeVerdict, MetadataIssue};
use super::errors::{MediaError, MediaResult};
use super::temporal::TemporalAnalysis;
use super::video::FrameResult;

/// What kind of media a record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Analysis lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Uploaded, analysis not yet started
    Pending,
    /// Background task is running
    Analyzing,
    /// Terminal: analysis produced a verdict
    Completed,
    /// Terminal: analysis errored
    Failed,
}

impl AnalysisStatus {
    /// Returns the persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The verdict payload required to complete a record.
///
/// Completion demands a consensus verdict by construction; there is no
/// way to reach `Completed` without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// Final consensus verdict
    pub consensus_verdict: DeepfakeVerdict,

    /// Final manipulation flag
    pub is_deepfake: bool,

    /// Final confidence, 0.0-1.0
    pub confidence: f64,

    /// Per-provider verdicts, when both ran
    pub primary_verdict: Option<DeepfakeVerdict>,
    pub primary_confidence: Option<f64>,
    pub secondary_verdict: Option<DeepfakeVerdict>,
    pub secondary_confidence: Option<f64>,

    /// Visual artifacts found
    pub artifacts: Vec<String>,

    /// Metadata inspection findings
    pub metadata_issues: Vec<MetadataIssue>,

    /// Per-frame results (video only)
    pub frame_results: Vec<FrameResult>,

    /// Temporal consistency findings (video only)
    pub temporal_analysis: Option<TemporalAnalysis>,

    /// Human-readable report
    pub report: String,
}

/// A tracked media item and its analysis state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Stable identity
    pub id: Uuid,

    /// Where the uploaded file lives
    pub file_path: PathBuf,

    /// Image or video
    pub kind: MediaKind,

    /// Current lifecycle state
    pub status: AnalysisStatus,

    /// Set on completion, never before
    pub outcome: Option<AnalysisOutcome>,

    /// Set on failure
    pub error: Option<String>,

    pub uploaded_at: DateTime<Utc>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl MediaRecord {
    /// Create a pending record for an uploaded file
    pub fn new(file_path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_path: file_path.into(),
            kind,
            status: AnalysisStatus::Pending,
            outcome: None,
            error: None,
            uploaded_at: Utc::now(),
            analyzed_at: None,
        }
    }

    /// Pending -> Analyzing
    pub fn begin_analysis(&mut self) -> MediaResult<()> {
        self.transition(AnalysisStatus::Pending, AnalysisStatus::Analyzing)
    }

    /// Analyzing -> Completed, with the verdict payload
    pub fn complete(&mut self, outcome: AnalysisOutcome) -> MediaResult<()> {
        self.transition(AnalysisStatus::Analyzing, AnalysisStatus::Completed)?;
        self.outcome = Some(outcome);
        self.analyzed_at = Some(Utc::now());
        Ok(())
    }

    /// Analyzing -> Failed, recording the cause
    pub fn fail(&mut self, error: impl Into<String>) -> MediaResult<()> {
        self.transition(AnalysisStatus::Analyzing, AnalysisStatus::Failed)?;
        self.error = Some(error.into());
        self.analyzed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, expected: AnalysisStatus, next: AnalysisStatus) -> MediaResult<()> {
        if self.status != expected {
            return Err(MediaError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> AnalysisOutcome {
        AnalysisOutcome {
            consensus_verdict: DeepfakeVerdict::Fake,
            is_deepfake: true,
            confidence: 0.9,
            primary_verdict: Some(DeepfakeVerdict::Fake),
            primary_confidence: Some(0.9),
            secondary_verdict: None,
            secondary_confidence: None,
            artifacts: Vec::new(),
            metadata_issues: Vec::new(),
            frame_results: Vec::new(),
            temporal_analysis: None,
            report: String::new(),
        }
    }

    /// The only legal path: pending -> analyzing -> completed.
    #[test]
    fn test_happy_path_transitions() {
        let mut record = MediaRecord::new("/tmp/a.jpg", MediaKind::Image);
        assert_eq!(record.status, AnalysisStatus::Pending);

        record.begin_analysis().unwrap();
        assert_eq!(record.status, AnalysisStatus::Analyzing);

        record.complete(outcome()).unwrap();
        assert_eq!(record.status, AnalysisStatus::Completed);
        assert!(record.outcome.is_some());
        assert!(record.analyzed_at.is_some());
    }

    /// Completion from pending is illegal; analysis must begin first.
    #[test]
    fn test_cannot_complete_from_pending() {
        let mut record = MediaRecord::new("/tmp/a.jpg", MediaKind::Image);
        assert!(record.complete(outcome()).is_err());
        assert_eq!(record.status, AnalysisStatus::Pending);
    }

    /// Terminal states reject every further transition.
    #[test]
    fn test_terminal_states_are_final() {
        let mut record = MediaRecord::new("/tmp/a.mp4", MediaKind::Video);
        record.begin_analysis().unwrap();
        record.fail("ffmpeg exploded").unwrap();

        assert_eq!(record.status, AnalysisStatus::Failed);
        assert!(record.status.is_terminal());
        assert!(record.begin_analysis().is_err());
        assert!(record.complete(outcome()).is_err());
        assert!(record.fail("again").is_err());
    }

    /// A completed record always carries its consensus verdict.
    #[test]
    fn test_completed_record_has_consensus_verdict() {
        let mut record = MediaRecord::new("/tmp/a.jpg", MediaKind::Image);
        record.begin_analysis().unwrap();
        record.complete(outcome()).unwrap();

        let outcome = record.outcome.unwrap();
        assert_eq!(outcome.consensus_verdict, DeepfakeVerdict::Fake);
    }

    /// Double begin is rejected (already analyzing).
    #[test]
    fn test_double_begin_is_rejected() {
        let mut record = MediaRecord::new("/tmp/a.jpg", MediaKind::Image);
        record.begin_analysis().unwrap();
        let err = record.begin_analysis().unwrap_err();
        assert!(matches!(err, MediaError::InvalidTransition { .. }));
    }
}
