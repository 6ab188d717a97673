//! # Temporal Consistency
//!
//! Pairwise frame differencing over the head of a clip. Splices and
//! generated segments often show abrupt whole-frame changes; the check
//! surfaces them without influencing the authenticity verdict.

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::source::GrayFrame;

/// Mean pixel difference above which a frame pair counts as a sudden change
pub const SUDDEN_CHANGE_THRESHOLD: f64 = 50.0;

/// Only the head of the clip is examined, for cost control
pub const MAX_TEMPORAL_FRAMES: usize = 50;

/// More sudden changes than this flags the clip as suspicious
pub const SUSPICIOUS_EVENT_LIMIT: usize = 5;

/// One detected inconsistency between consecutive frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inconsistency {
    /// Index of the later frame of the pair
    pub frame: usize,

    /// Event kind; currently always "sudden_change"
    #[serde(rename = "type")]
    pub kind: String,

    /// Mean absolute pixel difference that triggered the event
    pub score: f64,
}

/// Summary of the temporal consistency check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalAnalysis {
    /// Frame rate of the clip
    pub fps: f64,

    /// How many frames were examined
    pub frames_analyzed: usize,

    /// Detected sudden changes
    pub inconsistencies: Vec<Inconsistency>,

    /// More than [`SUSPICIOUS_EVENT_LIMIT`] events
    pub suspicious: bool,
}

impl TemporalAnalysis {
    /// The empty analysis used when no frames could be examined
    pub fn empty(fps: f64) -> Self {
        Self {
            fps,
            frames_analyzed: 0,
            inconsistencies: Vec::new(),
            suspicious: false,
        }
    }
}

/// Check consecutive-frame differences over the head of a clip.
///
/// A pair whose mean absolute pixel difference exceeds
/// [`SUDDEN_CHANGE_THRESHOLD`] is recorded; more than
/// [`SUSPICIOUS_EVENT_LIMIT`] such events marks the clip suspicious.
pub fn check_temporal_consistency(frames: &[GrayFrame], fps: f64) -> TemporalAnalysis {
    let examined = &frames[..frames.len().min(MAX_TEMPORAL_FRAMES)];

    let mut inconsistencies = Vec::new();
    for (index, pair) in examined.windows(2).enumerate() {
        let score = pair[0].mean_abs_diff(&pair[1]);
        if score > SUDDEN_CHANGE_THRESHOLD {
            inconsistencies.push(Inconsistency {
                frame: index + 1,
                kind: "sudden_change".to_string(),
                score,
            });
        }
    }

    let suspicious = inconsistencies.len() > SUSPICIOUS_EVENT_LIMIT;
    if suspicious {
        log_event_with_fields(
            Event::TemporalSuspicious,
            &[("events", &inconsistencies.len().to_string())],
        );
    }

    TemporalAnalysis {
        fps,
        frames_analyzed: examined.len(),
        inconsistencies,
        suspicious,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_frame(value: u8) -> GrayFrame {
        GrayFrame {
            width: 4,
            height: 4,
            pixels: vec![value; 16],
        }
    }

    /// A steady clip produces no events.
    #[test]
    fn test_steady_frames_pass() {
        let frames: Vec<GrayFrame> = (0..10).map(|_| flat_frame(100)).collect();
        let analysis = check_temporal_consistency(&frames, 30.0);
        assert!(analysis.inconsistencies.is_empty());
        assert!(!analysis.suspicious);
        assert_eq!(analysis.frames_analyzed, 10);
    }

    /// One hard cut produces one sudden-change event.
    #[test]
    fn test_hard_cut_is_detected() {
        let frames = vec![flat_frame(10), flat_frame(10), flat_frame(200), flat_frame(200)];
        let analysis = check_temporal_consistency(&frames, 24.0);
        assert_eq!(analysis.inconsistencies.len(), 1);
        assert_eq!(analysis.inconsistencies[0].frame, 2);
        assert_eq!(analysis.inconsistencies[0].kind, "sudden_change");
        assert!(analysis.inconsistencies[0].score > SUDDEN_CHANGE_THRESHOLD);
        assert!(!analysis.suspicious);
    }

    /// Six or more events flag the clip.
    #[test]
    fn test_many_events_flag_suspicious() {
        // Alternate dark/bright: every pair is a sudden change
        let frames: Vec<GrayFrame> = (0..14)
            .map(|i| flat_frame(if i % 2 == 0 { 0 } else { 255 }))
            .collect();
        let analysis = check_temporal_consistency(&frames, 30.0);
        assert!(analysis.inconsistencies.len() > SUSPICIOUS_EVENT_LIMIT);
        assert!(analysis.suspicious);
    }

    /// Only the head of a long clip is examined.
    #[test]
    fn test_examination_is_bounded() {
        let frames: Vec<GrayFrame> = (0..200).map(|_| flat_frame(50)).collect();
        let analysis = check_temporal_consistency(&frames, 30.0);
        assert_eq!(analysis.frames_analyzed, MAX_TEMPORAL_FRAMES);
    }
}
