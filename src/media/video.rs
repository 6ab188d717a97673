//! # Video Analysis
//!
//! Samples evenly spaced frames, runs single-provider image analysis
//! on each, majority-votes the per-frame calls, and attaches the
//! temporal consistency report.

use serde::{Deserialize, Serialize};

use super::analysis::DeepfakeVerdict;
use super::temporal::TemporalAnalysis;

/// How many frames are sampled per clip
pub const DEFAULT_VIDEO_FRAMES: usize = 3;

/// Analysis of one sampled frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// Frame index within the clip
    pub index: usize,

    pub is_deepfake: bool,
    pub confidence: f64,
    pub verdict: DeepfakeVerdict,
}

/// The full video authenticity report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoReport {
    /// Majority vote over the sampled frames
    pub is_deepfake: bool,

    /// Arithmetic mean of per-frame confidence
    pub confidence: f64,

    /// `Fake` when the vote carries, `Real` otherwise
    pub verdict: DeepfakeVerdict,

    /// Per-frame results, in sampling order
    pub frame_analysis: Vec<FrameResult>,

    /// Consecutive-frame consistency findings
    pub temporal_analysis: TemporalAnalysis,

    /// How many frames were analyzed
    pub frames_analyzed: usize,
}

/// Evenly spaced frame indices, inclusive of the first and last frame.
///
/// `index_i = round(i * (total - 1) / (count - 1))` for i in 0..count.
/// A single requested frame yields the first frame.
pub fn frame_indices(total_frames: usize, count: usize) -> Vec<usize> {
    if total_frames == 0 || count == 0 {
        return Vec::new();
    }
    if count == 1 || total_frames == 1 {
        return vec![0];
    }

    let last = (total_frames - 1) as f64;
    let step = last / (count - 1) as f64;
    (0..count)
        .map(|i| (i as f64 * step).round() as usize)
        .collect()
}

/// Majority vote: deepfake when fake frames are at least half of the
/// analyzed frames
pub fn majority_is_deepfake(frames: &[FrameResult]) -> bool {
    if frames.is_empty() {
        return false;
    }
    let fake_count = frames.iter().filter(|frame| frame.is_deepfake).count();
    fake_count as f64 >= frames.len() as f64 / 2.0
}

/// Arithmetic mean of per-frame confidence; 0.0 for no frames
pub fn average_confidence(frames: &[FrameResult]) -> f64 {
    if frames.is_empty() {
        return 0.0;
    }
    frames.iter().map(|frame| frame.confidence).sum::<f64>() / frames.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize, is_deepfake: bool, confidence: f64) -> FrameResult {
        FrameResult {
            index,
            is_deepfake,
            confidence,
            verdict: if is_deepfake {
                DeepfakeVerdict::Fake
            } else {
                DeepfakeVerdict::Real
            },
        }
    }

    /// Three frames over a 100-frame clip: first, middle, last.
    #[test]
    fn test_indices_even_spacing() {
        assert_eq!(frame_indices(100, 3), vec![0, 50, 99]);
    }

    /// Spacing is inclusive of both endpoints for other shapes too.
    #[test]
    fn test_indices_other_shapes() {
        assert_eq!(frame_indices(10, 5), vec![0, 2, 5, 7, 9]);
        assert_eq!(frame_indices(5, 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(frame_indices(1, 3), vec![0]);
        assert_eq!(frame_indices(7, 1), vec![0]);
    }

    /// Degenerate inputs yield no indices.
    #[test]
    fn test_indices_degenerate() {
        assert!(frame_indices(0, 3).is_empty());
        assert!(frame_indices(100, 0).is_empty());
    }

    /// 2 of 3 fake frames carries the vote.
    #[test]
    fn test_majority_two_of_three() {
        let frames = vec![frame(0, true, 0.9), frame(50, true, 0.8), frame(99, false, 0.7)];
        assert!(majority_is_deepfake(&frames));
    }

    /// 1 of 3 fake frames does not.
    #[test]
    fn test_minority_one_of_three() {
        let frames = vec![frame(0, true, 0.9), frame(50, false, 0.8), frame(99, false, 0.7)];
        assert!(!majority_is_deepfake(&frames));
    }

    /// Exactly half carries the vote (>= half).
    #[test]
    fn test_exact_half_carries() {
        let frames = vec![frame(0, true, 0.9), frame(99, false, 0.7)];
        assert!(majority_is_deepfake(&frames));
    }

    #[test]
    fn test_average_confidence() {
        let frames = vec![frame(0, true, 0.6), frame(50, false, 0.8), frame(99, false, 1.0)];
        assert!((average_confidence(&frames) - 0.8).abs() < 1e-12);
        assert_eq!(average_confidence(&[]), 0.0);
    }
}
