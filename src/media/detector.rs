//! # Deepfake Detector
//!
//! Front door for media forensics: image analysis with optional
//! dual-provider consensus, and video analysis via frame sampling,
//! per-frame voting, and the temporal consistency check.

use std::path::Path;
use std::sync::Arc;

use futures_util::future::join_all;

use crate::backend::GenerationBackend;
use crate::observability::{Event, Logger};

use super::analysis::{DeepfakeVerdict, MediaAnalysisResult};
use super::errors::{MediaError, MediaResult};
use super::image::ImageAnalyzer;
use super::source::{FfmpegVideo, VideoSource};
use super::temporal::{check_temporal_consistency, TemporalAnalysis, MAX_TEMPORAL_FRAMES};
use super::video::{
    average_confidence, frame_indices, majority_is_deepfake, FrameResult, VideoReport,
    DEFAULT_VIDEO_FRAMES,
};

/// Coordinates all media detection methods
pub struct DeepfakeDetector {
    image: ImageAnalyzer,
}

impl DeepfakeDetector {
    /// Build a detector over the two vision-capable provider handles
    pub fn new(
        primary: Arc<dyn GenerationBackend>,
        secondary: Arc<dyn GenerationBackend>,
        consensus_enabled: bool,
    ) -> Self {
        Self {
            image: ImageAnalyzer::new(primary, secondary, consensus_enabled),
        }
    }

    /// Analyze an image for manipulation signs.
    ///
    /// Returns `(consensus_or_primary, primary_if_consensus)`; see
    /// [`ImageAnalyzer::analyze_image`]. Never fails.
    pub async fn analyze_image(
        &self,
        path: &Path,
        use_consensus: bool,
    ) -> (MediaAnalysisResult, Option<MediaAnalysisResult>) {
        self.image.analyze_image(path, use_consensus).await
    }

    /// Analyze a video file on disk via ffmpeg
    pub async fn analyze_video(&self, path: &Path) -> MediaResult<VideoReport> {
        let source = FfmpegVideo::new(path);
        self.analyze_video_source(&source).await
    }

    /// Analyze a video through any frame source.
    ///
    /// Evenly spaced frames get single-provider image analysis (no
    /// per-frame consensus, to bound cost); the verdict is a majority
    /// vote over the frames with arithmetically averaged confidence.
    pub async fn analyze_video_source(&self, source: &dyn VideoSource) -> MediaResult<VideoReport> {
        let info = source.probe().await?;
        if info.frame_count == 0 {
            return Err(MediaError::FrameExtraction(
                "video contains no frames".to_string(),
            ));
        }

        // Sample frames; a frame that fails to decode is skipped
        let mut sampled = Vec::new();
        for index in frame_indices(info.frame_count, DEFAULT_VIDEO_FRAMES) {
            match source.jpeg_frame(index).await {
                Ok(jpeg) => sampled.push((index, jpeg)),
                Err(error) => Logger::warn(
                    "FRAME_SKIPPED",
                    &[("frame", &index.to_string()), ("error", &error.to_string())],
                ),
            }
        }
        if sampled.is_empty() {
            return Err(MediaError::FrameExtraction(
                "failed to extract any frames".to_string(),
            ));
        }

        let analyses = join_all(
            sampled
                .iter()
                .map(|(_, jpeg)| self.image.analyze_frame(jpeg.clone())),
        )
        .await;

        let frame_analysis: Vec<FrameResult> = sampled
            .iter()
            .zip(analyses)
            .map(|((index, _), result)| FrameResult {
                index: *index,
                is_deepfake: result.is_deepfake,
                confidence: result.confidence,
                verdict: result.verdict,
            })
            .collect();

        let temporal_analysis = match source.gray_frames(MAX_TEMPORAL_FRAMES).await {
            Ok(frames) => check_temporal_consistency(&frames, info.fps),
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[("operation", "temporal_check"), ("error", &error.to_string())],
                );
                TemporalAnalysis::empty(info.fps)
            }
        };

        let is_deepfake = majority_is_deepfake(&frame_analysis);
        let confidence = average_confidence(&frame_analysis);
        let frames_analyzed = frame_analysis.len();

        Ok(VideoReport {
            is_deepfake,
            confidence,
            verdict: if is_deepfake {
                DeepfakeVerdict::Fake
            } else {
                DeepfakeVerdict::Real
            },
            frame_analysis,
            temporal_analysis,
            frames_analyzed,
        })
    }
}
