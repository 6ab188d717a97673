//! # Media Forensics
//!
//! Deepfake detection for uploaded images and video: vision-provider
//! analysis with optional dual-provider consensus, frame sampling and
//! majority voting for clips, temporal consistency checks, and the
//! background task registry that hosts polls for status.

pub mod analysis;
pub mod consensus;
pub mod detector;
pub mod errors;
pub mod image;
pub mod metadata;
pub mod record;
pub mod source;
pub mod task;
pub mod temporal;
pub mod video;

pub use analysis::{DeepfakeVerdict, IssueSeverity, MediaAnalysisResult, MetadataIssue};
pub use consensus::media_consensus;
pub use detector::DeepfakeDetector;
pub use errors::{MediaError, MediaResult};
pub use image::ImageAnalyzer;
pub use metadata::inspect_metadata;
pub use record::{AnalysisOutcome, AnalysisStatus, MediaKind, MediaRecord};
pub use source::{FfmpegVideo, GrayFrame, VideoInfo, VideoSource, GRAY_DIM};
pub use task::AnalysisRegistry;
pub use temporal::{check_temporal_consistency, Inconsistency, TemporalAnalysis};
pub use video::{frame_indices, FrameResult, VideoReport, DEFAULT_VIDEO_FRAMES};
