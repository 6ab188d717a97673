//! # Image Authenticity Analysis
//!
//! Sends image bytes to the vision endpoints with a forensic
//! instruction prompt and parses the structured verdict. Like claim
//! verification, nothing here raises: a dead provider or an unusable
//! reply degrades to an uncertain result.

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::backend::{unwrap_fences, BackendId, GenerationBackend, ImagePayload};
use crate::observability::{Event, Logger};

use super::analysis::{DeepfakeVerdict, MediaAnalysisResult, MetadataIssue};
use super::consensus::media_consensus;
use super::metadata::inspect_metadata;

const FORENSIC_PROMPT: &str = r#"You are a forensic image analyst. Your ONLY job is to find FLAWS in this image. Do not praise its quality.

**STEP-BY-STEP ANALYSIS REQUIRED**:

1. **HANDS & FINGERS CHECK (CRITICAL)**:
   - Locate every hand in the image.
   - COUNT the fingers on each hand.
   - Check for malformed joints, merging fingers, or impossible grips.
   - **IF YOU SEE >5 FINGERS, <5 FINGERS (without explanation), OR MERGED FINGERS -> MARK AS FAKE IMMEDIATELY.**

2. **EYES & FACE CHECK**:
   - Zoom in on pupils. Are they perfectly circular?
   - Check reflections in eyes. Do they match?
   - Check teeth. Are they individual or a solid white bar?

3. **PHYSICS CHECK**:
   - Shadows: Do they fall in the correct direction?
   - Reflections: Do they match the object?

**VERDICT RULES**:
- Any anatomical error (6 fingers, bad teeth) = **FAKE** (Confidence 1.0).
- Any strong physics error = **FAKE**.
- Perfect lighting but "glossy/plastic" skin = **UNCERTAIN** or **FAKE**.
- Only mark **REAL** if you can find NO flaws after deep scrutiny.

**RESPONSE FORMAT**:
{
  "verdict": "fake" | "real" | "uncertain",
  "confidence": <float 0.0-1.0>,
  "is_deepfake": <boolean>,
  "reasoning": "I counted X fingers on the left hand...",
  "artifacts_detected": []
}"#;

/// Analyzes still images (and video frames) for manipulation
pub struct ImageAnalyzer {
    primary: Arc<dyn GenerationBackend>,
    secondary: Arc<dyn GenerationBackend>,
    consensus_enabled: bool,
}

impl ImageAnalyzer {
    /// Build an analyzer over the two vision-capable provider handles
    pub fn new(
        primary: Arc<dyn GenerationBackend>,
        secondary: Arc<dyn GenerationBackend>,
        consensus_enabled: bool,
    ) -> Self {
        Self {
            primary,
            secondary,
            consensus_enabled,
        }
    }

    /// Analyze an image file.
    ///
    /// Returns `(primary_result, secondary_result)`; in consensus mode
    /// the primary result is the merged consensus and the secondary is
    /// the primary provider's own result. Metadata findings attach to
    /// every per-provider result before merging. Never fails.
    pub async fn analyze_image(
        &self,
        path: &Path,
        use_consensus: bool,
    ) -> (MediaAnalysisResult, Option<MediaAnalysisResult>) {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[("operation", "analyze_image"), ("error", &error.to_string())],
                );
                return (
                    MediaAnalysisResult::uncertain(self.primary.id(), error),
                    None,
                );
            }
        };

        let metadata_issues = inspect_metadata(&bytes);
        let payload = ImagePayload {
            mime_type: mime_for_path(path).to_string(),
            data: bytes,
        };

        if use_consensus && self.consensus_enabled {
            let (mut primary_result, mut secondary_result) = tokio::join!(
                self.analyze_with(self.primary.as_ref(), &payload),
                self.analyze_with(self.secondary.as_ref(), &payload),
            );
            primary_result.metadata_issues = metadata_issues.clone();
            secondary_result.metadata_issues = metadata_issues;

            let merged = media_consensus(&primary_result, &secondary_result);
            (merged, Some(primary_result))
        } else {
            let mut result = self.analyze_with(self.primary.as_ref(), &payload).await;
            result.metadata_issues = metadata_issues;
            (result, None)
        }
    }

    /// Analyze one already-extracted video frame, primary provider
    /// only: per-frame consensus is skipped to bound cost.
    pub async fn analyze_frame(&self, jpeg: Vec<u8>) -> MediaAnalysisResult {
        let payload = ImagePayload::jpeg(jpeg);
        self.analyze_with(self.primary.as_ref(), &payload).await
    }

    async fn analyze_with(
        &self,
        backend: &dyn GenerationBackend,
        payload: &ImagePayload,
    ) -> MediaAnalysisResult {
        let reply = match backend.generate_vision(FORENSIC_PROMPT, payload).await {
            Ok(reply) => reply,
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[
                        ("backend", backend.id().as_str()),
                        ("operation", "analyze_image"),
                        ("error", &error.to_string()),
                    ],
                );
                return MediaAnalysisResult::uncertain(backend.id(), error);
            }
        };

        match serde_json::from_str::<ForensicReply>(unwrap_fences(&reply)) {
            Ok(parsed) => parsed.into_result(backend.id()),
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[
                        ("backend", backend.id().as_str()),
                        ("operation", "analyze_image"),
                        ("error", &error.to_string()),
                    ],
                );
                MediaAnalysisResult::uncertain(backend.id(), error)
            }
        }
    }
}

/// MIME type by file extension; defaults to JPEG
fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Wire shape of a vision provider's forensic reply
#[derive(Debug, Deserialize)]
struct ForensicReply {
    #[serde(default)]
    verdict: String,

    #[serde(default = "default_confidence")]
    confidence: f64,

    #[serde(default)]
    is_deepfake: bool,

    #[serde(default)]
    reasoning: String,

    #[serde(default)]
    artifacts_detected: Vec<String>,
}

fn default_confidence() -> f64 {
    0.5
}

impl ForensicReply {
    fn into_result(self, backend: BackendId) -> MediaAnalysisResult {
        MediaAnalysisResult {
            // Flag and verdict are taken independently; providers have
            // been seen disagreeing with themselves
            is_deepfake: self.is_deepfake,
            confidence: self.confidence.clamp(0.0, 1.0),
            verdict: DeepfakeVerdict::normalize(&self.verdict),
            reasoning: self.reasoning,
            artifacts: self.artifacts_detected,
            metadata_issues: Vec::<MetadataIssue>::new(),
            backend,
        }
    }
}
