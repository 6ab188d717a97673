//! # Media Analysis Types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::backend::BackendId;

/// Authenticity verdict for a piece of media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeepfakeVerdict {
    /// No manipulation found
    Real,
    /// Manipulated or generated
    Fake,
    /// Analysis could not decide
    Uncertain,
}

impl DeepfakeVerdict {
    /// Returns the persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            DeepfakeVerdict::Real => "real",
            DeepfakeVerdict::Fake => "fake",
            DeepfakeVerdict::Uncertain => "uncertain",
        }
    }

    /// Normalize a provider-supplied verdict string; out-of-enum strings
    /// become `Uncertain`
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "real" => DeepfakeVerdict::Real,
            "fake" => DeepfakeVerdict::Fake,
            _ => DeepfakeVerdict::Uncertain,
        }
    }
}

impl fmt::Display for DeepfakeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a metadata finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
}

/// A finding from metadata inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataIssue {
    /// Finding kind, e.g. "missing_exif"
    #[serde(rename = "type")]
    pub kind: String,

    /// Human-readable description
    pub description: String,

    /// How strongly this suggests manipulation
    pub severity: IssueSeverity,
}

/// Result of analyzing one image (or one video frame)
///
/// `is_deepfake` and `verdict` are carried independently: providers
/// have been observed returning `uncertain` alongside a set flag, and
/// both observations are preserved as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAnalysisResult {
    /// The provider's boolean manipulation call
    pub is_deepfake: bool,

    /// Confidence, 0.0-1.0
    pub confidence: f64,

    /// The provider's verdict
    pub verdict: DeepfakeVerdict,

    /// Free-text reasoning
    pub reasoning: String,

    /// Visual artifacts the provider pointed at
    pub artifacts: Vec<String>,

    /// Findings from local metadata inspection
    pub metadata_issues: Vec<MetadataIssue>,

    /// Which backend produced this result
    pub backend: BackendId,
}

impl MediaAnalysisResult {
    /// The degraded result for a failed or unusable analysis call
    pub fn uncertain(backend: BackendId, error: impl fmt::Display) -> Self {
        Self {
            is_deepfake: false,
            confidence: 0.0,
            verdict: DeepfakeVerdict::Uncertain,
            reasoning: format!("Error during analysis: {}", error),
            artifacts: Vec::new(),
            metadata_issues: Vec::new(),
            backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_verdicts() {
        assert_eq!(DeepfakeVerdict::normalize("real"), DeepfakeVerdict::Real);
        assert_eq!(DeepfakeVerdict::normalize(" FAKE "), DeepfakeVerdict::Fake);
        assert_eq!(
            DeepfakeVerdict::normalize("synthetic"),
            DeepfakeVerdict::Uncertain
        );
    }

    #[test]
    fn test_uncertain_result_shape() {
        let result = MediaAnalysisResult::uncertain(BackendId::OpenAi, "timeout");
        assert!(!result.is_deepfake);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.verdict, DeepfakeVerdict::Uncertain);
        assert!(result.reasoning.contains("timeout"));
    }
}
