//! # Media Consensus
//!
//! Same verdict arithmetic as claim consensus, plus merging of both
//! providers' artifact and metadata findings.

use crate::backend::BackendId;
use crate::verify::DISAGREEMENT_PENALTY;

use super::analysis::MediaAnalysisResult;

/// Merge two media analysis results into a consensus result.
///
/// Agreement takes the shared verdict at the higher confidence and the
/// primary's `is_deepfake` flag; disagreement takes the
/// higher-confidence side's verdict and flag, discounted by the shared
/// disagreement penalty, with the primary winning exact ties. Artifact
/// and metadata lists are concatenated from both inputs.
pub fn media_consensus(a: &MediaAnalysisResult, b: &MediaAnalysisResult) -> MediaAnalysisResult {
    let (verdict, is_deepfake, confidence, reasoning) = if a.verdict == b.verdict {
        (
            a.verdict,
            a.is_deepfake,
            a.confidence.max(b.confidence),
            format!(
                "Both models agree: {}\n\n{}: {}\n\n{}: {}",
                a.verdict.as_str().to_uppercase(),
                a.backend,
                a.reasoning,
                b.backend,
                b.reasoning
            ),
        )
    } else {
        let winner = if b.confidence > a.confidence { b } else { a };
        (
            winner.verdict,
            winner.is_deepfake,
            winner.confidence * DISAGREEMENT_PENALTY,
            format!(
                "Models disagree ({}: {}, {}: {})\n\n{}: {}\n\n{}: {}",
                a.backend, a.verdict, b.backend, b.verdict, a.backend, a.reasoning, b.backend,
                b.reasoning
            ),
        )
    };

    let mut artifacts = a.artifacts.clone();
    artifacts.extend(b.artifacts.iter().cloned());
    let mut metadata_issues = a.metadata_issues.clone();
    metadata_issues.extend(b.metadata_issues.iter().cloned());

    MediaAnalysisResult {
        is_deepfake,
        confidence,
        verdict,
        reasoning,
        artifacts,
        metadata_issues,
        backend: BackendId::Consensus,
    }
}
