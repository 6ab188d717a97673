//! # Credibility Scoring
//!
//! Collapses a verification result into a single 0-1 number combining
//! verdict, confidence, and evidence balance. Pure and deterministic.

use super::result::{Verdict, VerificationResult};

/// Compute the credibility score for a verification result.
///
/// Base score by verdict (true 0.9, false 0.1, mixed 0.5, unverifiable
/// 0.3), scaled by confidence; when any evidence exists the scaled score
/// is averaged with the supporting-evidence ratio. Rounded to two
/// decimal places.
pub fn credibility_score(result: &VerificationResult) -> f64 {
    let base = match result.verdict {
        Verdict::True => 0.9,
        Verdict::False => 0.1,
        Verdict::Mixed => 0.5,
        Verdict::Unverifiable => 0.3,
    };

    let mut credibility = base * result.confidence;

    let supporting = result.supporting_count();
    let contradicting = result.contradicting_count();
    if supporting + contradicting > 0 {
        let evidence_ratio = supporting as f64 / (supporting + contradicting) as f64;
        credibility = (credibility + evidence_ratio) / 2.0;
    }

    (credibility * 100.0).round() / 100.0
}
