//! # Consensus Policy
//!
//! Pure, total combination of two verification results. No partial
//! failure states: any two well-formed inputs produce a well-formed
//! consensus.

use crate::backend::BackendId;

use super::result::VerificationResult;

/// Confidence multiplier applied when the two providers disagree
pub const DISAGREEMENT_PENALTY: f64 = 0.8;

/// Merge two verification results into a consensus result.
///
/// - Same verdict: that verdict at the higher of the two confidences.
/// - Different verdicts: the higher-confidence verdict, discounted by
///   [`DISAGREEMENT_PENALTY`]. On an exact confidence tie the first
///   argument (the primary backend) wins.
///
/// Evidence lists are concatenated from both inputs without
/// deduplication; the reasoning labels each source's contribution.
pub fn consensus(a: &VerificationResult, b: &VerificationResult) -> VerificationResult {
    let (verdict, confidence, reasoning) = if a.verdict == b.verdict {
        (
            a.verdict,
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
        // Tie keeps the primary: only a strictly higher confidence flips
        let winner = if b.confidence > a.confidence { b } else { a };
        (
            winner.verdict,
            winner.confidence * DISAGREEMENT_PENALTY,
            format!(
                "Models disagree ({}: {}, {}: {})\n\n{}: {}\n\n{}: {}",
                a.backend, a.verdict, b.backend, b.verdict, a.backend, a.reasoning, b.backend,
                b.reasoning
            ),
        )
    };

    let mut supporting = a.supporting.clone();
    supporting.extend(b.supporting.iter().cloned());
    let mut contradicting = a.contradicting.clone();
    contradicting.extend(b.contradicting.iter().cloned());

    VerificationResult {
        verdict,
        confidence,
        reasoning,
        supporting,
        contradicting,
        backend: BackendId::Consensus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::result::{Evidence, Verdict};

    fn result(backend: BackendId, verdict: Verdict, confidence: f64) -> VerificationResult {
        VerificationResult {
            verdict,
            confidence,
            reasoning: format!("{} reasoning", backend),
            supporting: vec![Evidence::ai_analysis(format!("{} support", backend))],
            contradicting: Vec::new(),
            backend,
        }
    }

    /// Agreement takes the higher confidence and the shared verdict.
    #[test]
    fn test_agreement_takes_max_confidence() {
        let a = result(BackendId::Gemini, Verdict::True, 0.7);
        let b = result(BackendId::OpenAi, Verdict::True, 0.9);
        let merged = consensus(&a, &b);

        assert_eq!(merged.verdict, Verdict::True);
        assert_eq!(merged.confidence, 0.9);
        assert_eq!(merged.backend, BackendId::Consensus);
        assert!(merged.reasoning.contains("Both models agree"));
    }

    /// Disagreement keeps the stronger verdict at 0.8x its confidence.
    #[test]
    fn test_disagreement_discounts_winner() {
        let a = result(BackendId::Gemini, Verdict::True, 0.6);
        let b = result(BackendId::OpenAi, Verdict::False, 0.9);
        let merged = consensus(&a, &b);

        assert_eq!(merged.verdict, Verdict::False);
        assert!((merged.confidence - 0.9 * DISAGREEMENT_PENALTY).abs() < 1e-12);
        assert!(merged.reasoning.contains("Models disagree"));
    }

    /// An exact confidence tie resolves to the first (primary) argument.
    #[test]
    fn test_tie_prefers_primary() {
        let a = result(BackendId::Gemini, Verdict::Mixed, 0.8);
        let b = result(BackendId::OpenAi, Verdict::False, 0.8);
        let merged = consensus(&a, &b);

        assert_eq!(merged.verdict, Verdict::Mixed);
        assert!((merged.confidence - 0.8 * DISAGREEMENT_PENALTY).abs() < 1e-12);
    }

    /// Evidence from both inputs is concatenated, not deduplicated.
    #[test]
    fn test_evidence_is_concatenated() {
        let a = result(BackendId::Gemini, Verdict::True, 0.7);
        let b = result(BackendId::OpenAi, Verdict::True, 0.7);
        let merged = consensus(&a, &b);

        assert_eq!(merged.supporting.len(), 2);
        assert_eq!(merged.supporting[0].text, "gemini support");
        assert_eq!(merged.supporting[1].text, "openai support");
    }
}
