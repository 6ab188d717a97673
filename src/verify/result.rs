//! # Verification Result Types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::backend::BackendId;

/// Fact-check verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    True,
    False,
    /// Partially true
    Mixed,
    Unverifiable,
}

impl Verdict {
    /// Returns the persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::Mixed => "mixed",
            Verdict::Unverifiable => "unverifiable",
        }
    }

    /// Normalize a provider-supplied verdict string.
    ///
    /// Out-of-enum strings become `Unverifiable`; the closed enumeration
    /// is enforced here, at the parse boundary, and nowhere else.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "true" => Verdict::True,
            "false" => Verdict::False,
            "mixed" => Verdict::Mixed,
            _ => Verdict::Unverifiable,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One piece of evidence with its provenance label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Evidence text
    pub text: String,

    /// Where it came from
    pub source: String,
}

impl Evidence {
    /// Evidence synthesized by a provider rather than retrieved
    pub fn ai_analysis(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: "AI Analysis".to_string(),
        }
    }
}

/// A fact-check verification result
///
/// Immutable once produced. A claim may carry several: a primary, an
/// optional secondary, and a consensus merge of the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The verdict
    pub verdict: Verdict,

    /// Confidence, 0.0-1.0
    pub confidence: f64,

    /// Free-text reasoning behind the verdict
    pub reasoning: String,

    /// Evidence supporting the claim
    pub supporting: Vec<Evidence>,

    /// Evidence contradicting the claim
    pub contradicting: Vec<Evidence>,

    /// Which backend produced this result
    pub backend: BackendId,
}

impl VerificationResult {
    /// The degraded result used whenever a backend call or its reply
    /// cannot be used: unverifiable at zero confidence, with the
    /// triggering error in the reasoning for diagnosability.
    pub fn unverifiable(backend: BackendId, error: impl fmt::Display) -> Self {
        Self {
            verdict: Verdict::Unverifiable,
            confidence: 0.0,
            reasoning: format!("Error during verification: {}", error),
            supporting: Vec::new(),
            contradicting: Vec::new(),
            backend,
        }
    }

    /// Number of supporting evidence entries
    pub fn supporting_count(&self) -> usize {
        self.supporting.len()
    }

    /// Number of contradicting evidence entries
    pub fn contradicting_count(&self) -> usize {
        self.contradicting.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_known_verdicts() {
        assert_eq!(Verdict::normalize("true"), Verdict::True);
        assert_eq!(Verdict::normalize(" FALSE "), Verdict::False);
        assert_eq!(Verdict::normalize("Mixed"), Verdict::Mixed);
        assert_eq!(Verdict::normalize("unverifiable"), Verdict::Unverifiable);
    }

    #[test]
    fn test_normalize_rejects_out_of_enum_strings() {
        assert_eq!(Verdict::normalize("mostly-true"), Verdict::Unverifiable);
        assert_eq!(Verdict::normalize(""), Verdict::Unverifiable);
        assert_eq!(Verdict::normalize("uncertain"), Verdict::Unverifiable);
    }

    #[test]
    fn test_unverifiable_result_carries_error_text() {
        let result = VerificationResult::unverifiable(BackendId::Gemini, "connection refused");
        assert_eq!(result.verdict, Verdict::Unverifiable);
        assert_eq!(result.confidence, 0.0);
        assert!(result.reasoning.contains("connection refused"));
        assert_eq!(result.backend, BackendId::Gemini);
    }
}
