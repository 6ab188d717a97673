//! # Explanation Types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::verify::VerificationResult;

/// Which audience an explanation is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceTier {
    /// Everyday language, 8th grade reading level
    Simple,
    /// Informed general audience
    General,
    /// Experts, researchers, policymakers
    Expert,
}

impl AudienceTier {
    /// Returns the persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            AudienceTier::Simple => "simple",
            AudienceTier::General => "general",
            AudienceTier::Expert => "expert",
        }
    }

    /// Parse a tier name; unrecognized names fall back to `General`
    pub fn parse_or_general(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "simple" => AudienceTier::Simple,
            "expert" => AudienceTier::Expert,
            _ => AudienceTier::General,
        }
    }

    /// All tiers, in rendering order
    pub fn all() -> [AudienceTier; 3] {
        [
            AudienceTier::Simple,
            AudienceTier::General,
            AudienceTier::Expert,
        ]
    }
}

impl fmt::Display for AudienceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source citation attached to an explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Cited evidence text
    pub text: String,

    /// Provenance label
    pub source: String,

    /// Citation role; currently always "supporting"
    #[serde(rename = "type")]
    pub kind: String,
}

/// An audience-tailored explanation of a fact-check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Headline
    pub title: String,

    /// Short summary of the verdict
    pub summary: String,

    /// Full explanation body
    pub detailed_explanation: String,

    /// Citations drawn from the verification's supporting evidence
    pub citations: Vec<Citation>,

    /// Practical guidance: what to do with this information
    pub what_to_do: String,

    /// What NOT to do or believe
    pub what_to_avoid: String,

    /// Which audience this was written for
    pub audience: AudienceTier,
}

impl Explanation {
    /// Deterministic fallback built straight from the verification,
    /// used when the provider cannot produce an explanation.
    pub fn fallback(verification: &VerificationResult, audience: AudienceTier) -> Self {
        Self {
            title: format!(
                "Claim Verification: {}",
                verification.verdict.as_str().to_uppercase()
            ),
            summary: format!(
                "This claim has been assessed as {} with {:.0}% confidence.",
                verification.verdict,
                verification.confidence * 100.0
            ),
            detailed_explanation: verification.reasoning.clone(),
            citations: Vec::new(),
            what_to_do: "Verify information from multiple credible sources before sharing."
                .to_string(),
            what_to_avoid: "Avoid sharing unverified claims during crisis situations.".to_string(),
            audience,
        }
    }
}
