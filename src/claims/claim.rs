//! # Claim Records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::verify::Verdict;

/// Where a claim stands in the verification flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Extracted, not yet verified
    Pending,
    /// Verified true
    True,
    /// Verified false
    False,
    /// Partially true
    Mixed,
    /// Could not be verified
    Unverifiable,
}

impl VerificationStatus {
    /// Returns the persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::True => "true",
            VerificationStatus::False => "false",
            VerificationStatus::Mixed => "mixed",
            VerificationStatus::Unverifiable => "unverifiable",
        }
    }
}

impl From<Verdict> for VerificationStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::True => VerificationStatus::True,
            Verdict::False => VerificationStatus::False,
            Verdict::Mixed => VerificationStatus::Mixed,
            Verdict::Unverifiable => VerificationStatus::Unverifiable,
        }
    }
}

/// A claim as produced by extraction, before it has an identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedClaim {
    /// The exact claim statement
    pub text: String,

    /// URL of the content the claim came from
    pub source_url: String,

    /// Title of the content the claim came from
    pub source_title: String,

    /// Crisis category: "pandemic", "conflict", "climate", "disaster", "other", ...
    /// Open string; upstream models coin new categories
    pub crisis_type: String,

    /// How urgent verification is, 0.0-1.0
    pub urgency_score: f64,

    /// Named entities mentioned (people, places, organizations)
    pub entities: Vec<String>,

    /// Key topics/keywords
    pub topics: Vec<String>,
}

impl ExtractedClaim {
    /// Wrap user-submitted text as a claim to verify directly
    pub fn user_submitted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_url: "user_submitted".to_string(),
            source_title: "User Submitted Claim".to_string(),
            crisis_type: "general".to_string(),
            urgency_score: 0.7,
            entities: Vec::new(),
            topics: Vec::new(),
        }
    }

    /// Lowercased, trimmed text used for deduplication
    pub fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// A tracked claim with verification state
///
/// Created pending by extraction, mutated exactly once by verification,
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Stable identity
    pub id: Uuid,

    pub text: String,
    pub source_url: String,
    pub source_title: String,
    pub crisis_type: String,
    pub urgency_score: f64,
    pub entities: Vec<String>,
    pub topics: Vec<String>,

    /// Current verification status
    pub verification_status: VerificationStatus,

    /// Credibility score, 0.0-1.0
    pub credibility_score: f64,

    /// When extraction produced the claim
    pub detected_at: DateTime<Utc>,

    /// When verification concluded
    pub verified_at: Option<DateTime<Utc>>,
}

impl Claim {
    /// Promote an extracted claim to a tracked, pending claim
    pub fn from_extracted(extracted: ExtractedClaim) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: extracted.text,
            source_url: extracted.source_url,
            source_title: extracted.source_title,
            crisis_type: extracted.crisis_type,
            urgency_score: extracted.urgency_score,
            entities: extracted.entities,
            topics: extracted.topics,
            verification_status: VerificationStatus::Pending,
            credibility_score: 0.0,
            detected_at: Utc::now(),
            verified_at: None,
        }
    }

    /// Record the verification outcome. Called once per claim.
    pub fn mark_verified(&mut self, verdict: Verdict, credibility_score: f64) {
        self.verification_status = verdict.into();
        self.credibility_score = credibility_score;
        self.verified_at = Some(Utc::now());
    }
}
