//! # Fact Checker
//!
//! Drives claim verification against the providers. A provider call or
//! an unusable reply degrades to an unverifiable result at this
//! boundary; nothing below it raises to the caller.

use serde::Deserialize;
use std::sync::Arc;

use crate::backend::{unwrap_fences, BackendId, GenerationBackend};
use crate::claims::ExtractedClaim;
use crate::observability::{Event, Logger};

use super::consensus::consensus;
use super::result::{Evidence, Verdict, VerificationResult};

/// Verifies claims using the two provider handles
pub struct FactChecker {
    primary: Arc<dyn GenerationBackend>,
    secondary: Arc<dyn GenerationBackend>,
    consensus_enabled: bool,
    urgency_threshold: f64,
}

impl FactChecker {
    /// Build a checker over the two provider handles.
    ///
    /// Consensus mode engages for claims whose urgency exceeds
    /// `urgency_threshold`, and only when `consensus_enabled` is set.
    pub fn new(
        primary: Arc<dyn GenerationBackend>,
        secondary: Arc<dyn GenerationBackend>,
        consensus_enabled: bool,
        urgency_threshold: f64,
    ) -> Self {
        Self {
            primary,
            secondary,
            consensus_enabled,
            urgency_threshold,
        }
    }

    /// Verify a claim.
    ///
    /// Returns `(primary_result, secondary_result)`. In consensus mode
    /// the primary result is the merged consensus and the secondary is
    /// the primary provider's own verdict; otherwise the secondary is
    /// `None`. Never fails: degraded calls surface as unverifiable
    /// results.
    pub async fn verify_claim(
        &self,
        claim: &ExtractedClaim,
        use_consensus: bool,
    ) -> (VerificationResult, Option<VerificationResult>) {
        let consensus_claim = use_consensus
            && self.consensus_enabled
            && claim.urgency_score > self.urgency_threshold;

        if consensus_claim {
            // Fan out to both providers, join before combining
            let (primary_result, secondary_result) = tokio::join!(
                self.verify_with(self.primary.as_ref(), claim),
                self.verify_with(self.secondary.as_ref(), claim),
            );

            let merged = consensus(&primary_result, &secondary_result);
            (merged, Some(primary_result))
        } else {
            (self.verify_with(self.primary.as_ref(), claim).await, None)
        }
    }

    /// Verify a claim against one provider, degrading any failure
    async fn verify_with(
        &self,
        backend: &dyn GenerationBackend,
        claim: &ExtractedClaim,
    ) -> VerificationResult {
        let prompt = verification_prompt(claim);

        let reply = match backend.generate(&prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[
                        ("backend", backend.id().as_str()),
                        ("operation", "verify"),
                        ("error", &error.to_string()),
                    ],
                );
                return VerificationResult::unverifiable(backend.id(), error);
            }
        };

        match serde_json::from_str::<VerificationReply>(unwrap_fences(&reply)) {
            Ok(parsed) => parsed.into_result(backend.id()),
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[
                        ("backend", backend.id().as_str()),
                        ("operation", "verify"),
                        ("error", &error.to_string()),
                    ],
                );
                VerificationResult::unverifiable(backend.id(), error)
            }
        }
    }
}

fn verification_prompt(claim: &ExtractedClaim) -> String {
    let entities = if claim.entities.is_empty() {
        "None".to_string()
    } else {
        claim.entities.join(", ")
    };

    format!(
        r#"You are an expert fact-checker verifying claims during global crises.

Analyze this claim and determine its veracity:

CLAIM: {claim}

Context:
- Crisis Type: {crisis_type}
- Source: {source}
- Entities: {entities}

Your task:
1. Assess if the claim is TRUE, FALSE, MIXED (partially true), or UNVERIFIABLE
2. Provide confidence score (0.0-1.0)
3. Explain your reasoning with specific evidence
4. Identify what sources would support or contradict this claim

Consider:
- Is this claim factually accurate?
- Are there credible sources that verify or contradict it?
- Is the claim taken out of context?
- Are there any logical fallacies or misleading elements?

Respond in JSON format:
{{
  "verdict": "true|false|mixed|unverifiable",
  "confidence": 0.85,
  "reasoning": "detailed explanation of your assessment",
  "supporting_evidence": ["evidence point 1", "evidence point 2"],
  "contradicting_evidence": ["contradiction 1", "contradiction 2"]
}}"#,
        claim = claim.text,
        crisis_type = claim.crisis_type,
        source = claim.source_title,
        entities = entities,
    )
}

/// Wire shape of a provider's verification reply.
///
/// Every field has an explicit default so a sparse-but-valid reply
/// still parses; verdict strings are normalized to the closed enum.
#[derive(Debug, Deserialize)]
struct VerificationReply {
    #[serde(default)]
    verdict: String,

    #[serde(default)]
    confidence: f64,

    #[serde(default = "default_reasoning")]
    reasoning: String,

    #[serde(default)]
    supporting_evidence: Vec<String>,

    #[serde(default)]
    contradicting_evidence: Vec<String>,
}

fn default_reasoning() -> String {
    "No reasoning provided".to_string()
}

impl VerificationReply {
    fn into_result(self, backend: BackendId) -> VerificationResult {
        VerificationResult {
            verdict: Verdict::normalize(&self.verdict),
            confidence: self.confidence.clamp(0.0, 1.0),
            reasoning: self.reasoning,
            supporting: self
                .supporting_evidence
                .into_iter()
                .map(Evidence::ai_analysis)
                .collect(),
            contradicting: self
                .contradicting_evidence
                .into_iter()
                .map(Evidence::ai_analysis)
                .collect(),
            backend,
        }
    }
}
