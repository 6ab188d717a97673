//! # Explanation Generator
//!
//! Renders a fact-check result into audience-tailored prose via the
//! primary provider. Any provider or parse failure falls back to a
//! deterministic explanation built from the verdict alone.

use serde::Deserialize;
use std::sync::Arc;

use crate::backend::{unwrap_fences, GenerationBackend};
use crate::claims::ExtractedClaim;
use crate::observability::{Event, Logger};
use crate::verify::VerificationResult;

use super::explanation::{AudienceTier, Citation, Explanation};

/// At most this many supporting evidence entries become citations
const MAX_CITATIONS: usize = 3;

/// Generates context-aware explanations for verified claims
pub struct ExplanationGenerator {
    backend: Arc<dyn GenerationBackend>,
}

impl ExplanationGenerator {
    /// Build a generator over the provider used for prose rendering
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Render an explanation for the given audience tier.
    ///
    /// Never fails: provider and parse failures yield the deterministic
    /// fallback explanation with no further backend calls.
    pub async fn generate(
        &self,
        claim: &ExtractedClaim,
        verification: &VerificationResult,
        audience: AudienceTier,
    ) -> Explanation {
        let prompt = explanation_prompt(claim, verification, audience);

        let reply = match self.backend.generate(&prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[
                        ("backend", self.backend.id().as_str()),
                        ("operation", "explain"),
                        ("error", &error.to_string()),
                    ],
                );
                return Explanation::fallback(verification, audience);
            }
        };

        match serde_json::from_str::<ExplanationReply>(unwrap_fences(&reply)) {
            Ok(parsed) => parsed.into_explanation(verification, audience),
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[
                        ("backend", self.backend.id().as_str()),
                        ("operation", "explain"),
                        ("error", &error.to_string()),
                    ],
                );
                Explanation::fallback(verification, audience)
            }
        }
    }

    /// Render all three audience tiers sequentially
    pub async fn generate_all_tiers(
        &self,
        claim: &ExtractedClaim,
        verification: &VerificationResult,
    ) -> Vec<Explanation> {
        let mut explanations = Vec::with_capacity(3);
        for tier in AudienceTier::all() {
            explanations.push(self.generate(claim, verification, tier).await);
        }
        explanations
    }
}

fn explanation_prompt(
    claim: &ExtractedClaim,
    verification: &VerificationResult,
    audience: AudienceTier,
) -> String {
    let verdict = verification.verdict.as_str().to_uppercase();
    let confidence = format!("{:.0}%", verification.confidence * 100.0);
    let entities = if claim.entities.is_empty() {
        "None".to_string()
    } else {
        claim.entities.join(", ")
    };

    match audience {
        AudienceTier::Simple => format!(
            r#"You are explaining a fact-check result to a general audience with simple, clear language.

CLAIM: {claim}
VERDICT: {verdict}
CONFIDENCE: {confidence}
REASONING: {reasoning}

Create an explanation that:
1. Uses simple, everyday language (8th grade reading level)
2. Avoids jargon and technical terms
3. Provides clear, actionable guidance
4. Is empathetic and non-judgmental

Respond in JSON format:
{{
  "title": "Clear, engaging title",
  "summary": "2-3 sentence summary of the verdict",
  "detailed_explanation": "Full explanation in simple terms",
  "what_to_do": "Practical advice on what to do with this information",
  "what_to_avoid": "What NOT to do or believe"
}}"#,
            claim = claim.text,
            verdict = verdict,
            confidence = confidence,
            reasoning = verification.reasoning,
        ),
        AudienceTier::General => format!(
            r#"You are explaining a fact-check result to an informed general audience.

CLAIM: {claim}
VERDICT: {verdict}
CONFIDENCE: {confidence}
REASONING: {reasoning}
CRISIS CONTEXT: {crisis_type}

Create an explanation that:
1. Balances accessibility with detail
2. Provides context about the crisis situation
3. Cites evidence and reasoning
4. Offers actionable guidance

Respond in JSON format:
{{
  "title": "Informative title",
  "summary": "3-4 sentence summary with key context",
  "detailed_explanation": "Comprehensive explanation with evidence",
  "what_to_do": "Recommended actions based on this information",
  "what_to_avoid": "Common misconceptions or harmful actions to avoid"
}}"#,
            claim = claim.text,
            verdict = verdict,
            confidence = confidence,
            reasoning = verification.reasoning,
            crisis_type = claim.crisis_type,
        ),
        AudienceTier::Expert => format!(
            r#"You are explaining a fact-check result to experts, researchers, or policymakers.

CLAIM: {claim}
VERDICT: {verdict}
CONFIDENCE: {confidence}
REASONING: {reasoning}
CRISIS CONTEXT: {crisis_type}
ENTITIES: {entities}

Create an explanation that:
1. Provides technical depth and nuance
2. Discusses methodology and confidence levels
3. References specific evidence and sources
4. Addresses implications and limitations

Respond in JSON format:
{{
  "title": "Technical title",
  "summary": "Concise technical summary",
  "detailed_explanation": "In-depth analysis with methodological details",
  "what_to_do": "Expert recommendations and further research needs",
  "what_to_avoid": "Analytical pitfalls and limitations to consider"
}}"#,
            claim = claim.text,
            verdict = verdict,
            confidence = confidence,
            reasoning = verification.reasoning,
            crisis_type = claim.crisis_type,
            entities = entities,
        ),
    }
}

/// Wire shape of a provider's explanation reply
#[derive(Debug, Deserialize)]
struct ExplanationReply {
    #[serde(default = "default_title")]
    title: String,

    #[serde(default)]
    summary: String,

    #[serde(default)]
    detailed_explanation: String,

    #[serde(default)]
    what_to_do: String,

    #[serde(default)]
    what_to_avoid: String,
}

fn default_title() -> String {
    "Fact Check Result".to_string()
}

impl ExplanationReply {
    fn into_explanation(
        self,
        verification: &VerificationResult,
        audience: AudienceTier,
    ) -> Explanation {
        let citations = verification
            .supporting
            .iter()
            .take(MAX_CITATIONS)
            .map(|evidence| Citation {
                text: evidence.text.clone(),
                source: evidence.source.clone(),
                kind: "supporting".to_string(),
            })
            .collect();

        Explanation {
            title: self.title,
            summary: self.summary,
            detailed_explanation: self.detailed_explanation,
            citations,
            what_to_do: self.what_to_do,
            what_to_avoid: self.what_to_avoid,
            audience,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendId;
    use crate::verify::{Evidence, Verdict};

    fn verification_with_evidence(count: usize) -> VerificationResult {
        VerificationResult {
            verdict: Verdict::False,
            confidence: 0.9,
            reasoning: "reasoning".to_string(),
            supporting: (0..count)
                .map(|i| Evidence::ai_analysis(format!("evidence {}", i)))
                .collect(),
            contradicting: Vec::new(),
            backend: BackendId::Gemini,
        }
    }

    #[test]
    fn test_citations_truncate_to_three_supporting() {
        let verification = verification_with_evidence(5);
        let reply: ExplanationReply = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        let explanation = reply.into_explanation(&verification, AudienceTier::General);

        assert_eq!(explanation.citations.len(), 3);
        assert!(explanation
            .citations
            .iter()
            .all(|citation| citation.kind == "supporting"));
    }

    #[test]
    fn test_reply_defaults_fill_absent_fields() {
        let verification = verification_with_evidence(0);
        let reply: ExplanationReply = serde_json::from_str("{}").unwrap();
        let explanation = reply.into_explanation(&verification, AudienceTier::Expert);

        assert_eq!(explanation.title, "Fact Check Result");
        assert!(explanation.summary.is_empty());
        assert_eq!(explanation.audience, AudienceTier::Expert);
    }

    #[test]
    fn test_prompts_differ_by_tier() {
        let claim = ExtractedClaim::user_submitted("claim");
        let verification = verification_with_evidence(0);

        let simple = explanation_prompt(&claim, &verification, AudienceTier::Simple);
        let general = explanation_prompt(&claim, &verification, AudienceTier::General);
        let expert = explanation_prompt(&claim, &verification, AudienceTier::Expert);

        assert!(simple.contains("8th grade"));
        assert!(general.contains("CRISIS CONTEXT"));
        assert!(expert.contains("ENTITIES"));
        assert_ne!(simple, general);
        assert_ne!(general, expert);
    }
}
