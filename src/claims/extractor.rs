//! # Claim Extraction
//!
//! Turns raw content items into verifiable claims by prompting a
//! provider for structured output. Extraction never fails a batch: a
//! bad reply or a dead backend yields zero claims for that item.

use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::backend::{unwrap_fences, GenerationBackend};
use crate::content::ContentItem;
use crate::observability::{Event, Logger};

use super::claim::ExtractedClaim;

/// Content body is capped before interpolation to keep prompts bounded
const MAX_CONTENT_CHARS: usize = 2000;

/// Items at the head of a batch get dual-provider extraction
const CONSENSUS_HEAD_ITEMS: usize = 5;

/// Extracts claims from content via provider prompting
pub struct ClaimExtractor {
    primary: Arc<dyn GenerationBackend>,
    secondary: Arc<dyn GenerationBackend>,
    consensus_enabled: bool,
}

impl ClaimExtractor {
    /// Build an extractor over the two provider handles
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

    /// Extract claims from one content item.
    ///
    /// With `use_consensus` (and consensus enabled), both providers run
    /// concurrently and the merged claims are deduplicated by normalized
    /// text.
    pub async fn extract_claims(
        &self,
        content: &ContentItem,
        use_consensus: bool,
    ) -> Vec<ExtractedClaim> {
        if use_consensus && self.consensus_enabled {
            let (primary_claims, secondary_claims) = tokio::join!(
                self.extract_with(self.primary.as_ref(), content),
                self.extract_with(self.secondary.as_ref(), content),
            );

            let mut merged = primary_claims;
            merged.extend(secondary_claims);
            deduplicate_claims(merged)
        } else {
            self.extract_with(self.primary.as_ref(), content).await
        }
    }

    /// Extract claims from a batch of content items, capped at `max_items`.
    ///
    /// The first few items get dual-provider extraction; the rest use
    /// the primary provider only.
    pub async fn batch_extract(
        &self,
        content_items: &[ContentItem],
        max_items: usize,
    ) -> Vec<ExtractedClaim> {
        let mut all_claims = Vec::new();

        for (index, content) in content_items.iter().take(max_items).enumerate() {
            let use_consensus = index < CONSENSUS_HEAD_ITEMS;
            let claims = self.extract_claims(content, use_consensus).await;
            all_claims.extend(claims);
        }

        Logger::info(
            Event::ClaimsExtracted.as_str(),
            &[("claims", &all_claims.len().to_string())],
        );
        all_claims
    }

    async fn extract_with(
        &self,
        backend: &dyn GenerationBackend,
        content: &ContentItem,
    ) -> Vec<ExtractedClaim> {
        let prompt = extraction_prompt(content);

        let reply = match backend.generate(&prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[
                        ("backend", backend.id().as_str()),
                        ("operation", "extract"),
                        ("error", &error.to_string()),
                    ],
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<ExtractionReply>(unwrap_fences(&reply)) {
            Ok(parsed) => parsed
                .claims
                .into_iter()
                .map(|payload| payload.into_claim(content))
                .collect(),
            Err(error) => {
                Logger::warn(
                    Event::BackendDegraded.as_str(),
                    &[
                        ("backend", backend.id().as_str()),
                        ("operation", "extract"),
                        ("error", &error.to_string()),
                    ],
                );
                Vec::new()
            }
        }
    }
}

/// Drop claims whose lowercased, trimmed text was already seen
pub fn deduplicate_claims(claims: Vec<ExtractedClaim>) -> Vec<ExtractedClaim> {
    let mut seen = HashSet::new();
    claims
        .into_iter()
        .filter(|claim| seen.insert(claim.normalized_text()))
        .collect()
}

fn extraction_prompt(content: &ContentItem) -> String {
    format!(
        r#"You are an expert fact-checker analyzing content for potential misinformation during global crises.

Analyze the following content and extract factual claims that could be verified or debunked:

Title: {title}
Content: {text}
Source: {source}

Extract claims that are:
1. Factual statements (not opinions)
2. Verifiable or falsifiable
3. Related to crisis events (pandemic, conflict, climate, etc.)
4. Potentially impactful if false

For each claim, provide:
- The exact claim text
- Crisis type (pandemic/conflict/climate/disaster/other)
- Urgency score (0.0-1.0, how urgent is verification)
- Named entities mentioned (people, places, organizations)
- Key topics/keywords

Respond in JSON format:
{{
  "claims": [
    {{
      "text": "exact claim statement",
      "crisis_type": "pandemic",
      "urgency_score": 0.8,
      "entities": ["entity1", "entity2"],
      "topics": ["topic1", "topic2"]
    }}
  ]
}}

If no verifiable claims are found, return empty claims array."#,
        title = content.title,
        text = truncate_chars(&content.text, MAX_CONTENT_CHARS),
        source = content.source,
    )
}

/// Cap a string at `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[derive(Debug, Deserialize)]
struct ExtractionReply {
    #[serde(default)]
    claims: Vec<ClaimPayload>,
}

#[derive(Debug, Deserialize)]
struct ClaimPayload {
    text: String,

    #[serde(default = "default_crisis_type")]
    crisis_type: String,

    #[serde(default = "default_urgency")]
    urgency_score: f64,

    #[serde(default)]
    entities: Vec<String>,

    #[serde(default)]
    topics: Vec<String>,
}

fn default_crisis_type() -> String {
    "other".to_string()
}

fn default_urgency() -> f64 {
    0.5
}

impl ClaimPayload {
    fn into_claim(self, content: &ContentItem) -> ExtractedClaim {
        ExtractedClaim {
            text: self.text,
            source_url: content.url.clone(),
            source_title: content.title.clone(),
            crisis_type: self.crisis_type,
            urgency_score: self.urgency_score.clamp(0.0, 1.0),
            entities: self.entities,
            topics: self.topics,
        }
    }
}
