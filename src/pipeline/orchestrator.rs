//! # Analysis Orchestrator
//!
//! Sequences the full pipeline per claim: extraction, verification,
//! consensus, scoring, explanation, persistence. One bad item records
//! its own degraded state and the batch moves on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::backend::GenerationBackend;
use crate::claims::{Claim, ClaimExtractor, ExtractedClaim};
use crate::config::Settings;
use crate::content::{aggregate_content, ContentSource};
use crate::explain::{AudienceTier, Explanation, ExplanationGenerator};
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::verify::{credibility_score, FactChecker};

use super::store::AnalysisStore;

/// Counters for one detection cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleStats {
    pub content_items: usize,
    pub claims_extracted: usize,
    pub claims_verified: usize,
    pub explanations_generated: usize,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
}

impl CycleStats {
    fn begin() -> Self {
        Self {
            content_items: 0,
            claims_extracted: 0,
            claims_verified: 0,
            explanations_generated: 0,
            started_at: Utc::now(),
            duration_secs: 0.0,
        }
    }

    fn finish(mut self) -> Self {
        self.duration_secs = (Utc::now() - self.started_at).num_milliseconds() as f64 / 1000.0;
        self
    }
}

/// Outcome of verifying a single user-submitted claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaimOutcome {
    pub claim_id: Uuid,
    pub verdict: String,
    pub confidence: f64,
    pub credibility_score: f64,
    pub explanation: Explanation,
}

/// Drives detection cycles over the configured sources
pub struct Orchestrator {
    extractor: ClaimExtractor,
    checker: FactChecker,
    generator: ExplanationGenerator,
    store: Arc<dyn AnalysisStore>,
    sources: Vec<Box<dyn ContentSource>>,
    max_claims_per_cycle: usize,
    monitoring_interval: Duration,
    running: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Wire the pipeline from settings, provider handles, sources, and
    /// a store
    pub fn new(
        settings: &Settings,
        primary: Arc<dyn GenerationBackend>,
        secondary: Arc<dyn GenerationBackend>,
        sources: Vec<Box<dyn ContentSource>>,
        store: Arc<dyn AnalysisStore>,
    ) -> Self {
        Self {
            extractor: ClaimExtractor::new(
                Arc::clone(&primary),
                Arc::clone(&secondary),
                settings.enable_consensus_mode,
            ),
            checker: FactChecker::new(
                Arc::clone(&primary),
                Arc::clone(&secondary),
                settings.enable_consensus_mode,
                settings.consensus_urgency_threshold,
            ),
            generator: ExplanationGenerator::new(primary),
            store,
            sources,
            max_claims_per_cycle: settings.max_claims_per_cycle,
            monitoring_interval: Duration::from_secs(settings.monitoring_interval_secs),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run one complete detection and verification cycle
    pub async fn run_cycle(&self) -> CycleStats {
        log_event(Event::CycleStart);
        let mut stats = CycleStats::begin();

        let content_items = aggregate_content(&self.sources).await;
        stats.content_items = content_items.len();
        if content_items.is_empty() {
            Logger::warn("CYCLE_EMPTY", &[("stage", "content")]);
            return stats.finish();
        }

        let extracted = self
            .extractor
            .batch_extract(&content_items, self.max_claims_per_cycle)
            .await;
        stats.claims_extracted = extracted.len();
        if extracted.is_empty() {
            Logger::warn("CYCLE_EMPTY", &[("stage", "extraction")]);
            return stats.finish();
        }

        for claim in extracted {
            self.process_claim(claim, &mut stats).await;
        }

        let stats = stats.finish();
        log_event_with_fields(
            Event::CycleComplete,
            &[
                ("content_items", &stats.content_items.to_string()),
                ("claims_extracted", &stats.claims_extracted.to_string()),
                ("claims_verified", &stats.claims_verified.to_string()),
                ("duration_secs", &format!("{:.1}", stats.duration_secs)),
            ],
        );
        stats
    }

    /// Verify, score, explain, and persist one claim.
    ///
    /// A degraded backend shows up as an unverifiable result for this
    /// claim only; the rest of the batch is untouched.
    async fn process_claim(&self, extracted: ExtractedClaim, stats: &mut CycleStats) {
        let (primary_result, secondary_result) =
            self.checker.verify_claim(&extracted, true).await;

        let score = credibility_score(&primary_result);

        let explanation = self
            .generator
            .generate(&extracted, &primary_result, AudienceTier::General)
            .await;

        let mut claim = Claim::from_extracted(extracted);
        claim.mark_verified(primary_result.verdict, score);

        let claim_id = self.store.save_claim(&claim).await;
        self.store.save_verification(claim_id, &primary_result).await;
        if let Some(secondary_result) = &secondary_result {
            self.store.save_verification(claim_id, secondary_result).await;
        }
        self.store.save_explanation(claim_id, &explanation).await;

        stats.claims_verified += 1;
        stats.explanations_generated += 1;
        log_event_with_fields(
            Event::ClaimProcessed,
            &[
                ("claim_id", &claim_id.to_string()),
                ("verdict", primary_result.verdict.as_str()),
                ("credibility", &score.to_string()),
            ],
        );
    }

    /// Verify a single user-submitted claim end to end
    pub async fn verify_custom_claim(
        &self,
        claim_text: &str,
        audience: AudienceTier,
    ) -> CustomClaimOutcome {
        let extracted = ExtractedClaim::user_submitted(claim_text);

        let (primary_result, secondary_result) =
            self.checker.verify_claim(&extracted, true).await;
        let score = credibility_score(&primary_result);
        let explanation = self
            .generator
            .generate(&extracted, &primary_result, audience)
            .await;

        let mut claim = Claim::from_extracted(extracted);
        claim.mark_verified(primary_result.verdict, score);

        let claim_id = self.store.save_claim(&claim).await;
        self.store.save_verification(claim_id, &primary_result).await;
        if let Some(secondary_result) = &secondary_result {
            self.store.save_verification(claim_id, secondary_result).await;
        }
        self.store.save_explanation(claim_id, &explanation).await;

        CustomClaimOutcome {
            claim_id,
            verdict: primary_result.verdict.as_str().to_string(),
            confidence: primary_result.confidence,
            credibility_score: score,
            explanation,
        }
    }

    /// Run cycles continuously until [`Orchestrator::stop`] is called
    pub async fn start_monitoring(&self) {
        self.running.store(true, Ordering::SeqCst);
        log_event(Event::MonitorStart);

        while self.running.load(Ordering::SeqCst) {
            self.run_cycle().await;
            tokio::time::sleep(self.monitoring_interval).await;
        }

        log_event(Event::MonitorStop);
    }

    /// Stop continuous monitoring after the current cycle
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
