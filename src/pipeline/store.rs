//! # Analysis Store
//!
//! Persistence seam for the orchestrator. The relational store is an
//! external collaborator; this trait is its contract, and the memory
//! implementation backs tests and the CLI.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::claims::Claim;
use crate::explain::Explanation;
use crate::verify::VerificationResult;

/// Sink for verified claims and their attached results
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Persist a claim, returning its id
    async fn save_claim(&self, claim: &Claim) -> Uuid;

    /// Attach a verification result to a claim
    async fn save_verification(&self, claim_id: Uuid, result: &VerificationResult);

    /// Attach an explanation to a claim
    async fn save_explanation(&self, claim_id: Uuid, explanation: &Explanation);
}

/// One claim with everything attached to it
#[derive(Debug, Clone, Default)]
pub struct StoredClaim {
    pub claim: Option<Claim>,
    pub verifications: Vec<VerificationResult>,
    pub explanations: Vec<Explanation>,
}

/// In-memory store for tests and the CLI
#[derive(Clone, Default)]
pub struct MemoryStore {
    claims: Arc<RwLock<Vec<(Uuid, StoredClaim)>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored for a claim
    pub async fn get(&self, claim_id: Uuid) -> Option<StoredClaim> {
        self.claims
            .read()
            .await
            .iter()
            .find(|(id, _)| *id == claim_id)
            .map(|(_, stored)| stored.clone())
    }

    /// Number of stored claims
    pub async fn claim_count(&self) -> usize {
        self.claims.read().await.len()
    }

    async fn with_claim<F: FnOnce(&mut StoredClaim)>(&self, claim_id: Uuid, apply: F) {
        let mut claims = self.claims.write().await;
        if let Some((_, stored)) = claims.iter_mut().find(|(id, _)| *id == claim_id) {
            apply(stored);
        } else {
            let mut stored = StoredClaim::default();
            apply(&mut stored);
            claims.push((claim_id, stored));
        }
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn save_claim(&self, claim: &Claim) -> Uuid {
        let id = claim.id;
        self.with_claim(id, |stored| stored.claim = Some(claim.clone()))
            .await;
        id
    }

    async fn save_verification(&self, claim_id: Uuid, result: &VerificationResult) {
        self.with_claim(claim_id, |stored| stored.verifications.push(result.clone()))
            .await;
    }

    async fn save_explanation(&self, claim_id: Uuid, explanation: &Explanation) {
        self.with_claim(claim_id, |stored| {
            stored.explanations.push(explanation.clone())
        })
        .await;
    }
}
