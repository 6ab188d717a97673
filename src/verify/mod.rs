//! # Claim Verification
//!
//! The dual-provider verification pipeline: per-provider fact checking,
//! the consensus policy that merges two verdicts, and credibility
//! scoring.

pub mod checker;
pub mod consensus;
pub mod credibility;
pub mod result;

pub use checker::FactChecker;
pub use consensus::{consensus, DISAGREEMENT_PENALTY};
pub use credibility::credibility_score;
pub use result::{Evidence, Verdict, VerificationResult};
