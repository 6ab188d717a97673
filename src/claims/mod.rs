//! # Claims
//!
//! Claim records and LLM-driven extraction from monitored content.

pub mod claim;
pub mod extractor;

pub use claim::{Claim, ExtractedClaim, VerificationStatus};
pub use extractor::{deduplicate_claims, ClaimExtractor};
