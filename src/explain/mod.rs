//! # Explanation Rendering
//!
//! Audience-tailored explanations of fact-check results, with a
//! deterministic fallback when the provider cannot help.

pub mod explanation;
pub mod generator;

pub use explanation::{AudienceTier, Citation, Explanation};
pub use generator::ExplanationGenerator;
