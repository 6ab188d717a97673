//! Lifecycle events
//!
//! Every observable stage of the detection and media pipelines has an
//! explicit, typed event. Free-form event strings are reserved for
//! per-call diagnostics.

use std::fmt;

/// Observable pipeline events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Settings loaded and validated
    ConfigLoaded,
    /// Continuous monitoring started
    MonitorStart,
    /// Continuous monitoring stopped
    MonitorStop,

    // Detection cycle
    /// Detection cycle begins
    CycleStart,
    /// Content aggregation finished
    ContentFetched,
    /// Claim extraction finished
    ClaimsExtracted,
    /// One claim fully verified, scored, and explained
    ClaimProcessed,
    /// One claim failed and was skipped; the cycle continues
    ClaimSkipped,
    /// Detection cycle complete
    CycleComplete,

    // Backends
    /// A provider call failed and was degraded to a fallback result
    BackendDegraded,

    // Media analysis
    /// Media analysis task spawned
    MediaAnalysisStart,
    /// Media analysis reached the completed state
    MediaAnalysisComplete,
    /// Media analysis reached the failed state
    MediaAnalysisFailed,
    /// Temporal inconsistency flagged a clip as suspicious
    TemporalSuspicious,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::MonitorStart => "MONITOR_START",
            Event::MonitorStop => "MONITOR_STOP",
            Event::CycleStart => "CYCLE_BEGIN",
            Event::ContentFetched => "CONTENT_FETCHED",
            Event::ClaimsExtracted => "CLAIMS_EXTRACTED",
            Event::ClaimProcessed => "CLAIM_PROCESSED",
            Event::ClaimSkipped => "CLAIM_SKIPPED",
            Event::CycleComplete => "CYCLE_COMPLETE",
            Event::BackendDegraded => "BACKEND_DEGRADED",
            Event::MediaAnalysisStart => "MEDIA_ANALYSIS_BEGIN",
            Event::MediaAnalysisComplete => "MEDIA_ANALYSIS_COMPLETE",
            Event::MediaAnalysisFailed => "MEDIA_ANALYSIS_FAILED",
            Event::TemporalSuspicious => "TEMPORAL_SUSPICIOUS",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
