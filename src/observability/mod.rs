//! Observability subsystem
//!
//! Structured JSON logging with explicit lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only: no side effects on pipeline results
//! 2. Logging failures never abort an analysis
//! 3. Deterministic output (sorted keys, typed events)
//!
//! # Usage
//!
//! ```ignore
//! use deepcheck::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::info("CLAIM_PROCESSED", &[("verdict", "false")]);
//! log_event_with_fields(Event::CycleComplete, &[("claims", "12")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(Severity::Info, event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(Severity::Info, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_does_not_panic() {
        log_event(Event::CycleStart);
        log_event_with_fields(Event::CycleComplete, &[("claims", "0")]);
    }
}
