//! Observability for query execution
//!
//! - Structured JSON logging to stderr, gated by a minimum severity
//! - Typed events
//! - Counter metrics per runner
//!
//! # Usage
//!
//! ```ignore
//! use aeroquery::observability::{log_event, Event, MetricsRegistry};
//!
//! log_event(Event::QueryComplete, &[("rows", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_queries_completed();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a typed event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Only verifies no panic
        log_event(Event::QueryBegin, &[]);
        log_event(Event::QueryRejected, &[("code", "AERO_QUERY_TYPE_INVALID")]);
    }
}
