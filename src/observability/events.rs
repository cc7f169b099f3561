//! Observable events in query execution

use std::fmt;

use super::logger::Severity;

/// Typed log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file loaded
    ConfigLoaded,
    /// Query received by the runner
    QueryBegin,
    /// Execution strategy chosen
    QueryPlanned,
    /// Streaming read opened against the store
    StreamOpened,
    /// Enough records matched; stream ended early
    StreamLimitReached,
    /// Event arrived after the query settled
    StreamLateEventIgnored,
    /// Query produced its results
    QueryComplete,
    /// Query failed with an error
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::StreamOpened => "STREAM_OPENED",
            Event::StreamLimitReached => "STREAM_LIMIT_REACHED",
            Event::StreamLateEventIgnored => "STREAM_LATE_EVENT_IGNORED",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryRejected => Severity::Error,
            Event::StreamLateEventIgnored => Severity::Warn,
            Event::QueryPlanned | Event::StreamOpened | Event::StreamLimitReached => {
                Severity::Trace
            }
            Event::ConfigLoaded | Event::QueryBegin | Event::QueryComplete => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 8] = [
        Event::ConfigLoaded,
        Event::QueryBegin,
        Event::QueryPlanned,
        Event::StreamOpened,
        Event::StreamLimitReached,
        Event::StreamLateEventIgnored,
        Event::QueryComplete,
        Event::QueryRejected,
    ];

    #[test]
    fn test_all_events_have_string_representation() {
        for event in ALL {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::QueryRejected.severity(), Severity::Error);
        assert_eq!(Event::StreamLateEventIgnored.severity(), Severity::Warn);
        assert_eq!(Event::QueryComplete.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::StreamLimitReached), "STREAM_LIMIT_REACHED");
    }
}
