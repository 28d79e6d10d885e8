//! Observable events
//!
//! Events are explicit and typed; their names are the `event` field of
//! every log line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    ConfigLoaded,
    EndpointRegistered,
    CatalogLoaded,
    /// Invalid config or catalog (FATAL)
    StartupFailed,

    // Serving
    ServeStart,
    ServeComplete,

    // Requests
    ListQueryResolved,
    ListQueryRejected,
    RequestInvalid,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::EndpointRegistered => "ENDPOINT_REGISTERED",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::StartupFailed => "STARTUP_FAILED",
            Event::ServeStart => "SERVE_START",
            Event::ServeComplete => "SERVE_COMPLETE",
            Event::ListQueryResolved => "LIST_QUERY_RESOLVED",
            Event::ListQueryRejected => "LIST_QUERY_REJECTED",
            Event::RequestInvalid => "REQUEST_INVALID",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StartupFailed)
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

    #[test]
    fn test_event_names() {
        assert_eq!(Event::EndpointRegistered.as_str(), "ENDPOINT_REGISTERED");
        assert_eq!(Event::ListQueryRejected.to_string(), "LIST_QUERY_REJECTED");
    }

    #[test]
    fn test_only_startup_failure_is_fatal() {
        assert!(Event::StartupFailed.is_fatal());
        assert!(!Event::ListQueryRejected.is_fatal());
    }
}
