//! Observability
//!
//! Structured JSON-line logging of startup and request events.
//!
//! # Principles
//!
//! 1. Observability is read-only and never changes a result
//! 2. No async or background threads
//! 3. Query resolution itself does not log; callers log outcomes
//!
//! # Usage
//!
//! ```ignore
//! use catalogq::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::EndpointRegistered, &[("resource", "shows")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
