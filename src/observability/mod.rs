//! Observability for songbook
//!
//! Structured JSON logging and typed lifecycle events. Observability is
//! read-only: a failed log write never affects request handling.
//!
//! ```ignore
//! use songbook::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::info("SONGS_LISTED", &[("count", "42")]);
//! log_event_with_fields(Event::SeedLoaded, &[("songs", "42")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_error() {
        Severity::Error
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_events() {
        assert_eq!(severity_for(Event::SeedFailed), Severity::Fatal);
        assert_eq!(severity_for(Event::StoreError), Severity::Error);
        assert_eq!(severity_for(Event::RequestComplete), Severity::Info);
    }

    #[test]
    fn test_log_event() {
        log_event(Event::BootStart);
        log_event(Event::BootComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("seed_path", "/tmp/songs.json")]);
    }
}
