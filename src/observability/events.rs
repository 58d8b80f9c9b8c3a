//! Observable events for songbook
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in songbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Startup complete, ready to serve
    BootComplete,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Configuration missing or malformed (FATAL)
    ConfigInvalid,

    // Store
    /// Store client constructed
    StoreConnected,
    /// Store could not be reached during startup (FATAL)
    StoreUnreachable,
    /// A store operation failed while serving a request
    StoreError,

    // Seeding
    /// Seed dataset read from disk
    SeedLoaded,
    /// Seeding failed (FATAL)
    SeedFailed,

    // HTTP
    /// Listener bound
    ServerListening,
    /// Listener could not be bound or serving stopped with an error (FATAL)
    ServerFailed,
    /// One HTTP request handled
    RequestComplete,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::BootComplete => "BOOT_COMPLETE",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigInvalid => "CONFIG_INVALID",
            Event::StoreConnected => "STORE_CONNECTED",
            Event::StoreUnreachable => "STORE_UNREACHABLE",
            Event::StoreError => "STORE_ERROR",
            Event::SeedLoaded => "SEED_LOADED",
            Event::SeedFailed => "SEED_FAILED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ServerFailed => "SERVER_FAILED",
            Event::RequestComplete => "REQUEST_COMPLETE",
        }
    }

    /// Fatal events end the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Event::ConfigInvalid
                | Event::StoreUnreachable
                | Event::SeedFailed
                | Event::ServerFailed
        )
    }

    /// Non-fatal failures worth an ERROR line
    pub fn is_error(&self) -> bool {
        matches!(self, Event::StoreError)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
