//! songbook entry point
//!
//! All logic lives in `app::run`; this only reports a fatal startup error
//! and sets the exit code.

use std::process::ExitCode;

use songbook::app;
use songbook::observability::log_event_with_fields;

#[tokio::main]
async fn main() -> ExitCode {
    match app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = e.to_string();
            log_event_with_fields(e.event(), &[("error", message.as_str())]);
            ExitCode::FAILURE
        }
    }
}
