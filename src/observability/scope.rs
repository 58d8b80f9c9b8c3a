//! ObservationScope for automatic begin/complete logging
//!
//! - Logs BEGIN on creation
//! - Logs COMPLETE when closed
//! - Logs INCOMPLETE on drop if never closed

use std::time::Instant;

use super::logger::Logger;

/// A scope that logs `{name}_BEGIN` on creation and `{name}_COMPLETE` or
/// `{name}_INCOMPLETE` when it ends.
///
/// ```ignore
/// let scope = ObservationScope::new("SEED");
/// // ... do work ...
/// scope.complete_with_fields(&[("songs", "42")]);
/// ```
pub struct ObservationScope {
    name: &'static str,
    completed: bool,
    timer: Timer,
}

impl ObservationScope {
    /// Create a new observation scope
    pub fn new(name: &'static str) -> Self {
        Logger::info(&format!("{}_BEGIN", name), &[]);
        Self {
            name,
            completed: false,
            timer: Timer::new(),
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as successfully completed with additional fields
    pub fn complete_with_fields(mut self, extra_fields: &[(&str, &str)]) {
        self.completed = true;
        let elapsed = self.timer.elapsed_ms();
        let mut fields = vec![("elapsed_ms", elapsed.as_str())];
        fields.extend(extra_fields.iter().copied());
        Logger::info(&format!("{}_COMPLETE", self.name), &fields);
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.completed {
            let event = format!("{}_INCOMPLETE", self.name);
            Logger::warn(&event, &[("reason", "scope dropped without completion")]);
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::new("TEST");
        scope.complete();
    }

    #[test]
    fn test_scope_complete_with_extra_fields() {
        let scope = ObservationScope::new("TEST");
        scope.complete_with_fields(&[("result", "success")]);
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        drop(scope);
    }

    #[test]
    fn test_timer_elapsed_is_numeric() {
        let timer = Timer::new();
        assert!(timer.elapsed_ms().parse::<u128>().is_ok());
    }
}
