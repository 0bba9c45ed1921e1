//! Calls whose failure must not abort a command.
//!
//! Autocomplete responses, cleanup of prompt messages and error replies are
//! nice to have; a failure there is logged at debug level and dropped.

use std::fmt::Display;
use tracing::debug;

/// Turns a fallible result into an optional value, logging the failure
pub trait BestEffort<T> {
    /// Returns the value, or logs `action` with the error and returns `None`.
    fn best_effort(self, action: &str) -> Option<T>;
}

impl<T, E: Display> BestEffort<T> for Result<T, E> {
    fn best_effort(self, action: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(action, error = %e, "Best-effort call failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_effort() {
        let ok: Result<u8, String> = Ok(3);
        assert_eq!(ok.best_effort("ok"), Some(3));

        let failed: Result<u8, String> = Err("gone".to_string());
        assert_eq!(failed.best_effort("fail"), None);
    }
}
