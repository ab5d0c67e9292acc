//! Diagnostics sink for recoverable parse problems

use crate::error::ParseError;

/// Receives every problem the parser recovers from.
///
/// Passed into each parse call so callers decide where diagnostics go.
pub trait ParseObserver {
    fn report(&self, error: &ParseError);
}

/// Forwards parse diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn report(&self, error: &ParseError) {
        match error {
            ParseError::MalformedItem { index, reason, .. } => {
                tracing::warn!(
                    index = *index,
                    reason = *reason,
                    error = %error,
                    "Skipping malformed diagnosis item"
                );
            }
            ParseError::MissingRationaleHeading { index, heading } => {
                tracing::warn!(
                    index = *index,
                    heading = %heading,
                    "Rationale heading not found, leaving rationale empty"
                );
            }
            ParseError::ParseFailure(message) => {
                tracing::error!(error = %message, "Error transforming diagnosis data");
            }
        }
    }
}
