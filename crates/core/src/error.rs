use thiserror::Error;

/// Diagnosis narrative parsing errors
///
/// Only `ParseFailure` ever aborts a parse. The other two are reported to the
/// observer and degrade to a skipped item or an empty rationale.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed diagnosis item {index} ({reason}): {line}")]
    MalformedItem {
        index: usize,
        line: String,
        reason: &'static str,
    },

    #[error("Rationale heading not found for item {index}: {heading}")]
    MissingRationaleHeading { index: usize, heading: String },

    #[error("Failed to parse diagnosis narrative: {0}")]
    ParseFailure(String),
}
