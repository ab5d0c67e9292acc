//! ddx-core: structured parsing of model-generated diagnosis narratives
//!
//! The diagnosis model answers with two free-text blocks: a numbered list of
//! diagnoses with inline likelihood labels, and a rationale section keyed by
//! the same numbered headings. This crate turns that pair into an ordered list
//! of [`DiagnosisRecord`]s without doing any I/O.

pub mod error;
pub mod narrative;
pub mod observer;
pub mod options;
pub mod parser;
pub mod rationale;
pub mod record;

pub use error::ParseError;
pub use narrative::{DecodedItem, decode_item, segment};
pub use observer::{ParseObserver, TracingObserver};
pub use options::ParseOptions;
pub use parser::{HeadingParser, NarrativeParser, parse_or_empty};
pub use rationale::{locate, normalize};
pub use record::{DiagnosisBlockInput, DiagnosisRecord};
