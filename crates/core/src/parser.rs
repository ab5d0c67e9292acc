//! Diagnosis narrative parser
//!
//! [`NarrativeParser`] is the seam callers depend on; [`HeadingParser`] is the
//! positional substring implementation used by the server.

use serde_json::Value as JsonValue;

use crate::error::ParseError;
use crate::narrative::{DecodedItem, decode_item, segment};
use crate::observer::ParseObserver;
use crate::options::ParseOptions;
use crate::rationale::{locate, normalize};
use crate::record::{DiagnosisBlockInput, DiagnosisRecord};

/// Converts a model's diagnosis/rationale text pair into structured records
pub trait NarrativeParser: Send + Sync {
    fn parse(
        &self,
        input: &DiagnosisBlockInput,
        observer: &dyn ParseObserver,
    ) -> Result<Vec<DiagnosisRecord>, ParseError>;
}

/// Parser that pairs each diagnosis with the rationale found between its
/// `"<N>. <Name>"` heading and the next item's heading.
#[derive(Debug, Clone, Default)]
pub struct HeadingParser {
    options: ParseOptions,
}

impl HeadingParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a raw model response, returning an empty list on any failure.
    pub fn parse_payload(
        &self,
        payload: &JsonValue,
        observer: &dyn ParseObserver,
    ) -> Vec<DiagnosisRecord> {
        match DiagnosisBlockInput::from_model_payload(payload) {
            Ok(input) => parse_or_empty(self, &input, observer),
            Err(err) => {
                observer.report(&err);
                Vec::new()
            }
        }
    }

    fn rationale_for(
        &self,
        rationale_text: &str,
        item: &DecodedItem,
        next: Option<&DecodedItem>,
        observer: &dyn ParseObserver,
    ) -> String {
        let heading = item.heading();
        let next_heading = next.map(DecodedItem::heading);

        match locate(rationale_text, &heading, next_heading.as_deref()) {
            Some(span) => normalize(span, &self.options),
            None => {
                let missing = match next_heading {
                    Some(next) if rationale_text.contains(&heading) => next,
                    _ => heading,
                };
                observer.report(&ParseError::MissingRationaleHeading {
                    index: item.index,
                    heading: missing,
                });
                String::new()
            }
        }
    }
}

impl NarrativeParser for HeadingParser {
    fn parse(
        &self,
        input: &DiagnosisBlockInput,
        observer: &dyn ParseObserver,
    ) -> Result<Vec<DiagnosisRecord>, ParseError> {
        let items: Vec<DecodedItem> = segment(&input.diagnosis_text)
            .filter_map(|(index, line)| match decode_item(index, line) {
                Ok(item) => Some(item),
                Err(err) => {
                    observer.report(&err);
                    None
                }
            })
            .collect();

        let records = items
            .iter()
            .enumerate()
            .map(|(pos, item)| DiagnosisRecord {
                diagnosis: item.name.clone(),
                rationale: self.rationale_for(
                    &input.rationale_text,
                    item,
                    items.get(pos + 1),
                    observer,
                ),
                likelihood: item.likelihood.clone(),
            })
            .collect();

        Ok(records)
    }
}

/// Run `parser`, reporting a failed parse and degrading it to an empty list.
///
/// An empty result therefore means "nothing usable", not "no diagnoses";
/// callers should fall back to the raw model text.
pub fn parse_or_empty<P: NarrativeParser + ?Sized>(
    parser: &P,
    input: &DiagnosisBlockInput,
    observer: &dyn ParseObserver,
) -> Vec<DiagnosisRecord> {
    parser.parse(input, observer).unwrap_or_else(|err| {
        observer.report(&err);
        Vec::new()
    })
}
