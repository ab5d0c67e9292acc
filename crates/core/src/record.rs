//! Model payload boundary and the structured diagnosis record

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ParseError;

/// The two text blocks produced by the diagnosis model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisBlockInput {
    /// One `"<N>. <Name> (Likelihood: <Label>)"` per line
    pub diagnosis_text: String,
    /// `"<N>. <Name>"` headings, each followed by prose
    pub rationale_text: String,
}

impl DiagnosisBlockInput {
    pub fn new(diagnosis_text: impl Into<String>, rationale_text: impl Into<String>) -> Self {
        Self {
            diagnosis_text: diagnosis_text.into(),
            rationale_text: rationale_text.into(),
        }
    }

    /// Read `data.output.diagnosis` and `data.output.rationale` from a raw
    /// model response.
    pub fn from_model_payload(payload: &JsonValue) -> Result<Self, ParseError> {
        let output = payload
            .get("data")
            .and_then(|data| data.get("output"))
            .ok_or_else(|| ParseError::ParseFailure("response has no data.output".to_string()))?;

        let field = |name: &str| {
            output
                .get(name)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    ParseError::ParseFailure(format!(
                        "data.output.{name} is missing or not a string"
                    ))
                })
        };

        Ok(Self {
            diagnosis_text: field("diagnosis")?,
            rationale_text: field("rationale")?,
        })
    }
}

/// One entry of the structured differential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub diagnosis: String,
    pub rationale: String,
    pub likelihood: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_model_payload() {
        let payload = json!({
            "data": {
                "conclusion": "Likely viral illness",
                "output": {
                    "diagnosis": "1. Influenza (Likelihood: High)",
                    "rationale": "1. Influenza Clinical signs include fever."
                }
            }
        });

        let input = DiagnosisBlockInput::from_model_payload(&payload).unwrap();
        assert_eq!(input.diagnosis_text, "1. Influenza (Likelihood: High)");
        assert_eq!(input.rationale_text, "1. Influenza Clinical signs include fever.");
    }

    #[test]
    fn test_from_model_payload_missing_output() {
        let payload = json!({"data": {"conclusion": "n/a"}});
        let err = DiagnosisBlockInput::from_model_payload(&payload).unwrap_err();
        assert!(matches!(err, ParseError::ParseFailure(_)));
    }

    #[test]
    fn test_from_model_payload_non_string_field() {
        let payload = json!({"data": {"output": {"diagnosis": ["a"], "rationale": ""}}});
        let err = DiagnosisBlockInput::from_model_payload(&payload).unwrap_err();
        assert_eq!(
            err,
            ParseError::ParseFailure("data.output.diagnosis is missing or not a string".to_string())
        );
    }

    #[test]
    fn test_record_serializes_with_plain_field_names() {
        let record = DiagnosisRecord {
            diagnosis: "Influenza".to_string(),
            rationale: "Clinical signs include fever.".to_string(),
            likelihood: "High".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["diagnosis"], "Influenza");
        assert_eq!(value["rationale"], "Clinical signs include fever.");
        assert_eq!(value["likelihood"], "High");
    }
}
