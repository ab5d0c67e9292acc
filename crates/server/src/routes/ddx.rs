//! Differential diagnosis endpoint

use std::sync::Arc;

use axum::{Extension, Json, response::IntoResponse};
use ddx_core::{DiagnosisRecord, HeadingParser, TracingObserver};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::ai::DiagnosisModel;
use crate::error::{ApiJson, AppError};
use crate::tracking::RequestTracker;

/// Request body for POST /ddx
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdxBody {
    visit_uuid: String,
    casehistory: String,
}

/// Response body for POST /ddx
#[derive(Debug, Serialize)]
pub struct DdxResponse {
    /// Unmodified model response
    pub result: JsonValue,
    pub conclusion: JsonValue,
    pub diagnoses: Vec<DiagnosisRecord>,
    /// Raw diagnosis text, present only when nothing could be parsed from it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<JsonValue>,
}

impl DdxResponse {
    /// Attach the parsed differential to the raw model response
    pub fn new(result: JsonValue, diagnoses: Vec<DiagnosisRecord>) -> Self {
        let conclusion = result
            .pointer("/data/conclusion")
            .cloned()
            .unwrap_or(JsonValue::Null);

        let fallback = diagnoses.is_empty().then(|| {
            result
                .pointer("/data/output/diagnosis")
                .cloned()
                .unwrap_or(JsonValue::Null)
        });

        Self {
            result,
            conclusion,
            diagnoses,
            fallback,
        }
    }
}

/// POST /ddx - Differential diagnosis for a case history
///
/// Tracks the request, asks the diagnosis model, and returns its raw answer
/// together with the structured diagnosis list parsed out of it.
pub async fn create(
    Extension(model): Extension<DiagnosisModel>,
    Extension(tracker): Extension<RequestTracker>,
    Extension(parser): Extension<Arc<HeadingParser>>,
    ApiJson(body): ApiJson<DdxBody>,
) -> Result<impl IntoResponse, AppError> {
    let tracker_id = Uuid::new_v4();
    tracing::info!(
        target: "ddx",
        visit_uuid = %body.visit_uuid,
        tracker = %tracker_id,
        case_len = body.casehistory.len(),
        "Incoming differential diagnosis request"
    );

    tracker
        .record(model.index_name(), tracker_id, &body.visit_uuid)
        .await;

    let result = model
        .differential(&body.casehistory, tracker_id)
        .await
        .map_err(|e| {
            tracing::error!(target: "ddx", tracker = %tracker_id, error = %e, "Request failed after retries");
            AppError::from(e)
        })?;

    let diagnoses = parser.parse_payload(&result, &TracingObserver);
    if diagnoses.is_empty() {
        tracing::warn!(target: "ddx", tracker = %tracker_id, "No structured diagnoses parsed, returning raw text");
    }

    Ok(Json(DdxResponse::new(result, diagnoses)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_without_diagnoses_carries_fallback() {
        let raw = json!({"data": {"conclusion": "Unclear", "output": {"diagnosis": "Unable to rank"}}});
        let response = serde_json::to_value(DdxResponse::new(raw, Vec::new())).unwrap();

        assert_eq!(response["conclusion"], "Unclear");
        assert_eq!(response["diagnoses"], json!([]));
        assert_eq!(response["fallback"], "Unable to rank");
    }

    #[test]
    fn test_response_with_diagnoses_omits_fallback() {
        let raw = json!({"data": {"output": {"diagnosis": "1. Flu (Likelihood: High)"}}});
        let diagnoses = vec![DiagnosisRecord {
            diagnosis: "Flu".to_string(),
            rationale: String::new(),
            likelihood: "High".to_string(),
        }];
        let response = serde_json::to_value(DdxResponse::new(raw, diagnoses)).unwrap();

        assert_eq!(response["conclusion"], JsonValue::Null);
        assert!(response.get("fallback").is_none());
        assert_eq!(response["diagnoses"][0]["diagnosis"], "Flu");
    }
}
