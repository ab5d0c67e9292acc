//! Treatment recommendation endpoint

use axum::{Extension, Json, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::ai::{ModelError, TreatmentModel};
use crate::error::{ApiJson, AppError};
use crate::tracking::RequestTracker;

/// Request body for POST /ttxv1
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtxBody {
    visit_uuid: String,
    case: String,
    diagnosis: String,
}

/// Response body for POST /ttxv1
#[derive(Serialize)]
pub struct TtxResponse {
    result: JsonValue,
}

/// POST /ttxv1 - Treatment recommendation for a case and its diagnosis
pub async fn create(
    Extension(model): Extension<TreatmentModel>,
    Extension(tracker): Extension<RequestTracker>,
    ApiJson(body): ApiJson<TtxBody>,
) -> Result<impl IntoResponse, AppError> {
    let tracker_id = Uuid::new_v4();
    tracing::info!(
        target: "ttx",
        visit_uuid = %body.visit_uuid,
        tracker = %tracker_id,
        "Incoming treatment request"
    );

    tracker
        .record(model.index_name(), tracker_id, &body.visit_uuid)
        .await;

    let result = model
        .recommend(&body.case, &body.diagnosis, tracker_id)
        .await
        .map_err(|e| {
            tracing::error!(target: "ttx", tracker = %tracker_id, error = %e, "Treatment request failed");
            match e {
                ModelError::Decode(msg) => AppError::BadRequest(msg),
                other => AppError::from(other),
            }
        })?;

    Ok(Json(TtxResponse { result }))
}
