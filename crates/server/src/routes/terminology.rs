//! SNOMED CT search endpoint

use axum::{Extension, Json, extract::Path, response::IntoResponse};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::terminology::TerminologyClient;

/// Response body for GET /getdiags/{term}
#[derive(Serialize)]
pub struct SearchResponse {
    result: Vec<JsonValue>,
}

/// GET /getdiags/{term} - Search SNOMED CT concepts matching `term`
pub async fn search(
    Extension(client): Extension<TerminologyClient>,
    Path(term): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let concepts = client.search(&term).await.map_err(|e| {
        tracing::error!(error = %e, term = %term, "Error searching SNOMED CT");
        AppError::Upstream("Terminology service unavailable".to_string())
    })?;

    Ok(Json(SearchResponse { result: concepts }))
}
