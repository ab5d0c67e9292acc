//! Concept dictionary endpoint

use axum::{Extension, Json, extract::State, response::IntoResponse};
use deadpool_postgres::Pool;
use serde::{Deserialize, Serialize};

use crate::config::ConceptDefaults;
use crate::db::ConceptRepository;
use crate::error::{ApiJson, AppError};

/// Request body for POST /snomed
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnomedMappingBody {
    concept_name: String,
    snomed_code: String,
}

/// Response body for POST /snomed
#[derive(Serialize)]
pub struct SnomedMappingResponse {
    result: String,
}

/// POST /snomed - Map a SNOMED CT code onto a diagnosis concept
///
/// Adds the mapping to an existing concept with the same name, or creates the
/// concept, its name and its diagnosis-set membership first.
pub async fn map_snomed(
    State(pool): State<Pool>,
    Extension(defaults): Extension<ConceptDefaults>,
    ApiJson(body): ApiJson<SnomedMappingBody>,
) -> Result<impl IntoResponse, AppError> {
    let concept_name = body.concept_name.trim();
    let snomed_code = body.snomed_code.trim();
    if concept_name.is_empty() || snomed_code.is_empty() {
        return Err(AppError::BadRequest(
            "conceptName and snomedCode must not be empty".to_string(),
        ));
    }

    let repo = ConceptRepository::new(pool, defaults);
    let outcome = repo.map_snomed(concept_name, snomed_code).await?;

    Ok(Json(SnomedMappingResponse {
        result: outcome.message(concept_name),
    }))
}
