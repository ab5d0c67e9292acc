//! Treatment recommendation model

use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::client::{ModelClient, ModelError};
use crate::config::ModelEndpoint;

/// Request body expected by the treatment model
#[derive(Debug, Serialize)]
pub struct TtxRequest<'a> {
    pub model_name: &'a str,
    pub case: &'a str,
    pub diagnosis: &'a str,
    pub tracker: Uuid,
}

/// Client for the model that proposes treatment for a diagnosed case
#[derive(Clone)]
pub struct TreatmentModel {
    client: ModelClient,
    endpoint: ModelEndpoint,
}

impl TreatmentModel {
    pub fn new(client: ModelClient, endpoint: ModelEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn index_name(&self) -> &str {
        &self.endpoint.index_name
    }

    pub async fn recommend(
        &self,
        case: &str,
        diagnosis: &str,
        tracker: Uuid,
    ) -> Result<JsonValue, ModelError> {
        let request = TtxRequest {
            model_name: &self.endpoint.model_name,
            case,
            diagnosis,
            tracker,
        };
        tracing::info!(target: "ttx", request = ?request, "Sending request to model");

        let response = self.client.post_json(&self.endpoint.url, &request).await?;
        tracing::info!(target: "ttx", tracker = %tracker, response = %response, "Response data");

        Ok(response)
    }
}
