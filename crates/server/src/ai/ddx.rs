//! Differential diagnosis model

use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::client::{ModelClient, ModelError};
use crate::config::ModelEndpoint;

/// Prompt revision the diagnosis model is asked to answer with
const PROMPT_VERSION: u32 = 1;

/// Request body expected by the diagnosis model
#[derive(Debug, Serialize)]
pub struct DdxRequest<'a> {
    pub model_name: &'a str,
    pub case: &'a str,
    pub prompt_version: u32,
    pub tracker: Uuid,
}

/// Client for the model that produces a differential from a case history
#[derive(Clone)]
pub struct DiagnosisModel {
    client: ModelClient,
    endpoint: ModelEndpoint,
}

impl DiagnosisModel {
    pub fn new(client: ModelClient, endpoint: ModelEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn index_name(&self) -> &str {
        &self.endpoint.index_name
    }

    /// Ask the model for a differential; returns its raw JSON response
    pub async fn differential(&self, case: &str, tracker: Uuid) -> Result<JsonValue, ModelError> {
        let request = DdxRequest {
            model_name: &self.endpoint.model_name,
            case,
            prompt_version: PROMPT_VERSION,
            tracker,
        };
        tracing::info!(target: "ddx", request = ?request, "Sending request to model");

        let response = self.client.post_json(&self.endpoint.url, &request).await?;
        tracing::info!(target: "ddx", tracker = %tracker, response = %response, "Response data");

        Ok(response)
    }
}
