//! Request tracking entries indexed into Elasticsearch

use serde::Serialize;
use uuid::Uuid;

/// Document stored for every model request
#[derive(Debug, Clone, Serialize)]
pub struct TrackingEntry {
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    #[serde(rename = "visitUUID")]
    pub visit_uuid: String,
}

impl TrackingEntry {
    pub fn now(visit_uuid: &str) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            visit_uuid: visit_uuid.to_string(),
        }
    }
}

/// Writes tracking entries through the Elasticsearch document API
#[derive(Clone)]
pub struct RequestTracker {
    http: reqwest::Client,
    base_url: String,
}

impl RequestTracker {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `PUT /{index}/_doc/{id}`
    pub async fn index(
        &self,
        index: &str,
        id: Uuid,
        entry: &TrackingEntry,
    ) -> Result<(), reqwest::Error> {
        self.http
            .put(format!("{}/{}/_doc/{}", self.base_url, index, id))
            .json(entry)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Index a tracking entry for `visit_uuid`. Failures are logged, not returned,
    /// so an unavailable index never blocks the model call.
    pub async fn record(&self, index: &str, id: Uuid, visit_uuid: &str) {
        let entry = TrackingEntry::now(visit_uuid);
        if let Err(e) = self.index(index, id, &entry).await {
            tracing::warn!(error = %e, index, tracker = %id, "Failed to index tracking entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_shape() {
        let entry = TrackingEntry::now("visit-42");
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["visitUUID"], "visit-42");
        let timestamp = value["timestamp"].as_str().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let tracker = RequestTracker::new(reqwest::Client::new(), "http://es:9200/");
        assert_eq!(tracker.base_url, "http://es:9200");
    }
}
