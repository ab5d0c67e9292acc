//! SNOMED CT terminology search proxy

use serde_json::Value as JsonValue;

const SEARCH_PATH: &str = "/csnoserv/api/search/search";

/// Fields removed from every concept before it is returned to callers
const DROPPED_FIELDS: [&str; 2] = ["conceptFsn", "id"];

/// Client for the terminology server's search API
#[derive(Clone)]
pub struct TerminologyClient {
    http: reqwest::Client,
    base_url: String,
}

impl TerminologyClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search active concepts whose synonyms match `term`
    pub async fn search(&self, term: &str) -> Result<Vec<JsonValue>, reqwest::Error> {
        let mut concepts: Vec<JsonValue> = self
            .http
            .get(format!("{}{}", self.base_url, SEARCH_PATH))
            .query(&[
                ("term", term),
                ("state", "active"),
                ("acceptability", "synonyms"),
                ("fullconcept", "false"),
                ("returnlimit", "-1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        concepts.iter_mut().for_each(strip_concept);
        Ok(concepts)
    }
}

fn strip_concept(concept: &mut JsonValue) {
    if let Some(fields) = concept.as_object_mut() {
        for field in DROPPED_FIELDS {
            fields.remove(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_concept() {
        let mut concept = json!({
            "conceptId": "6142004",
            "term": "Influenza",
            "conceptFsn": "Influenza (disorder)",
            "id": "1234"
        });
        strip_concept(&mut concept);
        assert_eq!(concept, json!({"conceptId": "6142004", "term": "Influenza"}));
    }

    #[test]
    fn test_strip_concept_ignores_non_objects() {
        let mut concept = json!("Influenza");
        strip_concept(&mut concept);
        assert_eq!(concept, json!("Influenza"));
    }
}
