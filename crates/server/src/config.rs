//! Server configuration

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use ddx_core::ParseOptions;
use ddx_core::options::{DEFAULT_BOILERPLATE_MARKERS, DEFAULT_CONTENT_ANCHOR};

use crate::ai::RetryPolicy;

/// Env file read at startup
pub const ENV_FILE: &str = "ai.env";

/// Load `path` into the process environment. Variables that are already set
/// keep their value. Returns `Ok(false)` when the file does not exist.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path.as_ref()) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// One upstream inference model
#[derive(Debug, Clone)]
pub struct ModelEndpoint {
    pub url: String,
    pub model_name: String,
    /// Elasticsearch index receiving one tracking entry per request
    pub index_name: String,
}

/// Column defaults for rows written to the concept tables
#[derive(Debug, Clone)]
pub struct ConceptDefaults {
    pub class_id: i32,
    pub datatype_id: i32,
    pub retired: bool,
    pub is_set: bool,
    pub creator_id: i32,
    pub source_id: i32,
    pub map_type_id: i32,
    pub diagnosis_set_id: i32,
    pub locale: String,
    pub name_type: String,
}

impl Default for ConceptDefaults {
    fn default() -> Self {
        Self {
            class_id: 4,
            datatype_id: 4,
            retired: false,
            is_set: false,
            creator_id: 1,
            source_id: 1,
            map_type_id: 1,
            diagnosis_set_id: 160168,
            locale: "en".to_string(),
            name_type: "FULLY_SPECIFIED".to_string(),
        }
    }
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Create the concept tables at startup
    pub apply_schema: bool,
    pub bind_address: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    pub ddx: ModelEndpoint,
    pub ttx: ModelEndpoint,
    pub model_timeout: Duration,
    pub retry: RetryPolicy,
    pub elasticsearch_url: String,
    pub snomed_base_url: String,
    pub concepts: ConceptDefaults,
    pub parse_options: ParseOptions,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let number = |key: &str, default| parse_or(&lookup, key, default);

        let default_concepts = ConceptDefaults::default();
        let concepts = ConceptDefaults {
            class_id: number("CONCEPT_CLASS_ID", default_concepts.class_id),
            datatype_id: number("CONCEPT_DATATYPE_ID", default_concepts.datatype_id),
            retired: number("CONCEPT_RETIRED", 0) != 0,
            is_set: number("CONCEPT_IS_SET", 0) != 0,
            creator_id: number("CONCEPT_CREATOR_ID", default_concepts.creator_id),
            source_id: number("CONCEPT_SOURCE_ID", default_concepts.source_id),
            map_type_id: number("CONCEPT_MAP_TYPE_ID", default_concepts.map_type_id),
            diagnosis_set_id: number("CONCEPT_SET_ID", default_concepts.diagnosis_set_id),
            locale: text("CONCEPT_LOCALE", &default_concepts.locale),
            name_type: text("CONCEPT_NAME_TYPE", &default_concepts.name_type),
        };

        let default_retry = RetryPolicy::default();
        let retry = RetryPolicy {
            total: parse_or(&lookup, "RETRY_TOTAL", default_retry.total),
            backoff_factor: parse_or(&lookup, "RETRY_BACKOFF_FACTOR", default_retry.backoff_factor),
            status_forcelist: lookup("RETRY_STATUS_FORCELIST")
                .map(|list| parse_list(&list, ','))
                .unwrap_or(default_retry.status_forcelist),
        };

        Self {
            database_url: text(
                "DATABASE_URL",
                "host=localhost user=postgres dbname=openmrs",
            ),
            apply_schema: matches!(
                lookup("DB_APPLY_SCHEMA").as_deref().map(str::trim),
                Some("1" | "true" | "yes")
            ),
            bind_address: text("BIND_ADDRESS", "0.0.0.0:8080"),
            cors_origins: text("CORS_ORIGINS", "*")
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            rate_limit_rps: parse_or(&lookup, "RATE_LIMIT_RPS", 100u32).max(1),
            ddx: ModelEndpoint {
                url: text("DDX_MODEL_URL", "http://127.0.0.1:5050/predict/v1"),
                model_name: text("DDX_MODEL_NAME", "gemini-2.0-flash"),
                index_name: text("DDX_INDEX_NAME", "ddx_req"),
            },
            ttx: ModelEndpoint {
                url: text("TTX_MODEL_URL", "http://127.0.0.1:5051/ttx/v1"),
                model_name: text("TTX_MODEL_NAME", "gemini-2.5-flash-preview-04-17"),
                index_name: text("TTX_INDEX_NAME", "ttx_req"),
            },
            model_timeout: Duration::from_secs(parse_or(&lookup, "MODEL_TIMEOUT_SECS", 120u64)),
            retry,
            elasticsearch_url: text("ELASTICSEARCH_URL", "http://localhost:9200"),
            snomed_base_url: text("SNOMED_BASE_URL", "http://localhost:8081"),
            concepts,
            parse_options: parse_options(&lookup),
        }
    }
}

/// Rationale cleanup heuristics; an empty `DDX_CONTENT_ANCHOR` disables truncation
fn parse_options<F>(lookup: &F) -> ParseOptions
where
    F: Fn(&str) -> Option<String>,
{
    let markers: Vec<String> = lookup("DDX_RATIONALE_MARKERS")
        .map(|list| parse_list(&list, '|'))
        .unwrap_or_else(|| {
            DEFAULT_BOILERPLATE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect()
        });

    let options = ParseOptions::default().with_boilerplate_markers(markers);
    match lookup("DDX_CONTENT_ANCHOR") {
        Some(anchor) if anchor.trim().is_empty() => options.without_content_anchor(),
        Some(anchor) => options.with_content_anchor(anchor),
        None => options.with_content_anchor(DEFAULT_CONTENT_ANCHOR),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = ?default, "Invalid config value, using default");
            default
        }),
        None => default,
    }
}

fn parse_list<T: FromStr>(raw: &str, separator: char) -> Vec<T> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| item.parse().ok())
        .collect()
}
