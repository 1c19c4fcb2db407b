/// Configuration module for plagscan.
///
/// Handles loading, validating, and providing default configuration values.
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::search::SearchCredentials;

pub const API_KEY_ENV: &str = "PLAGSCAN_API_KEY";
pub const SEARCH_ENGINE_ID_ENV: &str = "PLAGSCAN_SEARCH_ENGINE_ID";

// ── Default value functions ──────────────────────────────────────────

fn default_compare_chunk_tokens() -> usize {
    150
}

fn default_query_chunk_chars() -> usize {
    200
}

fn default_min_query_chunk_chars() -> usize {
    50
}

fn default_corpus_threshold() -> f64 {
    30.0
}

fn default_document_threshold() -> f64 {
    25.0
}

fn default_document_boost() -> f64 {
    1.1
}

fn default_snippet_chars() -> usize {
    150
}

fn default_endpoint() -> String {
    crate::search::google::DEFAULT_ENDPOINT.to_string()
}

fn default_max_query_chunks() -> usize {
    3
}

fn default_max_results() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_weights() -> Vec<f64> {
    vec![0.6, 0.25, 0.15]
}

fn default_residual_weight() -> f64 {
    0.1
}

fn default_top_k() -> usize {
    3
}

fn default_collection() -> String {
    crate::corpus::DEFAULT_COLLECTION.to_string()
}

fn default_display_limit() -> usize {
    5
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub aggregate: AggregateConfig,

    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Matches returned to the caller.
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChunkingConfig {
    /// Tokens per chunk when comparing against corpus records and documents.
    #[serde(default = "default_compare_chunk_tokens")]
    pub compare_chunk_tokens: usize,

    /// Target characters per web-search query.
    #[serde(default = "default_query_chunk_chars")]
    pub query_chunk_chars: usize,

    /// Shorter query chunks are not sent.
    #[serde(default = "default_min_query_chunk_chars")]
    pub min_query_chunk_chars: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_corpus_threshold")]
    pub corpus_threshold: f64,

    #[serde(default = "default_document_threshold")]
    pub document_threshold: f64,

    /// Multiplier applied to uploaded-document scores, in `[1.0, 1.5]`.
    #[serde(default = "default_document_boost")]
    pub document_boost: f64,

    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_engine_id: Option<String>,

    #[serde(default = "default_max_query_chunks")]
    pub max_query_chunks: usize,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Substitute simulated hits when the provider is unusable.
    #[serde(default = "default_true")]
    pub fallback_on_failure: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AggregateConfig {
    /// Weights for ranks 1, 2, 3, ...
    #[serde(default = "default_weights")]
    pub weights: Vec<f64>,

    /// Weight for ranks past `weights` but within `top_k`.
    #[serde(default = "default_residual_weight")]
    pub residual_weight: f64,

    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_collection")]
    pub default_collection: String,

    /// JSON corpus replacing the built-in collections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            matching: MatchingConfig::default(),
            search: SearchConfig::default(),
            aggregate: AggregateConfig::default(),
            corpus: CorpusConfig::default(),
            display_limit: default_display_limit(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            compare_chunk_tokens: default_compare_chunk_tokens(),
            query_chunk_chars: default_query_chunk_chars(),
            min_query_chunk_chars: default_min_query_chunk_chars(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            corpus_threshold: default_corpus_threshold(),
            document_threshold: default_document_threshold(),
            document_boost: default_document_boost(),
            snippet_chars: default_snippet_chars(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            search_engine_id: None,
            max_query_chunks: default_max_query_chunks(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            fallback_on_failure: default_true(),
        }
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            weights: default_weights(),
            residual_weight: default_residual_weight(),
            top_k: default_top_k(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            default_collection: default_collection(),
            path: None,
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl SearchConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Credentials from the config file, else from the environment.
    ///
    /// Returns `None` unless both the key and the engine id are non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<SearchCredentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    /// [`Self::credentials`] with `lookup` standing in for the environment.
    fn credentials_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<SearchCredentials> {
        let resolve = |configured: &Option<String>, var: &str| {
            non_empty(configured.clone()).or_else(|| non_empty(lookup(var)))
        };
        let credentials = SearchCredentials {
            api_key: resolve(&self.api_key, API_KEY_ENV)?,
            search_engine_id: resolve(&self.search_engine_id, SEARCH_ENGINE_ID_ENV)?,
        };
        credentials.is_complete().then_some(credentials)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// A missing or unparsable file yields the default configuration.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.chunking.compare_chunk_tokens > 0,
            "chunking.compare_chunk_tokens must be positive"
        );
        anyhow::ensure!(
            self.chunking.query_chunk_chars > 0,
            "chunking.query_chunk_chars must be positive"
        );
        anyhow::ensure!(
            (1.0..=1.5).contains(&self.matching.document_boost),
            "matching.document_boost must be within [1.0, 1.5]"
        );
        for (name, threshold) in [
            ("corpus_threshold", self.matching.corpus_threshold),
            ("document_threshold", self.matching.document_threshold),
        ] {
            anyhow::ensure!(
                (0.0..=100.0).contains(&threshold),
                "matching.{name} must be within [0, 100]"
            );
        }
        anyhow::ensure!(
            self.search.max_query_chunks > 0,
            "search.max_query_chunks must be positive"
        );
        anyhow::ensure!(self.search.timeout_secs > 0, "search.timeout_secs must be positive");
        anyhow::ensure!(self.aggregate.top_k > 0, "aggregate.top_k must be positive");
        anyhow::ensure!(
            self.aggregate
                .weights
                .iter()
                .chain(std::iter::once(&self.aggregate.residual_weight))
                .all(|w| w.is_finite() && *w > 0.0),
            "aggregate weights must be positive"
        );
        anyhow::ensure!(self.display_limit > 0, "display_limit must be positive");
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chunking.compare_chunk_tokens, 150);
        assert_eq!(config.chunking.query_chunk_chars, 200);
        assert_eq!(config.chunking.min_query_chunk_chars, 50);
        assert_eq!(config.matching.corpus_threshold, 30.0);
        assert_eq!(config.matching.document_threshold, 25.0);
        assert_eq!(config.search.max_query_chunks, 3);
        assert_eq!(config.search.max_results, 5);
        assert!(config.search.fallback_on_failure);
        assert_eq!(config.aggregate.weights, vec![0.6, 0.25, 0.15]);
        assert_eq!(config.corpus.default_collection, "academic");
        assert_eq!(config.display_limit, 5);
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{"matching": {"corpus_threshold": 40}, "display_limit": 3}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.matching.corpus_threshold, 40.0);
        assert_eq!(config.display_limit, 3);
        // Other fields should have defaults
        assert_eq!(config.matching.document_threshold, 25.0);
        assert_eq!(config.search.timeout_secs, 10);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("absent.json");
        let config = Config::load(&path.to_string_lossy()).unwrap();
        assert_eq!(config.display_limit, 5);
    }

    #[test]
    fn test_load_invalid_json_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = Config::load(&path.to_string_lossy()).unwrap();
        assert_eq!(config.chunking.compare_chunk_tokens, 150);
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("plagscan.json");
        let path = path.to_string_lossy();

        let mut config = Config::default();
        config.search.max_results = 8;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.search.max_results, 8);
    }

    #[test]
    fn test_validate_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_boost() {
        let mut config = Config::default();
        config.matching.document_boost = 2.0;
        assert!(config.validate().is_err());
        config.matching.document_boost = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_weights() {
        let mut config = Config::default();
        config.aggregate.weights = vec![0.6, -0.1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_chunk_size() {
        let mut config = Config::default();
        config.chunking.compare_chunk_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_from_config() {
        let mut search = SearchConfig::default();
        search.api_key = Some("key".to_string());
        search.search_engine_id = Some("cx".to_string());
        let creds = search.credentials_with(|_| None).unwrap();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.search_engine_id, "cx");
    }

    #[test]
    fn test_blank_credentials_ignored() {
        let mut search = SearchConfig::default();
        search.api_key = Some("   ".to_string());
        search.search_engine_id = Some("cx".to_string());
        assert!(search.credentials_with(|_| None).is_none());

        let blank_env = |_: &str| Some(" ".to_string());
        assert!(search.credentials_with(blank_env).is_none());
    }

    #[test]
    fn test_credentials_fall_back_to_environment() {
        let mut search = SearchConfig::default();
        search.search_engine_id = Some("cx".to_string());
        let lookup = |name: &str| (name == API_KEY_ENV).then(|| "env-key".to_string());
        let creds = search.credentials_with(lookup).unwrap();
        assert_eq!(creds.api_key, "env-key");
        assert_eq!(creds.search_engine_id, "cx");

        // a configured value wins over the environment
        search.api_key = Some("file-key".to_string());
        assert_eq!(search.credentials_with(lookup).unwrap().api_key, "file-key");
    }
}
