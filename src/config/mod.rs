//! Configuration for the comparison service

mod embedding;
mod http;
mod logging;
mod ranking;
mod store;

pub use embedding::{BackendConfig, EmbeddingConfig};
pub use http::HttpConfig;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use ranking::RankingConfig;
pub use store::VectorStoreConfig;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Corpus snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Path to the JSONL corpus file
    pub path: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/corpus.jsonl"),
        }
    }
}

/// Main configuration for the comparison service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Corpus configuration
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Embedding backend configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Vector store configuration
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    /// Ranking configuration
    #[serde(default)]
    pub ranking: RankingConfig,
    /// HTTP API server configuration
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            embedding: EmbeddingConfig::default(),
            vector_store: VectorStoreConfig::default(),
            ranking: RankingConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass rather than playing whack-a-mole.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        // Corpus validation
        if self.corpus.path.as_os_str().is_empty() {
            errors.push("corpus path must not be empty".to_string());
        }

        // Embedding validation
        if self.embedding.dimensions == 0 {
            errors.push("embedding dimensions must be positive".to_string());
        }
        if self.embedding.dimensions > 4096 {
            errors.push("embedding dimensions must be <= 4096".to_string());
        }
        match self.embedding.backend.as_str() {
            "http" => {
                if self.embedding.endpoint.as_deref().unwrap_or("").is_empty() {
                    errors.push("embedding endpoint is required for the http backend".to_string());
                }
            }
            "hash" => {}
            other => {
                errors.push(format!("unknown embedding backend '{}'", other));
            }
        }

        // Vector store validation
        if self.vector_store.url.is_empty() {
            errors.push("vector store url must not be empty".to_string());
        }
        if self.vector_store.hybrid_collection.is_empty()
            || self.vector_store.dense_collection.is_empty()
        {
            errors.push("vector store collection names must not be empty".to_string());
        }
        if self.vector_store.hybrid_collection == self.vector_store.dense_collection {
            errors.push("hybrid and dense collections must have distinct names".to_string());
        }
        if self.vector_store.dense_vector.is_empty() || self.vector_store.sparse_vector.is_empty() {
            errors.push("vector store vector names must not be empty".to_string());
        }

        // Ranking validation
        if self.ranking.ngram_min == 0 {
            errors.push("ngram_min must be positive".to_string());
        }
        if self.ranking.ngram_max < self.ranking.ngram_min {
            errors.push("ngram_max must be >= ngram_min".to_string());
        }
        if self.ranking.min_df == 0 {
            errors.push("min_df must be positive".to_string());
        }
        if self.ranking.max_df <= 0.0 || self.ranking.max_df > 1.0 {
            errors.push("max_df must be between 0.0 (exclusive) and 1.0".to_string());
        }
        if self.ranking.max_features == 0 {
            errors.push("max_features must be positive".to_string());
        }
        if self.ranking.rrf_k == 0 {
            errors.push("rrf_k must be positive".to_string());
        }
        if self.ranking.candidates_dense == 0 || self.ranking.candidates_sparse == 0 {
            errors.push("hybrid candidate budgets must be positive".to_string());
        }

        // HTTP config validation
        if !self.http.listen_addr.is_empty() {
            // Extract port from listen_addr (format: "host:port")
            if let Some(port_str) = self.http.listen_addr.rsplit(':').next() {
                if let Ok(port) = port_str.parse::<u32>() {
                    if port == 0 || port > 65535 {
                        errors.push(format!(
                            "HTTP listen port must be between 1 and 65535, got {}",
                            port
                        ));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Helper: build a valid default config for mutation-based testing
    // ========================================================================

    fn valid_config() -> Config {
        Config::default()
    }

    // ========================================================================
    // Config::validate – happy path
    // ========================================================================

    #[test]
    fn default_config_passes_validation() {
        let cfg = valid_config();
        assert!(cfg.validate().is_ok(), "default config should be valid");
    }

    // ========================================================================
    // Config::validate – embedding errors
    // ========================================================================

    #[test]
    fn validate_rejects_zero_embedding_dimensions() {
        let mut cfg = valid_config();
        cfg.embedding.dimensions = 0;
        let err = cfg.validate().unwrap_err();
        assert!(
            err.to_string().contains("embedding dimensions must be positive"),
            "unexpected error message: {}",
            err
        );
    }

    #[test]
    fn validate_rejects_http_backend_without_endpoint() {
        let mut cfg = valid_config();
        cfg.embedding.backend = "http".to_string();
        cfg.embedding.endpoint = None;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("embedding endpoint is required"));
    }

    #[test]
    fn validate_rejects_unknown_backend() {
        let mut cfg = valid_config();
        cfg.embedding.backend = "onnx".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("unknown embedding backend"));
    }

    // ========================================================================
    // Config::validate – vector store errors
    // ========================================================================

    #[test]
    fn validate_rejects_colliding_collection_names() {
        let mut cfg = valid_config();
        cfg.vector_store.dense_collection = cfg.vector_store.hybrid_collection.clone();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("distinct names"));
    }

    #[test]
    fn validate_rejects_empty_store_url() {
        let mut cfg = valid_config();
        cfg.vector_store.url = String::new();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("vector store url must not be empty"));
    }

    // ========================================================================
    // Config::validate – ranking errors
    // ========================================================================

    #[test]
    fn validate_rejects_inverted_ngram_range() {
        let mut cfg = valid_config();
        cfg.ranking.ngram_min = 3;
        cfg.ranking.ngram_max = 2;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("ngram_max must be >= ngram_min"));
    }

    #[test]
    fn validate_rejects_max_df_above_one() {
        let mut cfg = valid_config();
        cfg.ranking.max_df = 1.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("max_df"));
    }

    #[test]
    fn validate_rejects_zero_rrf_k() {
        let mut cfg = valid_config();
        cfg.ranking.rrf_k = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("rrf_k must be positive"));
    }

    #[test]
    fn validate_rejects_zero_candidate_budget() {
        let mut cfg = valid_config();
        cfg.ranking.candidates_sparse = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("candidate budgets must be positive"));
    }

    // ========================================================================
    // Config::validate – HTTP errors
    // ========================================================================

    #[test]
    fn validate_rejects_out_of_range_port() {
        let mut cfg = valid_config();
        cfg.http.listen_addr = "127.0.0.1:99999".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("HTTP listen port"));
    }

    // ========================================================================
    // Config::load – TOML round trip
    // ========================================================================

    #[test]
    fn parse_minimal_toml_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.embedding.dimensions, 384);
        assert_eq!(cfg.ranking.rrf_k, 60);
        assert_eq!(cfg.vector_store.hybrid_collection, "docs_hybrid");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_overrides_from_toml() {
        let toml_str = r#"
            [corpus]
            path = "data/pt-300.jsonl"

            [ranking]
            min_df = 1
            max_df = 1.0

            [vector_store]
            url = "http://qdrant:6333"
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.corpus.path, PathBuf::from("data/pt-300.jsonl"));
        assert_eq!(cfg.ranking.min_df, 1);
        assert_eq!(cfg.vector_store.url, "http://qdrant:6333");
        assert!(cfg.validate().is_ok());
    }
}
