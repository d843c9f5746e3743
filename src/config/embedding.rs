//! Embedding backend configuration

use serde::{Deserialize, Serialize};

/// Default timeout for HTTP backend requests
fn default_timeout() -> u64 {
    30
}

fn default_backend() -> String {
    "http".to_string()
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_dimensions() -> usize {
    384
}

/// Resolved backend configuration for dense encoders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum BackendConfig {
    /// OpenAI-compatible HTTP endpoint
    ///
    /// Works with: OpenAI API, LM Studio, vLLM, Ollama (OpenAI compat mode),
    /// text-embeddings-inference
    Http {
        /// API endpoint URL (e.g., "http://localhost:8081/v1/embeddings")
        endpoint: String,
        /// API key (optional)
        api_key: Option<String>,
        /// Model name sent with each request
        model: String,
        /// Embedding dimensions
        dimensions: usize,
        /// Request timeout in seconds
        timeout_secs: u64,
    },
    /// Deterministic hash-based encoder with no semantic meaning.
    /// Useful for offline smoke tests against a store without a model.
    Hash {
        /// Embedding dimensions
        dimensions: usize,
    },
}

/// Embedding model configuration (flat TOML fields)
///
/// ```toml
/// [embedding]
/// backend = "http"
/// endpoint = "http://localhost:8081/v1/embeddings"
/// model_name = "all-MiniLM-L6-v2"
/// dimensions = 384
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Backend type: "http" or "hash"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// HTTP backend: API endpoint URL
    #[serde(default)]
    pub endpoint: Option<String>,
    /// HTTP backend: API key (optional)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name sent with API requests
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Embedding dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// HTTP backend: request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    /// Resolve the tagged backend configuration from the flat fields.
    /// An http backend without an endpoint falls back to the hash encoder;
    /// `Config::validate` reports that combination as a configuration error.
    pub fn resolve_backend(&self) -> BackendConfig {
        match self.backend.as_str() {
            "http" => match self.endpoint.clone() {
                Some(endpoint) if !endpoint.is_empty() => BackendConfig::Http {
                    endpoint,
                    api_key: self.api_key.clone(),
                    model: self.model_name.clone(),
                    dimensions: self.dimensions,
                    timeout_secs: self.timeout_secs,
                },
                _ => BackendConfig::Hash {
                    dimensions: self.dimensions,
                },
            },
            _ => BackendConfig::Hash {
                dimensions: self.dimensions,
            },
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            endpoint: Some("http://localhost:8081/v1/embeddings".to_string()),
            api_key: None,
            model_name: default_model_name(),
            dimensions: default_dimensions(),
            timeout_secs: default_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_http_backend() {
        let cfg = EmbeddingConfig::default();
        match cfg.resolve_backend() {
            BackendConfig::Http { endpoint, model, dimensions, .. } => {
                assert_eq!(endpoint, "http://localhost:8081/v1/embeddings");
                assert_eq!(model, "all-MiniLM-L6-v2");
                assert_eq!(dimensions, 384);
            }
            other => panic!("expected http backend, got {:?}", other),
        }
    }

    #[test]
    fn resolve_hash_backend_when_endpoint_missing() {
        let cfg = EmbeddingConfig {
            endpoint: None,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(cfg.resolve_backend(), BackendConfig::Hash { dimensions: 384 }));
    }

    #[test]
    fn resolve_hash_backend_by_name() {
        let cfg = EmbeddingConfig {
            backend: "hash".to_string(),
            dimensions: 16,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(cfg.resolve_backend(), BackendConfig::Hash { dimensions: 16 }));
    }
}
