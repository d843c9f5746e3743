//! Pluggable dense encoder backends
//!
//! Two backends are provided:
//!
//! - **http**: OpenAI-compatible embedding APIs (OpenAI, LM Studio, vLLM,
//!   Ollama in compat mode, text-embeddings-inference)
//! - **hash**: deterministic hash embeddings with no semantic meaning, for
//!   offline smoke tests against a store without a model
//!
//! ```toml
//! [embedding]
//! backend = "http"
//! endpoint = "http://localhost:8081/v1/embeddings"
//! model_name = "all-MiniLM-L6-v2"
//! dimensions = 384
//! ```

mod http;
mod traits;

pub use http::{HttpEncoder, HttpEncoderConfig};
pub use traits::{DenseEncoder, EncodeError, EncodeResult};

use crate::config::{BackendConfig, EmbeddingConfig};
use crate::types::Embedding;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Deterministic hash-based encoder.
///
/// Produces the same vector for the same text but carries no semantic
/// meaning; nearest-neighbor results over hash embeddings are only useful
/// for exercising the pipeline.
#[derive(Debug, Clone)]
pub struct HashEncoder {
    dimensions: usize,
}

impl HashEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Generate a unit-length hash embedding for the given text
    pub fn embed(&self, text: &str) -> Embedding {
        let hash = xxhash_rust::xxh3::xxh3_64(text.as_bytes());
        let raw: Vec<f32> = (0..self.dimensions)
            .map(|i| {
                let h = xxhash_rust::xxh3::xxh3_64_with_seed(text.as_bytes(), hash ^ i as u64);
                ((h % 1000) as f32 / 500.0) - 1.0
            })
            .collect();
        http::normalize_embedding(&raw)
    }
}

#[async_trait]
impl DenseEncoder for HashEncoder {
    async fn encode(&self, text: &str) -> EncodeResult<Embedding> {
        Ok(self.embed(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// Build an encoder from configuration
pub fn build_encoder(config: &EmbeddingConfig) -> EncodeResult<Arc<dyn DenseEncoder>> {
    match config.resolve_backend() {
        BackendConfig::Http {
            endpoint,
            api_key,
            model,
            dimensions,
            timeout_secs,
        } => {
            let encoder = HttpEncoder::new(HttpEncoderConfig {
                endpoint,
                api_key,
                model,
                dimensions,
                timeout_secs,
            })?;
            Ok(Arc::new(encoder))
        }
        BackendConfig::Hash { dimensions } => {
            info!("Using deterministic hash encoder ({} dimensions)", dimensions);
            Ok(Arc::new(HashEncoder::new(dimensions)))
        }
    }
}
