//! Dense encoder trait definition

use crate::types::Embedding;
use async_trait::async_trait;
use std::fmt::Debug;

/// Errors that can occur while encoding text
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The backend rejected the input text
    #[error("input rejected: {0}")]
    Rejected(String),

    /// Embedding generation failed
    #[error("encoding failed: {0}")]
    Failed(String),

    /// Network or HTTP error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for encoding operations
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Core trait for dense encoders.
///
/// Object-safe so rankers can hold a `dyn DenseEncoder` injected at startup.
#[async_trait]
pub trait DenseEncoder: Send + Sync + Debug {
    /// Encode a single text into a dense vector
    async fn encode(&self, text: &str) -> EncodeResult<Embedding>;

    /// Encode a batch of texts
    ///
    /// The default implementation encodes one text at a time; backends with
    /// a batch API should override it.
    async fn encode_batch(&self, texts: &[String]) -> EncodeResult<Vec<Embedding>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.encode(text).await?);
        }
        Ok(out)
    }

    /// Embedding dimensions produced by this encoder
    fn dimensions(&self) -> usize;

    /// Backend name (e.g., "http", "hash")
    fn name(&self) -> &str;
}
