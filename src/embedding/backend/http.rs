//! HTTP encoder for OpenAI-compatible embedding APIs
//!
//! Works with the OpenAI API as well as local servers (LM Studio, vLLM,
//! Ollama in OpenAI compat mode, text-embeddings-inference).

use super::traits::{DenseEncoder, EncodeError, EncodeResult};
use crate::types::Embedding;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum number of texts sent in a single request
const MAX_BATCH_SIZE: usize = 100;

/// Configuration for the HTTP encoder
#[derive(Debug, Clone)]
pub struct HttpEncoderConfig {
    /// API endpoint (e.g., "http://localhost:8081/v1/embeddings")
    pub endpoint: String,
    /// API key (optional, falls back to OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Model name sent with each request
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// OpenAI-compatible HTTP encoder
#[derive(Debug)]
pub struct HttpEncoder {
    client: Client,
    config: HttpEncoderConfig,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    encoding_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl HttpEncoder {
    /// Create a new HTTP encoder
    pub fn new(config: HttpEncoderConfig) -> EncodeResult<Self> {
        info!(
            "Initializing HTTP encoder: endpoint={}, model={}",
            config.endpoint, config.model
        );

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok());

        if let Some(key) = &api_key {
            let auth_value = format!("Bearer {}", key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| EncodeError::Config(format!("Invalid API key format: {}", e)))?,
            );
        } else if config.endpoint.contains("openai.com") {
            warn!("No API key provided for {}", config.endpoint);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| EncodeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn request_embeddings(&self, texts: &[&str]) -> EncodeResult<Vec<Embedding>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts.to_vec(),
            encoding_format: "float",
        };

        debug!(
            "Sending embedding request to {} for {} texts",
            self.config.endpoint,
            texts.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                if status == reqwest::StatusCode::BAD_REQUEST {
                    return Err(EncodeError::Rejected(error_response.error.message));
                }
                return Err(EncodeError::Failed(format!(
                    "API error ({}): {}",
                    status, error_response.error.message
                )));
            }

            return Err(EncodeError::Failed(format!(
                "HTTP error ({}): {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EncodeError::Failed(format!("Failed to parse response: {}", e)))?;

        if embedding_response.data.len() != texts.len() {
            return Err(EncodeError::Failed(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embedding_response.data.len()
            )));
        }

        // The API may return entries out of order
        let mut data = embedding_response.data;
        data.sort_by_key(|d| d.index);

        Ok(data
            .into_iter()
            .map(|d| normalize_embedding(&d.embedding))
            .collect())
    }
}

#[async_trait]
impl DenseEncoder for HttpEncoder {
    async fn encode(&self, text: &str) -> EncodeResult<Embedding> {
        let embeddings = self.request_embeddings(&[text]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EncodeError::Failed("No embedding returned".to_string()))
    }

    async fn encode_batch(&self, texts: &[String]) -> EncodeResult<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let text_refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let mut all_embeddings = Vec::with_capacity(texts.len());
        for chunk in text_refs.chunks(MAX_BATCH_SIZE) {
            all_embeddings.extend(self.request_embeddings(chunk).await?);
        }
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Normalize an embedding vector to unit length
pub(super) fn normalize_embedding(embedding: &[f32]) -> Embedding {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        embedding.iter().map(|x| x / norm).collect()
    } else {
        embedding.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_embedding() {
        let normalized = normalize_embedding(&[3.0, 4.0]);
        assert!((normalized[0] - 0.6).abs() < 1e-6);
        assert!((normalized[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        assert_eq!(normalize_embedding(&[0.0, 0.0]), vec![0.0, 0.0]);
    }
}
