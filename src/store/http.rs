//! Qdrant-style REST client for the vector store contract.

use super::traits::{
    CollectionSchema, PointInsert, PointRecord, ScoredPoint, StoreError, StoreResult, VectorStore,
};
use crate::config::VectorStoreConfig;
use crate::embedding::SparseVector;
use crate::types::{Payload, PointId};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// REST client for a Qdrant-compatible vector store.
pub struct HttpVectorStore {
    client: Client,
    base_url: String,
    dense_vector: String,
    sparse_vector: String,
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    result: QueryResult,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    points: Vec<RawScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct RawScoredPoint {
    id: Value,
    score: f32,
    #[serde(default)]
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct RetrieveEnvelope {
    result: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: Value,
    #[serde(default)]
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct CountEnvelope {
    result: CountResult,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: u64,
}

impl HttpVectorStore {
    /// Create a new store client from configuration
    pub fn new(config: &VectorStoreConfig) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| StoreError::InvalidResponse(format!("invalid api key: {}", e)))?;
            headers.insert("api-key", value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            dense_vector: config.dense_vector.clone(),
            sparse_vector: config.sparse_vector.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "no response body".to_string());
        Err(StoreError::Request {
            status: status.as_u16(),
            message,
        })
    }

    async fn run_query(&self, collection: &str, body: Value) -> StoreResult<Vec<ScoredPoint>> {
        let response = self
            .client
            .post(self.url(&format!("/collections/{}/points/query", collection)))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let envelope: QueryEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("query response: {}", e)))?;

        Ok(envelope
            .result
            .points
            .into_iter()
            .map(|p| ScoredPoint {
                id: id_to_string(&p.id),
                score: p.score,
                payload: p.payload.unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl VectorStore for HttpVectorStore {
    async fn ensure_collection(&self, schema: &CollectionSchema) -> StoreResult<bool> {
        let probe = self
            .client
            .get(self.url(&format!("/collections/{}", schema.name)))
            .send()
            .await
            .map_err(transport_error)?;
        if probe.status().is_success() {
            debug!("Collection already exists: {}", schema.name);
            return Ok(false);
        }
        if probe.status() != StatusCode::NOT_FOUND {
            Self::check_status(probe).await?;
            return Ok(false);
        }

        let mut vectors = serde_json::Map::new();
        vectors.insert(
            schema.dense_vector.clone(),
            json!({ "size": schema.dense_size, "distance": "Cosine" }),
        );
        let mut body = json!({ "vectors": vectors });
        if let Some(sparse) = &schema.sparse_vector {
            let mut sparse_vectors = serde_json::Map::new();
            sparse_vectors.insert(sparse.clone(), json!({}));
            body["sparse_vectors"] = Value::Object(sparse_vectors);
        }

        let response = self
            .client
            .put(self.url(&format!("/collections/{}", schema.name)))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        // Concurrent provisioning can race; losing the race is fine
        if response.status() == StatusCode::CONFLICT {
            debug!("Collection created concurrently: {}", schema.name);
            return Ok(false);
        }
        Self::check_status(response).await?;
        info!("Created collection: {}", schema.name);
        Ok(true)
    }

    async fn query_dense(
        &self,
        collection: &str,
        vector_name: &str,
        vector: &[f32],
        limit: usize,
        id_filter: Option<&[PointId]>,
        with_payload: bool,
    ) -> StoreResult<Vec<ScoredPoint>> {
        let mut body = json!({
            "query": vector,
            "using": vector_name,
            "limit": limit,
            "with_payload": with_payload,
        });
        if let Some(ids) = id_filter {
            body["filter"] = json!({ "must": [{ "has_id": ids }] });
        }
        self.run_query(collection, body).await
    }

    async fn query_sparse(
        &self,
        collection: &str,
        vector_name: &str,
        vector: &SparseVector,
        limit: usize,
    ) -> StoreResult<Vec<ScoredPoint>> {
        let body = json!({
            "query": {
                "indices": vector.indices,
                "values": vector.values,
            },
            "using": vector_name,
            "limit": limit,
            "with_payload": true,
        });
        self.run_query(collection, body).await
    }

    async fn retrieve(&self, collection: &str, ids: &[PointId]) -> StoreResult<Vec<PointRecord>> {
        let body = json!({
            "ids": ids,
            "with_payload": true,
            "with_vector": false,
        });
        let response = self
            .client
            .post(self.url(&format!("/collections/{}/points", collection)))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let envelope: RetrieveEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("retrieve response: {}", e)))?;

        Ok(envelope
            .result
            .into_iter()
            .map(|r| PointRecord {
                id: id_to_string(&r.id),
                payload: r.payload.unwrap_or_default(),
            })
            .collect())
    }

    async fn upsert(&self, collection: &str, points: Vec<PointInsert>) -> StoreResult<()> {
        let payload_points: Vec<Value> = points
            .into_iter()
            .map(|p| {
                let mut vector = json!({});
                vector[&self.dense_vector] = json!(p.dense);
                if let Some(sparse) = p.sparse {
                    vector[&self.sparse_vector] = json!({
                        "indices": sparse.indices,
                        "values": sparse.values,
                    });
                }
                json!({
                    "id": p.id,
                    "vector": vector,
                    "payload": p.payload,
                })
            })
            .collect();

        let response = self
            .client
            .put(self.url(&format!("/collections/{}/points?wait=true", collection)))
            .json(&json!({ "points": payload_points }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        let response = self
            .client
            .post(self.url(&format!("/collections/{}/points/count", collection)))
            .json(&json!({ "exact": true }))
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let envelope: CountEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("count response: {}", e)))?;
        Ok(envelope.result.count)
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Point ids come back as JSON strings or integers depending on how they
/// were written.
fn id_to_string(id: &Value) -> PointId {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_to_string_handles_both_shapes() {
        assert_eq!(id_to_string(&json!("abc-123")), "abc-123");
        assert_eq!(id_to_string(&json!(42)), "42");
    }

    #[test]
    fn test_query_envelope_deserialization() {
        let raw = r#"{
            "result": {
                "points": [
                    {"id": "a", "score": 0.9, "payload": {"text": "doc"}},
                    {"id": 7, "score": 0.5}
                ]
            }
        }"#;
        let envelope: QueryEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.result.points.len(), 2);
        assert_eq!(id_to_string(&envelope.result.points[1].id), "7");
        assert!(envelope.result.points[1].payload.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = VectorStoreConfig {
            url: "http://localhost:6333/".to_string(),
            ..VectorStoreConfig::default()
        };
        let store = HttpVectorStore::new(&config).unwrap();
        assert_eq!(store.url("/collections/x"), "http://localhost:6333/collections/x");
    }
}
