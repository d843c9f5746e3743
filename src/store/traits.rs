//! Vector store capability contract.
//!
//! The rankers consume the external store through this trait only; the
//! concrete REST client is replaceable glue.

use crate::embedding::SparseVector;
use crate::types::{Embedding, Payload, PointId};
use async_trait::async_trait;
use thiserror::Error;

/// Store-related errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store unreachable (connection refused, timeout)
    #[error("vector store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected a request
    #[error("vector store request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// The store answered with something we could not interpret
    #[error("unexpected vector store response: {0}")]
    InvalidResponse(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A scored point returned by a nearest-neighbor query, ordered by the
/// store's native metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub id: PointId,
    pub score: f32,
    pub payload: Payload,
}

/// A point fetched by id, without a score.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub id: PointId,
    pub payload: Payload,
}

/// One point to insert or overwrite.
#[derive(Debug, Clone)]
pub struct PointInsert {
    pub id: PointId,
    pub dense: Embedding,
    /// Present only for points destined for a hybrid collection
    pub sparse: Option<SparseVector>,
    pub payload: Payload,
}

/// Shape of a collection to provision.
#[derive(Debug, Clone)]
pub struct CollectionSchema {
    pub name: String,
    /// Named dense vector, cosine distance
    pub dense_vector: String,
    pub dense_size: usize,
    /// Named sparse vector, absent for dense-only collections
    pub sparse_vector: Option<String>,
}

/// Nearest-neighbor index capability consumed by the rankers.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if it does not exist. Returns true if it was
    /// created, false if it already existed.
    async fn ensure_collection(&self, schema: &CollectionSchema) -> StoreResult<bool>;

    /// Dense nearest-neighbor query, cosine distance, descending score.
    /// An id filter restricts the search to exactly those points.
    async fn query_dense(
        &self,
        collection: &str,
        vector_name: &str,
        vector: &[f32],
        limit: usize,
        id_filter: Option<&[PointId]>,
        with_payload: bool,
    ) -> StoreResult<Vec<ScoredPoint>>;

    /// Sparse nearest-neighbor query, internally ranked by the store.
    async fn query_sparse(
        &self,
        collection: &str,
        vector_name: &str,
        vector: &SparseVector,
        limit: usize,
    ) -> StoreResult<Vec<ScoredPoint>>;

    /// Fetch points by id, unordered, payloads included.
    async fn retrieve(&self, collection: &str, ids: &[PointId]) -> StoreResult<Vec<PointRecord>>;

    /// Insert or overwrite points.
    async fn upsert(&self, collection: &str, points: Vec<PointInsert>) -> StoreResult<()>;

    /// Exact point count of a collection.
    async fn count(&self, collection: &str) -> StoreResult<u64>;
}
