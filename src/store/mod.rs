//! External vector store access.
//!
//! `VectorStore` is the nearest-neighbor capability contract the rankers and
//! the ingest pipeline consume; `HttpVectorStore` is the Qdrant-style REST
//! implementation behind it.

mod http;
mod traits;

pub use http::HttpVectorStore;
pub use traits::{
    CollectionSchema, PointInsert, PointRecord, ScoredPoint, StoreError, StoreResult, VectorStore,
};
