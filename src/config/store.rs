//! Vector store configuration

use serde::{Deserialize, Serialize};

fn default_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_hybrid_collection() -> String {
    "docs_hybrid".to_string()
}

fn default_dense_collection() -> String {
    "docs_dense".to_string()
}

fn default_dense_vector() -> String {
    "dense".to_string()
}

fn default_sparse_vector() -> String {
    "sparse".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Configuration for the external vector store.
///
/// Two collections back the store-side strategies: a hybrid collection
/// carrying both named vectors (candidate generation) and a dense-only
/// collection (dense ranking and hybrid rescoring).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Base URL of the store's REST API
    #[serde(default = "default_url")]
    pub url: String,
    /// API key sent with each request (optional)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Collection holding dense + sparse named vectors
    #[serde(default = "default_hybrid_collection")]
    pub hybrid_collection: String,
    /// Collection holding only the dense named vector
    #[serde(default = "default_dense_collection")]
    pub dense_collection: String,
    /// Name of the dense vector within collections
    #[serde(default = "default_dense_vector")]
    pub dense_vector: String,
    /// Name of the sparse vector within the hybrid collection
    #[serde(default = "default_sparse_vector")]
    pub sparse_vector: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            hybrid_collection: default_hybrid_collection(),
            dense_collection: default_dense_collection(),
            dense_vector: default_dense_vector(),
            sparse_vector: default_sparse_vector(),
            timeout_secs: default_timeout(),
        }
    }
}
