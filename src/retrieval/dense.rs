//! Dense ranker: embedding nearest-neighbor pass-through.

use crate::config::VectorStoreConfig;
use crate::embedding::DenseEncoder;
use crate::error::CompareResult;
use crate::store::VectorStore;
use crate::types::{payload_text, RankedMatch};
use std::sync::Arc;
use tracing::debug;

/// Ranks store documents by dense cosine similarity.
///
/// The adapter's native metric is authoritative; results come back in the
/// store's order with no local rescoring.
pub struct DenseRanker {
    encoder: Arc<dyn DenseEncoder>,
    store: Arc<dyn VectorStore>,
    collection: String,
    vector_name: String,
}

impl DenseRanker {
    pub fn new(
        encoder: Arc<dyn DenseEncoder>,
        store: Arc<dyn VectorStore>,
        config: &VectorStoreConfig,
    ) -> Self {
        Self {
            encoder,
            store,
            collection: config.dense_collection.clone(),
            vector_name: config.dense_vector.clone(),
        }
    }

    /// Encode the query and run one nearest-neighbor search.
    pub async fn search(&self, query: &str, top_k: usize) -> CompareResult<Vec<RankedMatch>> {
        let query_vec = self.encoder.encode(query).await?;
        let points = self
            .store
            .query_dense(
                &self.collection,
                &self.vector_name,
                &query_vec,
                top_k,
                None,
                true,
            )
            .await?;

        debug!("Dense search: {} results", points.len());

        Ok(points
            .into_iter()
            .map(|p| {
                let text = payload_text(&p.payload).unwrap_or_default().to_string();
                RankedMatch::from_point(p.id, Some(p.score), text)
            })
            .collect())
    }
}
