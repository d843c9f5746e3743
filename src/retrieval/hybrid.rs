//! Hybrid fusion ranker: dense + sparse candidate generation, in-process
//! RRF fusion, then an authoritative dense rescoring pass.
//!
//! The returned ORDER reflects fusion (lexical and semantic agreement);
//! every returned SCORE is the true dense cosine similarity, so hybrid
//! results stay numerically comparable to dense-only results.

use super::fusion::{reciprocal_rank_fusion, RrfConfig};
use crate::config::VectorStoreConfig;
use crate::embedding::{DenseEncoder, SparseEncoder};
use crate::error::CompareResult;
use crate::store::{ScoredPoint, VectorStore};
use crate::types::{payload_text, PointId, RankedMatch};
use crate::util::truncate_str;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Three-phase hybrid retrieval over the external store.
pub struct HybridRanker {
    encoder: Arc<dyn DenseEncoder>,
    sparse_encoder: SparseEncoder,
    store: Arc<dyn VectorStore>,
    hybrid_collection: String,
    dense_collection: String,
    dense_vector: String,
    sparse_vector: String,
    rrf: RrfConfig,
}

impl HybridRanker {
    pub fn new(
        encoder: Arc<dyn DenseEncoder>,
        store: Arc<dyn VectorStore>,
        config: &VectorStoreConfig,
        rrf_k: usize,
    ) -> Self {
        Self {
            encoder,
            sparse_encoder: SparseEncoder::new(),
            store,
            hybrid_collection: config.hybrid_collection.clone(),
            dense_collection: config.dense_collection.clone(),
            dense_vector: config.dense_vector.clone(),
            sparse_vector: config.sparse_vector.clone(),
            rrf: RrfConfig { k: rrf_k },
        }
    }

    /// Run the generate → fuse → rescore pipeline.
    ///
    /// Candidate budgets smaller than `top_k` shorten the result
    /// (recall-limited, not an error). A fused id the rescoring query
    /// cannot retrieve keeps its position with no score.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        candidates_dense: usize,
        candidates_sparse: usize,
    ) -> CompareResult<Vec<RankedMatch>> {
        // Phase 1: candidate generation. The query is encoded once; the two
        // nearest-neighbor queries have no data dependency and run
        // concurrently, bounding latency to the slower of the two.
        let query_vec = self.encoder.encode(query).await?;
        let sparse_vec = self.sparse_encoder.encode(query);

        let (dense_candidates, sparse_candidates) = tokio::try_join!(
            self.store.query_dense(
                &self.hybrid_collection,
                &self.dense_vector,
                &query_vec,
                candidates_dense,
                None,
                true,
            ),
            self.store.query_sparse(
                &self.hybrid_collection,
                &self.sparse_vector,
                &sparse_vec,
                candidates_sparse,
            ),
        )?;

        debug!(
            "Hybrid candidates: dense={}, sparse={}",
            dense_candidates.len(),
            sparse_candidates.len()
        );

        if dense_candidates.is_empty() && sparse_candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Phase 2: in-process fusion, truncated to top_k.
        let lists = vec![point_ids(&dense_candidates), point_ids(&sparse_candidates)];
        let mut fused = reciprocal_rank_fusion(&lists, &self.rrf);
        fused.truncate(top_k);

        let texts = candidate_texts(&dense_candidates, &sparse_candidates);
        let fused_ids: Vec<PointId> = fused.iter().map(|f| f.id.clone()).collect();

        // Phase 3: one dense query restricted to the fused ids yields the
        // authoritative cosine per id, independent of fusion math.
        let rescored = self
            .store
            .query_dense(
                &self.dense_collection,
                &self.dense_vector,
                &query_vec,
                fused_ids.len(),
                Some(&fused_ids),
                false,
            )
            .await?;
        let cosine_by_id: HashMap<&str, f32> =
            rescored.iter().map(|p| (p.id.as_str(), p.score)).collect();

        let results: Vec<RankedMatch> = fused
            .into_iter()
            .map(|candidate| {
                let score = cosine_by_id.get(candidate.id.as_str()).copied();
                let text = texts
                    .get(candidate.id.as_str())
                    .map(|t| t.to_string())
                    .unwrap_or_default();
                RankedMatch::from_point(candidate.id, score, text)
            })
            .collect();

        info!(
            "Hybrid search for '{}': {} results",
            truncate_str(query, 50),
            results.len()
        );
        Ok(results)
    }
}

fn point_ids(points: &[ScoredPoint]) -> Vec<PointId> {
    points.iter().map(|p| p.id.clone()).collect()
}

/// Display texts come from the candidate payloads; the dense list wins when
/// both carry the same id.
fn candidate_texts<'a>(
    dense: &'a [ScoredPoint],
    sparse: &'a [ScoredPoint],
) -> HashMap<&'a str, &'a str> {
    let mut texts = HashMap::new();
    for point in dense.iter().chain(sparse.iter()) {
        if let Some(text) = payload_text(&point.payload) {
            texts.entry(point.id.as_str()).or_insert(text);
        }
    }
    texts
}
