//! Ranking configuration

use serde::{Deserialize, Serialize};

fn default_ngram_min() -> usize {
    1
}

fn default_ngram_max() -> usize {
    2
}

fn default_min_df() -> usize {
    2
}

fn default_max_df() -> f32 {
    0.9
}

fn default_max_features() -> usize {
    100_000
}

fn default_rrf_k() -> usize {
    60
}

fn default_candidates() -> usize {
    10
}

/// Tuning knobs for the lexical and hybrid rankers.
///
/// The vectorizer fields fix the vocabulary derivation: the same corpus and
/// settings always rebuild the same term-vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Smallest n-gram length emitted by the vectorizer
    #[serde(default = "default_ngram_min")]
    pub ngram_min: usize,
    /// Largest n-gram length emitted by the vectorizer
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
    /// Drop terms present in fewer than this many documents
    #[serde(default = "default_min_df")]
    pub min_df: usize,
    /// Drop terms present in more than this fraction of documents
    #[serde(default = "default_max_df")]
    pub max_df: f32,
    /// Cap on vocabulary size, keeping the most frequent terms
    #[serde(default = "default_max_features")]
    pub max_features: usize,
    /// Reciprocal rank fusion constant
    #[serde(default = "default_rrf_k")]
    pub rrf_k: usize,
    /// Dense candidate budget for hybrid recall
    #[serde(default = "default_candidates")]
    pub candidates_dense: usize,
    /// Sparse candidate budget for hybrid recall
    #[serde(default = "default_candidates")]
    pub candidates_sparse: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            ngram_min: default_ngram_min(),
            ngram_max: default_ngram_max(),
            min_df: default_min_df(),
            max_df: default_max_df(),
            max_features: default_max_features(),
            rrf_k: default_rrf_k(),
            candidates_dense: default_candidates(),
            candidates_sparse: default_candidates(),
        }
    }
}
