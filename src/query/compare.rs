//! Comparison orchestrator: one envelope per request, one list per
//! requested strategy.

use crate::config::{RankingConfig, VectorStoreConfig};
use crate::corpus::Corpus;
use crate::embedding::DenseEncoder;
use crate::error::CompareResult;
use crate::retrieval::{DenseRanker, HybridRanker, LexicalRanker, VectorizerConfig};
use crate::store::VectorStore;
use crate::types::{CompareMode, CompareOutcome, RankedMatch};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// The corpus snapshot and the lexical index fitted against it.
///
/// Kept together because corpus positions are the join key back into the
/// index; a rebuild swaps both as one unit.
struct LexicalState {
    corpus: Corpus,
    ranker: LexicalRanker,
}

impl LexicalState {
    fn fit(corpus: Corpus, ranking: &RankingConfig) -> CompareResult<Self> {
        let mut ranker = LexicalRanker::new(VectorizerConfig::from(ranking));
        ranker.fit(corpus.texts())?;
        Ok(Self { corpus, ranker })
    }
}

/// Orchestrates the three comparison strategies.
///
/// The lexical state and the encoder handle are process-wide read-only
/// resources; requests share them without per-request locking. The lexical
/// slot is an `Arc` behind a lock only so a corpus rebuild can swap the
/// whole fitted index atomically instead of mutating it in place.
pub struct CompareService {
    lexical: RwLock<Arc<LexicalState>>,
    dense: DenseRanker,
    hybrid: HybridRanker,
    candidates_dense: usize,
    candidates_sparse: usize,
}

impl CompareService {
    /// Build the service and fit the lexical ranker against the corpus.
    pub fn new(
        corpus: Corpus,
        encoder: Arc<dyn DenseEncoder>,
        store: Arc<dyn VectorStore>,
        ranking: &RankingConfig,
        store_config: &VectorStoreConfig,
    ) -> CompareResult<Self> {
        let state = LexicalState::fit(corpus, ranking)?;
        info!(
            "Comparison service ready: {} corpus documents",
            state.corpus.len()
        );

        Ok(Self {
            lexical: RwLock::new(Arc::new(state)),
            dense: DenseRanker::new(encoder.clone(), store.clone(), store_config),
            hybrid: HybridRanker::new(encoder, store, store_config, ranking.rrf_k),
            candidates_dense: ranking.candidates_dense,
            candidates_sparse: ranking.candidates_sparse,
        })
    }

    /// Run the requested strategies and assemble the envelope.
    ///
    /// Empty-after-trim input yields an empty envelope without touching any
    /// ranker. For `all`, the strategies run independently and any
    /// constituent failure fails the whole request.
    pub async fn compare(
        &self,
        text: &str,
        top_k: usize,
        mode: CompareMode,
    ) -> CompareResult<CompareOutcome> {
        if text.trim().is_empty() {
            debug!("Empty comparison input, returning empty envelope");
            return Ok(CompareOutcome::empty(mode));
        }

        let mut outcome = CompareOutcome::empty(mode);
        match mode {
            CompareMode::Lexical => {
                outcome.lexical = self.compare_lexical(text, top_k)?;
            }
            CompareMode::Semantic => {
                outcome.semantic = self.dense.search(text, top_k).await?;
            }
            CompareMode::Hybrid => {
                outcome.hybrid = self.compare_hybrid(text, top_k).await?;
            }
            CompareMode::All => {
                outcome.lexical = self.compare_lexical(text, top_k)?;
                outcome.semantic = self.dense.search(text, top_k).await?;
                outcome.hybrid = self.compare_hybrid(text, top_k).await?;
            }
        }
        Ok(outcome)
    }

    /// Refit the lexical index against a new corpus snapshot and swap the
    /// corpus and index in one step. Requests already in flight keep the
    /// state they started with.
    pub fn rebuild_lexical(&self, corpus: Corpus, ranking: &RankingConfig) -> CompareResult<()> {
        let state = LexicalState::fit(corpus, ranking)?;
        let documents = state.corpus.len();
        *self.lexical.write() = Arc::new(state);
        info!("Lexical index rebuilt: {} documents", documents);
        Ok(())
    }

    fn compare_lexical(&self, text: &str, top_k: usize) -> CompareResult<Vec<RankedMatch>> {
        let state = self.lexical.read().clone();
        let ranked = state.ranker.rank(text, top_k)?;
        Ok(ranked
            .into_iter()
            .map(|(index, score)| {
                let doc = state.corpus.get(index).unwrap_or_default();
                RankedMatch::from_corpus(index, score, doc)
            })
            .collect())
    }

    async fn compare_hybrid(&self, text: &str, top_k: usize) -> CompareResult<Vec<RankedMatch>> {
        self.hybrid
            .search(text, top_k, self.candidates_dense, self.candidates_sparse)
            .await
    }
}
