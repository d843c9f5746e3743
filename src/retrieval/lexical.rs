//! Lexical ranker: TF-IDF cosine over the in-process corpus.

use super::vectorizer::{TermVectorIndex, VectorizerConfig};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::debug;

/// Errors raised by the lexical ranker.
#[derive(Error, Debug)]
pub enum LexicalError {
    /// `rank` was called before `fit`
    #[error("lexical ranker used before fit")]
    NotInitialized,

    /// `fit` was called with an empty corpus
    #[error("cannot fit on an empty corpus")]
    EmptyCorpus,

    /// Document-frequency pruning removed every term
    #[error("document-frequency pruning removed every vocabulary term")]
    EmptyVocabulary,
}

/// Ranks corpus documents by cosine similarity over the term-vector index.
///
/// `fit` must be called once before ranking; the fitted index is read-only
/// afterwards, so concurrent `rank` calls need no synchronization.
#[derive(Debug, Clone)]
pub struct LexicalRanker {
    config: VectorizerConfig,
    index: Option<TermVectorIndex>,
}

impl LexicalRanker {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            index: None,
        }
    }

    /// Build the term-vector index over the corpus snapshot.
    pub fn fit(&mut self, texts: &[String]) -> Result<(), LexicalError> {
        let index = TermVectorIndex::fit(texts, &self.config)?;
        debug!(
            "Lexical ranker fitted: {} documents, {} terms",
            index.num_documents(),
            index.vocabulary_size()
        );
        self.index = Some(index);
        Ok(())
    }

    /// Rank corpus documents against the query.
    ///
    /// Returns at most `min(top_k, corpus size)` `(corpus_index, score)`
    /// pairs, descending by score, ties broken by ascending index. `top_k`
    /// is clamped to at least 1. An empty or fully out-of-vocabulary query
    /// still ranks: every document scores zero and the lowest indices win.
    pub fn rank(&self, query: &str, top_k: usize) -> Result<Vec<(usize, f32)>, LexicalError> {
        let index = self.index.as_ref().ok_or(LexicalError::NotInitialized)?;

        let query_vec = index.transform(query);
        let scores = index.score_all(&query_vec);

        let k = top_k.max(1).min(scores.len());
        let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();

        // Partial selection: only the top k need full ordering
        if k < ranked.len() {
            ranked.select_nth_unstable_by(k - 1, compare_ranked);
            ranked.truncate(k);
        }
        ranked.sort_by(compare_ranked);
        Ok(ranked)
    }

    /// Whether `fit` has completed
    pub fn is_fitted(&self) -> bool {
        self.index.is_some()
    }
}

/// Descending score, ties by ascending corpus index.
fn compare_ranked(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then(a.0.cmp(&b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "O gato subiu no telhado".to_string(),
            "O cão correu no parque".to_string(),
            "O gato dormiu no sofá".to_string(),
        ]
    }

    fn unpruned_ranker() -> LexicalRanker {
        let mut ranker = LexicalRanker::new(VectorizerConfig {
            min_df: 1,
            max_df: 1.0,
            ..VectorizerConfig::default()
        });
        ranker.fit(&corpus()).unwrap();
        ranker
    }

    #[test]
    fn test_rank_before_fit_fails() {
        let ranker = LexicalRanker::new(VectorizerConfig::default());
        let err = ranker.rank("gato", 3).unwrap_err();
        assert!(matches!(err, LexicalError::NotInitialized));
    }

    #[test]
    fn test_rank_orders_by_term_overlap() {
        let ranker = unpruned_ranker();
        let ranked = ranker.rank("gato no telhado", 3).unwrap();

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].0, 0);
        assert_eq!(ranked[1].0, 2);
        assert_eq!(ranked[2].0, 1);
        assert!(ranked[0].1 > ranked[1].1);
        assert!(ranked[1].1 > ranked[2].1);
        // Doc 1 shares only the near-ubiquitous "no" with the query
        assert!(ranked[2].1 < 0.2);
    }

    #[test]
    fn test_rank_scores_non_increasing() {
        let ranker = unpruned_ranker();
        let ranked = ranker.rank("gato dormiu", 3).unwrap();
        for pair in ranked.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_top_k_clamped_to_corpus_size() {
        let ranker = unpruned_ranker();
        assert_eq!(ranker.rank("gato", 50).unwrap().len(), 3);
    }

    #[test]
    fn test_top_k_zero_clamped_to_one() {
        let ranker = unpruned_ranker();
        assert_eq!(ranker.rank("gato", 0).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_query_returns_zero_scores_in_index_order() {
        let ranker = unpruned_ranker();
        let ranked = ranker.rank("   ", 3).unwrap();
        assert_eq!(ranked.len(), 3);
        for (position, (index, score)) in ranked.iter().enumerate() {
            assert_eq!(*index, position);
            assert_eq!(*score, 0.0);
        }
    }

    #[test]
    fn test_fit_twice_yields_identical_rankings() {
        let a = unpruned_ranker();
        let b = unpruned_ranker();
        assert_eq!(
            a.rank("gato no telhado", 3).unwrap(),
            b.rank("gato no telhado", 3).unwrap()
        );
    }
}
