//! Term-vector index: a sparse TF-IDF matrix over a fixed corpus snapshot.
//!
//! Vocabulary derivation is deterministic under fixed settings: lowercasing,
//! accent stripping, n-gram range, document-frequency pruning, and a feature
//! cap. Re-fitting the same corpus with the same settings reproduces the
//! same vocabulary and weights.

use super::lexical::LexicalError;
use crate::config::RankingConfig;
use crate::util::tokenize;
use std::collections::{HashMap, HashSet};

/// Vocabulary derivation settings for the term-vector index.
#[derive(Debug, Clone)]
pub struct VectorizerConfig {
    /// Smallest n-gram length
    pub ngram_min: usize,
    /// Largest n-gram length
    pub ngram_max: usize,
    /// Drop terms present in fewer than this many documents
    pub min_df: usize,
    /// Drop terms present in more than this fraction of documents
    pub max_df: f32,
    /// Cap on vocabulary size, keeping the highest-count terms
    pub max_features: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_min: 1,
            ngram_max: 2,
            min_df: 2,
            max_df: 0.9,
            max_features: 100_000,
        }
    }
}

impl From<&RankingConfig> for VectorizerConfig {
    fn from(cfg: &RankingConfig) -> Self {
        Self {
            ngram_min: cfg.ngram_min,
            ngram_max: cfg.ngram_max,
            min_df: cfg.min_df,
            max_df: cfg.max_df,
            max_features: cfg.max_features,
        }
    }
}

/// A fitted TF-IDF matrix with its vocabulary.
///
/// Rows are L2-normalized, so cosine similarity against a normalized query
/// vector reduces to a sparse dot product.
#[derive(Debug, Clone)]
pub struct TermVectorIndex {
    /// term -> column
    vocabulary: HashMap<String, usize>,
    /// smoothed inverse document frequency per column
    idf: Vec<f32>,
    /// one sparse row per document, (column, weight) sorted by column
    rows: Vec<Vec<(usize, f32)>>,
    ngram_min: usize,
    ngram_max: usize,
}

impl TermVectorIndex {
    /// Build the index from a corpus snapshot.
    pub fn fit(texts: &[String], config: &VectorizerConfig) -> Result<Self, LexicalError> {
        if texts.is_empty() {
            return Err(LexicalError::EmptyCorpus);
        }

        let analyzed: Vec<Vec<String>> = texts
            .iter()
            .map(|t| analyze(t, config.ngram_min, config.ngram_max))
            .collect();

        // Document frequency and corpus-wide count per term
        let mut df: HashMap<&str, usize> = HashMap::new();
        let mut count: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in terms {
                *count.entry(term).or_insert(0) += 1;
                if seen.insert(term) {
                    *df.entry(term).or_insert(0) += 1;
                }
            }
        }

        let n_docs = texts.len();
        let max_df_count = config.max_df * n_docs as f32;
        let mut kept: Vec<(&str, usize)> = df
            .iter()
            .filter(|(_, &d)| d >= config.min_df && (d as f32) <= max_df_count)
            .map(|(&term, _)| (term, count[term]))
            .collect();

        if kept.len() > config.max_features {
            // Highest corpus-wide count wins the cap, ties lexicographic
            kept.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            kept.truncate(config.max_features);
        }
        if kept.is_empty() {
            return Err(LexicalError::EmptyVocabulary);
        }

        // Column order is lexicographic over surviving terms
        let mut terms: Vec<&str> = kept.into_iter().map(|(t, _)| t).collect();
        terms.sort_unstable();
        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(col, &term)| (term.to_string(), col))
            .collect();

        let idf: Vec<f32> = terms
            .iter()
            .map(|&term| {
                let d = df[term] as f32;
                ((1.0 + n_docs as f32) / (1.0 + d)).ln() + 1.0
            })
            .collect();

        let rows = analyzed
            .iter()
            .map(|doc_terms| weigh(doc_terms, &vocabulary, &idf))
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            rows,
            ngram_min: config.ngram_min,
            ngram_max: config.ngram_max,
        })
    }

    /// Transform a query into a normalized vector over the fixed vocabulary.
    ///
    /// Out-of-vocabulary terms are dropped; a query with no known terms
    /// yields an empty (all-zero) vector.
    pub fn transform(&self, query: &str) -> Vec<(usize, f32)> {
        let terms = analyze(query, self.ngram_min, self.ngram_max);
        weigh(&terms, &self.vocabulary, &self.idf)
    }

    /// Cosine similarity of a transformed query against every document row.
    pub fn score_all(&self, query: &[(usize, f32)]) -> Vec<f32> {
        self.rows
            .iter()
            .map(|row| sparse_dot(query, row))
            .collect()
    }

    /// Number of documents in the index
    pub fn num_documents(&self) -> usize {
        self.rows.len()
    }

    /// Number of vocabulary terms
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Tokenize and expand into the configured n-gram range, adjacent tokens
/// joined by a single space.
fn analyze(text: &str, ngram_min: usize, ngram_max: usize) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = Vec::new();
    for n in ngram_min..=ngram_max {
        if n == 0 || n > tokens.len() {
            continue;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

/// Raw counts times IDF, L2-normalized, sorted by column.
fn weigh(terms: &[String], vocabulary: &HashMap<String, usize>, idf: &[f32]) -> Vec<(usize, f32)> {
    let mut counts: HashMap<usize, f32> = HashMap::new();
    for term in terms {
        if let Some(&col) = vocabulary.get(term) {
            *counts.entry(col).or_insert(0.0) += 1.0;
        }
    }

    let mut entries: Vec<(usize, f32)> = counts
        .into_iter()
        .map(|(col, tf)| (col, tf * idf[col]))
        .collect();
    entries.sort_by_key(|(col, _)| *col);

    let norm: f32 = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in entries.iter_mut() {
            *w /= norm;
        }
    }
    entries
}

/// Dot product of two sparse vectors sorted by column.
fn sparse_dot(a: &[(usize, f32)], b: &[(usize, f32)]) -> f32 {
    let mut sum = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
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

    fn unpruned() -> VectorizerConfig {
        VectorizerConfig {
            min_df: 1,
            max_df: 1.0,
            ..VectorizerConfig::default()
        }
    }

    #[test]
    fn test_fit_rejects_empty_corpus() {
        let err = TermVectorIndex::fit(&[], &unpruned()).unwrap_err();
        assert!(matches!(err, LexicalError::EmptyCorpus));
    }

    #[test]
    fn test_fit_rejects_emptied_vocabulary() {
        let config = VectorizerConfig {
            min_df: 10,
            ..VectorizerConfig::default()
        };
        let err = TermVectorIndex::fit(&corpus(), &config).unwrap_err();
        assert!(matches!(err, LexicalError::EmptyVocabulary));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let config = unpruned();
        let a = TermVectorIndex::fit(&corpus(), &config).unwrap();
        let b = TermVectorIndex::fit(&corpus(), &config).unwrap();
        assert_eq!(a.vocabulary, b.vocabulary);
        assert_eq!(a.idf, b.idf);
        assert_eq!(a.rows, b.rows);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let index = TermVectorIndex::fit(&corpus(), &unpruned()).unwrap();
        for row in &index.rows {
            let norm: f32 = row.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_transform_drops_unknown_terms() {
        let index = TermVectorIndex::fit(&corpus(), &unpruned()).unwrap();
        let vocab_before = index.vocabulary_size();
        let query = index.transform("zebra xilofone");
        assert!(query.is_empty());
        assert_eq!(index.vocabulary_size(), vocab_before);
    }

    #[test]
    fn test_self_similarity_is_one() {
        let index = TermVectorIndex::fit(&corpus(), &unpruned()).unwrap();
        let query = index.transform("O gato subiu no telhado");
        let scores = index.score_all(&query);
        assert!((scores[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let config = VectorizerConfig {
            min_df: 1,
            max_df: 1.0,
            max_features: 3,
            ..VectorizerConfig::default()
        };
        let index = TermVectorIndex::fit(&corpus(), &config).unwrap();
        assert_eq!(index.vocabulary_size(), 3);
    }

    #[test]
    fn test_ngram_analysis() {
        let terms = analyze("o gato subiu", 1, 2);
        assert!(terms.contains(&"gato".to_string()));
        assert!(terms.contains(&"gato subiu".to_string()));
        // "o" is shorter than two characters and never becomes a term
        assert!(!terms.iter().any(|t| t == "o"));
    }

    #[test]
    fn test_sparse_dot() {
        let a = vec![(0, 0.5), (2, 0.5)];
        let b = vec![(1, 1.0), (2, 0.4)];
        assert!((sparse_dot(&a, &b) - 0.2).abs() < 1e-6);
    }
}
