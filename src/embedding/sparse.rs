//! In-process sparse term-weight encoding.
//!
//! Produces a BM25-style sparse representation: unigram tokens from the
//! shared preprocessing pipeline, term-frequency values, and a dimension
//! index computed by hashing the term. The sparse index adapter receives
//! plain indices and values, never text.

use crate::util::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A high-dimensional, mostly-zero term-weight vector.
///
/// `indices` are sorted ascending and unique; `values` are positive and
/// aligned with `indices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

/// Deterministic text-to-sparse-vector encoder.
#[derive(Debug, Clone, Default)]
pub struct SparseEncoder;

impl SparseEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a text into a sparse term-frequency vector.
    ///
    /// The dimension index of a term is its xxh3 hash folded to u32; hash
    /// collisions merge two terms into one dimension, which only perturbs
    /// sparse recall.
    pub fn encode(&self, text: &str) -> SparseVector {
        let mut weights: HashMap<u32, f32> = HashMap::new();
        for token in tokenize(text) {
            let index = xxhash_rust::xxh3::xxh3_64(token.as_bytes()) as u32;
            *weights.entry(index).or_insert(0.0) += 1.0;
        }

        let mut entries: Vec<(u32, f32)> = weights.into_iter().collect();
        entries.sort_by_key(|(index, _)| *index);

        let (indices, values) = entries.into_iter().unzip();
        SparseVector { indices, values }
    }
}
