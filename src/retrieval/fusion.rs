//! Reciprocal Rank Fusion over candidate id lists.
//!
//! Fusion runs in-process: the store only ever answers plain top-k queries,
//! and the fused ordering is an observable contract of this system.

use crate::types::PointId;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Reciprocal Rank Fusion parameters
#[derive(Debug, Clone)]
pub struct RrfConfig {
    /// Dampening constant; 60 by convention
    pub k: usize,
}

impl Default for RrfConfig {
    fn default() -> Self {
        Self { k: 60 }
    }
}

/// One fused candidate with its aggregate rank evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedCandidate {
    pub id: PointId,
    /// Sum of 1/(k + rank) over every list the id appears in
    pub fused_score: f32,
    /// Best (lowest) 1-based rank across the source lists
    pub best_rank: usize,
}

/// Fuse ranked candidate id lists.
///
/// Each id scores `1/(k + rank)` per list it appears in, ranks 1-based
/// within their list; ids absent from a list contribute nothing for it.
/// Output is sorted by descending fused score, ties broken by best source
/// rank, then by id, for full determinism.
pub fn reciprocal_rank_fusion(lists: &[Vec<PointId>], config: &RrfConfig) -> Vec<FusedCandidate> {
    let mut candidates: HashMap<&str, FusedCandidate> = HashMap::new();

    for list in lists {
        for (position, id) in list.iter().enumerate() {
            let rank = position + 1;
            let contribution = 1.0 / (config.k as f32 + rank as f32);

            candidates
                .entry(id)
                .and_modify(|fused| {
                    fused.fused_score += contribution;
                    fused.best_rank = fused.best_rank.min(rank);
                })
                .or_insert_with(|| FusedCandidate {
                    id: id.clone(),
                    fused_score: contribution,
                    best_rank: rank,
                });
        }
    }

    let mut fused: Vec<FusedCandidate> = candidates.into_values().collect();
    fused.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(Ordering::Equal)
            .then(a.best_rank.cmp(&b.best_rank))
            .then(a.id.cmp(&b.id))
    });
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<PointId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rrf_score_for_id_in_both_lists() {
        let lists = vec![ids(&["A", "B", "C"]), ids(&["B", "A", "D"])];
        let fused = reciprocal_rank_fusion(&lists, &RrfConfig::default());

        let a = fused.iter().find(|f| f.id == "A").unwrap();
        let expected = 1.0 / 61.0 + 1.0 / 62.0;
        assert!((a.fused_score - expected).abs() < 1e-7);

        let b = fused.iter().find(|f| f.id == "B").unwrap();
        assert!((b.fused_score - expected).abs() < 1e-7);
    }

    #[test]
    fn test_rrf_score_for_id_in_one_list() {
        let lists = vec![ids(&["A", "B", "C"]), ids(&["B", "A", "D"])];
        let fused = reciprocal_rank_fusion(&lists, &RrfConfig::default());

        let c = fused.iter().find(|f| f.id == "C").unwrap();
        assert!((c.fused_score - 1.0 / 63.0).abs() < 1e-7);

        let d = fused.iter().find(|f| f.id == "D").unwrap();
        assert!((d.fused_score - 1.0 / 63.0).abs() < 1e-7);
    }

    #[test]
    fn test_double_membership_outranks_single() {
        let lists = vec![ids(&["A", "B", "C"]), ids(&["B", "A", "D"])];
        let fused = reciprocal_rank_fusion(&lists, &RrfConfig::default());

        let order: Vec<&str> = fused.iter().map(|f| f.id.as_str()).collect();
        // A and B appear in both lists; exact ties fall back to id order
        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_exact_ties_fall_back_to_id_order() {
        // Z and Q tie at rank 1, M and A tie at rank 2; id breaks each tie
        let lists = vec![ids(&["Z", "M"]), ids(&["Q", "A"])];
        let fused = reciprocal_rank_fusion(&lists, &RrfConfig::default());

        let order: Vec<&str> = fused.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, vec!["Q", "Z", "A", "M"]);
    }

    #[test]
    fn test_best_rank_tracked_across_lists() {
        let lists = vec![ids(&["A", "B"]), ids(&["B", "A"])];
        let fused = reciprocal_rank_fusion(&lists, &RrfConfig::default());
        for candidate in &fused {
            assert_eq!(candidate.best_rank, 1);
        }
    }

    #[test]
    fn test_empty_lists_fuse_to_nothing() {
        let fused = reciprocal_rank_fusion(&[Vec::new(), Vec::new()], &RrfConfig::default());
        assert!(fused.is_empty());
    }
}
