//! End-to-end tests for the ingest and comparison pipeline.
//!
//! These run against an in-memory vector store so the full
//! ingest -> compare path is exercised without a running backend.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use textsim::config::{RankingConfig, VectorStoreConfig};
use textsim::corpus::{Corpus, CorpusRecord};
use textsim::embedding::{HashEncoder, SparseVector};
use textsim::ingest::IngestPipeline;
use textsim::query::CompareService;
use textsim::retrieval::HybridRanker;
use textsim::store::{
    CollectionSchema, PointInsert, PointRecord, ScoredPoint, StoreError, StoreResult, VectorStore,
};
use textsim::types::{CompareMode, Payload, PointId};

#[derive(Clone)]
struct StoredPoint {
    dense: Vec<f32>,
    sparse: Option<SparseVector>,
    payload: Payload,
}

/// Brute-force in-memory stand-in for the nearest-neighbor backend.
struct FakeStore {
    collections: Mutex<HashMap<String, HashMap<PointId, StoredPoint>>>,
    /// Dense queries carrying an id filter, i.e. rescore requests
    filtered_queries: AtomicUsize,
}

impl FakeStore {
    fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            filtered_queries: AtomicUsize::new(0),
        }
    }

    fn with_collection<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&HashMap<PointId, StoredPoint>) -> T,
    ) -> StoreResult<T> {
        let collections = self.collections.lock();
        let points = collections
            .get(collection)
            .ok_or_else(|| StoreError::Request {
                status: 404,
                message: format!("collection {collection} does not exist"),
            })?;
        Ok(f(points))
    }
}

fn dense_dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f32 {
    let weights: HashMap<u32, f32> = a.indices.iter().copied().zip(a.values.iter().copied()).collect();
    b.indices
        .iter()
        .zip(b.values.iter())
        .filter_map(|(i, v)| weights.get(i).map(|w| w * v))
        .sum()
}

fn top_scored(mut hits: Vec<ScoredPoint>, limit: usize) -> Vec<ScoredPoint> {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    hits.truncate(limit);
    hits
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn ensure_collection(&self, schema: &CollectionSchema) -> StoreResult<bool> {
        let mut collections = self.collections.lock();
        if collections.contains_key(&schema.name) {
            return Ok(false);
        }
        collections.insert(schema.name.clone(), HashMap::new());
        Ok(true)
    }

    async fn query_dense(
        &self,
        collection: &str,
        _vector_name: &str,
        vector: &[f32],
        limit: usize,
        id_filter: Option<&[PointId]>,
        with_payload: bool,
    ) -> StoreResult<Vec<ScoredPoint>> {
        if id_filter.is_some() {
            self.filtered_queries.fetch_add(1, Ordering::SeqCst);
        }
        self.with_collection(collection, |points| {
            let hits = points
                .iter()
                .filter(|(id, _)| match id_filter {
                    Some(ids) => ids.contains(id),
                    None => true,
                })
                .map(|(id, point)| ScoredPoint {
                    id: id.clone(),
                    score: dense_dot(vector, &point.dense),
                    payload: if with_payload {
                        point.payload.clone()
                    } else {
                        Payload::new()
                    },
                })
                .collect();
            top_scored(hits, limit)
        })
    }

    async fn query_sparse(
        &self,
        collection: &str,
        _vector_name: &str,
        vector: &SparseVector,
        limit: usize,
    ) -> StoreResult<Vec<ScoredPoint>> {
        self.with_collection(collection, |points| {
            let hits = points
                .iter()
                .filter_map(|(id, point)| {
                    let stored = point.sparse.as_ref()?;
                    let score = sparse_dot(vector, stored);
                    (score > 0.0).then(|| ScoredPoint {
                        id: id.clone(),
                        score,
                        payload: point.payload.clone(),
                    })
                })
                .collect();
            top_scored(hits, limit)
        })
    }

    async fn retrieve(&self, collection: &str, ids: &[PointId]) -> StoreResult<Vec<PointRecord>> {
        self.with_collection(collection, |points| {
            ids.iter()
                .filter_map(|id| {
                    points.get(id).map(|point| PointRecord {
                        id: id.clone(),
                        payload: point.payload.clone(),
                    })
                })
                .collect()
        })
    }

    async fn upsert(&self, collection: &str, inserts: Vec<PointInsert>) -> StoreResult<()> {
        let mut collections = self.collections.lock();
        let points = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::Request {
                status: 404,
                message: format!("collection {collection} does not exist"),
            })?;
        for insert in inserts {
            points.insert(
                insert.id,
                StoredPoint {
                    dense: insert.dense,
                    sparse: insert.sparse,
                    payload: insert.payload,
                },
            );
        }
        Ok(())
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        self.with_collection(collection, |points| points.len() as u64)
    }
}

fn sample_texts() -> Vec<String> {
    vec![
        "The quick brown fox jumps over the lazy dog".to_string(),
        "A fast auburn fox leapt over a sleepy hound".to_string(),
        "Stock markets rallied after the central bank announcement".to_string(),
        "The lazy dog slept while the quick brown fox watched".to_string(),
    ]
}

fn sample_records() -> Vec<CorpusRecord> {
    sample_texts()
        .into_iter()
        .map(|text| CorpusRecord { id: None, text })
        .collect()
}

fn test_ranking() -> RankingConfig {
    // Small corpora need permissive document-frequency pruning
    RankingConfig {
        min_df: 1,
        max_df: 1.0,
        ..Default::default()
    }
}

fn build_service(store: Arc<FakeStore>) -> CompareService {
    let encoder = Arc::new(HashEncoder::new(32));
    CompareService::new(
        Corpus::from_texts(sample_texts()),
        encoder,
        store,
        &test_ranking(),
        &VectorStoreConfig::default(),
    )
    .expect("service should fit against the sample corpus")
}

async fn ingest_sample(store: Arc<FakeStore>) -> Vec<textsim::ingest::IngestReport> {
    let pipeline = IngestPipeline::new(
        Arc::new(HashEncoder::new(32)),
        store,
        VectorStoreConfig::default(),
    );
    pipeline.provision().await.unwrap();
    pipeline.run(&sample_records()).await.unwrap()
}

#[tokio::test]
async fn test_ingest_then_compare_all_strategies() {
    let store = Arc::new(FakeStore::new());
    let reports = ingest_sample(store.clone()).await;

    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert_eq!(report.upserted, 4);
        assert_eq!(report.unchanged, 0);
        assert_eq!(report.total, 4);
    }

    let service = build_service(store);
    let outcome = service
        .compare("quick brown fox", 3, CompareMode::All)
        .await
        .unwrap();

    assert_eq!(outcome.mode, CompareMode::All);

    // Lexical: overlapping vocabulary wins, scores strictly ranked
    assert_eq!(outcome.lexical.len(), 3);
    assert!(outcome.lexical[0].text.contains("fox"));
    assert!(outcome.lexical[0].score >= outcome.lexical[1].score);
    assert!(outcome.lexical[0].index.is_some());

    // Semantic: point-backed matches with store scores and payload text
    assert_eq!(outcome.semantic.len(), 3);
    for m in &outcome.semantic {
        assert!(m.id.is_some());
        assert!(m.score.is_some());
        assert!(!m.text.is_empty());
    }

    // Hybrid: fused candidates rescored against the dense collection
    assert!(!outcome.hybrid.is_empty());
    for m in &outcome.hybrid {
        assert!(m.id.is_some());
        assert!(m.score.is_some(), "rescore must find ingested points");
        assert!(!m.text.is_empty());
    }
}

#[tokio::test]
async fn test_reingest_is_idempotent() {
    let store = Arc::new(FakeStore::new());
    ingest_sample(store.clone()).await;
    let reports = ingest_sample(store).await;

    for report in reports {
        assert_eq!(report.upserted, 0, "unchanged documents must be skipped");
        assert_eq!(report.unchanged, 4);
        assert_eq!(report.total, 4);
    }
}

#[tokio::test]
async fn test_hybrid_without_candidates_skips_rescoring() {
    let store = Arc::new(FakeStore::new());
    // Provisioned but empty collections
    let pipeline = IngestPipeline::new(
        Arc::new(HashEncoder::new(32)),
        store.clone(),
        VectorStoreConfig::default(),
    );
    pipeline.provision().await.unwrap();

    let service = build_service(store.clone());
    let outcome = service
        .compare("quick brown fox", 5, CompareMode::Hybrid)
        .await
        .unwrap();

    assert!(outcome.hybrid.is_empty());
    assert_eq!(
        store.filtered_queries.load(Ordering::SeqCst),
        0,
        "no rescoring query when both candidate lists are empty"
    );
}

#[tokio::test]
async fn test_hybrid_keeps_candidates_missing_from_rescore() {
    let store = Arc::new(FakeStore::new());
    let pipeline = IngestPipeline::new(
        Arc::new(HashEncoder::new(32)),
        store.clone(),
        VectorStoreConfig::default(),
    );
    pipeline.provision().await.unwrap();

    // Points exist only in the hybrid collection, so fused candidates
    // have no counterpart to rescore against.
    let encoder = HashEncoder::new(32);
    let config = VectorStoreConfig::default();
    let inserts: Vec<PointInsert> = sample_texts()
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let mut payload = Payload::new();
            payload.insert("text".to_string(), serde_json::Value::String(text.clone()));
            PointInsert {
                id: format!("point-{i}"),
                dense: encoder.embed(text),
                sparse: Some(textsim::embedding::SparseEncoder::new().encode(text)),
                payload,
            }
        })
        .collect();
    store.upsert(&config.hybrid_collection, inserts).await.unwrap();

    let service = build_service(store);
    let outcome = service
        .compare("quick brown fox", 3, CompareMode::Hybrid)
        .await
        .unwrap();

    assert!(!outcome.hybrid.is_empty());
    for m in &outcome.hybrid {
        assert!(m.score.is_none(), "missing rescore hits must not get a score");
        assert!(!m.text.is_empty(), "candidate payload text is still carried");
    }
}

#[tokio::test]
async fn test_compare_all_is_idempotent() {
    let store = Arc::new(FakeStore::new());
    ingest_sample(store.clone()).await;

    let service = build_service(store);
    let first = service
        .compare("quick brown fox", 3, CompareMode::All)
        .await
        .unwrap();
    let second = service
        .compare("quick brown fox", 3, CompareMode::All)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert!(!first.lexical.is_empty());
    assert!(!first.semantic.is_empty());
    assert!(!first.hybrid.is_empty());
}

#[tokio::test]
async fn test_hybrid_order_follows_fusion_when_rescore_disagrees() {
    let store = Arc::new(FakeStore::new());
    let config = VectorStoreConfig::default();
    let encoder = HashEncoder::new(8);
    let query = "ordem de fusao";
    let q = encoder.embed(query);

    store
        .ensure_collection(&CollectionSchema {
            name: config.hybrid_collection.clone(),
            dense_vector: config.dense_vector.clone(),
            dense_size: 8,
            sparse_vector: Some(config.sparse_vector.clone()),
        })
        .await
        .unwrap();
    store
        .ensure_collection(&CollectionSchema {
            name: config.dense_collection.clone(),
            dense_vector: config.dense_vector.clone(),
            dense_size: 8,
            sparse_vector: None,
        })
        .await
        .unwrap();

    // Candidate generation sees beta ahead of alfa, so fusion ranks beta
    // first; the rescoring collection holds vectors that invert the cosines.
    let text_payload = |text: &str| {
        let mut payload = Payload::new();
        payload.insert("text".to_string(), serde_json::Value::String(text.to_string()));
        payload
    };
    store
        .upsert(
            &config.hybrid_collection,
            vec![
                PointInsert {
                    id: "beta".to_string(),
                    dense: scale(&q, 0.9),
                    sparse: None,
                    payload: text_payload("documento beta"),
                },
                PointInsert {
                    id: "alfa".to_string(),
                    dense: scale(&q, 0.8),
                    sparse: None,
                    payload: text_payload("documento alfa"),
                },
            ],
        )
        .await
        .unwrap();
    store
        .upsert(
            &config.dense_collection,
            vec![
                PointInsert {
                    id: "alfa".to_string(),
                    dense: scale(&q, 0.95),
                    sparse: None,
                    payload: Payload::new(),
                },
                PointInsert {
                    id: "beta".to_string(),
                    dense: scale(&q, 0.2),
                    sparse: None,
                    payload: Payload::new(),
                },
            ],
        )
        .await
        .unwrap();

    let ranker = HybridRanker::new(Arc::new(encoder), store, &config, 60);
    let matches = ranker.search(query, 5, 10, 10).await.unwrap();

    // Order is fusion's, even though rescoring says alfa is the closer point
    let ids: Vec<&str> = matches.iter().map(|m| m.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["beta", "alfa"]);
    assert!((matches[0].score.unwrap() - 0.2).abs() < 1e-5);
    assert!((matches[1].score.unwrap() - 0.95).abs() < 1e-5);
    assert!(matches[0].score < matches[1].score);
}

fn scale(vector: &[f32], factor: f32) -> Vec<f32> {
    vector.iter().map(|v| v * factor).collect()
}

#[tokio::test]
async fn test_empty_input_returns_empty_envelope() {
    let store = Arc::new(FakeStore::new());
    let service = build_service(store.clone());

    let outcome = service.compare("   \n\t ", 5, CompareMode::All).await.unwrap();
    assert!(outcome.lexical.is_empty());
    assert!(outcome.semantic.is_empty());
    assert!(outcome.hybrid.is_empty());
    assert_eq!(store.filtered_queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rebuild_swaps_lexical_corpus() {
    let store = Arc::new(FakeStore::new());
    let service = build_service(store);

    let before = service
        .compare("quick brown fox", 1, CompareMode::Lexical)
        .await
        .unwrap();
    assert!(before.lexical[0].text.contains("fox"));

    let replacement = Corpus::from_texts(vec![
        "Baking bread requires patience and steam".to_string(),
        "Sourdough starters ferment wild yeast".to_string(),
    ]);
    service.rebuild_lexical(replacement, &test_ranking()).unwrap();

    let after = service
        .compare("sourdough yeast", 1, CompareMode::Lexical)
        .await
        .unwrap();
    assert_eq!(after.lexical[0].index, Some(1));
    assert!(after.lexical[0].text.contains("Sourdough"));
}
