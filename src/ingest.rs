//! Corpus ingest: collection provisioning and dedup upserts.
//!
//! Point ids are UUIDv5 over the document text, so re-ingesting the same
//! corpus is idempotent. A content hash stored in the payload lets the
//! pipeline skip documents the store already holds unchanged.

use crate::config::VectorStoreConfig;
use crate::corpus::CorpusRecord;
use crate::embedding::{DenseEncoder, SparseEncoder};
use crate::error::CompareResult;
use crate::store::{CollectionSchema, PointInsert, VectorStore};
use crate::types::{ContentHash, Payload, PointId, PAYLOAD_HASH_KEY, PAYLOAD_TEXT_KEY};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Namespace for stable point ids derived from document text
const POINT_ID_NAMESPACE: Uuid = Uuid::from_bytes([
    0x11, 0x11, 0x11, 0x11, 0x22, 0x22, 0x33, 0x33, 0x44, 0x44, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55,
]);

/// How many ids to fetch per dedup-lookup request
const RETRIEVE_BATCH: usize = 1024;

/// How many points to send per upsert request
const UPSERT_BATCH: usize = 256;

/// Outcome of ingesting into one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub collection: String,
    pub unchanged: usize,
    pub upserted: usize,
    pub total: u64,
}

/// Derive the stable point id for a document text.
pub fn stable_point_id(text: &str) -> PointId {
    Uuid::new_v5(&POINT_ID_NAMESPACE, text.as_bytes()).to_string()
}

struct BaseDoc {
    id: PointId,
    text: String,
    hash: ContentHash,
}

/// Provisioning and dedup-upsert pipeline over the vector store.
pub struct IngestPipeline {
    encoder: Arc<dyn DenseEncoder>,
    sparse_encoder: SparseEncoder,
    store: Arc<dyn VectorStore>,
    config: VectorStoreConfig,
}

impl IngestPipeline {
    pub fn new(
        encoder: Arc<dyn DenseEncoder>,
        store: Arc<dyn VectorStore>,
        config: VectorStoreConfig,
    ) -> Self {
        Self {
            encoder,
            sparse_encoder: SparseEncoder::new(),
            store,
            config,
        }
    }

    /// Create both collections if missing. Idempotent.
    pub async fn provision(&self) -> CompareResult<()> {
        let dense_size = self.encoder.dimensions();

        self.store
            .ensure_collection(&CollectionSchema {
                name: self.config.hybrid_collection.clone(),
                dense_vector: self.config.dense_vector.clone(),
                dense_size,
                sparse_vector: Some(self.config.sparse_vector.clone()),
            })
            .await?;

        self.store
            .ensure_collection(&CollectionSchema {
                name: self.config.dense_collection.clone(),
                dense_vector: self.config.dense_vector.clone(),
                dense_size,
                sparse_vector: None,
            })
            .await?;

        Ok(())
    }

    /// Ingest records into both collections, skipping documents whose
    /// stored content hash already matches.
    pub async fn run(&self, records: &[CorpusRecord]) -> CompareResult<Vec<IngestReport>> {
        let docs: Vec<BaseDoc> = records
            .iter()
            .map(|r| BaseDoc {
                id: stable_point_id(&r.text),
                text: r.text.clone(),
                hash: ContentHash::compute(&r.text),
            })
            .collect();

        let hybrid = self
            .ingest_collection(&docs, &self.config.hybrid_collection, true)
            .await?;
        let dense = self
            .ingest_collection(&docs, &self.config.dense_collection, false)
            .await?;
        Ok(vec![hybrid, dense])
    }

    async fn ingest_collection(
        &self,
        docs: &[BaseDoc],
        collection: &str,
        with_sparse: bool,
    ) -> CompareResult<IngestReport> {
        let ids: Vec<PointId> = docs.iter().map(|d| d.id.clone()).collect();
        let existing = self.fetch_existing_hashes(collection, &ids).await?;

        let to_upsert: Vec<&BaseDoc> = docs
            .iter()
            .filter(|d| existing.get(&d.id).map(String::as_str) != Some(d.hash.as_str()))
            .collect();
        let unchanged = docs.len() - to_upsert.len();

        info!(
            "[{}] unchanged={} upsert={}",
            collection,
            unchanged,
            to_upsert.len()
        );

        for chunk in to_upsert.chunks(UPSERT_BATCH) {
            let texts: Vec<String> = chunk.iter().map(|d| d.text.clone()).collect();
            let embeddings = self.encoder.encode_batch(&texts).await?;

            let points: Vec<PointInsert> = chunk
                .iter()
                .zip(embeddings)
                .map(|(doc, dense)| {
                    let mut payload = Payload::new();
                    payload.insert(PAYLOAD_TEXT_KEY.to_string(), json!(doc.text));
                    payload.insert(PAYLOAD_HASH_KEY.to_string(), json!(doc.hash.as_str()));
                    PointInsert {
                        id: doc.id.clone(),
                        dense,
                        sparse: with_sparse.then(|| self.sparse_encoder.encode(&doc.text)),
                        payload,
                    }
                })
                .collect();

            self.store.upsert(collection, points).await?;
        }

        let total = self.store.count(collection).await?;
        Ok(IngestReport {
            collection: collection.to_string(),
            unchanged,
            upserted: to_upsert.len(),
            total,
        })
    }

    async fn fetch_existing_hashes(
        &self,
        collection: &str,
        ids: &[PointId],
    ) -> CompareResult<HashMap<PointId, String>> {
        let mut hashes = HashMap::new();
        for chunk in ids.chunks(RETRIEVE_BATCH) {
            let points = self.store.retrieve(collection, chunk).await?;
            for point in points {
                if let Some(hash) = point
                    .payload
                    .get(PAYLOAD_HASH_KEY)
                    .and_then(|v| v.as_str())
                {
                    hashes.insert(point.id, hash.to_string());
                }
            }
        }
        debug!(
            "[{}] {} of {} ids already stored",
            collection,
            hashes.len(),
            ids.len()
        );
        Ok(hashes)
    }
}
