//! Core types shared across the comparison pipeline

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identifier of a point held by the external vector store
pub type PointId = String;

/// Dense embedding vector type
pub type Embedding = Vec<f32>;

/// Opaque point payload: scalar key-value pairs passed through untouched
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Payload key carrying the document text
pub const PAYLOAD_TEXT_KEY: &str = "text";

/// Payload key carrying the ingest content hash
pub const PAYLOAD_HASH_KEY: &str = "content_hash";

/// Extract the display text from a payload, if present
pub fn payload_text(payload: &Payload) -> Option<&str> {
    payload.get(PAYLOAD_TEXT_KEY).and_then(|v| v.as_str())
}

// ============================================================================
// Content Identity
// ============================================================================

/// Exact content hash using SHA256 (64-character hex string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute SHA256 hash of content
    pub fn compute(content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let result = hasher.finalize();
        ContentHash(hex::encode(result))
    }

    /// Get the underlying string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

// ============================================================================
// Comparison Results
// ============================================================================

/// One ranked corpus match produced by a comparison strategy.
///
/// Lexical matches are identified by corpus index, store-backed matches by
/// point id. Hybrid matches may carry no score when the rescoring pass could
/// not retrieve the point; absent fields are omitted from serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PointId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub text: String,
}

impl RankedMatch {
    /// Match identified by position in the in-process corpus
    pub fn from_corpus(index: usize, score: f32, text: impl Into<String>) -> Self {
        Self {
            id: None,
            index: Some(index),
            score: Some(score),
            text: text.into(),
        }
    }

    /// Match identified by an external store point id
    pub fn from_point(id: impl Into<PointId>, score: Option<f32>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            index: None,
            score,
            text: text.into(),
        }
    }
}

/// Which comparison strategies to run for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Term-vector cosine ranking over the in-process corpus
    Lexical,
    /// Dense embedding nearest-neighbor ranking
    Semantic,
    /// Fused dense + sparse candidates with dense rescoring
    Hybrid,
    /// All three strategies in one envelope
    All,
}

impl CompareMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareMode::Lexical => "lexical",
            CompareMode::Semantic => "semantic",
            CompareMode::Hybrid => "hybrid",
            CompareMode::All => "all",
        }
    }
}

impl Default for CompareMode {
    fn default() -> Self {
        CompareMode::All
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result envelope for one comparison request.
///
/// Carries one list per executed strategy; strategies that were not requested
/// keep empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareOutcome {
    pub mode: CompareMode,
    #[serde(default)]
    pub lexical: Vec<RankedMatch>,
    #[serde(default)]
    pub semantic: Vec<RankedMatch>,
    #[serde(default)]
    pub hybrid: Vec<RankedMatch>,
}

impl CompareOutcome {
    pub fn empty(mode: CompareMode) -> Self {
        Self {
            mode,
            lexical: Vec::new(),
            semantic: Vec::new(),
            hybrid: Vec::new(),
        }
    }
}
