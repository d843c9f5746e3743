//! HTTP API request/response types

use crate::types::CompareMode;
use serde::{Deserialize, Serialize};

/// Compare request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    /// The text to compare against the corpus
    pub text: String,
    /// Number of matches per strategy (default: 5)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Which strategies to run (default: all)
    #[serde(default)]
    pub mode: CompareMode,
}

pub(super) fn default_top_k() -> usize {
    5
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
