//! Query and document encoding.
//!
//! Dense encoding goes through a pluggable backend (an OpenAI-compatible
//! HTTP endpoint, or a deterministic hash encoder for offline smoke tests).
//! The sparse term-weight representation is computed in-process so the
//! sparse index adapter only ever sees plain data.

pub mod backend;
pub mod sparse;

pub use backend::{build_encoder, DenseEncoder, EncodeError, EncodeResult, HashEncoder};
pub use sparse::{SparseEncoder, SparseVector};
