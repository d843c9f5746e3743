//! textsim: text similarity comparison service
//!
//! Ranks corpus documents by similarity to an input text using three
//! independent strategies:
//! - lexical: TF-IDF cosine over an in-process term-vector index
//! - semantic: dense embedding nearest-neighbor via an external vector store
//! - hybrid: dense + sparse candidate fusion (RRF) rescored by dense cosine
//!
//! All three return score-comparable `RankedMatch` lists under one envelope.

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod query;
pub mod retrieval;
pub mod server;
pub mod store;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::{CompareError, CompareResult};
pub use types::*;
