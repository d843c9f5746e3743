//! Retrieval and ranking strategies.
//!
//! Three independent rankers share nothing but the output type: lexical
//! (TF-IDF cosine over the in-process corpus), dense (store-side embedding
//! nearest-neighbor), and hybrid (fused dense+sparse candidates rescored by
//! dense cosine).

mod dense;
mod fusion;
mod hybrid;
mod lexical;
mod vectorizer;

pub use dense::DenseRanker;
pub use fusion::{reciprocal_rank_fusion, FusedCandidate, RrfConfig};
pub use hybrid::HybridRanker;
pub use lexical::{LexicalError, LexicalRanker};
pub use vectorizer::{TermVectorIndex, VectorizerConfig};
