//! Request-level error type for the comparison pipeline.

use thiserror::Error;

/// Failure of a single comparison request.
///
/// Adapter and encoding faults fail the whole request; an empty result list
/// is never reported through this type since it is a valid outcome.
#[derive(Error, Debug)]
pub enum CompareError {
    /// The embedding function rejected the input
    #[error("encoding error: {0}")]
    Encode(#[from] crate::embedding::EncodeError),

    /// The vector store could not serve a query
    #[error("vector store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// The lexical ranker was used before fit or could not be built
    #[error("lexical ranker error: {0}")]
    Lexical(#[from] crate::retrieval::LexicalError),
}

/// Result alias for comparison operations.
pub type CompareResult<T> = Result<T, CompareError>;
