// Pipeline error taxonomy.
//
// Only failures that abort a run live here. Degenerate-but-valid batches
// (everything filtered, everything noise, too few keywords) are not errors;
// they flow through the pipeline and produce an empty or shorter topic list.

use thiserror::Error;

/// Fatal errors surfaced by the topic pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The raw input could not be decoded as text.
    #[error("Input is not valid text: {0}")]
    InputFormat(String),

    /// The embedding provider failed or broke its order/shape contract.
    #[error("Embedding provider failed: {0}")]
    EmbeddingProvider(String),

    /// The provider returned a different number of vectors than texts sent.
    #[error("Embedding provider returned {actual} vectors for {expected} responses")]
    VectorCountMismatch { expected: usize, actual: usize },

    /// The vectors handed to the grouper were unusable.
    #[error("Grouping failed: {0}")]
    Grouping(#[from] GroupingError),

    /// A normalizer table or spelling dictionary was invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Errors from validating vectors before clustering.
#[derive(Error, Debug, PartialEq)]
pub enum GroupingError {
    /// Vectors in one batch must share a dimension.
    #[error("vector {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// NaN or infinite components make distances meaningless.
    #[error("vector {index} contains a non-finite value")]
    NonFinite { index: usize },

    /// The clustering library rejected the batch.
    #[error("clustering failed: {0}")]
    Clustering(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
