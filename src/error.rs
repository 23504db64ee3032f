//! Error types for folio.

/// Boxed error returned by an embedding backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while chunking a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No sections were given, or every section segmented to zero sentences.
    #[error("document has no sentences to chunk")]
    EmptyInput,

    /// The embedding provider failed for one section (or the merged stream).
    #[error("embedding failed for section {section:?}: {source}")]
    Embedding {
        /// Name of the section being chunked.
        section: String,
        /// The underlying provider failure.
        #[source]
        source: EmbeddingError,
    },

    /// Invalid chunking configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Similarity scores do not line up with the sentence list.
    #[error("expected {expected} similarity scores for {sentences} sentences, got {actual}")]
    ScoreCountMismatch {
        /// Number of sentences being packed.
        sentences: usize,
        /// Scores required (`sentences - 1`).
        expected: usize,
        /// Scores supplied.
        actual: usize,
    },
}

/// Errors raised at the embedding boundary.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// The backend itself returned an error.
    #[error("embedding provider error: {0}")]
    Provider(#[source] BoxError),

    /// The backend returned a different number of vectors than texts.
    #[error("embedding provider returned {actual} vectors for {expected} texts")]
    CountMismatch {
        /// Number of texts sent.
        expected: usize,
        /// Number of vectors received.
        actual: usize,
    },

    /// The backend returned zero-dimensional vectors.
    #[error("embedding provider returned empty vectors")]
    EmptyVector,

    /// Vectors within one call have different dimensions.
    #[error("embedding {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        /// Position of the offending vector.
        index: usize,
        /// Dimension of the first vector.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },
}

/// Invalid [`ChunkingConfig`](crate::ChunkingConfig) or advisor input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Threshold must lie strictly between 0 and 1.
    #[error("similarity threshold {0} must be in (0, 1)")]
    ThresholdOutOfRange(f32),

    /// Minimum chunk size must be > 0.
    #[error("min chunk size must be > 0")]
    ZeroMinChunkSize,

    /// Maximum chunk size must exceed the minimum.
    #[error("max chunk size ({max}) must be > min chunk size ({min})")]
    MaxNotAboveMin {
        /// The minimum chunk size.
        min: usize,
        /// The maximum that was too small.
        max: usize,
    },

    /// Overlap must be smaller than the maximum chunk size.
    #[error("overlap {overlap} must be < max chunk size {max}")]
    OverlapExceedsMax {
        /// The maximum chunk size.
        max: usize,
        /// The overlap that was too large.
        overlap: usize,
    },

    /// The advisor has no profile with this name.
    #[error("unknown domain {0:?} (expected one of: technical, psychology, philosophy, history, general)")]
    UnknownDomain(String),
}

/// Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;
