//! The embedding boundary.
//!
//! folio never loads a model itself. Anything that turns a batch of texts
//! into same-length vectors can drive it: a local ONNX model, an HTTP client,
//! a closure in a test.
//!
//! The contract is small:
//!
//! - one vector per input text, in input order
//! - every vector in one call has the same dimension
//! - vectors are comparable with cosine similarity
//!
//! Anything else (batching limits, retries, timeouts) belongs to the backend.
//! Results are checked on the way in; a backend that breaks the contract
//! fails the section instead of producing misaligned chunks.

use crate::error::{BoxError, EmbeddingError};
use crate::Chunk;

/// A batched text embedding backend.
///
/// Closures implement this directly, so a plain `embed_fn` works anywhere an
/// embedder is expected:
///
/// ```rust
/// use folio::Embedder;
///
/// let embed_fn = |texts: &[&str]| -> Result<Vec<Vec<f32>>, String> {
///     Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
/// };
///
/// let vectors = embed_fn.embed(&["one", "three"]).unwrap();
/// assert_eq!(vectors, vec![vec![3.0, 1.0], vec![5.0, 1.0]]);
/// ```
pub trait Embedder {
    /// Embed every text in `texts`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::Provider`] when the backend fails.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

impl<F, E> Embedder for F
where
    F: Fn(&[&str]) -> Result<Vec<Vec<f32>>, E>,
    E: Into<BoxError>,
{
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self(texts).map_err(|e| EmbeddingError::Provider(e.into()))
    }
}

/// Embed `texts` in one call and check the result against the contract.
///
/// # Errors
///
/// Fails if the backend fails, returns the wrong number of vectors, returns
/// zero-dimensional vectors, or mixes dimensions.
pub fn embed_texts<E>(embedder: &E, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>
where
    E: Embedder + ?Sized,
{
    if texts.is_empty() {
        return Ok(vec![]);
    }

    let vectors = embedder.embed(texts)?;

    if vectors.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }

    let dim = vectors.first().map_or(0, Vec::len);
    if dim == 0 {
        return Err(EmbeddingError::EmptyVector);
    }
    if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
        return Err(EmbeddingError::DimensionMismatch {
            index,
            expected: dim,
            actual: v.len(),
        });
    }

    Ok(vectors)
}

/// Embed each chunk's full text (overlap included) for the vector store.
///
/// Returns one vector per chunk, parallel to `chunks`. Sentence embeddings
/// from boundary detection are not reused: a chunk's meaning is not the
/// average of its sentences.
///
/// # Errors
///
/// Same as [`embed_texts`].
pub fn embed_chunks<E>(chunks: &[Chunk], embedder: &E) -> Result<Vec<Vec<f32>>, EmbeddingError>
where
    E: Embedder + ?Sized,
{
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    embed_texts(embedder, &texts)
}

/// Embedder backed by a local fastembed model.
///
/// Requires the `fastembed` feature.
///
/// ## Example
///
/// ```rust,ignore
/// use folio::{chunk_document, ChunkingConfig, FastEmbedder, MergeMode, Metadata, Section};
///
/// // Uses fastembed's default model (BGE-small-en)
/// let embedder = FastEmbedder::new()?;
/// let doc = chunk_document(&sections, &ChunkingConfig::default(), &Metadata::new(), &embedder, MergeMode::Separate)?;
/// ```
#[cfg(feature = "fastembed")]
pub struct FastEmbedder {
    model: fastembed::TextEmbedding,
    batch_size: Option<usize>,
}

#[cfg(feature = "fastembed")]
impl FastEmbedder {
    /// Load fastembed's default model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails to load.
    pub fn new() -> Result<Self, EmbeddingError> {
        let model = fastembed::TextEmbedding::try_new(Default::default())
            .map_err(|e| EmbeddingError::Provider(e.into()))?;
        Ok(Self::from_model(model))
    }

    /// Wrap an already-initialized model.
    #[must_use]
    pub fn from_model(model: fastembed::TextEmbedding) -> Self {
        Self {
            model,
            batch_size: None,
        }
    }

    /// Set the inference batch size passed to fastembed.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
}

#[cfg(feature = "fastembed")]
impl Embedder for FastEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.model
            .embed(texts.to_vec(), self.batch_size)
            .map_err(|e| EmbeddingError::Provider(e.into()))
    }
}

#[cfg(feature = "fastembed")]
impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(texts: &[&str]) -> Result<Vec<Vec<f32>>, String> {
        Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
    }

    #[test]
    fn test_function_is_an_embedder() {
        let vectors = embed_texts(&lengths, &["ab", "abcd"]).unwrap();
        assert_eq!(vectors, vec![vec![2.0, 1.0], vec![4.0, 1.0]]);
    }

    #[test]
    fn test_empty_batch_skips_backend() {
        let failing = |_: &[&str]| -> Result<Vec<Vec<f32>>, String> { Err("called".into()) };
        assert!(embed_texts(&failing, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_provider_error_wrapped() {
        let failing = |_: &[&str]| -> Result<Vec<Vec<f32>>, &'static str> { Err("offline") };
        let err = embed_texts(&failing, &["a"]).unwrap_err();
        assert!(matches!(err, EmbeddingError::Provider(_)));
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn test_count_mismatch() {
        let short = |_: &[&str]| -> Result<Vec<Vec<f32>>, String> { Ok(vec![vec![1.0]]) };
        let err = embed_texts(&short, &["a", "b"]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let ragged =
            |_: &[&str]| -> Result<Vec<Vec<f32>>, String> { Ok(vec![vec![1.0, 0.0], vec![1.0]]) };
        let err = embed_texts(&ragged, &["a", "b"]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                index: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_empty_vectors_rejected() {
        let empty = |t: &[&str]| -> Result<Vec<Vec<f32>>, String> { Ok(vec![vec![]; t.len()]) };
        assert!(matches!(
            embed_texts(&empty, &["a"]),
            Err(EmbeddingError::EmptyVector)
        ));
    }
}
