//! Adjacent-sentence similarity.
//!
//! ## The Idea
//!
//! Adjacent sentences about the same topic have similar embeddings. When the
//! topic changes, similarity drops:
//!
//! ```text
//! Sentences:     [S0]   [S1]   [S2]   [S3]
//! Scores:            0.9    0.1    0.85
//!                           ^
//!                      topic shift
//! ```
//!
//! `scores[i]` compares sentence `i` with sentence `i + 1`, so `n` sentences
//! give `n - 1` scores. The scores only nominate break points; the packer
//! decides which ones to take.
//!
//! ## Cost
//!
//! One embedding call per section, batched, then O(n × d) arithmetic.
//! Per-sentence calls would multiply the round trips to a possibly remote
//! model by the sentence count.

use crate::embed::{embed_texts, Embedder};
use crate::error::EmbeddingError;

/// Cosine similarity between two vectors of equal length.
///
/// Returns `0.0` if either vector has zero norm.
///
/// ```rust
/// use folio::cosine_similarity;
///
/// assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
/// assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]).abs() < 1e-6);
/// assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
/// ```
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "cosine of vectors with different lengths");

    #[cfg(feature = "simd")]
    {
        innr::cosine(a, b)
    }

    #[cfg(not(feature = "simd"))]
    {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a > 0.0 && norm_b > 0.0 {
            dot / (norm_a * norm_b)
        } else {
            0.0
        }
    }
}

/// Score each adjacent sentence pair.
///
/// Embeds all sentences in one call, then returns `sentences.len() - 1`
/// cosine similarities. With fewer than two sentences there is nothing to
/// compare and the embedder is not called.
///
/// # Errors
///
/// Propagates embedder failures and contract violations (wrong vector count,
/// empty or mixed dimensions) without retrying.
pub fn adjacent_similarities<S, E>(sentences: &[S], embedder: &E) -> Result<Vec<f32>, EmbeddingError>
where
    S: AsRef<str>,
    E: Embedder + ?Sized,
{
    if sentences.len() < 2 {
        return Ok(vec![]);
    }

    let texts: Vec<&str> = sentences.iter().map(AsRef::as_ref).collect();
    let embeddings = embed_texts(embedder, &texts)?;

    Ok(embeddings
        .windows(2)
        .map(|pair| cosine_similarity(&pair[0], &pair[1]))
        .collect())
}

/// Sentence indices where a new topic may start.
///
/// Index `i + 1` is returned for every score `scores[i]` below `threshold`.
/// Informational: the packer applies its own size rules on top.
///
/// ```rust
/// use folio::candidate_breaks;
///
/// assert_eq!(candidate_breaks(&[0.9, 0.1, 0.85, 0.2], 0.5), vec![2, 4]);
/// ```
#[must_use]
pub fn candidate_breaks(scores: &[f32], threshold: f32) -> Vec<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, &s)| s < threshold)
        .map(|(i, _)| i + 1)
        .collect()
}
