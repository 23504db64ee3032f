//! Size-constrained greedy packing.
//!
//! Turns a sentence stream plus adjacent similarity scores into chunks in a
//! single forward pass.
//!
//! ## The Algorithm
//!
//! Keep a buffer of sentences. For each next sentence, two questions:
//!
//! - **must break**: would adding it push the buffer over `max_chunk_size`?
//! - **should break**: is its similarity to the previous sentence below the
//!   threshold, *and* does the buffer already hold `min_chunk_size` words?
//!
//! Either one closes the buffer before the sentence; otherwise the sentence
//! joins the buffer. Whatever remains at the end becomes the last chunk,
//! however small.
//!
//! ```text
//! sentences:  "A cat sleeps."  "A dog sleeps."  "Quantum mechanics is weird."  "Relativity bends spacetime."
//! words:            3                3                    4                           3
//! scores:                   0.9              0.1                          0.85
//! threshold 0.5, min 2, max 100
//!
//! i=1  sim 0.9  buffer 3   -> append            buffer 6
//! i=2  sim 0.1  buffer 6   -> should break      emit "A cat sleeps. A dog sleeps."
//! i=3  sim 0.85 buffer 4   -> append            buffer 7
//! end                      -> emit "Quantum mechanics is weird. Relativity bends spacetime."
//! ```
//!
//! ## Sentences Are Never Split
//!
//! A sentence longer than `max_chunk_size` on its own still becomes exactly
//! one chunk. It is reported in [`Packing::oversized`] and logged, because it
//! usually means extraction glued a page together without punctuation.
//!
//! ## Overlap Is Not Here
//!
//! Packed chunks are disjoint. Overlap is padding added afterwards by the
//! document layer and never changes a break decision.

use std::ops::Range;

use tracing::warn;

use crate::sentence::count_words;
use crate::{ChunkingConfig, Error, Result};

/// A closed buffer: consecutive sentences joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedChunk {
    /// Sentences joined with a single space.
    pub text: String,
    /// Whitespace-delimited words in `text`.
    pub word_count: usize,
    /// Indices of the sentences in this chunk.
    pub sentences: Range<usize>,
}

/// A single sentence longer than the maximum chunk size.
///
/// Non-fatal: the sentence is still emitted as its own chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OversizedSentence {
    /// Section the sentence belongs to (empty when packing directly).
    pub section: String,
    /// Index of the sentence in its segmented sentence list.
    pub sentence: usize,
    /// Words in the sentence.
    pub word_count: usize,
    /// The ceiling it exceeds.
    pub max_chunk_size: usize,
}

impl std::fmt::Display for OversizedSentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sentence {} in section {:?} has {} words (max {})",
            self.sentence, self.section, self.word_count, self.max_chunk_size
        )
    }
}

/// Output of [`pack`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packing {
    /// Chunks in sentence order.
    pub chunks: Vec<PackedChunk>,
    /// Warnings for sentences that alone exceed the ceiling.
    pub oversized: Vec<OversizedSentence>,
}

/// Pack sentences into chunks.
///
/// `scores[i]` is the similarity between `sentences[i]` and
/// `sentences[i + 1]`, as produced by
/// [`adjacent_similarities`](crate::adjacent_similarities).
///
/// # Errors
///
/// Returns [`Error::Config`] for an invalid config and
/// [`Error::ScoreCountMismatch`] unless `scores.len() == sentences.len() - 1`
/// (or both are empty).
///
/// # Example
///
/// ```rust
/// use folio::{pack, ChunkingConfig};
///
/// let sentences = [
///     "A cat sleeps.",
///     "A dog sleeps.",
///     "Quantum mechanics is weird.",
///     "Relativity bends spacetime.",
/// ];
/// let config = ChunkingConfig::new(2, 100).unwrap();
///
/// let packing = pack(&sentences, &[0.9, 0.1, 0.85], &config).unwrap();
/// let texts: Vec<&str> = packing.chunks.iter().map(|c| c.text.as_str()).collect();
///
/// assert_eq!(
///     texts,
///     [
///         "A cat sleeps. A dog sleeps.",
///         "Quantum mechanics is weird. Relativity bends spacetime.",
///     ]
/// );
/// ```
pub fn pack<S: AsRef<str>>(sentences: &[S], scores: &[f32], config: &ChunkingConfig) -> Result<Packing> {
    config.validate()?;

    let expected = sentences.len().saturating_sub(1);
    if scores.len() != expected {
        return Err(Error::ScoreCountMismatch {
            sentences: sentences.len(),
            expected,
            actual: scores.len(),
        });
    }

    let mut packing = Packing::default();
    let Some(first) = sentences.first() else {
        return Ok(packing);
    };

    let mut start = 0;
    let mut buffered = count_words(first.as_ref());
    check_oversized(&mut packing, 0, buffered, config);

    for (i, sentence) in sentences.iter().enumerate().skip(1) {
        let words = count_words(sentence.as_ref());
        check_oversized(&mut packing, i, words, config);

        // The buffer always holds at least one sentence here, so a break
        // never emits an empty chunk.
        let must_break = config.would_overflow(buffered, words);
        let should_break = config.is_topic_break(scores[i - 1], buffered);

        if must_break || should_break {
            packing.chunks.push(close(sentences, start..i));
            start = i;
            buffered = words;
        } else {
            buffered += words;
        }
    }

    packing.chunks.push(close(sentences, start..sentences.len()));
    Ok(packing)
}

fn close<S: AsRef<str>>(sentences: &[S], range: Range<usize>) -> PackedChunk {
    let text = sentences[range.clone()]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ");
    PackedChunk {
        word_count: count_words(&text),
        text,
        sentences: range,
    }
}

fn check_oversized(packing: &mut Packing, sentence: usize, words: usize, config: &ChunkingConfig) {
    if words <= config.max_chunk_size() {
        return;
    }
    warn!(
        sentence,
        words,
        max = config.max_chunk_size(),
        "sentence exceeds max chunk size, emitting it as its own chunk"
    );
    packing.oversized.push(OversizedSentence {
        section: String::new(),
        sentence,
        word_count: words,
        max_chunk_size: config.max_chunk_size(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(packing: &Packing) -> Vec<&str> {
        packing.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_topic_shift_example() {
        let sentences = [
            "A cat sleeps.",
            "A dog sleeps.",
            "Quantum mechanics is weird.",
            "Relativity bends spacetime.",
        ];
        let config = ChunkingConfig::new(2, 100).unwrap();
        let packing = pack(&sentences, &[0.9, 0.1, 0.85], &config).unwrap();

        assert_eq!(
            texts(&packing),
            [
                "A cat sleeps. A dog sleeps.",
                "Quantum mechanics is weird. Relativity bends spacetime."
            ]
        );
        assert_eq!(packing.chunks[0].word_count, 6);
        assert_eq!(packing.chunks[0].sentences, 0..2);
        assert_eq!(packing.chunks[1].word_count, 7);
        assert_eq!(packing.chunks[1].sentences, 2..4);
        assert!(packing.oversized.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let config = ChunkingConfig::default();
        let packing = pack::<&str>(&[], &[], &config).unwrap();
        assert!(packing.chunks.is_empty());
    }

    #[test]
    fn test_single_sentence_any_size() {
        let config = ChunkingConfig::new(50, 100).unwrap();
        let packing = pack(&["Tiny."], &[], &config).unwrap();
        assert_eq!(texts(&packing), ["Tiny."]);
    }

    #[test]
    fn test_single_oversized_sentence() {
        let long = words(5000);
        let config = ChunkingConfig::new(500, 1500).unwrap();
        let packing = pack(&[long.as_str()], &[], &config).unwrap();

        assert_eq!(packing.chunks.len(), 1);
        assert_eq!(packing.chunks[0].word_count, 5000);
        assert_eq!(
            packing.oversized,
            [OversizedSentence {
                section: String::new(),
                sentence: 0,
                word_count: 5000,
                max_chunk_size: 1500,
            }]
        );
    }

    #[test]
    fn test_oversized_sentence_isolated() {
        let long = words(30);
        let sentences = ["Short one here.", long.as_str(), "Another short one."];
        let config = ChunkingConfig::new(1, 20).unwrap();
        let packing = pack(&sentences, &[0.99, 0.99], &config).unwrap();

        assert_eq!(packing.chunks.len(), 3);
        assert_eq!(packing.chunks[1].sentences, 1..2);
        assert_eq!(packing.oversized.len(), 1);
        assert_eq!(packing.oversized[0].sentence, 1);
    }

    #[test]
    fn test_forced_break_despite_high_similarity() {
        let s = words(4);
        let sentences = vec![s.as_str(); 5];
        let config = ChunkingConfig::new(1, 10).unwrap();
        let packing = pack(&sentences, &[1.0; 4], &config).unwrap();

        // 4 + 4 = 8 fits, + 4 = 12 does not
        let counts: Vec<usize> = packing.chunks.iter().map(|c| c.word_count).collect();
        assert_eq!(counts, [8, 8, 4]);
    }

    #[test]
    fn test_exact_fit_does_not_break() {
        let s = words(5);
        let config = ChunkingConfig::new(1, 10).unwrap();
        let packing = pack(&[s.as_str(), s.as_str()], &[0.9], &config).unwrap();
        assert_eq!(packing.chunks.len(), 1);
        assert_eq!(packing.chunks[0].word_count, 10);
    }

    #[test]
    fn test_topic_shift_ignored_below_min() {
        let sentences = ["One two.", "Three four.", "Five six."];
        let config = ChunkingConfig::new(5, 100).unwrap();
        let packing = pack(&sentences, &[0.0, 0.0], &config).unwrap();

        // Buffer holds 2 then 4 words, never reaching min
        assert_eq!(packing.chunks.len(), 1);
    }

    #[test]
    fn test_trailing_remainder_kept() {
        let sentences = ["One two three four.", "Five six seven eight.", "Nine."];
        let config = ChunkingConfig::new(4, 100).unwrap();
        let packing = pack(&sentences, &[0.9, 0.1], &config).unwrap();

        assert_eq!(texts(&packing), ["One two three four. Five six seven eight.", "Nine."]);
        assert_eq!(packing.chunks[1].word_count, 1);
    }

    #[test]
    fn test_score_count_mismatch() {
        let config = ChunkingConfig::default();
        let err = pack(&["One.", "Two."], &[], &config).unwrap_err();
        assert!(matches!(
            err,
            Error::ScoreCountMismatch {
                sentences: 2,
                expected: 1,
                actual: 0
            }
        ));
    }
}
