//! Chunking parameters.
//!
//! ## Two Limits, One Preference
//!
//! A chunk has to be big enough to carry meaning and small enough to embed
//! well. Between those limits, topic shifts decide where to cut:
//!
//! ```text
//! words:      0 ........ min ..................... max
//!             |  too small  |   cut on topic shift  | never exceeded
//! ```
//!
//! - `min_chunk_size`: a topic-shift break is honored only once the buffer
//!   holds at least this many words.
//! - `max_chunk_size`: hard ceiling. The buffer is closed before a sentence
//!   that would push it over, however similar that sentence is.
//! - `similarity_threshold`: adjacent sentences scoring below this are a
//!   topic shift.
//! - `overlap`: trailing words of one chunk repeated at the start of the next.
//!   Applied after packing; it never influences where breaks fall.
//!
//! All sizes count whitespace-delimited words.

use crate::error::ConfigError;

/// Similarity threshold used when none is given.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

/// Validated, immutable chunking parameters for one run.
///
/// # Examples
///
/// ```rust
/// use folio::ChunkingConfig;
///
/// let config = ChunkingConfig::new(200, 800)
///     .and_then(|c| c.with_threshold(0.6))
///     .and_then(|c| c.with_overlap(50))
///     .unwrap();
///
/// assert_eq!(config.min_chunk_size(), 200);
/// assert_eq!(config.max_chunk_size(), 800);
/// assert_eq!(config.overlap(), 50);
///
/// // max must exceed min
/// assert!(ChunkingConfig::new(800, 200).is_err());
///
/// // Range syntax
/// let config = ChunkingConfig::try_from(100..=400).unwrap();
/// assert_eq!(config.max_chunk_size(), 400);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkingConfig {
    similarity_threshold: f32,
    min_chunk_size: usize,
    max_chunk_size: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    overlap: usize,
}

impl ChunkingConfig {
    /// Create a config with the given word limits, the default threshold and
    /// no overlap.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_chunk_size == 0` or `max_chunk_size <= min_chunk_size`.
    pub fn new(min_chunk_size: usize, max_chunk_size: usize) -> Result<Self, ConfigError> {
        let config = Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_chunk_size,
            max_chunk_size,
            overlap: 0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the similarity threshold below which adjacent sentences count as a
    /// topic shift.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < threshold < 1`.
    pub fn with_threshold(self, threshold: f32) -> Result<Self, ConfigError> {
        let config = Self {
            similarity_threshold: threshold,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the number of overlap words carried into each following chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if `overlap >= max_chunk_size`.
    pub fn with_overlap(self, overlap: usize) -> Result<Self, ConfigError> {
        let config = Self { overlap, ..self };
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant.
    ///
    /// Constructors already call this; it exists for values that arrive some
    /// other way (deserialization, struct update in tests).
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.similarity_threshold;
        if !(t > 0.0 && t < 1.0) {
            return Err(ConfigError::ThresholdOutOfRange(t));
        }
        if self.min_chunk_size == 0 {
            return Err(ConfigError::ZeroMinChunkSize);
        }
        if self.max_chunk_size <= self.min_chunk_size {
            return Err(ConfigError::MaxNotAboveMin {
                min: self.min_chunk_size,
                max: self.max_chunk_size,
            });
        }
        if self.overlap >= self.max_chunk_size {
            return Err(ConfigError::OverlapExceedsMax {
                max: self.max_chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }

    /// Similarity below which a topic shift is assumed.
    #[must_use]
    pub const fn similarity_threshold(&self) -> f32 {
        self.similarity_threshold
    }

    /// Word count a chunk needs before a topic-shift break is honored.
    #[must_use]
    pub const fn min_chunk_size(&self) -> usize {
        self.min_chunk_size
    }

    /// Hard ceiling on chunk word count.
    #[must_use]
    pub const fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Overlap words prepended to each following chunk.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Whether adding `additional` words to a buffer of `current` words would
    /// cross the ceiling.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.max_chunk_size
    }

    /// Whether a similarity drop to `similarity` should close a buffer that
    /// already holds `current` words.
    #[must_use]
    pub fn is_topic_break(&self, similarity: f32, current: usize) -> bool {
        similarity < self.similarity_threshold && current >= self.min_chunk_size
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        // Roughly a page of prose per chunk
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_chunk_size: 100,
            max_chunk_size: 500,
            overlap: 0,
        }
    }
}

impl TryFrom<std::ops::RangeInclusive<usize>> for ChunkingConfig {
    type Error = ConfigError;

    fn try_from(range: std::ops::RangeInclusive<usize>) -> Result<Self, Self::Error> {
        Self::new(*range.start(), *range.end())
    }
}
