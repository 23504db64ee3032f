//! The Chunk type: a run of sentences ready to embed and store.

use std::collections::BTreeMap;
use std::ops::Range;

/// Caller-supplied key/value metadata copied onto every chunk.
///
/// Ordered so that two runs over the same input serialize identically.
pub type Metadata = BTreeMap<String, String>;

/// Well-known metadata keys.
pub mod keys {
    /// Section (chapter, page) the chunk came from. Always set by the chunker.
    pub const SECTION: &str = "section";
    /// Book title.
    pub const TITLE: &str = "title";
    /// Book author.
    pub const AUTHOR: &str = "author";
    /// Domain profile name (see [`Domain`](crate::Domain)).
    pub const DOMAIN: &str = "domain";
}

/// One retrieval unit: consecutive sentences from a single section.
///
/// ## Overlap
///
/// With overlap enabled, the last words of the previous chunk are repeated
/// at the front of `text`. `body_start` marks where the chunk's own
/// sentences begin, so the original sentence stream can always be recovered:
///
/// ```text
/// Chunk 0: "A cat sleeps. A dog sleeps."
/// Chunk 1: "dog sleeps. Quantum mechanics is weird."
///           ^^^^^^^^^^^ overlap_words = 2
///                       ^ body_start = 12
/// ```
///
/// ```rust
/// use folio::{Chunk, Metadata};
///
/// let chunk = Chunk {
///     text: "dog sleeps. Quantum mechanics is weird.".to_string(),
///     word_count: 6,
///     index: 1,
///     sentences: 2..3,
///     overlap_words: 2,
///     body_start: 12,
///     metadata: Metadata::new(),
/// };
///
/// assert_eq!(chunk.body(), "Quantum mechanics is weird.");
/// assert_eq!(chunk.overlap_text(), "dog sleeps.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chunk {
    /// The chunk text: overlap prefix (if any) plus sentences joined by single spaces.
    pub text: String,
    /// Whitespace-delimited words in `text`.
    pub word_count: usize,
    /// Zero-based position within the section (or the whole document when merged).
    pub index: usize,
    /// Sentence indices covered, into the segmented sentence list of the source.
    pub sentences: Range<usize>,
    /// Words repeated from the previous chunk at the start of `text`.
    pub overlap_words: usize,
    /// Byte offset in `text` where this chunk's own sentences begin.
    pub body_start: usize,
    /// Caller metadata plus the section name.
    pub metadata: Metadata,
}

impl Chunk {
    /// The chunk's own sentences, without overlap padding.
    ///
    /// An out-of-range `body_start` yields the whole text.
    #[must_use]
    pub fn body(&self) -> &str {
        self.text.get(self.body_start..).unwrap_or(&self.text)
    }

    /// The overlap prefix repeated from the previous chunk (empty if none).
    #[must_use]
    pub fn overlap_text(&self) -> &str {
        self.text
            .get(..self.body_start)
            .map_or("", str::trim_end)
    }

    /// Name of the section this chunk came from.
    #[must_use]
    pub fn section(&self) -> &str {
        self.metadata.get(keys::SECTION).map_or("", String::as_str)
    }

    /// Number of sentences in the body.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Storage identity of this chunk within the book `book_id`.
    #[must_use]
    pub fn key(&self, book_id: &str) -> ChunkKey {
        ChunkKey {
            book: book_id.to_string(),
            section: self.section().to_string(),
            index: self.index,
        }
    }

    /// Whether this chunk has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ section: {:?}, index: {}, sentences: {}..{}, words: {} }}",
            self.section(),
            self.index,
            self.sentences.start,
            self.sentences.end,
            self.word_count
        )
    }
}

/// Unique identity of a stored chunk: `(book, section, index)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkKey {
    /// Book identifier chosen by the caller.
    pub book: String,
    /// Section name.
    pub section: String,
    /// Chunk index within the section.
    pub index: usize,
}

impl std::fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.book, self.section, self.index)
    }
}
