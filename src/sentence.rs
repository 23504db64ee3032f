//! Sentence segmentation.
//!
//! Every later stage works on sentences: they are what gets embedded, what
//! similarity is measured between, and the unit the packer never splits.
//!
//! ## Boundary Rules
//!
//! The default rule is plain punctuation: a sentence ends at `.`, `!` or
//! `?` when the next character is whitespace.
//!
//! ```text
//! "It was late. Was it? Yes! Pi is 3.14 or so."
//!              ^       ^    ^
//! ["It was late.", "Was it?", "Yes!", "Pi is 3.14 or so."]
//! ```
//!
//! Decimals survive (no whitespace after the point), abbreviations do not:
//! "Dr. Smith" becomes two pieces. [`SplitMode::Unicode`] switches to
//! Unicode Standard Annex #29 sentence boundaries, which behave differently
//! around quotes and closing punctuation.
//!
//! ## Noise Filtering
//!
//! Book extraction leaves debris: page numbers, stray quotes, lone
//! punctuation. Pieces shorter than `min_chars` grapheme clusters after
//! trimming are dropped.

use unicode_segmentation::UnicodeSegmentation;

/// Minimum sentence length, in grapheme clusters, used when none is given.
pub const DEFAULT_MIN_SENTENCE_CHARS: usize = 3;

/// Where sentence boundaries are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SplitMode {
    /// Split after `.`, `!` or `?` followed by whitespace.
    #[default]
    Punctuation,
    /// Unicode (UAX #29) sentence boundaries.
    Unicode,
}

/// Splits raw section text into an ordered list of sentences.
///
/// ## Example
///
/// ```rust
/// use folio::SentenceSplitter;
///
/// let splitter = SentenceSplitter::new();
/// let sentences = splitter.split("First sentence. Second one! Third?");
///
/// assert_eq!(sentences, ["First sentence.", "Second one!", "Third?"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSplitter {
    min_chars: usize,
    mode: SplitMode,
}

impl SentenceSplitter {
    /// Create a punctuation splitter with the default noise filter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_chars: DEFAULT_MIN_SENTENCE_CHARS,
            mode: SplitMode::Punctuation,
        }
    }

    /// Set the minimum sentence length in grapheme clusters.
    ///
    /// `0` and `1` both keep every non-empty piece.
    #[must_use]
    pub const fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Set the boundary rule.
    #[must_use]
    pub const fn with_mode(mut self, mode: SplitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Minimum sentence length in grapheme clusters.
    #[must_use]
    pub const fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// The boundary rule in use.
    #[must_use]
    pub const fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Split `text` into trimmed sentences, in document order.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if text.is_empty() {
            return vec![];
        }

        let pieces: Vec<&str> = match self.mode {
            SplitMode::Punctuation => split_on_terminal_punctuation(text),
            SplitMode::Unicode => text.split_sentence_bounds().collect(),
        };

        pieces
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.graphemes(true).count() >= self.min_chars)
            .collect()
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut after every `.`, `!` or `?` that is immediately followed by whitespace.
fn split_on_terminal_punctuation(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
            let end = i + c.len_utf8();
            pieces.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}

/// Number of whitespace-delimited words in `text`.
///
/// This is the only word count used anywhere in the crate; chunk sizes,
/// limits and overlap are all measured with it.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
