//! Chapter-aware chunking of whole documents.
//!
//! A document arrives from an extractor as ordered, named sections. How
//! those sections should be treated depends on what they are:
//!
//! | Sections are... | Example | Mode |
//! |-----------------|---------|------|
//! | meaningful units | EPUB chapters | [`MergeMode::Separate`] |
//! | format artifacts | PDF pages | [`MergeMode::Merged`] |
//!
//! In separate mode each section runs through segment → score → pack on its
//! own and chunk indices restart at zero per section; no chunk ever spans
//! two chapters. In merged mode the sections are joined into one stream
//! first, so a sentence broken across a page boundary is healed, and
//! indices run across the whole document.
//!
//! The caller picks the mode. Nothing here knows about file formats.
//!
//! ## Overlap
//!
//! After packing, each chunk after the first in a stream is prefixed with
//! the last `overlap` words of its predecessor. The packer has already
//! decided every break by then, so overlap never moves a boundary.

use tracing::{debug, debug_span, info};

use crate::chunk::{keys, Chunk, Metadata};
use crate::embed::Embedder;
use crate::pack::{pack, OversizedSentence, PackedChunk};
use crate::sentence::{count_words, SentenceSplitter};
use crate::similarity::adjacent_similarities;
use crate::{ChunkingConfig, Error, Result};

/// Section name given to the single stream in merged mode, unless overridden.
pub const DEFAULT_MERGED_SECTION: &str = "full_text";

/// One named, ordered unit of a document (chapter, page) as extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    /// Section name, e.g. a chapter title or "page 12".
    pub name: String,
    /// Raw extracted text.
    pub text: String,
}

impl Section {
    /// Create a section.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Whitespace-delimited words in the raw text.
    #[must_use]
    pub fn word_count(&self) -> usize {
        count_words(&self.text)
    }
}

/// Total words across all sections; the input the advisor expects.
#[must_use]
pub fn total_word_count(sections: &[Section]) -> usize {
    sections.iter().map(Section::word_count).sum()
}

/// How sections relate to chunk boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MergeMode {
    /// Chunk each section independently; indices restart per section.
    #[default]
    Separate,
    /// Concatenate all sections and chunk them as one stream.
    Merged,
}

/// Chunks produced for one document, plus non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkedDocument {
    /// Chunks in document order.
    pub chunks: Vec<Chunk>,
    /// Sentences that alone exceeded the maximum chunk size.
    pub oversized: Vec<OversizedSentence>,
}

impl ChunkedDocument {
    /// Number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunks were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Drop the warnings and keep the chunks.
    #[must_use]
    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    /// Size statistics over all chunks.
    #[must_use]
    pub fn stats(&self) -> ChunkStats {
        ChunkStats::from_chunks(&self.chunks)
    }
}

impl IntoIterator for ChunkedDocument {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

/// Word-count statistics for a chunk list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkStats {
    /// Number of chunks.
    pub chunks: usize,
    /// Sum of chunk word counts (overlap counted in every chunk it appears in).
    pub total_words: usize,
    /// Smallest chunk.
    pub min_words: usize,
    /// Largest chunk.
    pub max_words: usize,
    /// Mean chunk size, 0 when there are no chunks.
    pub mean_words: f64,
}

impl ChunkStats {
    /// Compute statistics for `chunks`.
    #[must_use]
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        if chunks.is_empty() {
            return Self::default();
        }
        let total_words: usize = chunks.iter().map(|c| c.word_count).sum();
        Self {
            chunks: chunks.len(),
            total_words,
            min_words: chunks.iter().map(|c| c.word_count).min().unwrap_or(0),
            max_words: chunks.iter().map(|c| c.word_count).max().unwrap_or(0),
            mean_words: total_words as f64 / chunks.len() as f64,
        }
    }
}

/// Runs segmentation, boundary detection and packing over a document.
///
/// ## Example
///
/// ```rust
/// use folio::{keys, ChunkingConfig, DocumentChunker, Metadata, Section};
///
/// // Toy embedder: animal sentences vs everything else
/// let embed = |texts: &[&str]| -> Result<Vec<Vec<f32>>, String> {
///     Ok(texts
///         .iter()
///         .map(|t| if t.contains("cat") || t.contains("dog") { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
///         .collect())
/// };
///
/// let sections = [Section::new(
///     "Chapter 1",
///     "A cat sleeps. A dog sleeps. Quantum mechanics is weird. Relativity bends spacetime.",
/// )];
/// let mut metadata = Metadata::new();
/// metadata.insert(keys::TITLE.to_string(), "Mixed Notes".to_string());
///
/// let chunker = DocumentChunker::new(ChunkingConfig::new(2, 100).unwrap());
/// let doc = chunker.chunk(&sections, &metadata, &embed).unwrap();
///
/// assert_eq!(doc.len(), 2);
/// assert_eq!(doc.chunks[1].text, "Quantum mechanics is weird. Relativity bends spacetime.");
/// assert_eq!(doc.chunks[1].section(), "Chapter 1");
/// assert_eq!(doc.chunks[1].metadata[keys::TITLE], "Mixed Notes");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentChunker {
    config: ChunkingConfig,
    splitter: SentenceSplitter,
    mode: MergeMode,
    merged_section: String,
}

impl DocumentChunker {
    /// Create a chunker in separate mode with the default splitter.
    #[must_use]
    pub fn new(config: ChunkingConfig) -> Self {
        Self {
            config,
            splitter: SentenceSplitter::new(),
            mode: MergeMode::Separate,
            merged_section: DEFAULT_MERGED_SECTION.to_string(),
        }
    }

    /// Use a custom sentence splitter.
    #[must_use]
    pub fn with_splitter(mut self, splitter: SentenceSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Choose how sections map to chunk streams.
    #[must_use]
    pub fn with_mode(mut self, mode: MergeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Section name recorded on chunks in merged mode.
    #[must_use]
    pub fn with_merged_section_name(mut self, name: impl Into<String>) -> Self {
        self.merged_section = name.into();
        self
    }

    /// The chunking parameters.
    #[must_use]
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// The merge mode.
    #[must_use]
    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    /// Chunk a document.
    ///
    /// `metadata` is copied onto every chunk, with [`keys::SECTION`] set to
    /// the section name (replacing any caller value under that key).
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the config is invalid (checked before any text
    ///   is touched)
    /// - [`Error::EmptyInput`] if there are no sections or no section yields
    ///   a sentence
    /// - [`Error::Embedding`] if the embedder fails for any section; no
    ///   partial result is returned
    pub fn chunk<E>(&self, sections: &[Section], metadata: &Metadata, embedder: &E) -> Result<ChunkedDocument>
    where
        E: Embedder + ?Sized,
    {
        self.config.validate()?;
        if sections.is_empty() {
            return Err(Error::EmptyInput);
        }

        let merged_text;
        let streams: Vec<(&str, &str)> = match self.mode {
            MergeMode::Separate => sections
                .iter()
                .map(|s| (s.name.as_str(), s.text.as_str()))
                .collect(),
            MergeMode::Merged => {
                merged_text = sections
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                vec![(self.merged_section.as_str(), merged_text.as_str())]
            }
        };

        let mut doc = ChunkedDocument::default();
        let mut total_sentences = 0;

        for (name, text) in streams {
            // Packer warnings inherit the section name from this span
            let _span = debug_span!("section", name).entered();
            let sentences = self.splitter.split(text);
            if sentences.is_empty() {
                debug!(section = name, "no sentences, skipping section");
                continue;
            }
            total_sentences += sentences.len();

            let scores = adjacent_similarities(&sentences, embedder).map_err(|source| {
                Error::Embedding {
                    section: name.to_string(),
                    source,
                }
            })?;
            let packing = pack(&sentences, &scores, &self.config)?;

            debug!(
                section = name,
                sentences = sentences.len(),
                chunks = packing.chunks.len(),
                "chunked section"
            );

            doc.oversized
                .extend(packing.oversized.into_iter().map(|w| OversizedSentence {
                    section: name.to_string(),
                    ..w
                }));
            doc.chunks
                .extend(self.finish(name, &packing.chunks, metadata));
        }

        if total_sentences == 0 {
            return Err(Error::EmptyInput);
        }

        info!(
            sections = sections.len(),
            sentences = total_sentences,
            chunks = doc.chunks.len(),
            oversized = doc.oversized.len(),
            "chunked document"
        );
        Ok(doc)
    }

    /// Attach index, overlap and metadata to one stream's packed chunks.
    fn finish(&self, section: &str, packed: &[PackedChunk], metadata: &Metadata) -> Vec<Chunk> {
        let mut metadata = metadata.clone();
        metadata.insert(keys::SECTION.to_string(), section.to_string());

        let overlap = self.config.overlap();
        let mut chunks = Vec::with_capacity(packed.len());

        for (index, p) in packed.iter().enumerate() {
            let prefix = match index.checked_sub(1) {
                Some(prev) if overlap > 0 => trailing_words(&packed[prev].text, overlap),
                _ => String::new(),
            };

            let (text, body_start, overlap_words) = if prefix.is_empty() {
                (p.text.clone(), 0, 0)
            } else {
                (
                    format!("{prefix} {}", p.text),
                    prefix.len() + 1,
                    count_words(&prefix),
                )
            };

            chunks.push(Chunk {
                word_count: count_words(&text),
                text,
                index,
                sentences: p.sentences.clone(),
                overlap_words,
                body_start,
                metadata: metadata.clone(),
            });
        }

        chunks
    }
}

/// Chunk a document in one call.
///
/// Shorthand for [`DocumentChunker`] with the default splitter.
///
/// # Errors
///
/// See [`DocumentChunker::chunk`].
pub fn chunk_document<E>(
    sections: &[Section],
    config: &ChunkingConfig,
    metadata: &Metadata,
    embedder: &E,
    mode: MergeMode,
) -> Result<ChunkedDocument>
where
    E: Embedder + ?Sized,
{
    DocumentChunker::new(*config)
        .with_mode(mode)
        .chunk(sections, metadata, embedder)
}

/// The last `n` whitespace-delimited words of `text`, joined by single spaces.
fn trailing_words(text: &str, n: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let k = n.min(words.len());
    words[words.len() - k..].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmbeddingError;

    /// Three fixed topics, picked by keyword.
    fn topics(texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, String> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                if t.contains("cat") || t.contains("dog") {
                    vec![1.0, 0.0, 0.0]
                } else if t.contains("quantum") || t.contains("relativity") {
                    vec![0.0, 1.0, 0.0]
                } else {
                    vec![0.0, 0.0, 1.0]
                }
            })
            .collect())
    }

    const CHAPTER: &str =
        "A cat sleeps. A dog sleeps. Quantum mechanics is weird. Relativity bends spacetime.";

    fn config() -> ChunkingConfig {
        ChunkingConfig::new(2, 100).unwrap()
    }

    fn book_metadata() -> Metadata {
        let mut m = Metadata::new();
        m.insert(keys::TITLE.to_string(), "A Brief Tour".to_string());
        m.insert(keys::AUTHOR.to_string(), "N. Author".to_string());
        m
    }

    #[test]
    fn test_separate_mode_restarts_indices() {
        let sections = [
            Section::new("Chapter 1", CHAPTER),
            Section::new("Chapter 2", "The cat purrs loudly."),
        ];
        let doc = DocumentChunker::new(config())
            .chunk(&sections, &book_metadata(), &topics)
            .unwrap();

        let ids: Vec<(&str, usize)> = doc.chunks.iter().map(|c| (c.section(), c.index)).collect();
        assert_eq!(ids, [("Chapter 1", 0), ("Chapter 1", 1), ("Chapter 2", 0)]);
        assert_eq!(doc.chunks[0].text, "A cat sleeps. A dog sleeps.");
        assert_eq!(doc.chunks[2].sentences, 0..1);
    }

    #[test]
    fn test_metadata_propagated() {
        let sections = [Section::new("Chapter 1", CHAPTER)];
        let doc = DocumentChunker::new(config())
            .chunk(&sections, &book_metadata(), &topics)
            .unwrap();

        for chunk in &doc.chunks {
            assert_eq!(chunk.metadata[keys::TITLE], "A Brief Tour");
            assert_eq!(chunk.metadata[keys::AUTHOR], "N. Author");
            assert_eq!(chunk.metadata[keys::SECTION], "Chapter 1");
            assert_eq!(chunk.metadata.len(), 3);
        }
    }

    #[test]
    fn test_merged_mode_heals_page_break() {
        let pages = [
            Section::new("page 1", "A cat sleeps. A dog"),
            Section::new("page 2", "sleeps. Quantum mechanics is weird."),
        ];
        let doc = DocumentChunker::new(config())
            .with_mode(MergeMode::Merged)
            .chunk(&pages, &Metadata::new(), &topics)
            .unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.chunks[0].word_count, 6);
        assert_eq!(doc.chunks[1].text, "Quantum mechanics is weird.");
        assert_eq!(doc.chunks[1].index, 1);
        assert!(doc.chunks.iter().all(|c| c.section() == DEFAULT_MERGED_SECTION));
    }

    #[test]
    fn test_merged_section_name_override() {
        let pages = [Section::new("page 1", CHAPTER)];
        let doc = DocumentChunker::new(config())
            .with_mode(MergeMode::Merged)
            .with_merged_section_name("whole book")
            .chunk(&pages, &Metadata::new(), &topics)
            .unwrap();
        assert_eq!(doc.chunks[0].section(), "whole book");
    }

    #[test]
    fn test_overlap_prefix() {
        let config = config().with_overlap(2).unwrap();
        let sections = [Section::new("Chapter 1", CHAPTER)];
        let doc = DocumentChunker::new(config)
            .chunk(&sections, &Metadata::new(), &topics)
            .unwrap();

        let first = &doc.chunks[0];
        assert_eq!(first.overlap_words, 0);
        assert_eq!(first.body(), first.text);

        let second = &doc.chunks[1];
        assert_eq!(
            second.text,
            "dog sleeps. Quantum mechanics is weird. Relativity bends spacetime."
        );
        assert_eq!(second.overlap_words, 2);
        assert_eq!(second.word_count, 9);
        assert_eq!(second.overlap_text(), "dog sleeps.");
        assert_eq!(
            second.body(),
            "Quantum mechanics is weird. Relativity bends spacetime."
        );
    }

    #[test]
    fn test_overlap_does_not_cross_sections() {
        let config = config().with_overlap(3).unwrap();
        let sections = [
            Section::new("Chapter 1", "A cat sleeps."),
            Section::new("Chapter 2", "A dog sleeps."),
        ];
        let doc = DocumentChunker::new(config)
            .chunk(&sections, &Metadata::new(), &topics)
            .unwrap();
        assert!(doc.chunks.iter().all(|c| c.overlap_words == 0));
    }

    #[test]
    fn test_overlap_capped_by_previous_chunk() {
        let config = config().with_overlap(50).unwrap();
        let sections = [Section::new("Chapter 1", CHAPTER)];
        let doc = DocumentChunker::new(config)
            .chunk(&sections, &Metadata::new(), &topics)
            .unwrap();
        assert_eq!(doc.chunks[1].overlap_words, 6);
        assert!(doc.chunks[1].text.starts_with("A cat sleeps. A dog sleeps. Quantum"));
    }

    #[test]
    fn test_empty_document() {
        let err = chunk_document(&[], &config(), &Metadata::new(), &topics, MergeMode::Separate)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn test_all_sections_blank() {
        let sections = [Section::new("front", "   "), Section::new("back", "7")];
        let err = chunk_document(
            &sections,
            &config(),
            &Metadata::new(),
            &topics,
            MergeMode::Separate,
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn test_blank_section_skipped() {
        let sections = [
            Section::new("front", ""),
            Section::new("Chapter 1", CHAPTER),
        ];
        let doc = chunk_document(
            &sections,
            &config(),
            &Metadata::new(),
            &topics,
            MergeMode::Separate,
        )
        .unwrap();
        assert!(doc.chunks.iter().all(|c| c.section() == "Chapter 1"));
    }

    #[test]
    fn test_embedding_failure_names_section() {
        let failing = |texts: &[&str]| -> std::result::Result<Vec<Vec<f32>>, String> {
            if texts.iter().any(|t| t.contains("Quantum")) {
                Err("model crashed".to_string())
            } else {
                topics(texts)
            }
        };
        let sections = [
            Section::new("Chapter 1", "A cat sleeps. A dog sleeps."),
            Section::new("Chapter 2", CHAPTER),
        ];
        let err = DocumentChunker::new(config())
            .chunk(&sections, &Metadata::new(), &failing)
            .unwrap_err();

        match err {
            Error::Embedding { section, source } => {
                assert_eq!(section, "Chapter 2");
                assert!(matches!(source, EmbeddingError::Provider(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_warning_carries_section() {
        let long = format!("{}.", vec!["word"; 30].join(" "));
        let config = ChunkingConfig::new(5, 20).unwrap();
        let sections = [Section::new("Appendix", long)];
        let doc = DocumentChunker::new(config)
            .chunk(&sections, &Metadata::new(), &topics)
            .unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.chunks[0].word_count, 30);
        assert_eq!(doc.oversized.len(), 1);
        assert_eq!(doc.oversized[0].section, "Appendix");
    }

    #[test]
    fn test_stats() {
        let sections = [Section::new("Chapter 1", CHAPTER)];
        let doc = DocumentChunker::new(config())
            .chunk(&sections, &Metadata::new(), &topics)
            .unwrap();
        let stats = doc.stats();
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.total_words, 13);
        assert_eq!(stats.min_words, 6);
        assert_eq!(stats.max_words, 7);
        assert!((stats.mean_words - 6.5).abs() < 1e-9);
        assert_eq!(ChunkStats::from_chunks(&[]), ChunkStats::default());
    }

    #[test]
    fn test_trailing_words() {
        assert_eq!(trailing_words("a b  c\nd", 2), "c d");
        assert_eq!(trailing_words("a b", 5), "a b");
        assert_eq!(trailing_words("a b", 0), "");
    }

    #[test]
    fn test_total_word_count() {
        let sections = [Section::new("a", "one two"), Section::new("b", "three")];
        assert_eq!(total_word_count(&sections), 3);
    }
}
