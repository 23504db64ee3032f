//! # folio
//!
//! Semantic chunking of long-form documents for retrieval-augmented
//! generation (RAG) pipelines.
//!
//! ## The Problem
//!
//! A book is a few hundred thousand words. A retrieval system wants passages
//! of a few hundred. Where you cut matters:
//!
//! - A cut mid-sentence produces garbage
//! - A cut mid-argument produces a passage that answers nothing
//! - A passage spanning two topics embeds as neither
//! - A passage that is too small carries no context; too large, and its
//!   embedding averages away the detail you were looking for
//!
//! Fixed-size windows solve the size problem and ignore the others. folio
//! cuts where the text changes topic, within hard size limits.
//!
//! ## The Pipeline
//!
//! ```text
//! sections ──> segment ──> embed + score ──> pack ──> attach metadata ──> chunks
//!  (chapters)   (sentences)  (adjacent cosine)  (min/max words)  (overlap, index)
//! ```
//!
//! 1. **Segment**: split each section into sentences ([`SentenceSplitter`]).
//! 2. **Score**: embed all sentences in one batch and compute the cosine
//!    similarity of each adjacent pair ([`adjacent_similarities`]).
//! 3. **Pack**: walk the sentences once, closing a chunk when the next
//!    sentence would exceed `max_chunk_size` or when similarity drops below
//!    the threshold and the chunk already has `min_chunk_size` words
//!    ([`pack`]).
//! 4. **Attach**: number the chunks, add overlap, copy caller metadata
//!    ([`DocumentChunker`]).
//!
//! ```text
//! Sentences:  [S1] [S2] [S3] [S4] [S5] [S6]
//! Scores:        0.9  0.8  0.3  0.85 0.7
//!                          ↑
//!                     topic shift (and the chunk is big enough)
//!
//! Chunks: [S1 S2 S3] | [S4 S5 S6]
//! ```
//!
//! Sentences are never split. A single sentence longer than the maximum
//! becomes its own chunk and is reported as an [`OversizedSentence`].
//!
//! ## Quick Start
//!
//! ```rust
//! use folio::{chunk_document, keys, ChunkingConfig, MergeMode, Metadata, Section};
//!
//! // Any batched embedder works; this one knows two topics.
//! let embed = |texts: &[&str]| -> Result<Vec<Vec<f32>>, String> {
//!     Ok(texts
//!         .iter()
//!         .map(|t| if t.contains("ship") { vec![1.0, 0.1] } else { vec![0.1, 1.0] })
//!         .collect())
//! };
//!
//! let sections = vec![
//!     Section::new("Chapter 1", "The ship left port at dawn. The ship was heavy with cargo. \
//!                                Inland, the harvest had failed."),
//!     Section::new("Chapter 2", "Winter came early that year."),
//! ];
//!
//! let mut metadata = Metadata::new();
//! metadata.insert(keys::TITLE.to_string(), "The Long Voyage".to_string());
//!
//! let config = ChunkingConfig::new(5, 200).unwrap();
//! let doc = chunk_document(&sections, &config, &metadata, &embed, MergeMode::Separate).unwrap();
//!
//! assert_eq!(doc.len(), 3);
//! assert_eq!(doc.chunks[1].text, "Inland, the harvest had failed.");
//! assert_eq!(doc.chunks[2].section(), "Chapter 2");
//! assert_eq!(doc.chunks[2].index, 0); // indices restart per chapter
//! ```
//!
//! ## Choosing Parameters
//!
//! [`recommend`] maps a domain (technical, philosophy, ...) to baseline
//! sizes and estimates a target chunk count:
//!
//! ```rust
//! use folio::{recommend_params, total_word_count, Section};
//!
//! let sections = [Section::new("Chapter 1", "word ".repeat(10_000))];
//! let advice = recommend_params(total_word_count(&sections), "philosophy").unwrap();
//!
//! assert_eq!(advice.target_chunk_count, 20);
//! let config = advice.config().unwrap();
//! assert_eq!(config.max_chunk_size(), 900);
//! ```
//!
//! ## Performance Considerations
//!
//! | Stage | Cost | Notes |
//! |-------|------|-------|
//! | Segment | O(n) | No allocation per sentence |
//! | Score | 1 embed call + O(n × d) | The embed call dominates |
//! | Pack | O(n) | Single forward pass |
//!
//! Where n = sentences in a section, d = embedding dimension.
//!
//! Everything is synchronous and holds no shared state, so independent
//! documents can be chunked in parallel by the caller.

mod advisor;
mod chunk;
mod config;
mod document;
mod embed;
mod error;
mod pack;
mod sentence;
mod similarity;

pub use advisor::{recommend, recommend_params, Domain, DomainProfile, Recommendation};
pub use chunk::{keys, Chunk, ChunkKey, Metadata};
pub use config::{ChunkingConfig, DEFAULT_SIMILARITY_THRESHOLD};
pub use document::{
    chunk_document, total_word_count, ChunkStats, ChunkedDocument, DocumentChunker, MergeMode,
    Section, DEFAULT_MERGED_SECTION,
};
pub use embed::{embed_chunks, embed_texts, Embedder};
pub use error::{BoxError, ConfigError, EmbeddingError, Error, Result};
pub use pack::{pack, OversizedSentence, PackedChunk, Packing};
pub use sentence::{count_words, SentenceSplitter, SplitMode, DEFAULT_MIN_SENTENCE_CHARS};
pub use similarity::{adjacent_similarities, candidate_breaks, cosine_similarity};

#[cfg(feature = "fastembed")]
pub use embed::FastEmbedder;
