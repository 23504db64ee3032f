//! Chunk a Book
//!
//! The minimal example: turn a few chapters into retrieval-sized chunks.
//!
//! ```bash
//! RUST_LOG=folio=debug cargo run --example 01_chunk_book
//! ```
//!
//! The toy embedder below places each sentence on a topic axis by keyword.
//! Swap in `FastEmbedder` (feature `fastembed`) for real vectors.

use folio::{chunk_document, keys, ChunkingConfig, MergeMode, Metadata, Section};
use tracing_subscriber::EnvFilter;

fn toy_embedder(texts: &[&str]) -> Result<Vec<Vec<f32>>, String> {
    const TOPICS: [&str; 3] = ["ship", "harvest", "winter"];
    Ok(texts
        .iter()
        .map(|t| {
            let lower = t.to_lowercase();
            let mut v: Vec<f32> = TOPICS
                .iter()
                .map(|k| if lower.contains(k) { 1.0 } else { 0.0 })
                .collect();
            // Keyword-free sentences stay close to their neighbours
            v.push(0.3);
            v
        })
        .collect())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sections = vec![
        Section::new(
            "Chapter 1",
            "The ship left port at dawn. The ship was heavy with cargo bound for the south. \
             Its captain had made the crossing eleven times. \
             Inland, the harvest had failed for a second year. \
             Families ate the seed grain and waited for the harvest that did not come.",
        ),
        Section::new(
            "Chapter 2",
            "Winter came early that year. Snow closed the passes by the first week of winter. \
             The ship did not return until spring.",
        ),
    ];

    let mut metadata = Metadata::new();
    metadata.insert(keys::TITLE.to_string(), "The Long Voyage".to_string());
    metadata.insert(keys::AUTHOR.to_string(), "Anonymous".to_string());

    let config = ChunkingConfig::new(10, 60)
        .and_then(|c| c.with_overlap(4))
        .expect("valid config");

    let doc = chunk_document(&sections, &config, &metadata, &toy_embedder, MergeMode::Separate)
        .expect("chunking failed");

    println!("Sections: {}", sections.len());
    println!("Chunks:   {}\n", doc.len());

    for chunk in &doc.chunks {
        println!(
            "[{}] {} words, {} overlap",
            chunk.key("long-voyage"),
            chunk.word_count,
            chunk.overlap_words
        );
        if chunk.overlap_words > 0 {
            println!("    overlap: \"{}\"", chunk.overlap_text());
        }
        println!("    body:    \"{}\"\n", chunk.body());
    }

    let stats = doc.stats();
    println!(
        "words per chunk: min {}, max {}, mean {:.1}",
        stats.min_words, stats.max_words, stats.mean_words
    );
}
