//! Domain Profiles
//!
//! Compares the parameter presets and shows how far the packer lands from
//! each preset's target chunk count.
//!
//! ```bash
//! cargo run --example domain_profiles
//! ```

use folio::{
    recommend, total_word_count, DocumentChunker, Domain, MergeMode, Metadata, Section,
};
use tracing_subscriber::EnvFilter;

/// Two alternating subjects, one sentence each, so topic shifts are regular.
fn sample_book(chapters: usize, sentences_per_chapter: usize) -> Vec<Section> {
    let subjects = [
        "The river carried silt from the northern hills to the delta farms",
        "The council argued for weeks about the price of salt in the market",
    ];
    (0..chapters)
        .map(|c| {
            let text = (0..sentences_per_chapter)
                .map(|i| format!("{}, season {}.", subjects[(i / 12) % 2], i))
                .collect::<Vec<_>>()
                .join(" ");
            Section::new(format!("Chapter {}", c + 1), text)
        })
        .collect()
}

fn subject_embedder(texts: &[&str]) -> Result<Vec<Vec<f32>>, String> {
    Ok(texts
        .iter()
        .map(|t| if t.contains("river") { vec![1.0, 0.1] } else { vec![0.1, 1.0] })
        .collect())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let book = sample_book(8, 120);
    let total = total_word_count(&book);

    println!("Domain Profiles");
    println!("===============\n");
    println!("Book: {} chapters, {} words\n", book.len(), total);
    println!(
        "{:<11} {:>5} {:>5} {:>7} {:>9} {:>7} {:>7} {:>10}",
        "domain", "min", "max", "overlap", "threshold", "target", "actual", "efficiency"
    );

    for domain in Domain::ALL {
        let advice = recommend(total, domain);
        let config = advice.config().expect("presets are valid");

        for mode in [MergeMode::Separate, MergeMode::Merged] {
            let doc = DocumentChunker::new(config)
                .with_mode(mode)
                .chunk(&book, &Metadata::new(), &subject_embedder)
                .expect("chunking failed");

            let label = match mode {
                MergeMode::Separate => domain.to_string(),
                MergeMode::Merged => "  (merged)".to_string(),
            };
            println!(
                "{:<11} {:>5} {:>5} {:>7} {:>9.2} {:>7} {:>7} {:>10.2}",
                label,
                advice.min_tokens,
                advice.max_tokens,
                advice.overlap,
                advice.similarity_threshold,
                advice.target_chunk_count,
                doc.len(),
                advice.efficiency(doc.len()).unwrap_or(0.0),
            );
        }
    }

    println!("\nEfficiency above 1 means fewer, larger chunks than the preset expects.");
}
