//! Chunking parameters per domain.
//!
//! Different kinds of books want different chunk sizes. A philosophy text
//! builds one argument over several pages, so small chunks cut it apart. A
//! technical manual packs a self-contained fact into every paragraph, so
//! large chunks blur retrieval.
//!
//! | Domain | min | max | overlap | threshold |
//! |--------|-----|-----|---------|-----------|
//! | technical | 150 | 450 | 50 | 0.55 |
//! | psychology | 200 | 600 | 60 | 0.50 |
//! | philosophy | 300 | 900 | 100 | 0.45 |
//! | history | 250 | 750 | 75 | 0.50 |
//! | general | 200 | 600 | 50 | 0.50 |
//!
//! ## Target Counts Are Advice
//!
//! [`recommend`] estimates how many chunks a book of a given length should
//! produce:
//!
//! ```text
//! representative = (min + max) / 2 - overlap
//! target         = ceil(total_words / representative)
//! ```
//!
//! The packer follows topic shifts, not the estimate, so the actual count
//! will differ. [`Recommendation::efficiency`] reports the ratio for
//! monitoring; nothing re-chunks to hit it.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::{ChunkingConfig, Result};

/// A category of text with its own chunking preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Domain {
    /// Manuals, textbooks, programming books.
    Technical,
    /// Psychology and self-help.
    Psychology,
    /// Philosophy and long-form argument.
    Philosophy,
    /// History and biography.
    History,
    /// Anything else.
    General,
}

impl Domain {
    /// Every domain, in table order.
    pub const ALL: [Self; 5] = [
        Self::Technical,
        Self::Psychology,
        Self::Philosophy,
        Self::History,
        Self::General,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Psychology => "psychology",
            Self::Philosophy => "philosophy",
            Self::History => "history",
            Self::General => "general",
        }
    }

    /// The preset for this domain.
    #[must_use]
    pub const fn profile(self) -> DomainProfile {
        match self {
            Self::Technical => DomainProfile::new(150, 450, 50, 0.55),
            Self::Psychology => DomainProfile::new(200, 600, 60, 0.5),
            Self::Philosophy => DomainProfile::new(300, 900, 100, 0.45),
            Self::History => DomainProfile::new(250, 750, 75, 0.5),
            Self::General => DomainProfile::new(200, 600, 50, 0.5),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownDomain(s.to_string()))
    }
}

/// Baseline chunking parameters for a domain, in words.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainProfile {
    /// Minimum words before a topic break is honored.
    pub min_chunk_size: usize,
    /// Hard ceiling on chunk words.
    pub max_chunk_size: usize,
    /// Overlap words between adjacent chunks.
    pub overlap: usize,
    /// Topic-shift similarity threshold.
    pub similarity_threshold: f32,
}

impl DomainProfile {
    const fn new(min: usize, max: usize, overlap: usize, threshold: f32) -> Self {
        Self {
            min_chunk_size: min,
            max_chunk_size: max,
            overlap,
            similarity_threshold: threshold,
        }
    }

    /// Words a typical chunk contributes that are not repeated overlap.
    ///
    /// Never less than 1.
    #[must_use]
    pub const fn representative_chunk_size(&self) -> usize {
        let mid = (self.min_chunk_size + self.max_chunk_size) / 2;
        let size = mid.saturating_sub(self.overlap);
        if size == 0 {
            1
        } else {
            size
        }
    }

    /// A fresh config built from this profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile's values violate config invariants.
    pub fn config(&self) -> std::result::Result<ChunkingConfig, ConfigError> {
        ChunkingConfig::new(self.min_chunk_size, self.max_chunk_size)?
            .with_threshold(self.similarity_threshold)?
            .with_overlap(self.overlap)
    }
}

/// Advised parameters and expected chunk count for one document.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recommendation {
    /// Domain the advice is for.
    pub domain: Domain,
    /// Advised minimum chunk size in words.
    pub min_tokens: usize,
    /// Advised maximum chunk size in words.
    pub max_tokens: usize,
    /// Advised overlap in words.
    pub overlap: usize,
    /// Advised similarity threshold.
    pub similarity_threshold: f32,
    /// Expected number of chunks.
    pub target_chunk_count: usize,
}

impl Recommendation {
    /// `target_chunk_count / actual`, or `None` if nothing was produced.
    ///
    /// Above 1 means fewer, larger chunks than expected; below 1 means the
    /// text broke into more topics than the estimate assumed.
    #[must_use]
    pub fn efficiency(&self, actual_chunk_count: usize) -> Option<f64> {
        if actual_chunk_count == 0 {
            return None;
        }
        Some(self.target_chunk_count as f64 / actual_chunk_count as f64)
    }

    /// A config with the advised parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the advised values violate config invariants.
    pub fn config(&self) -> std::result::Result<ChunkingConfig, ConfigError> {
        ChunkingConfig::new(self.min_tokens, self.max_tokens)?
            .with_threshold(self.similarity_threshold)?
            .with_overlap(self.overlap)
    }
}

/// Advise parameters for a document of `total_word_count` words.
///
/// # Example
///
/// ```rust
/// use folio::{recommend, Domain};
///
/// let advice = recommend(100_000, Domain::Technical);
/// assert_eq!(advice.max_tokens, 450);
/// assert_eq!(advice.target_chunk_count, 400); // 100_000 / 250
/// ```
#[must_use]
pub fn recommend(total_word_count: usize, domain: Domain) -> Recommendation {
    let profile = domain.profile();
    Recommendation {
        domain,
        min_tokens: profile.min_chunk_size,
        max_tokens: profile.max_chunk_size,
        overlap: profile.overlap,
        similarity_threshold: profile.similarity_threshold,
        target_chunk_count: total_word_count.div_ceil(profile.representative_chunk_size()),
    }
}

/// [`recommend`] with the domain given by name.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownDomain`] (as [`crate::Error::Config`]) if
/// `domain` names no profile.
pub fn recommend_params(total_word_count: usize, domain: &str) -> Result<Recommendation> {
    let domain: Domain = domain.parse()?;
    Ok(recommend(total_word_count, domain))
}
