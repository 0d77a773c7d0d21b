//! Split reference sequences into overlapping chunks
//!
//! Every sequence is covered by windows of `chunk_size` bases. Neighbouring
//! windows share `overlap` bases, so a gene that crosses one window boundary
//! is fully contained in at least one window as long as it is shorter than
//! the overlap.
//!
//! ```text
//! sequence   |-----------------------------------------|
//! chunk 1    |==============|
//! chunk 2              |==============|
//! chunk 3                        |=====================|
//!                      ^^^^^ overlap
//! ```
//!
//! A trailing window of at most half the chunk size is not emitted on its
//! own. Instead, the window before it is extended to the end of the sequence.
//!
//! # Examples
//!
//! ```rust
//! use genechunk::chunks::{plan, SequenceSizes};
//!
//! let sizes = SequenceSizes::from_entries(vec![("chr1", 1000), ("chrM", 200)]);
//! let chunks = plan(&sizes, 400, 100).unwrap();
//!
//! let chr1 = chunks.get("chr1").unwrap();
//! assert_eq!(chr1.len(), 3);
//! assert_eq!(chr1[2].start(), 600);
//! assert_eq!(chr1[2].end(), 1000);
//!
//! assert_eq!(chunks.get("chrM").unwrap().len(), 1);
//! ```
mod sizes;

use log::{debug, warn};

use crate::models::GenomicInterval;
use crate::utils::errors::ConfigurationError;

pub use crate::chunks::sizes::SequenceSizes;

/// Ordered chunks of all sequences
///
/// Sequences keep the order of the size table and the chunks of every
/// sequence are sorted by their start. This is the order in which chunk
/// predictions are emitted and later concatenated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkPlan {
    sequences: Vec<(String, Vec<GenomicInterval>)>,
}

impl ChunkPlan {
    /// All chunks of one sequence
    pub fn get(&self, seq_id: &str) -> Option<&[GenomicInterval]> {
        self.sequences
            .iter()
            .find(|(id, _)| id == seq_id)
            .map(|(_, chunks)| chunks.as_slice())
    }

    /// Iterates the sequences with their chunks, in emission order
    pub fn sequences(&self) -> impl Iterator<Item = (&str, &[GenomicInterval])> {
        self.sequences
            .iter()
            .map(|(id, chunks)| (id.as_str(), chunks.as_slice()))
    }

    /// Iterates all chunks of all sequences, in emission order
    pub fn chunks(&self) -> impl Iterator<Item = &GenomicInterval> {
        self.sequences.iter().flat_map(|(_, chunks)| chunks.iter())
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.sequences.iter().map(|(_, chunks)| chunks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Checks the chunk geometry
///
/// `chunk_size` must be larger than `overlap` and `overlap` must be positive.
pub fn validate_geometry(chunk_size: u64, overlap: u64) -> Result<(), ConfigurationError> {
    if overlap == 0 {
        return Err(ConfigurationError::new("chunk overlap must be positive"));
    }
    if chunk_size <= overlap {
        return Err(ConfigurationError::new(format!(
            "chunk size ({}) must be larger than the overlap ({})",
            chunk_size, overlap
        )));
    }
    Ok(())
}

/// Plans the chunks of all sequences in `sizes`
///
/// Sequences of length 0 do not receive any chunk.
pub fn plan(sizes: &SequenceSizes, chunk_size: u64, overlap: u64) -> Result<ChunkPlan, ConfigurationError> {
    validate_geometry(chunk_size, overlap)?;
    let mut res = ChunkPlan::default();
    for (seq_id, length) in sizes.iter() {
        if length == 0 {
            warn!("sequence {} has length 0 and is not chunked", seq_id);
            continue;
        }
        let chunks = plan_sequence(seq_id, length, chunk_size, overlap)?;
        debug!("{}: {} bp in {} chunks", seq_id, length, chunks.len());
        res.sequences.push((seq_id.to_string(), chunks));
    }
    Ok(res)
}

/// Plans the chunks of a single sequence
///
/// ```rust
/// use genechunk::chunks::plan_sequence;
///
/// let chunks = plan_sequence("chr1", 1000, 300, 50).unwrap();
/// let starts: Vec<u64> = chunks.iter().map(|c| c.start()).collect();
/// assert_eq!(starts, vec![0, 250, 500, 750]);
/// assert_eq!(chunks[3].length(), 250);
/// ```
pub fn plan_sequence(
    seq_id: &str,
    length: u64,
    chunk_size: u64,
    overlap: u64,
) -> Result<Vec<GenomicInterval>, ConfigurationError> {
    validate_geometry(chunk_size, overlap)?;
    let step = chunk_size - overlap;
    let mut chunks: Vec<GenomicInterval> = Vec::new();
    let mut start = 0;
    while start < length {
        chunks.push(GenomicInterval::new(
            seq_id,
            start,
            chunk_size.min(length - start),
        )?);
        start += step;
    }

    if chunks.len() >= 2 {
        let last_len = chunks[chunks.len() - 1].length();
        // compared in integers: last_len <= chunk_size / 2
        if last_len * 2 <= chunk_size {
            chunks.pop();
            if let Some(last) = chunks.last_mut() {
                *last = last.extended_to(length);
            }
        }
    }
    Ok(chunks)
}
