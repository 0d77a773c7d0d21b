//! Genome sequences for single-genome prediction
//!
//! The genome is loaded into memory once and every chunk is written as
//! a separate FASTA file that is handed to the predictor. Soft-masking
//! (lowercase bases) is kept.
//!
//! ```rust
//! use genechunk::fasta::Genome;
//! use genechunk::models::GenomicInterval;
//!
//! let genome = Genome::from_file("tests/data/genome.fa").unwrap();
//! assert_eq!(genome.len("chr2"), Some(500));
//!
//! let chunk = GenomicInterval::new("chr1", 10, 5).unwrap();
//! assert_eq!(genome.slice(&chunk).unwrap().len(), 5);
//! ```
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use bio::io::fasta;
use log::debug;

use crate::chunks::SequenceSizes;
use crate::models::GenomicInterval;
use crate::utils::errors::ReadWriteError;

/// All sequences of a genome
#[derive(Clone, Debug, Default)]
pub struct Genome {
    order: Vec<String>,
    sequences: HashMap<String, Vec<u8>>,
}

impl Genome {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::open(path.as_ref()) {
            Ok(file) => Self::from_reader(file),
            Err(err) => Err(ReadWriteError::new(format!(
                "unable to open {}: {}",
                path.as_ref().display(),
                err
            ))),
        }
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ReadWriteError> {
        let mut genome = Genome::default();
        for record in fasta::Reader::new(reader).records() {
            let record = record.map_err(|err| ReadWriteError::new(format!("invalid FASTA: {}", err)))?;
            genome.insert(record.id(), record.seq().to_vec());
        }
        debug!("loaded {} sequences", genome.order.len());
        Ok(genome)
    }

    /// Adds a sequence, replacing a previous one with the same id
    pub fn insert<S: Into<String>>(&mut self, id: S, sequence: Vec<u8>) {
        let id = id.into();
        if !self.sequences.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.sequences.insert(id, sequence);
    }

    pub fn sequence(&self, id: &str) -> Option<&[u8]> {
        self.sequences.get(id).map(|seq| seq.as_slice())
    }

    pub fn len(&self, id: &str) -> Option<u64> {
        self.sequences.get(id).map(|seq| seq.len() as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sequence lengths, in the order of the FASTA file
    pub fn sizes(&self) -> SequenceSizes {
        SequenceSizes::from_entries(
            self.order
                .iter()
                .map(|id| (id.as_str(), self.sequences[id].len() as u64)),
        )
    }

    /// The bases of a chunk
    pub fn slice(&self, chunk: &GenomicInterval) -> Result<&[u8], ReadWriteError> {
        let seq = self.sequence(chunk.seq_id()).ok_or_else(|| {
            ReadWriteError::new(format!("sequence {} is not part of the genome", chunk.seq_id()))
        })?;
        let (start, end) = (chunk.start() as usize, chunk.end() as usize);
        if end > seq.len() {
            return Err(ReadWriteError::new(format!(
                "chunk {} exceeds the sequence length {}",
                chunk,
                seq.len()
            )));
        }
        Ok(&seq[start..end])
    }

    /// Writes the bases of a chunk as a FASTA record named after its sequence
    pub fn write_slice<P: AsRef<Path>>(&self, chunk: &GenomicInterval, path: P) -> Result<(), ReadWriteError> {
        let slice = self.slice(chunk)?;
        let mut writer = fasta::Writer::to_file(path.as_ref())?;
        writer.write(chunk.seq_id(), None, slice)?;
        writer.flush()?;
        Ok(())
    }
}
