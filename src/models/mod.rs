//! Data structures shared by all modules
//!
//! The gene-model side ([`Transcript`], [`Exon`], [`Transcripts`]) is the
//! in-memory representation that all file formats are read into and
//! written from. The pipeline side ([`GenomicInterval`], [`GenomeMap`],
//! [`RawFeatureSet`], [`MergedFeatureSet`]) describes chunks and the
//! gene sets predicted on them.
mod feature_set;
mod genome;
mod interval;
mod transcript;
mod transcripts;

pub use crate::models::feature_set::{MergedFeatureSet, PredictorMode, RawFeatureSet};
pub use crate::models::genome::{GenomeId, GenomeMap, GenomeSet};
pub use crate::models::interval::GenomicInterval;
pub use crate::models::transcript::{
    CdsStat, CoordinateVector, Exon, Strand, Transcript, TranscriptBuilder,
};
pub use crate::models::transcripts::Transcripts;

pub(crate) use crate::models::transcript::segment_frames;

use crate::utils::errors::ReadWriteError;

/// Trait for all readers that produce [`Transcripts`]
pub trait TranscriptRead {
    fn transcripts(&mut self) -> Result<Transcripts, ReadWriteError>;
}

/// Trait for all writers of [`Transcript`]s
pub trait TranscriptWrite {
    fn writeln_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error>;
    fn write_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error>;

    fn write_transcript_vec(&mut self, transcripts: &[Transcript]) -> Result<(), std::io::Error> {
        for transcript in transcripts {
            self.writeln_single_transcript(transcript)?;
        }
        Ok(())
    }

    fn write_transcripts(&mut self, transcripts: &Transcripts) -> Result<(), std::io::Error> {
        self.write_transcript_vec(transcripts.as_vec())
    }
}
