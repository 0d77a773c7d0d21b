#![doc = include_str!("../README.md")]

pub mod chunks;
pub mod config;
pub mod fasta;
pub mod genepred;
pub mod gtf;
pub mod hints;
pub mod merge;
pub mod models;
pub mod parents;
pub mod pipeline;
pub mod predict;
pub mod process;
pub mod qc;
pub mod store;
pub mod tests;
pub mod utils;

use crate::models::TranscriptRead;
use crate::models::Transcripts;
use crate::utils::errors::ReadWriteError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generic function to read transcript from any possible source
pub fn read_transcripts<R: TranscriptRead>(
    reader: Result<R, ReadWriteError>,
) -> Result<Transcripts, ReadWriteError> {
    match reader {
        Ok(mut r) => r.transcripts(),
        Err(err) => Err(err),
    }
}
