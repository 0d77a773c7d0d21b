//! Run AUGUSTUS on single chunks
//!
//! A [`ChunkPredictor`] turns one chunk of the reference into one raw
//! feature set per genome. Two predictors are provided:
//!
//! * [`CgpPredictor`] runs comparative gene prediction (AugustusCGP) on
//!   the alignment of a clade. One run predicts genes in all genomes.
//! * [`PbPredictor`] runs AugustusPB on a single genome with extrinsic
//!   hints, e.g. from IsoSeq alignments.
//!
//! Predictors only return output of runs that exited successfully. Any
//! failure of an external program is reported as a
//! [`PredictionError`].
mod cgp;
mod commands;
mod pb;

use std::path::{Path, PathBuf};

use crate::models::{GenomeMap, GenomeSet, GenomicInterval, RawFeatureSet};
use crate::utils::errors::PredictionError;

pub use crate::predict::cgp::CgpPredictor;
pub use crate::predict::commands::{AugustusCgp, AugustusPb, Hal2Maf, HalStatsTree};
pub use crate::predict::pb::PbPredictor;

/// Gene prediction on a single chunk
///
/// Implementations are shared between worker threads. Every call
/// receives its own, empty working directory.
pub trait ChunkPredictor: Sync {
    /// All genomes that are predicted
    fn genomes(&self) -> &GenomeSet;

    /// Predicts genes on `chunk`
    ///
    /// The returned map may lack genomes that did not receive any
    /// prediction output. Such genomes fail when their chunks are merged.
    fn predict(
        &self,
        chunk: &GenomicInterval,
        workdir: &Path,
    ) -> Result<GenomeMap<RawFeatureSet>, PredictionError>;
}

/// AUGUSTUS runs inside the chunk directory, so all inputs need absolute paths
fn absolute(path: &Path) -> Result<PathBuf, PredictionError> {
    std::fs::canonicalize(path)
        .map_err(|err| PredictionError::new(format!("{}: {}", path.display(), err)))
}
