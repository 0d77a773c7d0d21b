use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{GenomeId, GenomicInterval};

/// The two prediction modes of the pipeline
///
/// Each mode owns a distinct identifier prefix, so transcripts of the two
/// predictors never alias when their gene sets end up in the same pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictorMode {
    /// Comparative prediction on a multi-genome alignment (AugustusCGP)
    Cgp,
    /// Single-genome prediction with extrinsic hints (AugustusPB)
    Pb,
}

impl PredictorMode {
    /// Prefix of all transcript and gene identifiers in the merged output
    pub fn prefix(&self) -> &'static str {
        match self {
            PredictorMode::Cgp => "augCGP-",
            PredictorMode::Pb => "augPB-",
        }
    }

    /// Human readable label, handed to the parent gene assignment
    pub fn label(&self) -> &'static str {
        match self {
            PredictorMode::Cgp => "AugustusCGP",
            PredictorMode::Pb => "AugustusPB",
        }
    }

    /// GTF source column of normalized output
    pub fn source(&self) -> &'static str {
        match self {
            PredictorMode::Cgp => "augustusCGP",
            PredictorMode::Pb => "augustusPB",
        }
    }
}

impl fmt::Display for PredictorMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Unreconciled GTF output of the predictor for one chunk and one genome
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFeatureSet {
    genome: GenomeId,
    chunk: GenomicInterval,
    content: String,
}

impl RawFeatureSet {
    pub fn new(genome: GenomeId, chunk: GenomicInterval, content: String) -> Self {
        RawFeatureSet {
            genome,
            chunk,
            content,
        }
    }

    pub fn genome(&self) -> &GenomeId {
        &self.genome
    }

    /// The chunk of the reference this prediction was made on
    pub fn chunk(&self) -> &GenomicInterval {
        &self.chunk
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.content.lines()
    }
}

/// Boundary-reconciled gene set of one genome
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedFeatureSet {
    genome: GenomeId,
    mode: PredictorMode,
    gtf: String,
    gene_models: Option<String>,
}

impl MergedFeatureSet {
    pub fn new(genome: GenomeId, mode: PredictorMode, gtf: String, gene_models: Option<String>) -> Self {
        MergedFeatureSet {
            genome,
            mode,
            gtf,
            gene_models,
        }
    }

    pub fn genome(&self) -> &GenomeId {
        &self.genome
    }

    pub fn mode(&self) -> PredictorMode {
        self.mode
    }

    /// The merged gene set as GTF
    pub fn gtf(&self) -> &str {
        &self.gtf
    }

    /// The merged gene set as GenePredExt table, if it was normalized
    pub fn gene_models(&self) -> Option<&str> {
        self.gene_models.as_deref()
    }
}

#[cfg(test)]
mod test_feature_set {
    use super::*;

    #[test]
    fn test_prefixes_do_not_collide() {
        let cgp = PredictorMode::Cgp.prefix();
        let pb = PredictorMode::Pb.prefix();
        assert!(!cgp.starts_with(pb));
        assert!(!pb.starts_with(cgp));
    }
}
