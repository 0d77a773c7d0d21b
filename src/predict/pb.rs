use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::PbConfig;
use crate::fasta::Genome;
use crate::hints::write_chunk_hints;
use crate::models::{GenomeId, GenomeMap, GenomeSet, GenomicInterval, RawFeatureSet};
use crate::predict::commands::AugustusPb;
use crate::predict::{absolute, ChunkPredictor};
use crate::utils::errors::PredictionError;

/// Single-genome gene prediction with AugustusPB
///
/// Every chunk is written as its own FASTA file together with the hints
/// that lie inside the chunk. AUGUSTUS shifts its predictions by the chunk
/// start, so the raw output already uses sequence coordinates.
pub struct PbPredictor {
    binary: PathBuf,
    genome: Genome,
    genome_id: GenomeId,
    genomes: GenomeSet,
    hints: PathBuf,
    extrinsic_cfg: PathBuf,
    species: String,
}

impl PbPredictor {
    /// Loads the genome into memory
    pub fn new(config: &PbConfig) -> Result<Self, PredictionError> {
        Ok(PbPredictor {
            binary: config.binaries.augustus.clone(),
            genome: Genome::from_file(&config.fasta)?,
            genome_id: config.genome_id(),
            genomes: config.genome_set(),
            hints: absolute(&config.hints)?,
            extrinsic_cfg: absolute(&config.extrinsic_cfg)?,
            species: config.species.clone(),
        })
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Predicts the genes of one chunk
    pub fn predict_pb(
        &self,
        chunk: &GenomicInterval,
        workdir: &Path,
    ) -> Result<RawFeatureSet, PredictionError> {
        let fasta = workdir.join("chunk.fa");
        self.genome.write_slice(chunk, &fasta)?;
        let hints = workdir.join("hints.gff");
        let count = write_chunk_hints(&self.hints, &hints, chunk)?;
        debug!("predicting {} with {} hints", chunk, count);

        let output = workdir.join("augustus.gtf");
        AugustusPb {
            binary: self.binary.clone(),
            hints,
            extrinsic_cfg: self.extrinsic_cfg.clone(),
            species: self.species.clone(),
            coordinate_offset: chunk.start(),
            fasta,
            output: output.clone(),
        }
        .command()
        .workdir(workdir)
        .run()?;

        Ok(RawFeatureSet::new(
            self.genome_id.clone(),
            chunk.clone(),
            fs::read_to_string(&output)?,
        ))
    }
}

impl ChunkPredictor for PbPredictor {
    fn genomes(&self) -> &GenomeSet {
        &self.genomes
    }

    fn predict(
        &self,
        chunk: &GenomicInterval,
        workdir: &Path,
    ) -> Result<GenomeMap<RawFeatureSet>, PredictionError> {
        let raw = self.predict_pb(chunk, workdir)?;
        let mut res = GenomeMap::new(&self.genomes);
        res.insert(self.genome_id.clone(), raw)
            .map_err(PredictionError::new)?;
        Ok(res)
    }
}
