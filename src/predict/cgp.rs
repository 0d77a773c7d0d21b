use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, info, warn};
use tempfile::TempDir;

use crate::config::{Binaries, CgpConfig};
use crate::models::{GenomeId, GenomeMap, GenomeSet, GenomicInterval, RawFeatureSet};
use crate::predict::commands::{AugustusCgp, Hal2Maf, HalStatsTree};
use crate::predict::{absolute, ChunkPredictor};
use crate::utils::errors::PredictionError;

/// Comparative gene prediction with AugustusCGP
///
/// For every chunk, the alignment of the reference region is exported with
/// `hal2maf` and AUGUSTUS predicts genes in all genomes of the clade at once.
///
/// Files that are shared by all chunks (the phylogenetic tree and the list of
/// genome FASTA files) are created once and live as long as the predictor.
pub struct CgpPredictor {
    binaries: Binaries,
    hal: PathBuf,
    ref_genome: String,
    species: String,
    extrinsic_cfg: PathBuf,
    param_file: PathBuf,
    hints_db: PathBuf,
    genomes: GenomeSet,
    rundir: TempDir,
    genome_fofn: PathBuf,
    tree: Mutex<Option<PathBuf>>,
}

impl CgpPredictor {
    pub fn new(config: &CgpConfig) -> Result<Self, PredictionError> {
        let fasta = config.fasta_files().map_err(PredictionError::new)?;
        let rundir = tempfile::Builder::new().prefix("genechunk-cgp").tempdir()?;

        let genome_fofn = rundir.path().join("genomes.tsv");
        let mut writer = BufWriter::new(fs::File::create(&genome_fofn)?);
        for (genome, path) in fasta.iter() {
            writeln!(writer, "{}\t{}", genome, absolute(path)?.display())?;
        }
        writer.flush()?;

        Ok(CgpPredictor {
            binaries: config.binaries.clone(),
            hal: absolute(&config.hal)?,
            ref_genome: config.ref_genome.clone(),
            species: config.species.clone(),
            extrinsic_cfg: absolute(&config.extrinsic_cfg)?,
            param_file: absolute(&config.param_file)?,
            hints_db: absolute(&config.hints_db)?,
            genomes: config.genome_set(),
            rundir,
            genome_fofn,
            tree: Mutex::new(None),
        })
    }

    /// The phylogenetic tree of the alignment in NEWICK format
    ///
    /// `halStats` runs only for the first call, later calls return the
    /// cached file.
    pub fn tree(&self) -> Result<PathBuf, PredictionError> {
        let mut tree = self
            .tree
            .lock()
            .map_err(|_| PredictionError::new("tree cache is poisoned"))?;
        if let Some(path) = tree.as_ref() {
            return Ok(path.clone());
        }
        let path = self.rundir.path().join("tree.nwk");
        HalStatsTree {
            binary: self.binaries.hal_stats.clone(),
            hal: self.hal.clone(),
        }
        .command(&path)
        .run()?;
        info!("extracted the phylogenetic tree from {}", self.hal.display());
        *tree = Some(path.clone());
        Ok(path)
    }

    /// Predicts genes of all genomes on one alignment chunk
    pub fn predict_cgp(
        &self,
        chunk: &GenomicInterval,
        workdir: &Path,
    ) -> Result<GenomeMap<RawFeatureSet>, PredictionError> {
        let tree = self.tree()?;
        let alignment = workdir.join("chunk.maf");
        Hal2Maf {
            binary: self.binaries.hal2maf.clone(),
            hal: self.hal.clone(),
            ref_genome: self.ref_genome.clone(),
            chunk: chunk.clone(),
            output: alignment.clone(),
        }
        .command()
        .run()?;

        AugustusCgp {
            binary: self.binaries.augustus.clone(),
            extrinsic_cfg: self.extrinsic_cfg.clone(),
            species: self.species.clone(),
            tree,
            alignment,
            hints_db: self.hints_db.clone(),
            genome_fofn: self.genome_fofn.clone(),
            outdir: workdir.to_path_buf(),
            param_file: self.param_file.clone(),
        }
        .command()
        .run()?;

        let mut res = GenomeMap::new(&self.genomes);
        for genome in self.genomes.iter() {
            let path = genome_output(workdir, genome);
            if !path.exists() {
                warn!("no AugustusCGP output for {} on chunk {}", genome, chunk);
                continue;
            }
            let content = fs::read_to_string(&path)?;
            res.insert(
                genome.clone(),
                RawFeatureSet::new(genome.clone(), chunk.clone(), content),
            )
            .map_err(PredictionError::new)?;
        }
        debug!("chunk {}: predictions for {} genomes", chunk, res.len());
        Ok(res)
    }

    pub fn genome_fofn(&self) -> &Path {
        &self.genome_fofn
    }
}

impl ChunkPredictor for CgpPredictor {
    fn genomes(&self) -> &GenomeSet {
        &self.genomes
    }

    fn predict(
        &self,
        chunk: &GenomicInterval,
        workdir: &Path,
    ) -> Result<GenomeMap<RawFeatureSet>, PredictionError> {
        self.predict_cgp(chunk, workdir)
    }
}

/// AugustusCGP writes the genes of every genome into its own file
fn genome_output(workdir: &Path, genome: &GenomeId) -> PathBuf {
    workdir.join(format!("{}.cgp.gff", genome))
}
