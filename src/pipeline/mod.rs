//! Run the complete prediction of a genome or a clade
//!
//! The [`Pipeline`] drives all steps of a run:
//!
//! 1. Every chunk of the [`ChunkPlan`] is predicted in its own working
//!    directory. Chunks run in parallel, results are collected in plan order.
//! 2. Once all chunks are done, every genome is finished on its own: its
//!    chunk outputs are merged, staged in the blob store and assigned to
//!    parent genes.
//!
//! A genome only proceeds to the merge if every chunk produced output for
//! it. A failing chunk or a failing step of one genome fails that genome
//! only, the result of every genome is reported separately.
use std::path::Path;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::chunks::{plan, ChunkPlan, SequenceSizes};
use crate::config::{CgpConfig, JoinerKind, PbConfig, PriorModels};
use crate::genepred;
use crate::merge::{ChunkMerger, GeneJoiner, Joingenes, NativeJoiner};
use crate::models::{
    GenomeId, GenomeMap, GenomicInterval, PredictorMode, RawFeatureSet, Transcripts,
};
use crate::parents::{AssignmentRow, OverlapParentAssigner, ParentAssigner, ReferenceGeneDb};
use crate::predict::{CgpPredictor, ChunkPredictor, PbPredictor};
use crate::read_transcripts;
use crate::store::{BlobHandle, BlobStore, FileStore};
use crate::utils::errors::{
    ConfigurationError, MergeError, ParentAssignmentError, PipelineError, PredictionError,
};

/// Final output of one genome
///
/// All files are staged in the blob store.
#[derive(Clone, Debug, PartialEq)]
pub struct GenomeOutput {
    /// Concatenation of all chunk predictions
    pub raw: BlobHandle,
    /// Merged gene set, before parent assignment
    pub merged: BlobHandle,
    /// Merged gene set with parent gene attributes, without discarded transcripts
    pub annotated: BlobHandle,
    /// Merged gene set as genePredExt (single-genome mode only)
    pub gene_models: Option<BlobHandle>,
    /// Parent assignment summary table
    pub summary: BlobHandle,
    pub rows: Vec<AssignmentRow>,
    pub discarded: usize,
}

/// Result of every genome of a run
pub type RunResult = GenomeMap<Result<GenomeOutput, PipelineError>>;

/// Orchestrates the prediction, merge and parent assignment of a run
pub struct Pipeline<'a> {
    predictor: &'a dyn ChunkPredictor,
    merger: ChunkMerger<'a>,
    assigner: &'a dyn ParentAssigner,
    store: &'a dyn BlobStore,
    reference: &'a ReferenceGeneDb,
    priors: &'a GenomeMap<PriorModels>,
    threads: usize,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        predictor: &'a dyn ChunkPredictor,
        merger: ChunkMerger<'a>,
        assigner: &'a dyn ParentAssigner,
        store: &'a dyn BlobStore,
        reference: &'a ReferenceGeneDb,
        priors: &'a GenomeMap<PriorModels>,
    ) -> Self {
        Pipeline {
            predictor,
            merger,
            assigner,
            store,
            reference,
            priors,
            threads: 1,
        }
    }

    /// Sets the number of worker threads
    pub fn threads(&mut self, threads: usize) {
        self.threads = threads;
    }

    /// Runs all chunks of `plan` and finishes every genome
    ///
    /// Only errors that affect the run as a whole are returned as `Err`,
    /// errors of single genomes are part of the [`RunResult`].
    pub fn run(&self, plan: &ChunkPlan) -> Result<RunResult, PipelineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|err| ConfigurationError::new(format!("unable to start worker threads: {}", err)))?;

        let chunks: Vec<&GenomicInterval> = plan.chunks().collect();
        info!(
            "predicting {} chunks with {} threads",
            chunks.len(),
            self.threads
        );
        let predictions: Vec<Result<GenomeMap<RawFeatureSet>, PredictionError>> = pool.install(|| {
            chunks
                .par_iter()
                .map(|chunk| self.predict_chunk(chunk))
                .collect()
        });

        let genomes: Vec<&GenomeId> = self.predictor.genomes().iter().collect();
        let finished: Vec<(GenomeId, Result<GenomeOutput, PipelineError>)> = pool.install(|| {
            genomes
                .par_iter()
                .map(|genome| {
                    let res = self.finish_genome(genome, &chunks, &predictions);
                    if let Err(err) = &res {
                        warn!("{} failed: {}", genome, err);
                    }
                    ((*genome).clone(), res)
                })
                .collect()
        });

        let mut res = GenomeMap::new(self.predictor.genomes());
        for (genome, output) in finished {
            res.insert(genome, output)?;
        }
        Ok(res)
    }

    fn predict_chunk(
        &self,
        chunk: &GenomicInterval,
    ) -> Result<GenomeMap<RawFeatureSet>, PredictionError> {
        let workdir = tempfile::Builder::new()
            .prefix("genechunk-chunk")
            .tempdir()?;
        let res = self.predictor.predict(chunk, workdir.path());
        match &res {
            Ok(raw) => debug!("chunk {}: {} genomes predicted", chunk, raw.len()),
            Err(err) => warn!("chunk {} failed: {}", chunk, err),
        }
        res
    }

    /// Collects the chunk outputs of one genome in plan order
    fn gather(
        &self,
        genome: &GenomeId,
        chunks: &[&GenomicInterval],
        predictions: &[Result<GenomeMap<RawFeatureSet>, PredictionError>],
    ) -> Result<Vec<RawFeatureSet>, PredictionError> {
        let mut raw_sets = Vec::with_capacity(chunks.len());
        for (chunk, prediction) in chunks.iter().zip(predictions) {
            let raw = match prediction {
                Ok(raw) => raw.get(genome),
                Err(err) => {
                    return Err(PredictionError::new(format!(
                        "chunk {} failed: {}",
                        chunk, err
                    )))
                }
            };
            match raw {
                Some(raw) => raw_sets.push(raw.clone()),
                None => {
                    return Err(PredictionError::new(format!(
                        "no prediction for {} on chunk {}",
                        genome, chunk
                    )))
                }
            }
        }
        Ok(raw_sets)
    }

    fn finish_genome(
        &self,
        genome: &GenomeId,
        chunks: &[&GenomicInterval],
        predictions: &[Result<GenomeMap<RawFeatureSet>, PredictionError>],
    ) -> Result<GenomeOutput, PipelineError> {
        let raw_sets = self.gather(genome, chunks, predictions)?;

        let workdir = tempfile::Builder::new()
            .prefix("genechunk-merge")
            .tempdir()
            .map_err(MergeError::from)?;
        let merged = self.merger.merge(genome, &raw_sets, workdir.path())?;
        let raw = self.store.put(merged.raw.as_bytes())?;
        let merged_handle = self.store.put(merged.merged.gtf().as_bytes())?;
        let gene_models = merged
            .merged
            .gene_models()
            .map(|models| self.store.put(models.as_bytes()))
            .transpose()?;

        let priors = self.priors.get(genome).ok_or_else(|| {
            ParentAssignmentError::new(format!("no prior gene models for {}", genome))
        })?;
        let filtered = load_priors(&priors.filtered)?;
        let unfiltered = load_priors(&priors.unfiltered)?;
        let assignment = self.assigner.assign_parents(
            self.reference,
            &filtered,
            &unfiltered,
            &merged.merged,
            self.merger.mode().label(),
        )?;
        let summary = assignment
            .summary()
            .map_err(ParentAssignmentError::from)?;

        info!(
            "{}: {} transcripts, {} discarded",
            genome,
            assignment.rows.len(),
            assignment.discarded
        );
        Ok(GenomeOutput {
            raw,
            merged: merged_handle,
            annotated: self.store.put(assignment.annotated.as_bytes())?,
            gene_models,
            summary: self.store.put(summary.as_bytes())?,
            rows: assignment.rows,
            discarded: assignment.discarded,
        })
    }
}

fn load_priors(path: &Path) -> Result<Transcripts, ParentAssignmentError> {
    Ok(read_transcripts(genepred::Reader::from_file(path))?)
}

fn joiner(kind: JoinerKind, binary: &Path) -> Box<dyn GeneJoiner> {
    match kind {
        JoinerKind::Joingenes => Box::new(Joingenes::new(binary)),
        JoinerKind::Native => Box::new(NativeJoiner::new()),
    }
}

fn open_store(path: &Path) -> Result<FileStore, ConfigurationError> {
    FileStore::new(path).map_err(|err| ConfigurationError::new(err.message))
}

fn open_reference(path: &Path) -> Result<ReferenceGeneDb, ConfigurationError> {
    ReferenceGeneDb::from_file(path).map_err(ConfigurationError::new)
}

/// Comparative prediction on all genomes of an alignment
///
/// The sequences of the reference genome are chunked, every chunk predicts
/// genes in all genomes.
pub fn run_cgp(config: &CgpConfig) -> Result<RunResult, PipelineError> {
    config.validate()?;
    let sizes = SequenceSizes::from_file(&config.sequence_sizes).map_err(ConfigurationError::new)?;
    let plan = plan(&sizes, config.geometry.chunk_size, config.geometry.overlap)?;

    let predictor = CgpPredictor::new(config)?;
    let joiner = joiner(config.joiner, &config.binaries.joingenes);
    let mut merger = ChunkMerger::new(PredictorMode::Cgp, joiner.as_ref());
    merger.normalize(config.normalize);
    let assigner = OverlapParentAssigner::new(config.assignment.min_distance);
    let store = open_store(&config.store)?;
    let reference = open_reference(&config.assignment.reference_gene_db)?;
    let priors = config.assignment.priors(&config.genome_set())?;

    let mut pipeline = Pipeline::new(&predictor, merger, &assigner, &store, &reference, &priors);
    pipeline.threads(config.threads);
    pipeline.run(&plan)
}

/// Single-genome prediction with hints
pub fn run_pb(config: &PbConfig) -> Result<RunResult, PipelineError> {
    config.validate()?;
    let predictor = PbPredictor::new(config)?;
    let plan = plan(
        &predictor.genome().sizes(),
        config.geometry.chunk_size,
        config.geometry.overlap,
    )?;

    let joiner = joiner(config.joiner, &config.binaries.joingenes);
    let mut merger = ChunkMerger::new(PredictorMode::Pb, joiner.as_ref());
    merger.normalize(config.normalize);
    let assigner = OverlapParentAssigner::new(config.assignment.min_distance);
    let store = open_store(&config.store)?;
    let reference = open_reference(&config.assignment.reference_gene_db)?;
    let priors = config.assignment.priors(&config.genome_set())?;

    let mut pipeline = Pipeline::new(&predictor, merger, &assigner, &store, &reference, &priors);
    pipeline.threads(config.threads);
    pipeline.run(&plan)
}
