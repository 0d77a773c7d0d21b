//! Merge the chunk predictions of one genome
//!
//! Chunks overlap, so a plain concatenation of all chunk outputs contains
//! duplicated and truncated genes. The [`ChunkMerger`] reconciles them:
//!
//! 1. All raw sets are concatenated in chunk order, every line preserved.
//! 2. A [`GeneJoiner`] removes the boundary artifacts.
//! 3. Only the structural lines of the predictor are kept.
//! 4. The `jg` identifiers of the joiner are replaced by the prefix of the
//!    prediction mode, so that CGP and PB genes never share an id.
//! 5. Optionally, the result is normalized by parsing it into transcripts
//!    and writing them back sorted by position.
mod joiner;

use std::path::Path;

use log::{debug, info};

use crate::genepred;
use crate::gtf::{compose_transcripts, parse_records, GtfRecord, Writer};
use crate::models::{GenomeId, MergedFeatureSet, PredictorMode, RawFeatureSet, TranscriptWrite};
use crate::utils::errors::{EmptyInputError, MergeError, ParseGtfError, PipelineError};

pub use crate::merge::joiner::{GeneJoiner, Joingenes, NativeJoiner};

/// Source column of all AUGUSTUS lines
pub const PREDICTOR_SOURCE: &str = "AUGUSTUS";

/// Identifier prefix of joined genes
pub const JOINED_PREFIX: &str = "jg";

/// Features that make up the merged gene set
pub const STRUCTURAL_FEATURES: [&str; 6] =
    ["exon", "CDS", "start_codon", "stop_codon", "tss", "tts"];

/// Result of merging the chunks of one genome
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutput {
    /// The concatenation of all raw chunk outputs
    pub raw: String,
    pub merged: MergedFeatureSet,
}

/// Concatenates raw sets in the given order
///
/// Every line is kept, each set ends with a newline.
///
/// ```rust
/// use genechunk::merge::concatenate;
/// use genechunk::models::{GenomeId, GenomicInterval, RawFeatureSet};
///
/// let sets: Vec<RawFeatureSet> = [(0, "a\nb"), (100, "c\n")]
///     .iter()
///     .map(|(start, content)| RawFeatureSet::new(
///         GenomeId::from("hg38"),
///         GenomicInterval::new("chr1", *start, 150).unwrap(),
///         content.to_string(),
///     ))
///     .collect();
/// assert_eq!(concatenate(&sets), "a\nb\nc\n");
/// ```
pub fn concatenate(raw_sets: &[RawFeatureSet]) -> String {
    let mut res = String::with_capacity(raw_sets.iter().map(|raw| raw.content().len() + 1).sum());
    for raw in raw_sets {
        res.push_str(raw.content());
        if !raw.content().is_empty() && !raw.content().ends_with('\n') {
            res.push('\n');
        }
    }
    res
}

/// Keeps the structural lines of the predictor, unchanged
pub fn filter_structural(gtf: &str) -> String {
    let mut res = String::with_capacity(gtf.len());
    for line in gtf.lines() {
        let mut cols = line.split('\t');
        let (source, feature) = match (cols.next(), cols.next(), cols.next()) {
            (Some(_), Some(source), Some(feature)) => (source, feature),
            _ => continue,
        };
        if source == PREDICTOR_SOURCE && STRUCTURAL_FEATURES.contains(&feature) {
            res.push_str(line);
            res.push('\n');
        }
    }
    res
}

/// Replaces the `jg` prefix of gene and transcript ids by `prefix`
///
/// No other attribute is changed.
///
/// ```rust
/// use genechunk::merge::rename_identifiers;
///
/// let line = "chr1\tAUGUSTUS\texon\t11\t20\t.\t+\t.\tgene_id \"jg2\"; transcript_id \"jg2.t1\"; note \"jg\";\n";
/// let renamed = rename_identifiers(line, "augPB-").unwrap();
/// assert_eq!(
///     renamed,
///     "chr1\tAUGUSTUS\texon\t11\t20\t.\t+\t.\tgene_id \"augPB-2\"; transcript_id \"augPB-2.t1\"; note \"jg\";\n"
/// );
/// ```
pub fn rename_identifiers(gtf: &str, prefix: &str) -> Result<String, ParseGtfError> {
    let mut res = String::with_capacity(gtf.len());
    for mut record in parse_records(gtf)? {
        for (key, value) in record.attributes_mut().iter_mut() {
            if (key == "gene_id" || key == "transcript_id") && value.starts_with(JOINED_PREFIX) {
                *value = format!("{}{}", prefix, &value[JOINED_PREFIX.len()..]);
            }
        }
        res.push_str(&record.to_string());
        res.push('\n');
    }
    Ok(res)
}

/// Rewrites a GTF gene set in canonical form
///
/// Transcripts are sorted by position and written with UTR features, all
/// lines get the source label of `mode`. Single-genome mode additionally
/// returns the gene set as genePredExt.
pub fn normalize(gtf: &str, mode: PredictorMode) -> Result<(String, Option<String>), MergeError> {
    let records: Vec<GtfRecord> = parse_records(gtf)?;
    let mut transcripts = compose_transcripts(&records)?;
    transcripts.sort();

    let mut writer = Writer::new(Vec::new());
    writer.source(mode.source());
    writer.utr(true);
    writer.write_transcripts(&transcripts)?;
    let normalized = into_string(writer.into_inner().map_err(MergeError::new)?)?;

    let gene_models = match mode {
        PredictorMode::Pb => {
            let mut writer = genepred::Writer::new(Vec::new());
            writer.write_transcripts(&transcripts)?;
            Some(into_string(writer.into_inner().map_err(MergeError::new)?)?)
        }
        PredictorMode::Cgp => None,
    };
    Ok((normalized, gene_models))
}

fn into_string(bytes: Vec<u8>) -> Result<String, MergeError> {
    String::from_utf8(bytes).map_err(|err| MergeError::new(err.to_string()))
}

/// Reconciles the chunk outputs of one genome into its merged gene set
///
/// # Examples
///
/// ```rust
/// use genechunk::merge::{ChunkMerger, NativeJoiner};
/// use genechunk::models::{GenomeId, GenomicInterval, PredictorMode, RawFeatureSet};
/// use genechunk::tests::gtf::augustus_transcript;
///
/// let genome = GenomeId::from("hg38");
/// let raw = RawFeatureSet::new(
///     genome.clone(),
///     GenomicInterval::new("chr1", 0, 1000).unwrap(),
///     augustus_transcript("chr1", "g1.t1", "g1", &[(101, 150), (201, 250)], Some((121, 230)), true, true),
/// );
///
/// let joiner = NativeJoiner::new();
/// let merger = ChunkMerger::new(PredictorMode::Cgp, &joiner);
/// let workdir = tempfile::tempdir().unwrap();
/// let output = merger.merge(&genome, &[raw], workdir.path()).unwrap();
///
/// assert!(output.merged.gtf().contains("transcript_id \"augCGP-1.t1\""));
/// assert!(!output.merged.gtf().contains("\ttranscript\t"));
/// ```
pub struct ChunkMerger<'a> {
    mode: PredictorMode,
    joiner: &'a dyn GeneJoiner,
    normalize: bool,
}

impl<'a> ChunkMerger<'a> {
    /// Creates a merger, only single-genome output is normalized by default
    pub fn new(mode: PredictorMode, joiner: &'a dyn GeneJoiner) -> Self {
        ChunkMerger {
            mode,
            joiner,
            normalize: mode == PredictorMode::Pb,
        }
    }

    pub fn normalize(&mut self, normalize: bool) {
        self.normalize = normalize;
    }

    pub fn mode(&self) -> PredictorMode {
        self.mode
    }

    /// Merges all chunk outputs of `genome`
    ///
    /// `raw_sets` must be in chunk emission order. `workdir` is used by
    /// joiners that run external programs.
    pub fn merge(
        &self,
        genome: &GenomeId,
        raw_sets: &[RawFeatureSet],
        workdir: &Path,
    ) -> Result<MergeOutput, PipelineError> {
        if raw_sets.is_empty() {
            return Err(EmptyInputError::new(format!("no chunk predictions for {}", genome)).into());
        }
        if let Some(raw) = raw_sets.iter().find(|raw| raw.genome() != genome) {
            return Err(MergeError::new(format!(
                "chunk {} of {} cannot be merged into {}",
                raw.chunk(),
                raw.genome(),
                genome
            ))
            .into());
        }

        let raw = concatenate(raw_sets);
        debug!(
            "{}: merging {} chunks with {} lines",
            genome,
            raw_sets.len(),
            raw.lines().count()
        );

        let joined = self.joiner.join(raw_sets, workdir)?;
        let filtered = filter_structural(&joined);
        let renamed = rename_identifiers(&filtered, self.mode.prefix()).map_err(MergeError::from)?;

        let (gtf, gene_models) = if self.normalize {
            normalize(&renamed, self.mode)?
        } else {
            (renamed, None)
        };
        info!(
            "{}: merged {} chunks into {} {} lines",
            genome,
            raw_sets.len(),
            gtf.lines().count(),
            self.mode
        );

        Ok(MergeOutput {
            raw,
            merged: MergedFeatureSet::new(genome.clone(), self.mode, gtf, gene_models),
        })
    }
}

#[cfg(test)]
mod test_merge {
    use super::*;
    use crate::models::GenomicInterval;
    use crate::tests::gtf::{augustus_transcript, STANDARD_GTF};

    fn raw(genome: &str, start: u64, length: u64, content: String) -> RawFeatureSet {
        RawFeatureSet::new(
            GenomeId::from(genome),
            GenomicInterval::new("chr1", start, length).unwrap(),
            content,
        )
    }

    fn boundary_sets() -> Vec<RawFeatureSet> {
        let shared = augustus_transcript("chr1", "g2.t1", "g2", &[(310, 330), (350, 380)], Some((312, 377)), true, true);
        vec![
            raw(
                "hg38",
                0,
                400,
                format!(
                    "# chunk 1\n{}{}",
                    augustus_transcript("chr1", "g1.t1", "g1", &[(20, 50), (80, 120)], Some((25, 110)), true, true),
                    shared
                ),
            ),
            raw(
                "hg38",
                300,
                400,
                format!(
                    "# chunk 2\n{}{}",
                    shared,
                    augustus_transcript("chr1", "g3.t1", "g3", &[(500, 550)], None, false, false)
                ),
            ),
        ]
    }

    #[test]
    fn test_concatenate_keeps_order() {
        let sets = boundary_sets();
        let raw = concatenate(&sets);
        assert_eq!(raw, format!("{}{}", sets[0].content(), sets[1].content()));

        let mut reversed = sets.clone();
        reversed.reverse();
        assert_ne!(concatenate(&reversed), raw);
        assert_eq!(concatenate(&sets), raw);
    }

    #[test]
    fn test_concatenate_adds_newline() {
        let sets = vec![raw("hg38", 0, 10, "a".to_string()), raw("hg38", 5, 10, String::new())];
        assert_eq!(concatenate(&sets), "a\n");
    }

    #[test]
    fn test_filter_structural() {
        let filtered = filter_structural(STANDARD_GTF);
        assert_eq!(filtered.lines().count(), 11);
        assert!(!filtered.contains("\tgene\t"));
        assert!(!filtered.contains("\ttranscript\t"));

        let other = "chr1\tGeneMark\texon\t1\t10\t.\t+\t.\ttranscript_id \"x\";\n# comment\nnot a gtf line\n";
        assert_eq!(filter_structural(other), "");
    }

    #[test]
    fn test_rename_identifiers() {
        let gtf = "chr1\tAUGUSTUS\tCDS\t11\t20\t.\t-\t0\ttranscript_id \"jg10.t2\"; gene_id \"jg10\";\n";
        let renamed = rename_identifiers(gtf, PredictorMode::Cgp.prefix()).unwrap();
        assert!(renamed.contains("transcript_id \"augCGP-10.t2\""));
        assert!(renamed.contains("gene_id \"augCGP-10\""));

        let untouched = "chr1\tAUGUSTUS\tCDS\t11\t20\t.\t-\t0\ttranscript_id \"g1.t1\"; gene_id \"g1\";\n";
        assert!(rename_identifiers(untouched, "augPB-").unwrap().contains("\"g1.t1\""));
    }

    #[test]
    fn test_merge_boundary_duplicate() {
        let joiner = NativeJoiner::new();
        let merger = ChunkMerger::new(PredictorMode::Cgp, &joiner);
        let workdir = tempfile::tempdir().unwrap();
        let output = merger
            .merge(&GenomeId::from("hg38"), &boundary_sets(), workdir.path())
            .unwrap();

        let transcripts = compose_transcripts(&parse_records(output.merged.gtf()).unwrap()).unwrap();
        let names: Vec<&str> = transcripts.iter().map(|tx| tx.name()).collect();
        assert_eq!(names, vec!["augCGP-1.t1", "augCGP-2.t1", "augCGP-3.t1"]);
        assert!(output.merged.gtf().lines().all(|l| l.contains("\tAUGUSTUS\t")));
        assert!(output.merged.gene_models().is_none());

        // the raw concatenation still contains both copies
        assert_eq!(output.raw.matches("transcript_id \"g2.t1\"").count(), 2 * 6);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let joiner = NativeJoiner::new();
        let merger = ChunkMerger::new(PredictorMode::Pb, &joiner);
        let workdir = tempfile::tempdir().unwrap();
        let genome = GenomeId::from("hg38");
        let first = merger.merge(&genome, &boundary_sets(), workdir.path()).unwrap();
        let second = merger.merge(&genome, &boundary_sets(), workdir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_normalized_pb() {
        let joiner = NativeJoiner::new();
        let merger = ChunkMerger::new(PredictorMode::Pb, &joiner);
        let workdir = tempfile::tempdir().unwrap();
        let output = merger
            .merge(&GenomeId::from("hg38"), &boundary_sets(), workdir.path())
            .unwrap();

        let gtf = output.merged.gtf();
        assert!(gtf.lines().all(|l| l.split('\t').nth(1) == Some("augustusPB")));
        assert!(gtf.contains("\t5UTR\t"));
        assert!(gtf.contains("gene_id \"augPB-1\""));

        let gene_models = output.merged.gene_models().unwrap();
        let lines: Vec<&str> = gene_models.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("augPB-1.t1\tchr1\t+\t19\t120\t24\t110\t2\t"));
    }

    #[test]
    fn test_merge_without_normalization() {
        let joiner = NativeJoiner::new();
        let mut merger = ChunkMerger::new(PredictorMode::Pb, &joiner);
        merger.normalize(false);
        let workdir = tempfile::tempdir().unwrap();
        let output = merger
            .merge(&GenomeId::from("hg38"), &boundary_sets(), workdir.path())
            .unwrap();
        assert!(output.merged.gtf().contains("\tAUGUSTUS\t"));
        assert!(output.merged.gene_models().is_none());
    }

    #[test]
    fn test_modes_do_not_share_prefixes() {
        let joiner = NativeJoiner::new();
        let workdir = tempfile::tempdir().unwrap();
        let genome = GenomeId::from("hg38");
        for (mode, other) in [
            (PredictorMode::Cgp, PredictorMode::Pb),
            (PredictorMode::Pb, PredictorMode::Cgp),
        ] {
            for normalize in [false, true] {
                let mut merger = ChunkMerger::new(mode, &joiner);
                merger.normalize(normalize);
                let output = merger.merge(&genome, &boundary_sets(), workdir.path()).unwrap();
                let gtf = output.merged.gtf();
                assert!(gtf.contains(&format!("gene_id \"{}1\"", mode.prefix())));
                assert!(!gtf.contains(other.prefix()));
                assert!(!gtf.contains(&format!("\"{}", JOINED_PREFIX)));
                if let Some(models) = output.merged.gene_models() {
                    assert!(!models.contains(other.prefix()));
                }
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let joiner = NativeJoiner::new();
        let merger = ChunkMerger::new(PredictorMode::Cgp, &joiner);
        let workdir = tempfile::tempdir().unwrap();
        let err = merger
            .merge(&GenomeId::from("hg38"), &[], workdir.path())
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput(_)));
    }

    #[test]
    fn test_foreign_genome() {
        let joiner = NativeJoiner::new();
        let merger = ChunkMerger::new(PredictorMode::Cgp, &joiner);
        let workdir = tempfile::tempdir().unwrap();
        let sets = vec![raw("mm10", 0, 100, String::new())];
        let err = merger
            .merge(&GenomeId::from("hg38"), &sets, workdir.path())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Merge(_)));
    }

    #[test]
    fn test_failing_joiner() {
        let dir = tempfile::tempdir().unwrap();
        let joiner = Joingenes::new(dir.path().join("no-such-joingenes"));
        let merger = ChunkMerger::new(PredictorMode::Cgp, &joiner);
        let err = merger
            .merge(&GenomeId::from("hg38"), &boundary_sets(), dir.path())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Merge(_)));
    }
}
