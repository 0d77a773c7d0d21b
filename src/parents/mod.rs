//! Assign predicted transcripts to genes of a reference annotation
//!
//! Predicted transcripts get their parent gene from prior gene models that
//! were projected onto the same genome (e.g. via transMap). Two sets of prior
//! models are used: the unfiltered projections and a filtered subset of
//! high-confidence projections.
//!
//! The [`OverlapParentAssigner`] works per predicted transcript:
//!
//! * Prior transcripts overlap if they share at least one exonic base.
//! * Overlapping priors that were removed by the filter only count as
//!   alternatives.
//! * Exactly one overlapping gene is assigned directly. Without any
//!   overlapping gene, the transcript is a putative novel gene.
//! * Several overlapping genes are resolved:
//!     1. If the exons of any two of the genes overlap with a Jaccard index
//!        above 0.001, the prior models themselves are questionable
//!        (`badAnnotOrTm`) and the transcript is discarded.
//!     2. Otherwise every gene is scored by the share of the predicted
//!        span it covers. A gene that scores higher than all other genes
//!        by at least `min_distance` is `rescued`, all other cases are
//!        `ambiguousOrFusion`.
//!
//! Transcripts that fail the structural [`QcCheck`] are discarded as well.
//! All other transcripts are annotated with their assignment.
mod reference;
mod writer;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use log::{debug, info};

use crate::gtf::{compose_transcripts, parse_records};
use crate::models::{MergedFeatureSet, Transcript, Transcripts};
use crate::qc::QcCheck;
use crate::utils::errors::{ParentAssignmentError, ReadWriteError};
use crate::utils::{jaccard, overlap_len};

pub use crate::parents::reference::{ReferenceGene, ReferenceGeneDb};
pub use crate::parents::writer::{Writer, HEADER};

/// Minimal exonic Jaccard index of two prior genes that marks them as conflicting
pub const CONFLICTING_JACCARD: f64 = 0.001;

/// Default minimal score difference to rescue an ambiguous assignment
pub const DEFAULT_MIN_DISTANCE: f64 = 0.9;

/// Written for attributes and table cells without a value
const MISSING: &str = "None";

/// How an assignment to several candidate genes was resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionMethod {
    /// The candidate genes overlap each other
    BadAnnotOrTm,
    /// No candidate gene scores clearly better than the others
    AmbiguousOrFusion,
    /// One candidate gene scores clearly better than the others
    Rescued,
}

impl fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResolutionMethod::BadAnnotOrTm => "badAnnotOrTm",
                ResolutionMethod::AmbiguousOrFusion => "ambiguousOrFusion",
                ResolutionMethod::Rescued => "rescued",
            }
        )
    }
}

/// Parent assignment of one predicted transcript
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentRow {
    pub transcript_id: String,
    pub assigned_gene: Option<String>,
    /// Overlapping genes other than the assigned one, sorted
    pub alternatives: Vec<String>,
    pub resolution: Option<ResolutionMethod>,
}

impl AssignmentRow {
    /// Comma-separated alternative genes, `None` without alternatives
    pub fn alternative_ids(&self) -> Option<String> {
        if self.alternatives.is_empty() {
            None
        } else {
            Some(self.alternatives.join(","))
        }
    }
}

impl fmt::Display for AssignmentRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.transcript_id,
            self.assigned_gene.as_deref().unwrap_or(MISSING),
            self.alternative_ids().as_deref().unwrap_or(MISSING),
            self.resolution
                .map(|res| res.to_string())
                .as_deref()
                .unwrap_or(MISSING)
        )
    }
}

/// Output of the parent assignment of one genome
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentResult {
    /// The merged GTF without discarded transcripts, with assignment attributes
    pub annotated: String,
    /// One row per predicted transcript, in the order of the merged GTF
    pub rows: Vec<AssignmentRow>,
    /// Number of discarded transcripts
    pub discarded: usize,
}

impl AssignmentResult {
    /// The summary table, including the header
    pub fn summary(&self) -> Result<String, ReadWriteError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_header()?;
        writer.write_rows(&self.rows)?;
        let bytes = writer.into_inner().map_err(ReadWriteError::new)?;
        String::from_utf8(bytes).map_err(ReadWriteError::new)
    }
}

/// Assigns the transcripts of a merged gene set to reference genes
///
/// Called once per genome, after its merged gene set is final.
pub trait ParentAssigner: Sync {
    fn assign_parents(
        &self,
        reference: &ReferenceGeneDb,
        filtered: &Transcripts,
        unfiltered: &Transcripts,
        merged: &MergedFeatureSet,
        predictor: &str,
    ) -> Result<AssignmentResult, ParentAssignmentError>;
}

/// Parent assignment based on exonic overlap with prior gene models
///
/// # Examples
///
/// ```rust
/// use genechunk::models::{GenomeId, MergedFeatureSet, PredictorMode, Transcripts};
/// use genechunk::parents::{OverlapParentAssigner, ParentAssigner, ReferenceGeneDb};
/// use genechunk::tests::gtf::augustus_transcript;
/// use genechunk::tests::transcripts::non_coding;
///
/// let reference = ReferenceGeneDb::from_reader("ENSG01\tBRCA2\n".as_bytes()).unwrap();
/// let priors: Transcripts = vec![non_coding("ENST01", "ENSG01", "chr1", &[(150, 250)])]
///     .into_iter()
///     .collect();
/// let merged = MergedFeatureSet::new(
///     GenomeId::from("hg38"),
///     PredictorMode::Pb,
///     augustus_transcript("chr1", "augPB-1.t1", "augPB-1", &[(100, 200)], None, false, false),
///     None,
/// );
///
/// let res = OverlapParentAssigner::default()
///     .assign_parents(&reference, &priors, &priors, &merged, "AugustusPB")
///     .unwrap();
///
/// assert_eq!(res.rows[0].assigned_gene.as_deref(), Some("ENSG01"));
/// assert!(res.annotated.contains("source_gene_common_name \"BRCA2\""));
/// assert_eq!(res.discarded, 0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OverlapParentAssigner {
    min_distance: f64,
}

impl Default for OverlapParentAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISTANCE)
    }
}

impl OverlapParentAssigner {
    pub fn new(min_distance: f64) -> Self {
        OverlapParentAssigner { min_distance }
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Assigns a single predicted transcript
    ///
    /// `priors` are the unfiltered prior transcripts, `filtered_out` the
    /// names of the priors that are missing from the filtered set.
    pub fn assign(
        &self,
        denovo: &Transcript,
        priors: &[&Transcript],
        filtered_out: &HashSet<&str>,
    ) -> AssignmentRow {
        let overlapping: Vec<&Transcript> = priors
            .iter()
            .copied()
            .filter(|prior| exonic_overlap(denovo, prior))
            .collect();
        let candidates: Vec<&Transcript> = overlapping
            .iter()
            .copied()
            .filter(|prior| !filtered_out.contains(prior.name()))
            .collect();
        let candidate_genes: BTreeSet<&str> = candidates.iter().map(|tx| tx.gene()).collect();

        let (assigned_gene, resolution) = match candidate_genes.len() {
            0 => (None, None),
            1 => (candidate_genes.iter().next().map(|gene| gene.to_string()), None),
            _ => {
                let (gene, resolution) = self.resolve(denovo, &candidates);
                (gene, Some(resolution))
            }
        };

        let alternatives: Vec<String> = overlapping
            .iter()
            .map(|tx| tx.gene())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .filter(|gene| Some(*gene) != assigned_gene.as_deref())
            .map(|gene| gene.to_string())
            .collect();

        AssignmentRow {
            transcript_id: denovo.name().to_string(),
            assigned_gene,
            alternatives,
            resolution,
        }
    }

    fn resolve(
        &self,
        denovo: &Transcript,
        candidates: &[&Transcript],
    ) -> (Option<String>, ResolutionMethod) {
        let mut by_gene: BTreeMap<&str, Vec<&Transcript>> = BTreeMap::new();
        for &tx in candidates {
            by_gene.entry(tx.gene()).or_default().push(tx);
        }

        let exons: Vec<Vec<(u32, u32)>> = by_gene
            .values()
            .map(|txs| txs.iter().flat_map(|tx| tx.exon_segments()).collect())
            .collect();
        for (idx, a) in exons.iter().enumerate() {
            for b in &exons[idx + 1..] {
                if jaccard(a, b) > CONFLICTING_JACCARD {
                    return (None, ResolutionMethod::BadAnnotOrTm);
                }
            }
        }

        let scores: Vec<(&str, f64)> = by_gene
            .iter()
            .map(|(gene, txs)| {
                let best = txs
                    .iter()
                    .map(|tx| closeness(denovo, tx))
                    .fold(0.0, f64::max);
                (*gene, best)
            })
            .collect();
        let high = scores.iter().map(|s| s.1).fold(0.0, f64::max);
        let winners: Vec<&str> = scores
            .iter()
            .filter(|s| s.1 == high)
            .map(|s| s.0)
            .collect();
        let clear_winner = winners.len() == 1
            && scores
                .iter()
                .filter(|s| s.1 != high)
                .all(|s| high - s.1 >= self.min_distance);

        if clear_winner {
            (Some(winners[0].to_string()), ResolutionMethod::Rescued)
        } else {
            (None, ResolutionMethod::AmbiguousOrFusion)
        }
    }
}

impl ParentAssigner for OverlapParentAssigner {
    fn assign_parents(
        &self,
        reference: &ReferenceGeneDb,
        filtered: &Transcripts,
        unfiltered: &Transcripts,
        merged: &MergedFeatureSet,
        predictor: &str,
    ) -> Result<AssignmentResult, ParentAssignmentError> {
        let filtered_out: HashSet<&str> = unfiltered
            .iter()
            .map(|tx| tx.name())
            .filter(|name| !filtered.contains_name(name))
            .collect();
        let mut priors_by_chrom: HashMap<&str, Vec<&Transcript>> = HashMap::new();
        for tx in unfiltered {
            priors_by_chrom.entry(tx.chrom()).or_default().push(tx);
        }

        let mut records = parse_records(merged.gtf())?;
        let denovo = compose_transcripts(&records)?;

        let mut rows: HashMap<String, AssignmentRow> = HashMap::with_capacity(denovo.len());
        let mut ordered_rows = Vec::with_capacity(denovo.len());
        let mut discarded: HashSet<String> = HashSet::new();
        for tx in &denovo {
            let priors = priors_by_chrom
                .get(tx.chrom())
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            let row = self.assign(tx, priors, &filtered_out);
            if !QcCheck::new(tx).is_valid() {
                debug!("{} fails the structural checks", tx.name());
                discarded.insert(tx.name().to_string());
            } else if row.resolution == Some(ResolutionMethod::BadAnnotOrTm) {
                discarded.insert(tx.name().to_string());
            }
            ordered_rows.push(row.clone());
            rows.insert(row.transcript_id.clone(), row);
        }

        let mut annotated = String::with_capacity(merged.gtf().len() * 2);
        for record in records.iter_mut() {
            let row = match record.transcript_id() {
                Some(tx_id) if discarded.contains(tx_id) => continue,
                Some(tx_id) => rows.get(tx_id),
                None => None,
            };
            if let Some(row) = row {
                let common_name = row
                    .assigned_gene
                    .as_deref()
                    .and_then(|gene| reference.name(gene))
                    .unwrap_or(MISSING)
                    .to_string();
                let attributes = record.attributes_mut();
                attributes.set(
                    "source_gene",
                    row.assigned_gene.as_deref().unwrap_or(MISSING),
                );
                attributes.set("source_gene_common_name", common_name);
                attributes.set(
                    "alternative_source_gene_ids",
                    row.alternative_ids().unwrap_or_else(|| MISSING.to_string()),
                );
                attributes.set(
                    "resolution_method",
                    row.resolution
                        .map(|res| res.to_string())
                        .unwrap_or_else(|| MISSING.to_string()),
                );
                attributes.set("predictor", predictor);
            }
            annotated.push_str(&record.to_string());
            annotated.push('\n');
        }

        info!(
            "{}: assigned {} of {} {} transcripts, {} discarded",
            merged.genome(),
            ordered_rows
                .iter()
                .filter(|row| row.assigned_gene.is_some())
                .count(),
            ordered_rows.len(),
            predictor,
            discarded.len()
        );

        Ok(AssignmentResult {
            annotated,
            rows: ordered_rows,
            discarded: discarded.len(),
        })
    }
}

/// True if the transcripts share at least one exonic base
fn exonic_overlap(a: &Transcript, b: &Transcript) -> bool {
    if a.chrom() != b.chrom() || overlap_len(a.span(), b.span()) == 0 {
        return false;
    }
    a.exons().iter().any(|x| {
        b.exons()
            .iter()
            .any(|y| overlap_len((x.start(), x.end()), (y.start(), y.end())) > 0)
    })
}

/// Share of the predicted span that is covered by the prior span
fn closeness(denovo: &Transcript, prior: &Transcript) -> f64 {
    let len = denovo.span_len();
    if len == 0 {
        return 0.0;
    }
    f64::from(overlap_len(denovo.span(), prior.span())) / f64::from(len)
}
