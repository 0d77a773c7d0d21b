use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::gtf::{compose_transcripts, parse_records, Writer};
use crate::models::{
    CdsStat, Exon, GenomicInterval, RawFeatureSet, Strand, Transcript, TranscriptWrite,
};
use crate::process::ExternalCommand;
use crate::utils::errors::MergeError;
use crate::utils::{merge, overlap_len};

/// Joins the chunk predictions of one genome into a single gene set
///
/// The raw sets are passed in chunk order. The joined output is GTF whose
/// identifiers all start with `jg`.
pub trait GeneJoiner: Sync {
    fn join(&self, raw_sets: &[RawFeatureSet], workdir: &Path) -> Result<String, MergeError>;
}

/// The `joingenes` program of the AUGUSTUS package
///
/// Every raw set is written into its own file inside `workdir`. The files
/// are listed in a file-of-filenames, `joingenes` writes to stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Joingenes {
    pub binary: PathBuf,
}

impl Joingenes {
    pub fn new<P: Into<PathBuf>>(binary: P) -> Self {
        Joingenes {
            binary: binary.into(),
        }
    }

    pub fn command(&self, fofn: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.binary)
            .arg("-f")
            .arg(fofn.display().to_string())
            .args(["-o", "/dev/stdout"])
    }
}

impl GeneJoiner for Joingenes {
    fn join(&self, raw_sets: &[RawFeatureSet], workdir: &Path) -> Result<String, MergeError> {
        let fofn = workdir.join("chunks.fofn");
        let mut writer = BufWriter::new(fs::File::create(&fofn)?);
        for (idx, raw) in raw_sets.iter().enumerate() {
            let path = workdir.join(format!("chunk_{}.gtf", idx));
            fs::write(&path, raw.content())?;
            writeln!(writer, "{}", path.display())?;
        }
        writer.flush()?;
        Ok(self.command(&fofn).workdir(workdir).output()?)
    }
}

/// Joins chunk predictions without external programs
///
/// Neighbouring chunks overlap, so genes in the overlap are predicted
/// twice and genes crossing a chunk border are predicted truncated.
/// The joiner
///
/// 1. drops transcripts whose span lies within the span of a transcript
///    of another chunk on the same strand, and exact duplicates,
/// 2. stitches a transcript that is truncated at a chunk border to the
///    continuing transcript of the neighbouring chunk,
/// 3. passes all other transcripts through.
///
/// Transcripts are stitched if they overlap, have the same intron chain
/// inside the overlap and, for coding transcripts, the same reading frame.
/// Every transcript is stitched at most once per neighbour.
///
/// In comparative mode the chunk is a window of the reference genome, the
/// other genomes are predicted on their own sequences. Their transcripts
/// are deduplicated by position, but never stitched, since the chunk
/// borders are unknown on their sequences.
///
/// All genes are renamed to `jg1`, `jg2`, ... in the order of their
/// position, their transcripts to `jg1.t1`, `jg1.t2`, ...
///
/// # Examples
///
/// ```rust
/// use genechunk::merge::{GeneJoiner, NativeJoiner};
/// use genechunk::models::{GenomeId, GenomicInterval, RawFeatureSet};
/// use genechunk::tests::gtf::augustus_transcript;
///
/// let genome = GenomeId::from("hg38");
/// let left = RawFeatureSet::new(
///     genome.clone(),
///     GenomicInterval::new("chr1", 0, 400).unwrap(),
///     augustus_transcript("chr1", "g1.t1", "g1", &[(101, 150), (201, 250)], None, false, false),
/// );
/// // the same transcript, predicted again in the overlap of the next chunk
/// let right = RawFeatureSet::new(
///     genome,
///     GenomicInterval::new("chr1", 100, 400).unwrap(),
///     augustus_transcript("chr1", "g1.t1", "g1", &[(101, 150), (201, 250)], None, false, false),
/// );
///
/// let joined = NativeJoiner::new().join(&[left, right], std::path::Path::new(".")).unwrap();
/// assert_eq!(joined.lines().filter(|l| l.contains("\texon\t")).count(), 2);
/// assert!(joined.contains("transcript_id \"jg1.t1\""));
/// ```
#[derive(Clone, Debug, Default)]
pub struct NativeJoiner {}

impl NativeJoiner {
    pub fn new() -> Self {
        NativeJoiner {}
    }

    /// Joins the transcripts of all raw sets, sorted by position
    pub fn join_transcripts(&self, raw_sets: &[RawFeatureSet]) -> Result<Vec<Transcript>, MergeError> {
        let mut seq_rank: HashMap<String, usize> = HashMap::new();
        let mut candidates: Vec<Candidate> = Vec::new();
        for (idx, raw) in raw_sets.iter().enumerate() {
            let chunk = raw.chunk();
            let next_rank = seq_rank.len();
            seq_rank.entry(chunk.seq_id().to_string()).or_insert(next_rank);
            let transcripts = compose_transcripts(&parse_records(raw.content())?)?;
            for tx in transcripts {
                let next_rank = seq_rank.len();
                seq_rank.entry(tx.chrom().to_string()).or_insert(next_rank);
                let window = if tx.chrom() == chunk.seq_id() {
                    Some(chunk.clone())
                } else {
                    None
                };
                candidates.push(Candidate {
                    first_chunk: idx,
                    last_chunk: idx,
                    window,
                    gene_key: (idx, tx.gene().to_string()),
                    tx,
                });
            }
        }
        let total = candidates.len();

        let candidates = drop_redundant(candidates);
        let candidates = stitch(candidates, &seq_rank);
        let mut candidates = drop_redundant(candidates);
        debug!(
            "joined {} chunk transcripts into {} transcripts",
            total,
            candidates.len()
        );

        candidates.sort_by(|a, b| {
            let rank = |c: &Candidate| seq_rank.get(c.tx.chrom()).copied().unwrap_or(usize::MAX);
            rank(a)
                .cmp(&rank(b))
                .then(a.tx.tx_start().cmp(&b.tx.tx_start()))
                .then(a.tx.tx_end().cmp(&b.tx.tx_end()))
                .then(strand_rank(a.tx.strand()).cmp(&strand_rank(b.tx.strand())))
                .then(a.first_chunk.cmp(&b.first_chunk))
                .then(a.tx.name().cmp(b.tx.name()))
        });

        let mut genes: HashMap<(usize, String), (usize, usize)> = HashMap::new();
        let mut res = Vec::with_capacity(candidates.len());
        for mut candidate in candidates {
            let next_gene = genes.len() + 1;
            let gene = genes.entry(candidate.gene_key).or_insert((next_gene, 0));
            gene.1 += 1;
            candidate.tx.set_gene(format!("jg{}", gene.0));
            candidate.tx.set_name(format!("jg{}.t{}", gene.0, gene.1));
            res.push(candidate.tx);
        }
        Ok(res)
    }
}

impl GeneJoiner for NativeJoiner {
    fn join(&self, raw_sets: &[RawFeatureSet], _workdir: &Path) -> Result<String, MergeError> {
        let transcripts = self.join_transcripts(raw_sets)?;
        let mut writer = Writer::new(Vec::new());
        writer.source("AUGUSTUS");
        writer.markers(true);
        writer.write_transcript_vec(&transcripts)?;
        let output = writer.into_inner().map_err(MergeError::new)?;
        String::from_utf8(output).map_err(|err| MergeError::new(err.to_string()))
    }
}

/// A transcript together with the chunk(s) it was predicted in
struct Candidate {
    first_chunk: usize,
    last_chunk: usize,
    /// Window of all chunks the transcript comes from, `None` if it was
    /// predicted on another sequence than the chunk's
    window: Option<GenomicInterval>,
    gene_key: (usize, String),
    tx: Transcript,
}

impl Candidate {
    fn same_origin(&self, other: &Candidate) -> bool {
        self.first_chunk == other.first_chunk && self.last_chunk == other.last_chunk
    }

    fn truncated_left(&self) -> bool {
        self.window.as_ref().map_or(false, |window| {
            window.start() > 0
                && !window.contains_position(u64::from(self.tx.tx_start()).saturating_sub(1))
        })
    }

    fn truncated_right(&self) -> bool {
        self.window.as_ref().map_or(false, |window| {
            !window.contains_position(u64::from(self.tx.tx_end()) + 1)
        })
    }
}

fn strand_rank(strand: Strand) -> u8 {
    match strand {
        Strand::Plus => 0,
        Strand::Minus => 1,
        Strand::Unknown => 2,
    }
}

/// Introns of `tx` that intersect `start..=end`
fn introns_within(tx: &Transcript, start: u32, end: u32) -> Vec<(u32, u32)> {
    tx.introns()
        .into_iter()
        .filter(|intron| intron.1 >= start && intron.0 <= end)
        .collect()
}

fn same_structure(a: &Transcript, b: &Transcript) -> bool {
    a.chrom() == b.chrom()
        && a.strand() == b.strand()
        && a.exon_segments() == b.exon_segments()
        && a.cds_segments() == b.cds_segments()
}

/// True if the span of `inner` lies within the span of `outer`, on the same strand
fn is_contained(inner: &Transcript, outer: &Transcript) -> bool {
    inner.chrom() == outer.chrom()
        && inner.strand() == outer.strand()
        && outer.tx_start() <= inner.tx_start()
        && inner.tx_end() <= outer.tx_end()
}

/// Removes duplicates and transcripts contained in a transcript of another chunk
///
/// Of two transcripts with identical spans, the one from the earlier chunk is kept.
fn drop_redundant(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut keep = vec![true; candidates.len()];
    for (i, c) in candidates.iter().enumerate() {
        for (j, d) in candidates.iter().enumerate() {
            if i == j || !keep[j] {
                continue;
            }
            let duplicate = j < i && same_structure(&c.tx, &d.tx);
            let contained = !c.same_origin(d)
                && is_contained(&c.tx, &d.tx)
                && (c.tx.span() != d.tx.span() || j < i);
            if duplicate || contained {
                debug!("dropping {} of chunk {}", c.tx.name(), c.first_chunk);
                keep[i] = false;
                break;
            }
        }
    }
    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(c, keep)| if keep { Some(c) } else { None })
        .collect()
}

/// Stitches transcripts that continue in the neighbouring chunk
fn stitch(candidates: Vec<Candidate>, seq_rank: &HashMap<String, usize>) -> Vec<Candidate> {
    let mut candidates = candidates;
    candidates.sort_by(|a, b| {
        let rank = |c: &Candidate| seq_rank.get(c.tx.chrom()).copied().unwrap_or(usize::MAX);
        rank(a)
            .cmp(&rank(b))
            .then(a.tx.tx_start().cmp(&b.tx.tx_start()))
            .then(a.first_chunk.cmp(&b.first_chunk))
    });

    let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
    for i in 0..slots.len() {
        let mut current = match slots[i].take() {
            Some(c) => c,
            None => continue,
        };
        let mut j = i + 1;
        while j < slots.len() {
            let partner = match &slots[j] {
                Some(partner) => partner,
                None => {
                    j += 1;
                    continue;
                }
            };
            if partner.tx.chrom() != current.tx.chrom()
                || partner.tx.tx_start() > current.tx.tx_end()
            {
                break;
            }
            if can_stitch(&current, partner) {
                if let Some(partner) = slots[j].take() {
                    debug!(
                        "stitching {} of chunk {} and {} of chunk {}",
                        current.tx.name(),
                        current.last_chunk,
                        partner.tx.name(),
                        partner.first_chunk
                    );
                    current = stitched(current, partner);
                    // the stitched transcript may continue into the next chunk
                    j = i + 1;
                    continue;
                }
            }
            j += 1;
        }
        slots[i] = Some(current);
    }
    slots.into_iter().flatten().collect()
}

fn can_stitch(left: &Candidate, right: &Candidate) -> bool {
    let (a, b) = (&left.tx, &right.tx);
    let (left_window, right_window) = match (&left.window, &right.window) {
        (Some(l), Some(r)) => (l, r),
        _ => return false,
    };
    if left.last_chunk == right.first_chunk
        || left.same_origin(right)
        || a.chrom() != b.chrom()
        || a.strand() != b.strand()
        // the chunks must overlap, with `right` being the right neighbour
        || right_window.start() >= left_window.end()
        || right_window.start() <= left_window.start()
    {
        return false;
    }
    if !(left.truncated_right() || right.truncated_left()) {
        return false;
    }
    if !(a.tx_start() < b.tx_start() && a.tx_end() < b.tx_end() && b.tx_start() <= a.tx_end()) {
        return false;
    }
    if introns_within(a, b.tx_start(), a.tx_end()) != introns_within(b, b.tx_start(), a.tx_end()) {
        return false;
    }
    match (a.cds_start(), a.cds_end(), b.cds_start(), b.cds_end()) {
        (None, None, None, None) => true,
        (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => {
            if b_start < a_start || b_start > a_end || b_end < a_end {
                return false;
            }
            // the CDS of `left` must not end with a stop codon in the middle of `right`'s CDS
            if a_end < b_end && a.cds_end_stat() == CdsStat::Complete {
                return false;
            }
            if a_start < b_start && b.cds_start_stat() == CdsStat::Complete {
                return false;
            }
            let offset: u32 = a
                .cds_segments()
                .iter()
                .map(|seg| overlap_len(*seg, (a_start, b_start - 1)))
                .sum();
            offset % 3 == 0
        }
        _ => false,
    }
}

fn stitched(left: Candidate, right: Candidate) -> Candidate {
    let (a, b) = (&left.tx, &right.tx);
    let mut segments: Vec<(u32, u32)> = a
        .exon_segments()
        .into_iter()
        .chain(b.exon_segments())
        .collect();
    segments.sort_unstable();
    let segments = merge(&segments);

    let cds = match (a.cds_start(), b.cds_end()) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };
    // frame of the 5'-most coding exon
    let first_frame = match a.strand() {
        Strand::Minus => b.exons().iter().rev().find(|ex| ex.is_coding()).and_then(|ex| ex.frame()),
        _ => a.exons().iter().find(|ex| ex.is_coding()).and_then(|ex| ex.frame()),
    };

    let mut tx = a.clone();
    *tx.cds_end_stat_mut() = b.cds_end_stat();
    tx.exons_mut().clear();

    let mut frame_set = false;
    let coding_exons: Vec<usize> = (0..segments.len())
        .filter(|idx| {
            cds.map_or(false, |(start, end)| {
                start <= segments[*idx].1 && end >= segments[*idx].0
            })
        })
        .collect();
    let five_prime = match a.strand() {
        Strand::Minus => coding_exons.last().copied(),
        _ => coding_exons.first().copied(),
    };
    for (idx, (start, end)) in segments.into_iter().enumerate() {
        let mut exon = Exon::new(start, end, None, None);
        if let Some((cds_start, cds_end)) = cds {
            if cds_start <= end && cds_end >= start {
                *exon.cds_start_mut() = Some(cds_start.max(start));
                *exon.cds_end_mut() = Some(cds_end.min(end));
                if Some(idx) == five_prime && !frame_set {
                    *exon.frame_mut() = first_frame;
                    frame_set = true;
                }
            }
        }
        tx.push_exon(exon);
    }

    Candidate {
        first_chunk: left.first_chunk,
        last_chunk: right.last_chunk,
        window: match (&left.window, &right.window) {
            (Some(l), Some(r)) => Some(l.extended_to(r.end())),
            _ => None,
        },
        gene_key: left.gene_key,
        tx,
    }
}

#[cfg(test)]
mod test_joiner {
    use super::*;
    use crate::models::{GenomeId, GenomicInterval};
    use crate::tests::gtf::augustus_transcript;

    fn raw(start: u64, length: u64, content: String) -> RawFeatureSet {
        RawFeatureSet::new(
            GenomeId::from("hg38"),
            GenomicInterval::new("chr1", start, length).unwrap(),
            content,
        )
    }

    #[test]
    fn test_overlap_duplicate() {
        let gene = augustus_transcript("chr1", "g2.t1", "g2", &[(310, 330), (350, 380)], Some((312, 377)), true, true);
        let sets = vec![raw(0, 400, gene.clone()), raw(300, 400, gene)];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();
        assert_eq!(transcripts.len(), 1);
        assert_eq!(transcripts[0].name(), "jg1.t1");
        assert_eq!(transcripts[0].cds_segments(), vec![(312, 330), (350, 377)]);
    }

    #[test]
    fn test_truncated_copy_is_dropped() {
        // chunk 1 ends at 400, the transcript is cut after its second exon
        let truncated = augustus_transcript("chr1", "g1.t1", "g1", &[(320, 340), (360, 400)], None, false, false);
        let full = augustus_transcript("chr1", "g5.t1", "g5", &[(320, 340), (360, 420), (450, 480)], None, false, false);
        let sets = vec![raw(0, 400, truncated), raw(300, 400, full)];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();
        assert_eq!(transcripts.len(), 1);
        assert_eq!(transcripts[0].exon_segments(), vec![(320, 340), (360, 420), (450, 480)]);
    }

    #[test]
    fn test_nested_transcript_of_other_chunk_is_dropped() {
        // different intron chains, only the spans are nested
        let nested = augustus_transcript("chr1", "g4.t1", "g4", &[(340, 360), (380, 395)], None, false, false);
        let outer = augustus_transcript("chr1", "g1.t1", "g1", &[(310, 330), (500, 520)], None, false, false);
        let sets = vec![raw(0, 400, nested), raw(300, 400, outer)];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();
        assert_eq!(transcripts.len(), 1);
        assert_eq!(transcripts[0].exon_segments(), vec![(310, 330), (500, 520)]);
    }

    #[test]
    fn test_nested_transcript_of_same_chunk_is_kept() {
        let content = format!(
            "{}{}",
            augustus_transcript("chr1", "g1.t1", "g1", &[(310, 330), (500, 520)], None, false, false),
            augustus_transcript("chr1", "g2.t1", "g2", &[(400, 420), (440, 460)], None, false, false)
        );
        let transcripts = NativeJoiner::new().join_transcripts(&[raw(0, 600, content)]).unwrap();
        assert_eq!(transcripts.len(), 2);
        assert_eq!(transcripts[0].gene(), "jg1");
        assert_eq!(transcripts[1].gene(), "jg2");
    }

    #[test]
    fn test_nested_transcript_on_other_strand_is_kept() {
        let outer = augustus_transcript("chr1", "g1.t1", "g1", &[(310, 330), (500, 520)], None, false, false);
        let nested = augustus_transcript("chr1", "g4.t1", "g4", &[(340, 360), (380, 395)], None, false, false)
            .replace("\t+\t", "\t-\t");
        let sets = vec![raw(0, 400, nested), raw(300, 400, outer)];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();
        assert_eq!(transcripts.len(), 2);
    }

    #[test]
    fn test_transcripts_on_aligned_genome_sequences() {
        // comparative mode: the chunk is chr1 of the reference, mm10 is predicted on its own chr5
        let mm10 = |start: u64, content: String| {
            RawFeatureSet::new(
                GenomeId::from("mm10"),
                GenomicInterval::new("chr1", start, 400).unwrap(),
                content,
            )
        };
        let shared = augustus_transcript("chr5", "g1.t1", "g1", &[(1310, 1330), (1350, 1380)], None, false, false);
        let nested = augustus_transcript("chr5", "g2.t1", "g2", &[(1315, 1325)], None, false, false);
        let other = augustus_transcript("chr5", "g3.t1", "g3", &[(1700, 1800)], None, false, false);
        let sets = vec![
            mm10(0, shared.clone()),
            mm10(300, format!("{}{}{}", shared, nested, other)),
        ];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();
        let spans: Vec<(&str, u32, u32)> = transcripts
            .iter()
            .map(|tx| (tx.chrom(), tx.tx_start(), tx.tx_end()))
            .collect();
        assert_eq!(spans, vec![("chr5", 1310, 1380), ("chr5", 1700, 1800)]);
    }

    #[test]
    fn test_stitch_at_border() {
        // chunk 1: 0..400, chunk 2: 300..700
        // the CDS is cut at 400 in chunk 1 and at 301 in chunk 2
        let left = augustus_transcript("chr1", "g1.t1", "g1", &[(210, 230), (250, 330), (350, 400)], Some((213, 400)), true, false);
        let right = augustus_transcript("chr1", "g1.t1", "g1", &[(301, 330), (350, 420), (450, 580)], Some((301, 580)), false, true);
        let sets = vec![raw(0, 400, left), raw(300, 400, right)];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();

        assert_eq!(transcripts.len(), 1);
        let tx = &transcripts[0];
        assert_eq!(tx.exon_segments(), vec![(210, 230), (250, 330), (350, 420), (450, 580)]);
        assert_eq!(tx.cds_start(), Some(213));
        assert_eq!(tx.cds_end(), Some(580));
        assert_eq!(tx.cds_start_stat(), CdsStat::Complete);
        assert_eq!(tx.cds_end_stat(), CdsStat::Complete);
    }

    #[test]
    fn test_no_stitch_with_different_introns() {
        let left = augustus_transcript("chr1", "g1.t1", "g1", &[(210, 230), (250, 330), (350, 400)], None, false, false);
        let right = augustus_transcript("chr1", "g1.t1", "g1", &[(301, 320), (360, 420), (450, 580)], None, false, false);
        let sets = vec![raw(0, 400, left), raw(300, 400, right)];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();
        assert_eq!(transcripts.len(), 2);
    }

    #[test]
    fn test_no_stitch_with_frame_shift() {
        // 71 coding bases of the left CDS lie before the start of the right CDS
        let left = augustus_transcript("chr1", "g1.t1", "g1", &[(210, 230), (250, 330), (350, 400)], Some((213, 400)), true, false);
        let right = augustus_transcript("chr1", "g1.t1", "g1", &[(301, 330), (350, 420), (450, 580)], Some((352, 580)), false, true);
        let sets = vec![raw(0, 400, left), raw(300, 400, right)];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();
        assert_eq!(transcripts.len(), 2);
    }

    #[test]
    fn test_stitch_across_three_chunks() {
        let first = augustus_transcript("chr1", "a.t1", "a", &[(250, 320), (340, 400)], None, false, false);
        let second = augustus_transcript("chr1", "b.t1", "b", &[(301, 320), (340, 650), (680, 700)], None, false, false);
        let third = augustus_transcript("chr1", "c.t1", "c", &[(601, 650), (680, 750), (800, 850)], None, false, false);
        let sets = vec![raw(0, 400, first), raw(300, 400, second), raw(600, 400, third)];
        let transcripts = NativeJoiner::new().join_transcripts(&sets).unwrap();
        assert_eq!(transcripts.len(), 1);
        assert_eq!(
            transcripts[0].exon_segments(),
            vec![(250, 320), (340, 650), (680, 750), (800, 850)]
        );
    }

    #[test]
    fn test_gene_numbering() {
        let content = format!(
            "{}{}",
            augustus_transcript("chr1", "g1.t1", "g1", &[(10, 50)], None, false, false),
            augustus_transcript("chr1", "g1.t2", "g1", &[(20, 60)], None, false, false)
        );
        let other = augustus_transcript("chr1", "g1.t1", "g1", &[(900, 950)], None, false, false);
        let sets = vec![raw(0, 400, content), raw(700, 400, other)];
        let names: Vec<(String, String)> = NativeJoiner::new()
            .join_transcripts(&sets)
            .unwrap()
            .iter()
            .map(|tx| (tx.gene().to_string(), tx.name().to_string()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("jg1".to_string(), "jg1.t1".to_string()),
                ("jg1".to_string(), "jg1.t2".to_string()),
                ("jg2".to_string(), "jg2.t1".to_string()),
            ]
        );
    }

    #[test]
    fn test_deterministic_output() {
        let sets = vec![
            raw(0, 400, augustus_transcript("chr1", "g1.t1", "g1", &[(210, 230), (250, 330), (350, 400)], Some((213, 400)), true, false)),
            raw(300, 400, augustus_transcript("chr1", "g1.t1", "g1", &[(301, 330), (350, 420), (450, 580)], Some((301, 580)), false, true)),
        ];
        let joiner = NativeJoiner::new();
        let first = joiner.join(&sets, Path::new(".")).unwrap();
        let second = joiner.join(&sets, Path::new(".")).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\tAUGUSTUS\ttss\t"));
        assert!(first.contains("\tAUGUSTUS\tstop_codon\t578\t580\t"));
    }

    #[test]
    fn test_joingenes() {
        let dir = tempfile::tempdir().unwrap();
        let binary = crate::predict::test_utils::script(
            dir.path(),
            "joingenes",
            "while read f; do cat \"$f\"; done < \"$2\"",
        );
        let sets = vec![raw(0, 400, "a\n".to_string()), raw(300, 400, "b\n".to_string())];
        let joined = Joingenes::new(binary).join(&sets, dir.path()).unwrap();
        assert_eq!(joined, "a\nb\n");
    }

    #[test]
    fn test_failing_joingenes() {
        let dir = tempfile::tempdir().unwrap();
        let binary = crate::predict::test_utils::script(dir.path(), "joingenes", "exit 1");
        let sets = vec![raw(0, 400, "a\n".to_string())];
        assert!(Joingenes::new(binary).join(&sets, dir.path()).is_err());
    }
}
