use core::str::FromStr;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::errors::{BuildTranscriptError, GeneChunkError};

/// Genomic segments of a transcript as `(chrom, start, end)`,
/// 1-based and inclusive, sorted by genomic position
pub type CoordinateVector<'a> = Vec<(&'a str, u32, u32)>;

/// Strand of a transcript or feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Plus,
    Minus,
    Unknown,
}

impl FromStr for Strand {
    type Err = GeneChunkError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            "." | "?" => Ok(Strand::Unknown),
            _ => Err(GeneChunkError::new(format!("invalid strand {}", s))),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Strand::Plus => "+",
                Strand::Minus => "-",
                Strand::Unknown => ".",
            }
        )
    }
}

/// Completeness of the CDS start or end, as used by GenePredExt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CdsStat {
    None,
    Unknown,
    Incomplete,
    Complete,
}

impl FromStr for CdsStat {
    type Err = GeneChunkError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(CdsStat::None),
            "unk" => Ok(CdsStat::Unknown),
            "incmpl" => Ok(CdsStat::Incomplete),
            "cmpl" => Ok(CdsStat::Complete),
            _ => Err(GeneChunkError::new(format!("invalid cds stat {}", s))),
        }
    }
}

impl fmt::Display for CdsStat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CdsStat::None => "none",
                CdsStat::Unknown => "unk",
                CdsStat::Incomplete => "incmpl",
                CdsStat::Complete => "cmpl",
            }
        )
    }
}

/// A single exon, optionally with a coding part
///
/// All coordinates are 1-based and inclusive. The `frame` is the GTF
/// frame of the coding part, if it was known when the exon was read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exon {
    start: u32,
    end: u32,
    cds_start: Option<u32>,
    cds_end: Option<u32>,
    frame: Option<u8>,
}

impl Exon {
    pub fn new(start: u32, end: u32, cds_start: Option<u32>, cds_end: Option<u32>) -> Self {
        Exon {
            start,
            end,
            cds_start,
            cds_end,
            frame: None,
        }
    }

    pub fn frame(&self) -> Option<u8> {
        self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Option<u8> {
        &mut self.frame
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn start_mut(&mut self) -> &mut u32 {
        &mut self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn end_mut(&mut self) -> &mut u32 {
        &mut self.end
    }

    pub fn cds_start(&self) -> Option<u32> {
        self.cds_start
    }

    pub fn cds_start_mut(&mut self) -> &mut Option<u32> {
        &mut self.cds_start
    }

    pub fn cds_end(&self) -> Option<u32> {
        self.cds_end
    }

    pub fn cds_end_mut(&mut self) -> &mut Option<u32> {
        &mut self.cds_end
    }

    /// Returns true if the exon has a coding part
    pub fn is_coding(&self) -> bool {
        self.cds_start.is_some() && self.cds_end.is_some()
    }

    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// A transcript with its exons and CDS
///
/// Exons are always kept sorted by their genomic start position,
/// independent of the strand.
///
/// # Examples
///
/// ```rust
/// use genechunk::models::{CdsStat, Exon, Strand, TranscriptBuilder};
///
/// let mut tx = TranscriptBuilder::new()
///     .name("g1.t1")
///     .gene("g1")
///     .chrom("chr1")
///     .strand(Strand::Plus)
///     .cds_start_stat(CdsStat::Complete)
///     .cds_end_stat(CdsStat::Complete)
///     .build()
///     .unwrap();
/// tx.push_exon(Exon::new(31, 40, Some(31), Some(35)));
/// tx.push_exon(Exon::new(11, 20, Some(15), Some(20)));
///
/// assert_eq!(tx.tx_start(), 11);
/// assert_eq!(tx.tx_end(), 40);
/// assert_eq!(tx.cds_start(), Some(15));
/// assert_eq!(tx.cds_end(), Some(35));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Transcript {
    name: String,
    chrom: String,
    strand: Strand,
    gene: String,
    cds_start_stat: CdsStat,
    cds_end_stat: CdsStat,
    exons: Vec<Exon>,
    score: Option<f32>,
}

impl Transcript {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into()
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn strand_mut(&mut self) -> &mut Strand {
        &mut self.strand
    }

    /// Returns true if the transcript is on the plus strand
    pub fn forward(&self) -> bool {
        self.strand == Strand::Plus
    }

    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn set_gene<S: Into<String>>(&mut self, gene: S) {
        self.gene = gene.into()
    }

    pub fn score(&self) -> Option<f32> {
        self.score
    }

    /// Completeness of the leftmost CDS boundary
    ///
    /// As in GenePredExt, this refers to the genomic start of the CDS,
    /// i.e. the stop codon of transcripts on the minus strand.
    pub fn cds_start_stat(&self) -> CdsStat {
        self.cds_start_stat
    }

    pub fn cds_start_stat_mut(&mut self) -> &mut CdsStat {
        &mut self.cds_start_stat
    }

    /// Completeness of the rightmost CDS boundary
    pub fn cds_end_stat(&self) -> CdsStat {
        self.cds_end_stat
    }

    pub fn cds_end_stat_mut(&mut self) -> &mut CdsStat {
        &mut self.cds_end_stat
    }

    pub fn exons(&self) -> &Vec<Exon> {
        &self.exons
    }

    pub fn exons_mut(&mut self) -> &mut Vec<Exon> {
        &mut self.exons
    }

    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    /// Adds an exon and keeps the exon list sorted
    pub fn push_exon(&mut self, exon: Exon) {
        self.exons.push(exon);
        self.exons.sort_by_key(|ex| ex.start());
    }

    /// Moves all exons from `exons` into the transcript
    pub fn append_exons(&mut self, exons: &mut Vec<Exon>) {
        self.exons.append(exons);
        self.exons.sort_by_key(|ex| ex.start());
    }

    /// Leftmost genomic position of the transcript
    ///
    /// Returns 0 for transcripts without exons
    pub fn tx_start(&self) -> u32 {
        self.exons.first().map(|ex| ex.start()).unwrap_or(0)
    }

    /// Rightmost genomic position of the transcript
    ///
    /// Returns 0 for transcripts without exons
    pub fn tx_end(&self) -> u32 {
        self.exons.iter().map(|ex| ex.end()).max().unwrap_or(0)
    }

    /// Genomic span of the transcript as `(start, end)`
    pub fn span(&self) -> (u32, u32) {
        (self.tx_start(), self.tx_end())
    }

    /// Number of genomic positions covered by the transcript span
    pub fn span_len(&self) -> u32 {
        if self.exons.is_empty() {
            return 0;
        }
        self.tx_end() - self.tx_start() + 1
    }

    pub fn is_coding(&self) -> bool {
        self.exons.iter().any(|ex| ex.is_coding())
    }

    /// Leftmost genomic position of the CDS (including the stop codon)
    pub fn cds_start(&self) -> Option<u32> {
        self.exons.iter().filter_map(|ex| ex.cds_start()).min()
    }

    /// Rightmost genomic position of the CDS (including the stop codon)
    pub fn cds_end(&self) -> Option<u32> {
        self.exons.iter().filter_map(|ex| ex.cds_end()).max()
    }

    /// Total length of the CDS, including the stop codon
    pub fn cds_len(&self) -> u32 {
        self.cds_segments().iter().map(|seg| seg.1 - seg.0 + 1).sum()
    }

    /// Exonic segments as `(start, end)`, sorted by genomic position
    pub fn exon_segments(&self) -> Vec<(u32, u32)> {
        self.exons.iter().map(|ex| (ex.start(), ex.end())).collect()
    }

    /// Coding segments as `(start, end)`, sorted by genomic position
    pub fn cds_segments(&self) -> Vec<(u32, u32)> {
        self.exons
            .iter()
            .filter_map(|ex| match (ex.cds_start(), ex.cds_end()) {
                (Some(start), Some(end)) => Some((start, end)),
                _ => None,
            })
            .collect()
    }

    /// Introns as `(start, end)`, sorted by genomic position
    pub fn introns(&self) -> Vec<(u32, u32)> {
        self.exons
            .windows(2)
            .map(|pair| (pair[0].end() + 1, pair[1].start() - 1))
            .collect()
    }

    pub fn exon_coordinates(&self) -> CoordinateVector {
        self.exons
            .iter()
            .map(|ex| (self.chrom(), ex.start(), ex.end()))
            .collect()
    }

    pub fn cds_coordinates(&self) -> CoordinateVector {
        self.cds_segments()
            .into_iter()
            .map(|seg| (self.chrom(), seg.0, seg.1))
            .collect()
    }

    /// Segments of the 5'UTR, sorted by genomic position
    pub fn utr5_segments(&self) -> Vec<(u32, u32)> {
        match self.strand {
            Strand::Minus => self.utr_right(),
            _ => self.utr_left(),
        }
    }

    /// Segments of the 3'UTR, sorted by genomic position
    pub fn utr3_segments(&self) -> Vec<(u32, u32)> {
        match self.strand {
            Strand::Minus => self.utr_left(),
            _ => self.utr_right(),
        }
    }

    fn utr_left(&self) -> Vec<(u32, u32)> {
        let cds_start = match self.cds_start() {
            Some(pos) => pos,
            None => return vec![],
        };
        self.exons
            .iter()
            .filter(|ex| ex.start() < cds_start)
            .map(|ex| (ex.start(), ex.end().min(cds_start - 1)))
            .collect()
    }

    fn utr_right(&self) -> Vec<(u32, u32)> {
        let cds_end = match self.cds_end() {
            Some(pos) => pos,
            None => return vec![],
        };
        self.exons
            .iter()
            .filter(|ex| ex.end() > cds_end)
            .map(|ex| (ex.start().max(cds_end + 1), ex.end()))
            .collect()
    }

    /// Genomic segments of the start codon
    ///
    /// Returns an empty vector for non-coding transcripts. The codon
    /// can be split over two or three segments if it spans an intron.
    pub fn start_codon(&self) -> Vec<(u32, u32)> {
        match self.strand {
            Strand::Minus => take_right(&self.cds_segments(), 3).0,
            _ => take_left(&self.cds_segments(), 3).0,
        }
    }

    /// Genomic segments of the stop codon
    ///
    /// Returns an empty vector for non-coding transcripts.
    pub fn stop_codon(&self) -> Vec<(u32, u32)> {
        match self.strand {
            Strand::Minus => take_left(&self.cds_segments(), 3).0,
            _ => take_right(&self.cds_segments(), 3).0,
        }
    }

    /// Returns true if the CDS boundary with the start codon is complete
    pub fn has_complete_start(&self) -> bool {
        match self.strand {
            Strand::Minus => self.cds_end_stat == CdsStat::Complete,
            _ => self.cds_start_stat == CdsStat::Complete,
        }
    }

    /// Returns true if the CDS boundary with the stop codon is complete
    pub fn has_complete_stop(&self) -> bool {
        match self.strand {
            Strand::Minus => self.cds_start_stat == CdsStat::Complete,
            _ => self.cds_end_stat == CdsStat::Complete,
        }
    }

    /// Coding segments without the stop codon, if the stop codon is complete
    ///
    /// This is the CDS as it is written in GTF files.
    pub fn cds_segments_without_stop(&self) -> Vec<(u32, u32)> {
        let segments = self.cds_segments();
        if !self.has_complete_stop() {
            return segments;
        }
        match self.strand {
            Strand::Minus => take_left(&segments, 3).1,
            _ => take_right(&segments, 3).1,
        }
    }

    /// GTF frame of every exon's coding part, in exon order
    ///
    /// The frame of the 5'-most coding exon is taken from the exon itself
    /// (defaulting to 0), all further frames follow from the CDS lengths.
    /// Non-coding exons have no frame.
    pub fn cds_frames(&self) -> Vec<Option<u8>> {
        let mut frames = vec![None; self.exons.len()];
        let order: Vec<usize> = match self.strand {
            Strand::Minus => (0..self.exons.len()).rev().collect(),
            _ => (0..self.exons.len()).collect(),
        };
        let mut coding: Option<u32> = None;
        for idx in order {
            let exon = &self.exons[idx];
            if let (Some(start), Some(end)) = (exon.cds_start(), exon.cds_end()) {
                let offset = match coding {
                    Some(offset) => offset,
                    None => exon.frame().map(|f| (3 - f as u32) % 3).unwrap_or(0),
                };
                frames[idx] = Some(((3 - offset % 3) % 3) as u8);
                coding = Some(offset + end - start + 1);
            }
        }
        frames
    }
}

/// GTF frames of consecutive segments of a codon or CDS
///
/// `segments` must be sorted by genomic position; the frames are
/// returned in the same order.
pub(crate) fn segment_frames(segments: &[(u32, u32)], strand: Strand) -> Vec<u8> {
    let mut frames = vec![0; segments.len()];
    let order: Vec<usize> = match strand {
        Strand::Minus => (0..segments.len()).rev().collect(),
        _ => (0..segments.len()).collect(),
    };
    let mut offset = 0;
    for idx in order {
        frames[idx] = ((3 - offset % 3) % 3) as u8;
        offset += segments[idx].1 - segments[idx].0 + 1;
    }
    frames
}

/// Splits off the leftmost `n` positions of sorted segments
///
/// Returns `(taken, remaining)`, both sorted by genomic position
fn take_left(segments: &[(u32, u32)], n: u32) -> (Vec<(u32, u32)>, Vec<(u32, u32)>) {
    let mut taken = Vec::new();
    let mut remaining = Vec::new();
    let mut left = n;
    for seg in segments {
        let len = seg.1 - seg.0 + 1;
        if left == 0 {
            remaining.push(*seg);
        } else if len <= left {
            taken.push(*seg);
            left -= len;
        } else {
            taken.push((seg.0, seg.0 + left - 1));
            remaining.push((seg.0 + left, seg.1));
            left = 0;
        }
    }
    (taken, remaining)
}

/// Splits off the rightmost `n` positions of sorted segments
///
/// Returns `(taken, remaining)`, both sorted by genomic position
fn take_right(segments: &[(u32, u32)], n: u32) -> (Vec<(u32, u32)>, Vec<(u32, u32)>) {
    let mut taken = Vec::new();
    let mut remaining = Vec::new();
    let mut left = n;
    for seg in segments.iter().rev() {
        let len = seg.1 - seg.0 + 1;
        if left == 0 {
            remaining.push(*seg);
        } else if len <= left {
            taken.push(*seg);
            left -= len;
        } else {
            taken.push((seg.1 - left + 1, seg.1));
            remaining.push((seg.0, seg.1 - left));
            left = 0;
        }
    }
    taken.reverse();
    remaining.reverse();
    (taken, remaining)
}

/// Builder for [`Transcript`]s
///
/// `name` and `chrom` are mandatory, all other values have defaults.
pub struct TranscriptBuilder {
    name: Option<String>,
    chrom: Option<String>,
    strand: Strand,
    gene: Option<String>,
    cds_start_stat: CdsStat,
    cds_end_stat: CdsStat,
    score: Option<f32>,
}

impl Default for TranscriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        TranscriptBuilder {
            name: None,
            chrom: None,
            strand: Strand::Unknown,
            gene: None,
            cds_start_stat: CdsStat::None,
            cds_end_stat: CdsStat::None,
            score: None,
        }
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn chrom<S: Into<String>>(mut self, chrom: S) -> Self {
        self.chrom = Some(chrom.into());
        self
    }

    pub fn strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    pub fn gene<S: Into<String>>(mut self, gene: S) -> Self {
        self.gene = Some(gene.into());
        self
    }

    pub fn cds_start_stat(mut self, stat: CdsStat) -> Self {
        self.cds_start_stat = stat;
        self
    }

    pub fn cds_end_stat(mut self, stat: CdsStat) -> Self {
        self.cds_end_stat = stat;
        self
    }

    pub fn score(mut self, score: Option<f32>) -> Self {
        self.score = score;
        self
    }

    pub fn build(self) -> Result<Transcript, BuildTranscriptError> {
        let name = match self.name {
            Some(name) => name,
            None => return Err(BuildTranscriptError::new("transcript name is missing")),
        };
        let chrom = match self.chrom {
            Some(chrom) => chrom,
            None => {
                return Err(BuildTranscriptError::new(format!(
                    "chromosome of transcript {} is missing",
                    name
                )))
            }
        };
        Ok(Transcript {
            gene: self.gene.unwrap_or_else(|| name.clone()),
            name,
            chrom,
            strand: self.strand,
            cds_start_stat: self.cds_start_stat,
            cds_end_stat: self.cds_end_stat,
            exons: Vec::new(),
            score: self.score,
        })
    }
}

#[cfg(test)]
mod test_transcript {
    use super::*;
    use crate::tests::transcripts::{minus_transcript, standard_transcript};

    #[test]
    fn test_coordinates() {
        let tx = standard_transcript();
        assert_eq!(tx.tx_start(), 11);
        assert_eq!(tx.tx_end(), 55);
        assert_eq!(tx.cds_start(), Some(22));
        assert_eq!(tx.cds_end(), Some(43));
        assert_eq!(tx.cds_segments(), vec![(22, 25), (31, 35), (41, 43)]);
        assert_eq!(tx.introns().len(), 4);
        assert_eq!(tx.introns()[0], (16, 20));
    }

    #[test]
    fn test_utr() {
        let tx = standard_transcript();
        assert_eq!(tx.utr5_segments(), vec![(11, 15), (21, 21)]);
        assert_eq!(tx.utr3_segments(), vec![(44, 45), (51, 55)]);

        let tx = minus_transcript();
        assert_eq!(tx.utr3_segments(), vec![(11, 15), (21, 21)]);
        assert_eq!(tx.utr5_segments(), vec![(44, 45), (51, 55)]);
    }

    #[test]
    fn test_codons_forward() {
        let tx = standard_transcript();
        assert_eq!(tx.start_codon(), vec![(22, 24)]);
        assert_eq!(tx.stop_codon(), vec![(41, 43)]);
        assert_eq!(tx.cds_segments_without_stop(), vec![(22, 25), (31, 35)]);
    }

    #[test]
    fn test_codons_reverse() {
        let tx = minus_transcript();
        assert_eq!(tx.start_codon(), vec![(41, 43)]);
        assert_eq!(tx.stop_codon(), vec![(22, 24)]);
        assert_eq!(
            tx.cds_segments_without_stop(),
            vec![(25, 25), (31, 35), (41, 43)]
        );
    }

    #[test]
    fn test_split_codon() {
        let (taken, remaining) = take_left(&[(10, 11), (20, 30)], 3);
        assert_eq!(taken, vec![(10, 11), (20, 20)]);
        assert_eq!(remaining, vec![(21, 30)]);

        let (taken, remaining) = take_right(&[(10, 20), (30, 31)], 3);
        assert_eq!(taken, vec![(20, 20), (30, 31)]);
        assert_eq!(remaining, vec![(10, 19)]);
    }

    #[test]
    fn test_incomplete_end_keeps_cds() {
        let mut tx = standard_transcript();
        *tx.cds_end_stat_mut() = CdsStat::Incomplete;
        assert_eq!(tx.cds_segments_without_stop(), tx.cds_segments());
    }

    #[test]
    fn test_cds_frames() {
        let tx = standard_transcript();
        // 4 coding bases in exon 2, 5 in exon 3
        assert_eq!(tx.cds_frames(), vec![None, Some(0), Some(2), Some(0), None]);

        let tx = minus_transcript();
        // 3 coding bases in exon 4, 5 in exon 3
        assert_eq!(tx.cds_frames(), vec![None, Some(1), Some(0), Some(0), None]);
    }

    #[test]
    fn test_cds_frames_partial_start() {
        let mut tx = standard_transcript();
        *tx.exons_mut()[1].frame_mut() = Some(1);
        assert_eq!(tx.cds_frames()[1], Some(1));
        // 2 + 4 = 6 bases of the first codons before exon 3
        assert_eq!(tx.cds_frames()[2], Some(0));
    }

    #[test]
    fn test_segment_frames() {
        assert_eq!(segment_frames(&[(10, 11), (20, 20)], Strand::Plus), vec![0, 1]);
        assert_eq!(segment_frames(&[(10, 11), (20, 20)], Strand::Minus), vec![2, 0]);
    }

    #[test]
    fn test_builder_requires_name() {
        assert!(TranscriptBuilder::new().chrom("chr1").build().is_err());
        let tx = TranscriptBuilder::new()
            .name("tx")
            .chrom("chr1")
            .build()
            .unwrap();
        assert_eq!(tx.gene(), "tx");
        assert!(!tx.is_coding());
        assert_eq!(tx.span_len(), 0);
    }

    #[test]
    fn test_strand_parsing() {
        assert_eq!(Strand::from_str("+").unwrap(), Strand::Plus);
        assert_eq!(Strand::from_str("-").unwrap(), Strand::Minus);
        assert!(Strand::from_str("x").is_err());
        assert_eq!(CdsStat::from_str("cmpl").unwrap(), CdsStat::Complete);
        assert_eq!(CdsStat::Incomplete.to_string(), "incmpl");
    }
}
