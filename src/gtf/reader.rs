use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::gtf::GtfRecord;
use crate::models::{CdsStat, Exon, Strand, TranscriptBuilder, TranscriptRead, Transcripts};
use crate::utils::errors::{ParseGtfError, ReadWriteError};
use crate::utils::merge;

/// Parses [`Transcript`](crate::models::Transcript)s from GTF data
///
/// Lines are grouped by their `transcript_id` attribute; lines without
/// one (e.g. AUGUSTUS `gene` and `transcript` lines) are ignored.
///
/// # Examples
///
/// ```rust
/// use genechunk::gtf::Reader;
/// use genechunk::models::TranscriptRead;
/// use genechunk::tests::gtf::STANDARD_GTF;
///
/// let transcripts = Reader::new(STANDARD_GTF.as_bytes()).transcripts().unwrap();
/// assert_eq!(transcripts.len(), 1);
/// assert_eq!(transcripts.as_vec()[0].cds_start(), Some(22));
/// ```
pub struct Reader<R> {
    inner: BufReader<R>,
}

impl Reader<File> {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::open(path.as_ref()) {
            Ok(file) => Ok(Self::new(file)),
            Err(err) => Err(ReadWriteError::new(format!(
                "unable to open {}: {}",
                path.as_ref().display(),
                err
            ))),
        }
    }
}

impl<R: std::io::Read> Reader<R> {
    pub fn new(reader: R) -> Self {
        Reader {
            inner: BufReader::new(reader),
        }
    }

    /// Reads all records, skipping empty lines and comments
    pub fn records(&mut self) -> Result<Vec<GtfRecord>, ReadWriteError> {
        let mut records = Vec::new();
        for line in (&mut self.inner).lines() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            records.push(line.parse::<GtfRecord>()?);
        }
        Ok(records)
    }
}

impl<R: std::io::Read> TranscriptRead for Reader<R> {
    fn transcripts(&mut self) -> Result<Transcripts, ReadWriteError> {
        let records = self.records()?;
        Ok(compose_transcripts(&records)?)
    }
}

/// Parses GTF content that is already in memory
pub fn parse_records(content: &str) -> Result<Vec<GtfRecord>, ParseGtfError> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.parse::<GtfRecord>())
        .collect()
}

/// Groups records into transcripts, in the order transcripts first appear
///
/// * Exons come from `exon` lines. Without any `exon` line, they are
///   derived from the coding, codon and UTR lines.
/// * The CDS spans all `CDS`, `start_codon` and `stop_codon` lines, so
///   the stop codon is part of the CDS.
/// * A CDS boundary is complete if the corresponding codon line exists.
pub fn compose_transcripts(records: &[GtfRecord]) -> Result<Transcripts, ParseGtfError> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&GtfRecord>> = HashMap::new();
    for record in records {
        let tx_id = match record.transcript_id() {
            Some(id) => id,
            None => {
                debug!("skipping {} line without transcript_id", record.feature());
                continue;
            }
        };
        groups
            .entry(tx_id)
            .or_insert_with(|| {
                order.push(tx_id);
                Vec::new()
            })
            .push(record);
    }

    let mut transcripts = Transcripts::with_capacity(order.len());
    for tx_id in order {
        let lines = &groups[tx_id];
        transcripts.push(compose_transcript(tx_id, lines)?);
    }
    Ok(transcripts)
}

fn compose_transcript(
    tx_id: &str,
    lines: &[&GtfRecord],
) -> Result<crate::models::Transcript, ParseGtfError> {
    let first = lines[0];
    if let Some(line) = lines
        .iter()
        .find(|l| l.seqname() != first.seqname() || l.strand() != first.strand())
    {
        return Err(ParseGtfError::new(format!(
            "transcript {} spans several sequences or strands ({}:{} and {}:{})",
            tx_id,
            first.seqname(),
            first.strand(),
            line.seqname(),
            line.strand()
        )));
    }
    let strand = first.strand();

    let mut exon_segments: Vec<(u32, u32)> = Vec::new();
    let mut other_segments: Vec<(u32, u32)> = Vec::new();
    let mut coding: Vec<(u32, u32, Option<u8>)> = Vec::new();
    let mut has_start_codon = false;
    let mut has_stop_codon = false;
    for line in lines {
        match line.feature() {
            "exon" => exon_segments.push((line.start(), line.end())),
            "CDS" => coding.push((line.start(), line.end(), line.frame())),
            "start_codon" => {
                has_start_codon = true;
                coding.push((line.start(), line.end(), None))
            }
            "stop_codon" => {
                has_stop_codon = true;
                coding.push((line.start(), line.end(), None))
            }
            "5UTR" | "3UTR" | "UTR" | "five_prime_utr" | "three_prime_utr" => {
                other_segments.push((line.start(), line.end()))
            }
            _ => {}
        }
    }

    if exon_segments.is_empty() {
        exon_segments = other_segments;
        exon_segments.extend(coding.iter().map(|c| (c.0, c.1)));
    }
    if exon_segments.is_empty() {
        return Err(ParseGtfError::new(format!(
            "transcript {} has no exonic features",
            tx_id
        )));
    }
    exon_segments.sort_unstable();
    let exon_segments = merge(&exon_segments);

    let cds_start = coding.iter().map(|c| c.0).min();
    let cds_end = coding.iter().map(|c| c.1).max();

    let (start_stat, end_stat) = match (cds_start, strand) {
        (None, _) => (CdsStat::None, CdsStat::None),
        (Some(_), Strand::Minus) => (complete(has_stop_codon), complete(has_start_codon)),
        (Some(_), _) => (complete(has_start_codon), complete(has_stop_codon)),
    };

    let mut tx = TranscriptBuilder::new()
        .name(tx_id)
        .gene(first.gene_id().unwrap_or(tx_id))
        .chrom(first.seqname())
        .strand(strand)
        .cds_start_stat(start_stat)
        .cds_end_stat(end_stat)
        .build()
        .map_err(|err| ParseGtfError::new(err.message))?;

    for (start, end) in exon_segments {
        let mut exon = Exon::new(start, end, None, None);
        if let (Some(cds_start), Some(cds_end)) = (cds_start, cds_end) {
            if cds_start <= end && cds_end >= start {
                *exon.cds_start_mut() = Some(cds_start.max(start));
                *exon.cds_end_mut() = Some(cds_end.min(end));
                *exon.frame_mut() = coding
                    .iter()
                    .find(|c| c.0 >= start && c.1 <= end && c.2.is_some())
                    .and_then(|c| c.2);
            }
        }
        tx.push_exon(exon);
    }
    Ok(tx)
}

fn complete(codon_present: bool) -> CdsStat {
    if codon_present {
        CdsStat::Complete
    } else {
        CdsStat::Incomplete
    }
}
