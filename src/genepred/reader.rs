use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::models::{CdsStat, Exon, Strand, Transcript, TranscriptBuilder, TranscriptRead, Transcripts};
use crate::utils::errors::{ParseGenePredError, ReadWriteError};

/// Parses GenePred and GenePredExt data
///
/// Plain GenePred lines (10 columns) are accepted as well. Their CDS
/// boundaries are marked as [`CdsStat::Unknown`].
///
/// # Examples
///
/// ```rust
/// use genechunk::genepred::Reader;
/// use genechunk::models::TranscriptRead;
///
/// let line = "g1.t1\tchr1\t-\t99\t300\t149\t250\t2\t99,199,\t150,300,\t0\tg1\tcmpl\tincmpl\t2,0,\n";
/// let transcripts = Reader::new(line.as_bytes()).transcripts().unwrap();
/// let tx = &transcripts.as_vec()[0];
/// assert_eq!(tx.tx_start(), 100);
/// assert_eq!(tx.cds_start(), Some(150));
/// assert_eq!(tx.exons()[0].frame(), Some(1));
/// ```
pub struct Reader<R> {
    inner: BufReader<R>,
}

impl Reader<File> {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::open(path.as_ref()) {
            Ok(file) => Ok(Self::new(file)),
            Err(err) => Err(ReadWriteError::new(err)),
        }
    }
}

impl<R: std::io::Read> Reader<R> {
    pub fn new(reader: R) -> Self {
        Reader {
            inner: BufReader::new(reader),
        }
    }

    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Reader {
            inner: BufReader::with_capacity(capacity, reader),
        }
    }

    /// Returns the next transcript, or `None` at the end of the input
    pub fn line(&mut self) -> Option<Result<Transcript, ParseGenePredError>> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.inner.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    if line.trim().is_empty() || line.starts_with('#') {
                        continue;
                    }
                    return Some(parse_line(line.trim_end()));
                }
                Err(err) => return Some(Err(ParseGenePredError::new(err))),
            }
        }
    }
}

impl<R: std::io::Read> TranscriptRead for Reader<R> {
    fn transcripts(&mut self) -> Result<Transcripts, ReadWriteError> {
        let mut res = Transcripts::new();
        while let Some(line) = self.line() {
            res.push(line?);
        }
        Ok(res)
    }
}

fn parse_line(line: &str) -> Result<Transcript, ParseGenePredError> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 10 {
        return Err(ParseGenePredError::new(format!(
            "expected at least 10 columns, found {}: {}",
            cols.len(),
            line
        )));
    }

    let strand = Strand::from_str(cols[2])
        .map_err(|_| ParseGenePredError::new(format!("invalid strand {}", cols[2])))?;
    let cds_start = number(cols[5])?;
    let cds_end = number(cols[6])?;
    let exon_count = number(cols[7])? as usize;
    let starts = numbers(cols[8])?;
    let ends = numbers(cols[9])?;
    if starts.len() != exon_count || ends.len() != exon_count {
        return Err(ParseGenePredError::new(format!(
            "{}: exon count {} does not match the exon coordinates",
            cols[0], exon_count
        )));
    }

    let extended = cols.len() >= 15;
    let coding = cds_start < cds_end;
    let (start_stat, end_stat) = match (extended, coding) {
        (_, false) => (CdsStat::None, CdsStat::None),
        (true, true) => (stat(cols[12])?, stat(cols[13])?),
        (false, true) => (CdsStat::Unknown, CdsStat::Unknown),
    };
    let frames: Vec<Option<u8>> = if extended {
        cols[14]
            .split(',')
            .filter(|f| !f.is_empty())
            .map(|f| match f.parse::<i8>() {
                Ok(-1) => Ok(None),
                // GenePred codon phase => GTF frame
                Ok(phase @ 0..=2) => Ok(Some(((3 - phase) % 3) as u8)),
                _ => Err(ParseGenePredError::new(format!("invalid exon frame {}", f))),
            })
            .collect::<Result<_, _>>()?
    } else {
        vec![None; exon_count]
    };

    let mut builder = TranscriptBuilder::new()
        .name(cols[0])
        .chrom(cols[1])
        .strand(strand)
        .cds_start_stat(start_stat)
        .cds_end_stat(end_stat);
    if extended {
        builder = builder.gene(cols[11]);
        if let Ok(score) = cols[10].parse::<f32>() {
            builder = builder.score(Some(score));
        }
    }
    let mut tx = builder
        .build()
        .map_err(|err| ParseGenePredError::new(err.message))?;

    for (idx, (start, end)) in starts.into_iter().zip(ends).enumerate() {
        // 0-based half-open => 1-based closed
        let start = start + 1;
        let mut exon = Exon::new(start, end, None, None);
        if coding && cds_start < end && cds_end >= start {
            *exon.cds_start_mut() = Some((cds_start + 1).max(start));
            *exon.cds_end_mut() = Some(cds_end.min(end));
            *exon.frame_mut() = frames.get(idx).copied().flatten();
        }
        tx.push_exon(exon);
    }
    Ok(tx)
}

fn number(value: &str) -> Result<u32, ParseGenePredError> {
    value
        .parse::<u32>()
        .map_err(|_| ParseGenePredError::new(format!("invalid coordinate {}", value)))
}

fn numbers(value: &str) -> Result<Vec<u32>, ParseGenePredError> {
    value
        .split(',')
        .filter(|x| !x.is_empty())
        .map(number)
        .collect()
}

fn stat(value: &str) -> Result<CdsStat, ParseGenePredError> {
    CdsStat::from_str(value).map_err(|_| ParseGenePredError::new(format!("invalid cdsStat {}", value)))
}
