//! Extrinsic evidence (hints) for the single-genome predictor
//!
//! Hints are GFF lines (e.g. from RNA-seq or IsoSeq alignments) that guide
//! AUGUSTUS. Every chunk only receives the hints that lie completely inside
//! its window.
//!
//! # Examples
//!
//! ```rust
//! use genechunk::hints::{slice_hints, HintReader};
//!
//! let gff = "chr1\tb2h\tintron\t120\t180\t0\t+\t.\tmult=3\n\
//!            chr1\tb2h\tintron\t90\t180\t0\t+\t.\tmult=1\n\
//!            chr2\tb2h\tintron\t120\t180\t0\t+\t.\tmult=2\n";
//!
//! let hints: Vec<_> = HintReader::new(gff.as_bytes())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! let subset: Vec<_> = slice_hints(&hints, "chr1", 100, 200).collect();
//! assert_eq!(subset.len(), 1);
//! assert!(subset[0].line().ends_with("mult=3"));
//! ```
use std::borrow::Borrow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::models::GenomicInterval;
use crate::utils::errors::ReadWriteError;

/// A single hint line
///
/// Only the columns needed for slicing are parsed; the full line is kept
/// so that written subsets are identical to the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintRecord {
    seq_id: String,
    start: u64,
    end: u64,
    line: String,
}

impl HintRecord {
    /// Parses a GFF line, returns `None` for lines that are not valid hints
    pub fn parse(line: &str) -> Option<HintRecord> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 8 {
            return None;
        }
        let start = cols[3].parse::<u64>().ok()?;
        let end = cols[4].parse::<u64>().ok()?;
        Some(HintRecord {
            seq_id: cols[0].to_string(),
            start,
            end,
            line: line.to_string(),
        })
    }

    pub fn seq_id(&self) -> &str {
        &self.seq_id
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// The unmodified GFF line, without line terminator
    pub fn line(&self) -> &str {
        &self.line
    }

    /// True if the hint lies on `seq_id`, between `start` and `stop`
    pub fn is_within(&self, seq_id: &str, start: u64, stop: u64) -> bool {
        self.seq_id == seq_id && self.start >= start && self.end <= stop
    }
}

/// Lazily reads [`HintRecord`]s from GFF
///
/// Empty lines, comments and malformed lines are skipped.
pub struct HintReader<R> {
    inner: BufReader<R>,
    buffer: String,
}

impl HintReader<File> {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::open(path.as_ref()) {
            Ok(file) => Ok(Self::new(file)),
            Err(err) => Err(ReadWriteError::new(format!(
                "unable to open hints {}: {}",
                path.as_ref().display(),
                err
            ))),
        }
    }
}

impl<R: std::io::Read> HintReader<R> {
    pub fn new(reader: R) -> Self {
        HintReader {
            inner: BufReader::new(reader),
            buffer: String::new(),
        }
    }
}

impl<R: std::io::Read> Iterator for HintReader<R> {
    type Item = Result<HintRecord, ReadWriteError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.inner.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    let line = self.buffer.trim_end_matches(&['\n', '\r'][..]);
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    match HintRecord::parse(line) {
                        Some(record) => return Some(Ok(record)),
                        None => debug!("skipping malformed hint: {}", line),
                    }
                }
                Err(err) => return Some(Err(ReadWriteError::new(err))),
            }
        }
    }
}

/// Returns the hints that lie completely inside `start..=stop` of `seq_id`
///
/// The input order is kept and the input is consumed lazily.
/// Hint coordinates are compared as they are, without conversion
/// between 0- and 1-based systems.
pub fn slice_hints<'a, I>(
    hints: I,
    seq_id: &'a str,
    start: u64,
    stop: u64,
) -> impl Iterator<Item = I::Item> + 'a
where
    I: IntoIterator + 'a,
    I::Item: Borrow<HintRecord>,
{
    hints
        .into_iter()
        .filter(move |hint| hint.borrow().is_within(seq_id, start, stop))
}

/// Writes the hints of one chunk from the hints file at `source` into `target`
///
/// Returns the number of written hints.
pub fn write_chunk_hints<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    target: Q,
    chunk: &GenomicInterval,
) -> Result<usize, ReadWriteError> {
    let reader = HintReader::from_file(source)?;
    let mut writer = BufWriter::new(File::create(target.as_ref())?);
    let mut count = 0;
    for hint in reader {
        let hint = hint?;
        if hint.is_within(chunk.seq_id(), chunk.start(), chunk.end()) {
            writer.write_all(hint.line().as_bytes())?;
            writer.write_all(b"\n")?;
            count += 1;
        }
    }
    writer.flush()?;
    debug!("{} hints for chunk {}", count, chunk);
    Ok(count)
}

#[cfg(test)]
mod test_hints {
    use super::*;

    fn hint(seq_id: &str, start: u64, end: u64) -> HintRecord {
        HintRecord::parse(&format!(
            "{}\tb2h\tintron\t{}\t{}\t0\t+\t.\tsrc=E",
            seq_id, start, end
        ))
        .unwrap()
    }

    #[test]
    fn test_containment() {
        let hints = vec![
            hint("chr1", 99, 150),
            hint("chr1", 100, 150),
            hint("chr1", 150, 200),
            hint("chr1", 150, 201),
            hint("chr2", 120, 130),
        ];
        let subset: Vec<&HintRecord> = slice_hints(&hints, "chr1", 100, 200).collect();
        assert_eq!(subset, vec![&hints[1], &hints[2]]);
    }

    #[test]
    fn test_starts_before_window() {
        let hints = vec![hint("chr1", 50, 120)];
        assert_eq!(slice_hints(&hints, "chr1", 100, 200).count(), 0);
    }

    #[test]
    fn test_owned_input() {
        let hints = vec![hint("chr1", 120, 130), hint("chr1", 110, 190)];
        let subset: Vec<HintRecord> = slice_hints(hints, "chr1", 100, 200).collect();
        assert_eq!(subset[0].start(), 120);
        assert_eq!(subset[1].start(), 110);
    }

    #[test]
    fn test_skip_malformed() {
        let gff = "# header\nchr1\tb2h\tintron\tabc\t180\t0\t+\t.\tmult=3\nchr1\tonly\tthree\n\
                   chr1\tb2h\tep\t10\t20\t0\t.\t.\tsrc=E\n";
        let hints: Vec<HintRecord> = HintReader::new(gff.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].end(), 20);
    }

    #[test]
    fn test_write_chunk_hints() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("hints.gff");
        let chunk = GenomicInterval::new("chr1", 100, 400).unwrap();
        let count = write_chunk_hints("tests/data/hints.gff", &target, &chunk).unwrap();
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(count, 2);
        assert_eq!(written.lines().count(), 2);
        assert!(written.starts_with("chr1\tb2h\tintron\t150\t300\t"));
    }
}
