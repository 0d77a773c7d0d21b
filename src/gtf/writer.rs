use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::gtf::{Attributes, GtfRecord};
use crate::models::{segment_frames, Strand, Transcript, TranscriptWrite};
use crate::utils::errors::{GeneChunkError, ReadWriteError};

/// Writes [`Transcript`]s as GTF
///
/// Every transcript is written as `exon`, `CDS`, `start_codon` and
/// `stop_codon` lines. The stop codon is not part of the `CDS` lines.
/// Codon lines are only written for complete CDS boundaries.
/// Optionally, `5UTR`/`3UTR` lines and AUGUSTUS-style `tss`/`tts`
/// markers are added.
///
/// # Examples
///
/// ```rust
/// use genechunk::gtf::Writer;
/// use genechunk::models::TranscriptWrite;
/// use genechunk::tests::transcripts::standard_transcript;
///
/// let output = Vec::new(); // substitute this with proper IO (io::stdout())
/// let mut writer = Writer::new(output);
/// writer.source("augustusPB");
/// writer.write_transcript_vec(&[standard_transcript()]).unwrap();
///
/// let written = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(written.lines().count(), 9);
/// assert!(written.starts_with("chr1\taugustusPB\texon\t11\t15\t"));
/// ```
pub struct Writer<W: std::io::Write> {
    inner: BufWriter<W>,
    source: String,
    utr: bool,
    markers: bool,
}

impl Writer<File> {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::create(path.as_ref()) {
            Ok(file) => Ok(Self::new(file)),
            Err(err) => Err(ReadWriteError::new(err)),
        }
    }
}

impl<W: std::io::Write> Writer<W> {
    /// Creates a new generic Writer for any `std::io::Write` object
    pub fn new(writer: W) -> Self {
        Writer {
            inner: BufWriter::new(writer),
            source: "genechunk".to_string(),
            utr: false,
            markers: false,
        }
    }

    /// Sets the value of the GTF `source` column
    pub fn source<S: Into<String>>(&mut self, source: S) {
        self.source = source.into()
    }

    /// Write `5UTR` and `3UTR` lines
    pub fn utr(&mut self, utr: bool) {
        self.utr = utr
    }

    /// Write `tss` and `tts` marker lines
    pub fn markers(&mut self, markers: bool) {
        self.markers = markers
    }

    pub fn flush(&mut self) -> Result<(), GeneChunkError> {
        match self.inner.flush() {
            Ok(res) => Ok(res),
            Err(err) => Err(GeneChunkError::from(err.to_string())),
        }
    }

    pub fn into_inner(self) -> Result<W, GeneChunkError> {
        match self.inner.into_inner() {
            Ok(res) => Ok(res),
            Err(err) => Err(GeneChunkError::from(err.to_string())),
        }
    }

    /// All GTF lines of a transcript, sorted by position
    pub fn records(&self, transcript: &Transcript) -> Vec<GtfRecord> {
        let mut attributes = Attributes::new();
        attributes.set("gene_id", transcript.gene());
        attributes.set("transcript_id", transcript.name());

        let strand = transcript.strand();
        let line = |feature: &str, start: u32, end: u32, frame: Option<u8>| {
            GtfRecord::new(
                transcript.chrom(),
                &self.source,
                feature,
                start,
                end,
                strand,
                frame,
                attributes.clone(),
            )
        };

        let mut records = Vec::new();
        for exon in transcript.exons() {
            records.push(line("exon", exon.start(), exon.end(), None));
        }

        let frames = transcript.cds_frames();
        for (start, end) in transcript.cds_segments_without_stop() {
            let frame = transcript
                .exons()
                .iter()
                .position(|ex| ex.start() <= start && ex.end() >= end)
                .and_then(|idx| frames[idx]);
            records.push(line("CDS", start, end, frame));
        }

        if transcript.has_complete_start() {
            let codon = transcript.start_codon();
            for (segment, frame) in codon.iter().zip(segment_frames(&codon, strand)) {
                records.push(line("start_codon", segment.0, segment.1, Some(frame)));
            }
        }
        if transcript.has_complete_stop() {
            let codon = transcript.stop_codon();
            for (segment, frame) in codon.iter().zip(segment_frames(&codon, strand)) {
                records.push(line("stop_codon", segment.0, segment.1, Some(frame)));
            }
        }

        if self.utr {
            for (start, end) in transcript.utr5_segments() {
                records.push(line("5UTR", start, end, None));
            }
            for (start, end) in transcript.utr3_segments() {
                records.push(line("3UTR", start, end, None));
            }
        }

        if self.markers && transcript.exon_count() > 0 {
            let (tss, tts) = match strand {
                Strand::Minus => (transcript.tx_end(), transcript.tx_start()),
                _ => (transcript.tx_start(), transcript.tx_end()),
            };
            records.push(line("tss", tss, tss, None));
            records.push(line("tts", tts, tts, None));
        }

        records.sort_by_key(|record| record.start());
        records
    }
}

impl<W: std::io::Write> TranscriptWrite for Writer<W> {
    /// Writes all lines of a transcript, each terminated by a newline
    fn writeln_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error> {
        self.write_single_transcript(transcript)
    }

    fn write_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error> {
        for record in self.records(transcript) {
            self.inner.write_all(record.to_string().as_bytes())?;
            self.inner.write_all("\n".as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_writer {
    use super::*;
    use crate::gtf::Reader;
    use crate::models::{CdsStat, TranscriptRead};
    use crate::tests::transcripts::{minus_transcript, standard_transcript};

    fn written(tx: &Transcript, utr: bool, markers: bool) -> Vec<String> {
        let mut writer = Writer::new(Vec::new());
        writer.utr(utr);
        writer.markers(markers);
        writer.write_single_transcript(tx).unwrap();
        String::from_utf8(writer.into_inner().unwrap())
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    fn features(lines: &[String]) -> Vec<(String, String, String, String)> {
        lines
            .iter()
            .map(|l| {
                let cols: Vec<&str> = l.split('\t').collect();
                (
                    cols[2].to_string(),
                    cols[3].to_string(),
                    cols[4].to_string(),
                    cols[7].to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_forward_lines() {
        let lines = written(&standard_transcript(), false, false);
        let f = features(&lines);
        assert!(f.contains(&("CDS".into(), "22".into(), "25".into(), "0".into())));
        assert!(f.contains(&("CDS".into(), "31".into(), "35".into(), "2".into())));
        assert!(f.contains(&("start_codon".into(), "22".into(), "24".into(), "0".into())));
        assert!(f.contains(&("stop_codon".into(), "41".into(), "43".into(), "0".into())));
        // the stop codon is not part of the CDS
        assert!(!f.iter().any(|x| x.0 == "CDS" && x.1 == "41"));
        assert!(lines[0].ends_with("gene_id \"Test-Gene\"; transcript_id \"Test-Transcript\";"));
    }

    #[test]
    fn test_reverse_lines() {
        let lines = written(&minus_transcript(), true, false);
        let f = features(&lines);
        assert!(f.contains(&("CDS".into(), "25".into(), "25".into(), "1".into())));
        assert!(f.contains(&("stop_codon".into(), "22".into(), "24".into(), "0".into())));
        assert!(f.contains(&("start_codon".into(), "41".into(), "43".into(), "0".into())));
        assert!(f.contains(&("5UTR".into(), "51".into(), "55".into(), ".".into())));
        assert!(f.contains(&("3UTR".into(), "11".into(), "15".into(), ".".into())));
    }

    #[test]
    fn test_incomplete_has_no_codons() {
        let mut tx = standard_transcript();
        *tx.cds_end_stat_mut() = CdsStat::Incomplete;
        let f = features(&written(&tx, false, true));
        assert!(!f.iter().any(|x| x.0 == "stop_codon"));
        assert!(f.contains(&("CDS".into(), "41".into(), "43".into(), "0".into())));
        assert!(f.contains(&("tss".into(), "11".into(), "11".into(), ".".into())));
        assert!(f.contains(&("tts".into(), "55".into(), "55".into(), ".".into())));
    }

    #[test]
    fn test_read_written_transcript() {
        let tx = minus_transcript();
        let lines = written(&tx, true, true).join("\n");
        let transcripts = Reader::new(lines.as_bytes()).transcripts().unwrap();
        let read = &transcripts.as_vec()[0];
        assert_eq!(read.exon_segments(), tx.exon_segments());
        assert_eq!(read.cds_segments(), tx.cds_segments());
        assert_eq!(read.strand(), tx.strand());
        assert_eq!(read.cds_start_stat(), CdsStat::Complete);
        assert_eq!(read.cds_end_stat(), CdsStat::Complete);
    }
}
