use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::{Transcript, TranscriptWrite};
use crate::utils::errors::{GeneChunkError, ReadWriteError};

/// Writes [`Transcript`]s as GenePredExt
///
/// # Examples
///
/// ```rust
/// use genechunk::tests;
/// use genechunk::genepred::Writer;
/// use genechunk::models::TranscriptWrite;
///
/// let transcripts = vec![tests::transcripts::standard_transcript()];
///
/// let output = Vec::new(); // substitute this with proper IO (io::stdout())
/// let mut writer = Writer::new(output);
/// writer.write_transcript_vec(&transcripts).unwrap();
///
/// assert_eq!(
/// writer.into_inner().unwrap(), // this is our actual output
/// b"Test-Transcript\tchr1\t+\t10\t55\t21\t43\t5\t10,20,30,40,50,\t15,25,35,45,55,\t0\tTest-Gene\tcmpl\tcmpl\t-1,0,1,0,-1,
/// "
/// );
/// ```
pub struct Writer<W: std::io::Write> {
    inner: BufWriter<W>,
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
    ///
    /// Use this method when you want to write to stdout or
    /// a remote source, e.g. via HTTP
    pub fn new(writer: W) -> Self {
        Writer {
            inner: BufWriter::new(writer),
        }
    }

    pub fn with_capacity(capacity: usize, writer: W) -> Self {
        Writer {
            inner: BufWriter::with_capacity(capacity, writer),
        }
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
}

impl<W: std::io::Write> TranscriptWrite for Writer<W> {
    /// Writes a single transcript formatted as GenePredExt with an extra newline
    fn writeln_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error> {
        self.write_single_transcript(transcript)?;
        self.inner.write_all("\n".as_bytes())
    }

    fn write_single_transcript(&mut self, transcript: &Transcript) -> Result<(), std::io::Error> {
        self.inner
            .write_all(GenePredLine::from(transcript).as_bytes())
    }
}

struct GenePredLine {
    line: String,
}

impl GenePredLine {
    fn as_bytes(&self) -> &[u8] {
        self.line.as_bytes()
    }
}

impl std::fmt::Display for GenePredLine {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.line)
    }
}

impl From<&Transcript> for GenePredLine {
    fn from(tx: &Transcript) -> GenePredLine {
        // GenePred uses 0-based half-open coordinates and places the CDS of
        // non-coding transcripts at the transcript end
        let tx_start = tx.tx_start().saturating_sub(1);
        let (cds_start, cds_end) = match (tx.cds_start(), tx.cds_end()) {
            (Some(start), Some(end)) => (start - 1, end),
            _ => (tx.tx_end(), tx.tx_end()),
        };
        let frames = tx
            .cds_frames()
            .iter()
            .map(|frame| match frame {
                // GTF frame => GenePred codon phase
                Some(f) => ((3 - *f as i8) % 3).to_string(),
                None => "-1".to_string(),
            })
            .collect::<Vec<String>>();

        GenePredLine {
            line: format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{},\t{},\t{}\t{}\t{}\t{}\t{},",
                tx.name(),
                tx.chrom(),
                tx.strand(),
                tx_start,
                tx.tx_end(),
                cds_start,
                cds_end,
                tx.exon_count(),
                tx.exons()
                    .iter()
                    .map(|ex| (ex.start() - 1).to_string())
                    .collect::<Vec<String>>()
                    .join(","),
                tx.exons()
                    .iter()
                    .map(|ex| ex.end().to_string())
                    .collect::<Vec<String>>()
                    .join(","),
                tx.score().map_or(0, |s| s.round() as i64),
                tx.gene(),
                tx.cds_start_stat(),
                tx.cds_end_stat(),
                frames.join(",")
            ),
        }
    }
}

#[cfg(test)]
mod test_genepredline {
    use super::*;
    use crate::tests::transcripts::{minus_transcript, non_coding, standard_transcript};

    #[test]
    fn test_single_transcript() {
        let tx = standard_transcript();
        let output = GenePredLine::from(&tx);
        assert_eq!(
            output.to_string(),
            "Test-Transcript\tchr1\t+\t10\t55\t21\t43\t5\t10,20,30,40,50,\t15,25,35,45,55,\t0\tTest-Gene\tcmpl\tcmpl\t-1,0,1,0,-1,"
        );
    }

    #[test]
    fn test_minus_frames() {
        let output = GenePredLine::from(&minus_transcript()).to_string();
        assert!(output.starts_with("Test-Transcript\tchr1\t-\t10\t55\t"));
        assert!(output.ends_with("\t-1,2,0,0,-1,"));
    }

    #[test]
    fn test_non_coding() {
        let tx = non_coding("nc.t1", "nc", "chr3", &[(101, 200), (301, 400)]);
        assert_eq!(
            GenePredLine::from(&tx).to_string(),
            "nc.t1\tchr3\t+\t100\t400\t400\t400\t2\t100,300,\t200,400,\t0\tnc\tnone\tnone\t-1,-1,"
        );
    }

    #[test]
    fn write_multiple_transcripts() {
        let transcripts = vec![standard_transcript(), minus_transcript()];
        let mut writer = Writer::new(Vec::new());
        writer
            .write_transcript_vec(&transcripts)
            .expect("Error writing into bytevec");
        let written_output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(written_output.lines().count(), 2);
        assert!(written_output.ends_with(",\n"));
    }
}
