use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::parents::AssignmentRow;
use crate::utils::errors::{GeneChunkError, ReadWriteError};

/// Header of the assignment summary table
pub const HEADER: &str = "TranscriptId\tAssignedGeneId\tAlternativeGeneIds\tResolutionMethod";

/// Writes the parent assignment summary as tab-separated table
///
/// Missing values are written as `None`.
///
/// # Examples
///
/// ```rust
/// use genechunk::parents::{AssignmentRow, ResolutionMethod, Writer};
///
/// let rows = vec![AssignmentRow {
///     transcript_id: "augPB-1.t1".to_string(),
///     assigned_gene: Some("ENSG01".to_string()),
///     alternatives: vec!["ENSG02".to_string(), "ENSG03".to_string()],
///     resolution: Some(ResolutionMethod::Rescued),
/// }];
///
/// let mut writer = Writer::new(Vec::new());
/// writer.write_header().unwrap();
/// writer.write_rows(&rows).unwrap();
///
/// let written = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(
///     written,
///     "TranscriptId\tAssignedGeneId\tAlternativeGeneIds\tResolutionMethod\naugPB-1.t1\tENSG01\tENSG02,ENSG03\trescued\n"
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
    pub fn new(writer: W) -> Self {
        Writer {
            inner: BufWriter::new(writer),
        }
    }

    pub fn write_header(&mut self) -> Result<(), std::io::Error> {
        writeln!(self.inner, "{}", HEADER)
    }

    pub fn write_row(&mut self, row: &AssignmentRow) -> Result<(), std::io::Error> {
        writeln!(self.inner, "{}", row)
    }

    pub fn write_rows(&mut self, rows: &[AssignmentRow]) -> Result<(), std::io::Error> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
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

#[cfg(test)]
mod test_writer {
    use super::*;

    #[test]
    fn test_unassigned_row() {
        let row = AssignmentRow {
            transcript_id: "augCGP-4.t2".to_string(),
            assigned_gene: None,
            alternatives: vec![],
            resolution: None,
        };
        let mut writer = Writer::new(Vec::new());
        writer.write_row(&row).unwrap();
        assert_eq!(
            writer.into_inner().unwrap(),
            b"augCGP-4.t2\tNone\tNone\tNone\n"
        );
    }
}
