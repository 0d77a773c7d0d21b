use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::utils::errors::ReadWriteError;

/// Lengths of the reference sequences
///
/// Read from a two-column, tab-separated table (`sequence_id<TAB>length`),
/// as produced by `faSize -detailed` or `halStats --chromSizes`.
/// The order of the table is kept.
///
/// # Examples
///
/// ```rust
/// use genechunk::chunks::SequenceSizes;
///
/// let table = "chr1\t1000\nchr2\t500\n";
/// let sizes = SequenceSizes::from_reader(table.as_bytes()).unwrap();
/// assert_eq!(sizes.get("chr2"), Some(500));
/// assert_eq!(sizes.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceSizes {
    entries: Vec<(String, u64)>,
}

impl SequenceSizes {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        SequenceSizes {
            entries: entries
                .into_iter()
                .map(|(id, len)| (id.into(), len))
                .collect(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::open(path.as_ref()) {
            Ok(file) => Self::from_reader(file),
            Err(err) => Err(ReadWriteError::new(format!(
                "unable to open {}: {}",
                path.as_ref().display(),
                err
            ))),
        }
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ReadWriteError> {
        let mut entries = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split('\t');
            let (id, len) = match (cols.next(), cols.next()) {
                (Some(id), Some(len)) => (id, len),
                _ => {
                    return Err(ReadWriteError::new(format!(
                        "invalid sequence size line: {}",
                        line
                    )))
                }
            };
            let len = len.trim().parse::<u64>().map_err(|_| {
                ReadWriteError::new(format!("invalid length of sequence {}: {}", id, len))
            })?;
            entries.push((id.to_string(), len));
        }
        Ok(SequenceSizes { entries })
    }

    pub fn get(&self, seq_id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(id, _)| id == seq_id)
            .map(|(_, len)| *len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(id, len)| (id.as_str(), *len))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
