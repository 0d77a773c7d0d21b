use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::errors::ConfigurationError;

/// A window on a single reference sequence
///
/// Coordinates are 0-based and half-open: the interval covers
/// `start..start + length`. An interval is immutable once created.
///
/// # Examples
///
/// ```rust
/// use genechunk::models::GenomicInterval;
///
/// let chunk = GenomicInterval::new("chr1", 250, 300).unwrap();
/// assert_eq!(chunk.end(), 550);
/// assert_eq!(chunk.to_string(), "chr1:250-550");
/// assert!(GenomicInterval::new("chr1", 0, 0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenomicInterval {
    seq_id: String,
    start: u64,
    length: u64,
}

impl GenomicInterval {
    pub fn new<S: Into<String>>(
        seq_id: S,
        start: u64,
        length: u64,
    ) -> Result<Self, ConfigurationError> {
        let seq_id = seq_id.into();
        if length == 0 {
            return Err(ConfigurationError::new(format!(
                "interval on {} at {} has zero length",
                seq_id, start
            )));
        }
        Ok(GenomicInterval {
            seq_id,
            start,
            length,
        })
    }

    pub fn seq_id(&self) -> &str {
        &self.seq_id
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// Exclusive end of the interval
    ///
    /// This is also the last position of the interval in 1-based coordinates.
    pub fn end(&self) -> u64 {
        self.start + self.length
    }

    /// Returns a copy of the interval extended up to `end`
    pub(crate) fn extended_to(&self, end: u64) -> Self {
        GenomicInterval {
            seq_id: self.seq_id.clone(),
            start: self.start,
            length: end.max(self.end()) - self.start,
        }
    }

    /// Returns true if the 1-based position lies inside the interval
    pub fn contains_position(&self, pos: u64) -> bool {
        pos > self.start && pos <= self.end()
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}-{}", self.seq_id, self.start, self.end())
    }
}

#[cfg(test)]
mod test_interval {
    use super::*;

    #[test]
    fn test_extend() {
        let iv = GenomicInterval::new("chr1", 600, 300).unwrap();
        let extended = iv.extended_to(1000);
        assert_eq!(extended.start(), 600);
        assert_eq!(extended.end(), 1000);
        assert_eq!(extended.length(), 400);
    }

    #[test]
    fn test_contains_position() {
        let iv = GenomicInterval::new("chr1", 10, 10).unwrap();
        assert!(!iv.contains_position(10));
        assert!(iv.contains_position(11));
        assert!(iv.contains_position(20));
        assert!(!iv.contains_position(21));
    }
}
