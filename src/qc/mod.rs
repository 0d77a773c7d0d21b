//! Structural quality checks for Transcripts
//!
//! Predicted transcripts pass through several conversions before their parent
//! genes are assigned. These checks catch transcripts whose structure got
//! broken on the way, without looking at the genome sequence.
//!
//! | QC check | Explanation | Non-Coding vs Coding |
//! | --- | --- | --- |
//! | Exon | Contains at least one exon | all |
//! | Sorted exons | Exons are sorted and do not overlap each other | all |
//! | CDS within exons | The CDS of every exon lies inside that exon | Coding |
//! | Correct CDS Length | The length of the CDS is divisible by 3 | Coding, complete start and stop |
//!
//! ```rust
//! use genechunk::tests::transcripts::standard_transcript;
//! use genechunk::qc::{QcCheck, QcResult};
//!
//! let qc = QcCheck::new(&standard_transcript());
//! assert_eq!(qc.correct_cds_length(), QcResult::OK);
//! assert!(qc.is_valid());
//! assert_eq!(qc.to_string(), "OK\tOK\tOK\tOK");
//! ```

use crate::models::Transcript;

/// Holds the result of a QC check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QcResult {
    /// Test could not be performed (e.g. CDS-length for non-coding transcripts),
    /// so no conclusion could be drawn
    NA,
    /// The test succeeded with an OK results
    OK,
    /// The test failed and gave a NOT OK result
    NOK,
}

impl std::fmt::Display for QcResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                QcResult::OK => "OK",
                QcResult::NOK => "NOK",
                QcResult::NA => "N/A",
            }
        )
    }
}

impl From<bool> for QcResult {
    fn from(b: bool) -> Self {
        if b {
            QcResult::OK
        } else {
            QcResult::NOK
        }
    }
}

impl From<Option<bool>> for QcResult {
    fn from(b: Option<bool>) -> Self {
        match b {
            None => QcResult::NA,
            Some(true) => QcResult::OK,
            Some(false) => QcResult::NOK,
        }
    }
}

/// Wrapper struct to run all structural checks on a transcript
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QcCheck {
    exon: QcResult,
    sorted_exons: QcResult,
    cds_within_exons: QcResult,
    cds_len: QcResult,
}

impl std::default::Default for QcCheck {
    fn default() -> Self {
        QcCheck {
            exon: QcResult::NA,
            sorted_exons: QcResult::NA,
            cds_within_exons: QcResult::NA,
            cds_len: QcResult::NA,
        }
    }
}

impl std::fmt::Display for QcCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.exon, self.sorted_exons, self.cds_within_exons, self.cds_len,
        )
    }
}

impl QcCheck {
    /// Runs all checks on the transcript
    pub fn new(transcript: &Transcript) -> Self {
        let mut res = QcCheck {
            exon: contains_exon(transcript).into(),
            ..QcCheck::default()
        };
        if res.exon == QcResult::NOK {
            return res;
        }
        res.sorted_exons = sorted_exons(transcript).into();
        res.cds_within_exons = cds_within_exons(transcript).into();
        res.cds_len = correct_cds_length(transcript).into();
        res
    }

    /// Does the transcript contain at least one exon
    pub fn contains_exon(&self) -> QcResult {
        self.exon
    }

    /// Are the exons sorted and free of overlaps
    pub fn sorted_exons(&self) -> QcResult {
        self.sorted_exons
    }

    /// Does the CDS of every exon lie within the exon
    pub fn cds_within_exons(&self) -> QcResult {
        self.cds_within_exons
    }

    /// Is the length of the transcript's CDS a multiple of 3,
    /// i.e. has a proper coding frame
    pub fn correct_cds_length(&self) -> QcResult {
        self.cds_len
    }

    /// True if no check failed
    pub fn is_valid(&self) -> bool {
        [
            self.exon,
            self.sorted_exons,
            self.cds_within_exons,
            self.cds_len,
        ]
        .iter()
        .all(|res| *res != QcResult::NOK)
    }

    /// Create an "ideal" QcCheck with all tests passing
    ///
    /// There is no need to use this method, unless you're lazy and want
    /// to have a simple scaffold for unit-tests
    pub fn ideal() -> Self {
        QcCheck {
            exon: QcResult::OK,
            sorted_exons: QcResult::OK,
            cds_within_exons: QcResult::OK,
            cds_len: QcResult::OK,
        }
    }
}

/// Returns true if the transcript contains at least one exon
pub fn contains_exon(transcript: &Transcript) -> bool {
    transcript.exon_count() > 0
}

/// Returns true if every exon ends before the next one starts
pub fn sorted_exons(transcript: &Transcript) -> bool {
    transcript
        .exons()
        .windows(2)
        .all(|pair| pair[0].end() < pair[1].start())
}

/// Returns `Some(true)` if the CDS of all exons lies within the exon
///
/// Returns `None` for non-coding transcripts
pub fn cds_within_exons(transcript: &Transcript) -> Option<bool> {
    if !transcript.is_coding() {
        return None;
    }
    Some(transcript.exons().iter().all(|exon| {
        match (exon.cds_start(), exon.cds_end()) {
            (Some(start), Some(end)) => {
                start <= end && start >= exon.start() && end <= exon.end()
            }
            (None, None) => true,
            _ => false,
        }
    }))
}

/// Returns `Some(true)` if the transcript is coding and the CDS
/// has a proper reading-frame length, i.e. divisible by 3
///
/// Returns `None` for non-coding transcripts and for transcripts
/// whose CDS is truncated at either end
pub fn correct_cds_length(transcript: &Transcript) -> Option<bool> {
    if !transcript.is_coding()
        || !transcript.has_complete_start()
        || !transcript.has_complete_stop()
    {
        None
    } else {
        Some(transcript.cds_len() % 3 == 0)
    }
}
