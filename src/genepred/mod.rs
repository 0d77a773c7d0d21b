//! Read and write GenePredExt
//!
//! GenePred is the tabular gene model format of the UCSC genome browser.
//! GenePredExt adds five columns to it:
//!
//! | Column | Content |
//! | --- | --- |
//! | 1 | transcript name |
//! | 2 | chromosome |
//! | 3 | strand |
//! | 4, 5 | transcript start and end (0-based, half-open) |
//! | 6, 7 | CDS start and end; both equal the transcript end for non-coding transcripts |
//! | 8 | exon count |
//! | 9, 10 | comma-separated exon starts and ends |
//! | 11 | score |
//! | 12 | gene name |
//! | 13, 14 | completeness of the left and right CDS end (`none`, `unk`, `incmpl`, `cmpl`) |
//! | 15 | comma-separated codon phase of every exon, `-1` for non-coding exons |
//!
//! The merged AugustusPB gene set is written in this format in addition to GTF.

mod reader;
mod writer;

pub use crate::genepred::reader::Reader;
pub use crate::genepred::writer::Writer;
