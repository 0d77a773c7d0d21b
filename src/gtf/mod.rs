//! Read and write GTF files
//!
//! GTF is the exchange format of the pipeline: AUGUSTUS writes it for
//! every chunk, `joingenes` consumes and produces it, and the final,
//! annotated gene sets are GTF as well.
//!
//! Individual lines are represented as [`GtfRecord`]. The [`Reader`]
//! composes records into [`Transcripts`](crate::models::Transcripts)
//! and the [`Writer`] turns transcripts back into records.
mod reader;
mod record;
mod writer;

pub use crate::gtf::reader::{compose_transcripts, parse_records, Reader};
pub use crate::gtf::record::{Attributes, GtfRecord};
pub use crate::gtf::writer::Writer;
