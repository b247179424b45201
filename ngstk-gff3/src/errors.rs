use thiserror::Error;

use ngstk_core::SelectorError;

use crate::allen::AllenRelation;

#[derive(Error, Debug, PartialEq)]
pub enum FeatureError {
    #[error("Expected 8 or 9 tab-separated fields, found {0}")]
    FieldCount(usize),

    #[error("Can't parse {field} `{value}` as a coordinate")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("Feature end {end} is before its start {start}")]
    InvalidInterval { start: u64, end: u64 },

    #[error("Can't merge features on different sequences: {a} vs {b}")]
    SeqIdMismatch { a: String, b: String },

    #[error("A must not start after B: A starts at {a_start}, B starts at {b_start}")]
    OutOfOrder { a_start: u64, b_start: u64 },

    #[error("Unexpected interval relation {relation:?} between {a} and {b}")]
    UnexpectedRelation {
        relation: AllenRelation,
        a: String,
        b: String,
    },

    #[error("Operation requires a sorted feature collection: {0}")]
    Unsorted(String),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

#[derive(Error, Debug)]
pub enum Gff3Error {
    #[error("No header lines found, a GFF3 file must start with ##gff-version 3")]
    NoHeaders,

    #[error("No feature records found")]
    NoRecords,

    #[error("First header line is not a GFF3 version line: {0}")]
    NotGff3(String),

    #[error("Error parsing feature on line {line}: {source}")]
    Parse { line: usize, source: FeatureError },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
