use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcfError {
    #[error("No meta lines found, a VCF file must start with ##fileformat=VCFv")]
    NoMeta,

    #[error("First line must be the ##fileformat=VCFv line, found: {0}")]
    MissingFileFormat(String),

    #[error("Malformed meta line `{line}`: {reason}")]
    MalformedMeta { line: String, reason: String },

    #[error("Malformed column header line: {0}")]
    MalformedHeader(String),

    #[error("Record has {found} fields, at least 8 are required: {line}")]
    FieldCount { found: usize, line: String },

    #[error("Can't parse POS `{0}` as an integer")]
    InvalidPos(String),

    #[error("Can't parse QUAL `{0}` as a number")]
    InvalidQual(String),

    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: Box<VcfError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
