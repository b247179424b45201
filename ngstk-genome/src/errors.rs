use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SequenceError {
    #[error("Start can't be less than 1: {0}")]
    StartBeforeOne(usize),

    #[error("End {end} is beyond the end of the sequence ({len})")]
    EndBeyondSequence { end: usize, len: usize },

    #[error("Start {start} is beyond the end of the sequence ({len})")]
    StartBeyondSequence { start: usize, len: usize },

    #[error("Start {start} is after end {end}")]
    StartAfterEnd { start: usize, end: usize },

    #[error("Range {start}-{end} splits a multi-byte character")]
    NotOnCharBoundary { start: usize, end: usize },
}

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Sequence data on line {0} before any `>` header")]
    SequenceBeforeHeader(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FastqError {
    #[error("Id line of a FASTQ record must start with @: {0}")]
    MissingAt(String),

    #[error("Separator line of record {0} must start with +")]
    MissingPlus(String),

    #[error("Base and quality counts differ for record {id}: {bases} vs {qualities}")]
    LengthMismatch {
        id: String,
        bases: usize,
        qualities: usize,
    },

    #[error("A FASTQ record has 4 lines, found {0}")]
    Truncated(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum GenomeError {
    #[error("Sequence `{0}` appears more than once")]
    DuplicateSequence(String),

    #[error("Error reading FASTA {path}: {source}")]
    Fasta { path: String, source: FastaError },

    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Seed mask must not be empty")]
    EmptyMask,

    #[error("Seed mask `{0}` samples no position, it needs at least one `1`")]
    NothingSampled(String),

    #[error("Sequence `{0}` was already added to the seed")]
    DuplicateSequence(String),

    #[error("Sequence `{0}` has non-ASCII bases and can't be indexed")]
    NonAsciiSequence(String),

    #[error("Seed was built from genome {seed} but was given genome {genome}")]
    GenomeMismatch { seed: String, genome: String },

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Seed config lists no masks")]
    NoMasks,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
