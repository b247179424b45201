//! Genome sequence storage and spaced-seed indexing.
//!
//! A [`Genome`] holds named sequences read from FASTA files together with the
//! checksums of those files and a provenance chain. A [`Seed`] is built from a
//! genome and a mask such as `11_1_1`: every sequence is appended to one shared
//! byte buffer and every window of the buffer is indexed by the bases the mask
//! samples, so all positions sharing a sampled pattern can be looked up at once.
//!
//! ```rust
//! use ngstk_genome::{Genome, Sequence};
//!
//! let mut genome = Genome::new("toy");
//! genome
//!     .add_sequences([Sequence::new(">chr1 toy chromosome", "ACGTACGT")])
//!     .unwrap();
//!
//! let seed = genome.new_seed("111").unwrap();
//! assert_eq!(seed.coords_for("ACG"), Some(&[0, 4][..]));
//! assert_eq!(seed.genome_id(), genome.id());
//! ```
pub mod config;
pub mod errors;
pub mod fasta;
pub mod fastq;
pub mod genome;
pub mod seed;
pub mod sequence;

pub use config::SeedConfig;
pub use errors::{ConfigError, FastaError, FastqError, GenomeError, SeedError, SequenceError};
pub use fasta::{FastaFile, FastaReader, parse_fasta_file};
pub use fastq::{FastqReader, FastqRecord};
pub use genome::Genome;
pub use seed::{Seed, SeedSequence};
pub use sequence::Sequence;

pub mod consts {
    pub const GENOME_VERSION: &str = "0.1.0";
    pub const GENOME_SUFFIX: &str = "genome.bin";
    pub const SEED_SUFFIX: &str = "seed.bin";
    pub const SEED_TEXT_SUFFIX: &str = "seed.txt";
    /// Base that marks an unknown position; windows whose first sampled base is this are skipped.
    pub const UNKNOWN_BASE: u8 = b'N';
}
