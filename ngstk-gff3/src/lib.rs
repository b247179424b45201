//! GFF3 features and the interval algebra used to merge them.
//!
//! The crate is organised bottom-up:
//!
//! - [`allen`]: classifies how two closed intervals relate (Allen relations).
//! - [`feature`]: one GFF3 record, its canonical line form, and the pairwise
//!   `merge` and `prudent_merge` operations.
//! - [`features`]: an ordered collection of features with sort, consolidate,
//!   prudent-merge-by-type and per-sequence partitioning.
//! - [`gff3`]: a whole GFF3 file (headers plus features), read from plain or
//!   gzipped input.
//! - [`tree`]: the `ID`/`Parent` relationship graph of a GFF3 file.
//!
//! ## Example
//!
//! ```rust
//! use ngstk_gff3::{Feature, Features};
//!
//! let a: Feature = "chr1\tsrc\texon\t1\t10\t.\t+\t.\tID=a".parse().unwrap();
//! let b: Feature = "chr1\tsrc\texon\t5\t20\t.\t+\t.\tID=b".parse().unwrap();
//!
//! let mut features = Features::new("seqid", "chr1");
//! features.add_features([a, b]);
//! features.sort();
//!
//! let merged = features.prudent_merged_by_type().unwrap();
//! assert_eq!(merged.len(), 3);
//! ```
pub mod allen;
pub mod errors;
pub mod feature;
pub mod features;
pub mod gff3;
pub mod tree;

pub use allen::{AllenRelation, GenomicInterval};
pub use errors::{FeatureError, Gff3Error};
pub use feature::{Feature, prudent_merge};
pub use features::{Features, SeqIdView, merge_features};
pub use gff3::Gff3;
pub use tree::{Tree, TreeNode};

pub mod consts {
    /// Value written for any missing scalar field.
    pub const MISSING: &str = ".";
    /// Type given to features that do not say otherwise, the Sequence Ontology root.
    pub const DEFAULT_TYPE: &str = "sequence_feature";
    /// Source of every overlap feature produced by a prudent merge.
    pub const MERGE_SOURCE: &str = "merge";
    pub const SOURCES_ATTR: &str = "Sources";
    pub const TYPES_ATTR: &str = "Types";
    pub const IDS_ATTR: &str = "IDs";
    pub const ID_ATTR: &str = "ID";
    pub const PARENT_ATTR: &str = "Parent";
    pub const SEQID_KEY: &str = "seqid";
}
