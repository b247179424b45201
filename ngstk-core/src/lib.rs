//! Shared building blocks for the ngstk crates.
//!
//! This crate holds the pieces every format crate needs and none of them own:
//! gzip-aware readers, file checksums and refget-style digests, run provenance
//! records, and the `operation:subject:pattern` selector mini-language used to
//! filter records by sequence id.
pub mod errors;
pub mod provenance;
pub mod selector;
pub mod utils;

pub use errors::SelectorError;
pub use provenance::RunParameters;
pub use selector::{Selector, SelectorOperation};
