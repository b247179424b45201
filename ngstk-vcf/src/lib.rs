//! A lightweight VCF reader and writer.
//!
//! Files are split into `##` meta lines, the `#CHROM` column header and
//! tab-separated records. Content of INFO and FORMAT columns is kept as text
//! and never validated.
//!
//! ```rust
//! use ngstk_vcf::Vcf;
//!
//! let text = "##fileformat=VCFv4.3\n\
//!             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
//!             chr1\t10\trs1\tA\tG\t.\tPASS\tDP=3\n";
//! let vcf = Vcf::from_reader(text.as_bytes()).unwrap();
//! assert_eq!(vcf.records.len(), 1);
//! assert_eq!(vcf.records[0].qual, None);
//! ```
pub mod errors;
pub mod header;
pub mod meta;
pub mod record;
pub mod vcf;

pub use errors::VcfError;
pub use header::Header;
pub use meta::MetaLine;
pub use record::Record;
pub use vcf::Vcf;

pub mod consts {
    pub const MISSING: &str = ".";
    pub const FILEFORMAT_PREFIX: &str = "##fileformat=VCFv";
    pub const MANDATORY_COLUMNS: [&str; 8] =
        ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];
    pub const FORMAT_COLUMN: &str = "FORMAT";
}
