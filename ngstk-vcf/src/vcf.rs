use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use log::info;

use ngstk_core::utils::get_dynamic_reader;

use crate::consts::FILEFORMAT_PREFIX;
use crate::errors::VcfError;
use crate::header::Header;
use crate::meta::MetaLine;
use crate::record::Record;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vcf {
    pub meta: Vec<MetaLine>,
    pub header: Header,
    pub records: Vec<Record>,
}

impl Vcf {
    /// Read a VCF file, gzipped or not.
    pub fn from_path(path: &Path) -> Result<Self, VcfError> {
        let vcf = Vcf::from_reader(get_dynamic_reader(path)?)?;
        info!(
            "Read {} records for {} samples from {}",
            vcf.records.len(),
            vcf.header.samples.len(),
            path.display()
        );
        Ok(vcf)
    }

    ///
    /// Read from any buffered reader. The first line must be the
    /// `##fileformat=VCFv` line; blank lines are skipped.
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, VcfError> {
        let mut vcf = Vcf::default();
        let mut first_line: Option<String> = None;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            if first_line.is_none() {
                first_line = Some(line.to_string());
            }

            let at_line = |source: VcfError| VcfError::Parse {
                line: i + 1,
                source: Box::new(source),
            };
            if line.starts_with("##") {
                vcf.meta.push(line.parse().map_err(at_line)?);
            } else if line.starts_with('#') {
                vcf.header = line.parse().map_err(at_line)?;
            } else {
                vcf.records.push(Record::from_line(line).map_err(at_line)?);
            }
        }

        if vcf.meta.is_empty() {
            return Err(VcfError::NoMeta);
        }
        match first_line {
            Some(first) if first.starts_with(FILEFORMAT_PREFIX) => Ok(vcf),
            other => Err(VcfError::MissingFileFormat(other.unwrap_or_default())),
        }
    }

    /// Version from the `##fileformat` line, e.g. `4.3`.
    pub fn fileformat(&self) -> Option<&str> {
        self.meta.iter().find_map(|m| match m {
            MetaLine::Unstructured { key, value } if key == "fileformat" => {
                value.strip_prefix("VCFv")
            }
            _ => None,
        })
    }

    /// Structured meta lines with the given key, e.g. `INFO` or `contig`.
    pub fn meta_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a MetaLine> + 'a {
        self.meta.iter().filter(move |m| m.key() == key)
    }

    /// Distinct CHROM values in order of first appearance.
    pub fn chroms(&self) -> Vec<&str> {
        let mut chroms: Vec<&str> = Vec::new();
        for r in &self.records {
            if !chroms.contains(&r.chrom.as_str()) {
                chroms.push(&r.chrom);
            }
        }
        chroms
    }

    /// Write to `path`, gzip-compressed when it ends in `.gz`.
    pub fn write(&self, path: &Path) -> Result<(), VcfError> {
        let file = File::create(path)?;
        if path.extension() == Some(OsStr::new("gz")) {
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            self.write_to(&mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            let mut writer = BufWriter::new(file);
            self.write_to(&mut writer)?;
            writer.flush()?;
        }
        info!("Wrote {} records to {}", self.records.len(), path.display());
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), VcfError> {
        for m in &self.meta {
            writeln!(writer, "{}", m)?;
        }
        writeln!(writer, "{}", self.header)?;
        for r in &self.records {
            writeln!(writer, "{}", r)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    const SMALL_VCF: &str = "##fileformat=VCFv4.3
##source=ngstk-test
##contig=<ID=chr1,length=1000>
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total depth, all samples\">
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA001
chr1\t10\trs1\tA\tG\t30\tPASS\tDP=4\tGT\t0/1
chr1\t20\t.\tC\tT\t.\tq10\tDP=2\tGT\t1/1
chr2\t5\t.\tG\tA\t12.5\tPASS\tDP=9\tGT\t0/0
";

    #[fixture]
    fn small_vcf() -> Vcf {
        Vcf::from_reader(SMALL_VCF.as_bytes()).unwrap()
    }

    #[rstest]
    fn test_read(small_vcf: Vcf) {
        assert_eq!(small_vcf.meta.len(), 5);
        assert_eq!(small_vcf.fileformat(), Some("4.3"));
        assert_eq!(small_vcf.header.samples, vec!["NA001"]);
        assert_eq!(small_vcf.records.len(), 3);
        assert_eq!(small_vcf.chroms(), vec!["chr1", "chr2"]);

        let info: Vec<Option<&str>> = small_vcf.meta_for("INFO").map(MetaLine::id).collect();
        assert_eq!(info, vec![Some("DP")]);
        assert_eq!(
            small_vcf.meta_for("INFO").next().unwrap().field("Description"),
            Some("Total depth, all samples")
        );
    }

    #[rstest]
    fn test_write_reproduces_input(small_vcf: Vcf) {
        let mut out = Vec::new();
        small_vcf.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), SMALL_VCF);
    }

    #[rstest]
    #[case("out.vcf")]
    #[case("out.vcf.gz")]
    fn test_write_and_read_file(small_vcf: Vcf, #[case] name: &str) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(name);
        small_vcf.write(&path).unwrap();
        assert_eq!(Vcf::from_path(&path).unwrap(), small_vcf);
    }

    #[rstest]
    fn test_no_meta_lines() {
        let text = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\nchr1\t1\t.\tA\tG\t.\t.\t.\n";
        assert!(matches!(
            Vcf::from_reader(text.as_bytes()),
            Err(VcfError::NoMeta)
        ));
        assert!(matches!(Vcf::from_reader("".as_bytes()), Err(VcfError::NoMeta)));
    }

    #[rstest]
    fn test_fileformat_must_come_first() {
        let text = "##source=x\n##fileformat=VCFv4.2\n";
        match Vcf::from_reader(text.as_bytes()) {
            Err(VcfError::MissingFileFormat(first)) => assert_eq!(first, "##source=x"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    fn test_parse_errors_carry_line_numbers() {
        let text = "##fileformat=VCFv4.3\nchr1\tx\t.\tA\tG\t.\t.\t.\n";
        match Vcf::from_reader(text.as_bytes()) {
            Err(VcfError::Parse { line, source }) => {
                assert_eq!(line, 2);
                assert!(matches!(*source, VcfError::InvalidPos(_)));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
