use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use log::info;

use ngstk_core::Selector;
use ngstk_core::utils::get_dynamic_reader;

use crate::errors::{FeatureError, Gff3Error};
use crate::feature::Feature;
use crate::features::{Features, SeqIdView};
use crate::tree::Tree;

/// Ensembl separates gene models with this line; it carries no information.
const DIVIDER: &str = "###";

/// A GFF3 file: its `#` header lines and its features.
#[derive(Debug, Clone, PartialEq)]
pub struct Gff3 {
    pub name: String,
    pub file: Option<PathBuf>,
    pub header: Vec<String>,
    pub features: Features,
}

impl Gff3 {
    ///
    /// Read a GFF3 file, gzipped or not.
    ///
    /// # Arguments
    /// - path: path to a `.gff3` or `.gff3.gz` file
    ///
    pub fn from_path(path: &Path) -> Result<Self, Gff3Error> {
        let reader = get_dynamic_reader(path)?;
        let name = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();

        let mut gff3 = Gff3::from_reader(reader, &name)?;
        gff3.file = Some(path.to_path_buf());
        info!(
            "Read {} features on {} sequences from {}",
            gff3.features.len(),
            gff3.seq_ids().len(),
            path.display()
        );
        Ok(gff3)
    }

    ///
    /// Read GFF3 records from any buffered reader.
    ///
    /// Lines starting with `#` are headers (the `###` divider is dropped), all
    /// other lines are features. The first header must be the
    /// `##gff-version 3` line.
    ///
    pub fn from_reader<R: BufRead>(reader: R, name: &str) -> Result<Self, Gff3Error> {
        let mut header = Vec::new();
        let mut features = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = idx + 1;
            if line.starts_with('#') {
                if line != DIVIDER {
                    header.push(line);
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let mut feature = Feature::from_line(&line).map_err(|source| Gff3Error::Parse {
                line: line_number,
                source,
            })?;
            feature.line_number = line_number;
            features.push(feature);
        }

        let first = header.first().ok_or(Gff3Error::NoHeaders)?;
        if features.is_empty() {
            return Err(Gff3Error::NoRecords);
        }
        if !is_version_line(first) {
            return Err(Gff3Error::NotGff3(first.clone()));
        }

        Ok(Gff3 {
            name: name.to_string(),
            file: None,
            header,
            features: Features::from_features("gff3", name, features),
        })
    }

    /// Write headers and features. A `.gz` path is gzip compressed.
    pub fn write(&self, path: &Path) -> Result<(), Gff3Error> {
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
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), Gff3Error> {
        for h in &self.header {
            writeln!(writer, "{}", h)?;
        }
        for f in &self.features {
            writeln!(writer, "{}", f)?;
        }
        Ok(())
    }

    pub fn seq_ids(&self) -> Vec<String> {
        self.features.seq_ids()
    }

    pub fn feature_attributes(&self) -> BTreeMap<String, usize> {
        self.features.attribute_tally()
    }

    pub fn keep_by_seq_id(&mut self, pattern: &str) -> Result<Vec<String>, FeatureError> {
        self.features.keep_by_seq_id(pattern)
    }

    pub fn delete_by_seq_id(&mut self, pattern: &str) -> Result<Vec<String>, FeatureError> {
        self.features.delete_by_seq_id(pattern)
    }

    pub fn apply_selector(&mut self, selector: &Selector) -> Result<Vec<String>, FeatureError> {
        self.features.apply_selector(selector)
    }

    pub fn by_seq_id(&self) -> BTreeMap<String, SeqIdView<'_>> {
        self.features.by_seq_id()
    }

    pub fn tree(&self) -> Tree {
        Tree::from_features(&self.features)
    }

    ///
    /// Headers with `-<suffix>` inserted after their leading `#` token, so
    /// headers from several files can be kept apart in one merged output:
    /// `##gff-version 3` becomes `##gff-version-2 3`.
    ///
    pub fn versioned_headers(&self, suffix: &str) -> Vec<String> {
        self.header
            .iter()
            .map(|h| {
                if !h.starts_with('#') {
                    return h.clone();
                }
                let split = h.find(['\t', ' ']).unwrap_or(h.len());
                format!("{}-{}{}", &h[..split], suffix, &h[split..])
            })
            .collect()
    }
}

/// `##gff-version`, at least one whitespace character, then `3`.
fn is_version_line(line: &str) -> bool {
    line.strip_prefix("##gff-version")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace) && rest.trim_start().starts_with('3'))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    const ENSEMBL: &str = "##gff-version   3
##sequence-region   1 1 249250621
#!genome-build  GRCh37.p13
1\tensembl\tgene\t11869\t14409\t.\t+\t.\tID=gene:G1;Name=DDX11L1
1\thavana\ttranscript\t11869\t14409\t.\t+\t.\tID=transcript:T1;Parent=gene:G1
1\thavana\texon\t11869\t12227\t.\t+\t.\tParent=transcript:T1
###
2\tensembl\tgene\t100\t200\t.\t-\t.\tID=gene:G2
MT\tinsdc\tregion\t1\t16569\t.\t.\t.
";

    #[fixture]
    fn gff3() -> Gff3 {
        Gff3::from_reader(Cursor::new(ENSEMBL), "ensembl").unwrap()
    }

    #[rstest]
    fn test_read_headers_and_features(gff3: Gff3) {
        assert_eq!(gff3.header.len(), 3);
        assert_eq!(gff3.features.len(), 5);
        assert_eq!(gff3.features.id(), "gff3:ensembl");
        assert_eq!(gff3.seq_ids(), vec!["1", "2", "MT"]);

        // the divider line still counts towards line numbers
        let g2 = gff3.features.feature(3).unwrap();
        assert_eq!(g2.line_number, 8);
    }

    #[rstest]
    fn test_feature_attributes(gff3: Gff3) {
        let attrs = gff3.feature_attributes();
        assert_eq!(attrs.get("ID"), Some(&3));
        assert_eq!(attrs.get("Parent"), Some(&2));
        assert_eq!(attrs.get("Name"), Some(&1));
    }

    #[rstest]
    #[case("1\ts\tgene\t1\t2\t.\t+\t.\n")]
    #[case("")]
    fn test_no_headers(#[case] input: &str) {
        assert!(matches!(
            Gff3::from_reader(Cursor::new(input), "x"),
            Err(Gff3Error::NoHeaders)
        ));
    }

    #[rstest]
    fn test_no_records() {
        assert!(matches!(
            Gff3::from_reader(Cursor::new("##gff-version 3\n"), "x"),
            Err(Gff3Error::NoRecords)
        ));
    }

    #[rstest]
    fn test_not_gff3() {
        let input = "##gff-version 2\n1\ts\tgene\t1\t2\t.\t+\t.\n";
        match Gff3::from_reader(Cursor::new(input), "x") {
            Err(Gff3Error::NotGff3(line)) => assert_eq!(line, "##gff-version 2"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    fn test_parse_error_reports_line() {
        let input = "##gff-version 3\n1\ts\tgene\t1\t2\t.\t+\t.\n1\ts\tgene\tx\t2\t.\t+\t.\n";
        match Gff3::from_reader(Cursor::new(input), "x") {
            Err(Gff3Error::Parse { line, source }) => {
                assert_eq!(line, 3);
                assert!(matches!(source, FeatureError::InvalidCoordinate { .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    fn test_versioned_headers(gff3: Gff3) {
        assert_eq!(
            gff3.versioned_headers("2"),
            vec![
                "##gff-version-2   3",
                "##sequence-region-2   1 1 249250621",
                "#!genome-build-2  GRCh37.p13",
            ]
        );
    }

    #[rstest]
    #[case("##gff-version 3", true)]
    #[case("##gff-version\t3.1.26", true)]
    #[case("##gff-version3", false)]
    #[case("##gff-version 2", false)]
    #[case("#gff-version 3", false)]
    fn test_is_version_line(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_version_line(line), expected);
    }

    #[rstest]
    fn test_keep_by_seq_id(mut gff3: Gff3) {
        let kept = gff3.keep_by_seq_id("^[0-9]+$").unwrap();
        assert_eq!(kept, vec!["1", "2"]);
        assert_eq!(gff3.features.len(), 4);
    }

    #[rstest]
    fn test_write_and_reread(gff3: Gff3) {
        let dir = tempdir().unwrap();
        for name in ["out.gff3", "out.gff3.gz"] {
            let path = dir.path().join(name);
            gff3.write(&path).unwrap();

            let again = Gff3::from_path(&path).unwrap();
            assert_eq!(again.header, gff3.header);
            assert_eq!(again.name, name);
            assert_eq!(
                again.features.iter().map(Feature::to_line).collect::<Vec<_>>(),
                gff3.features.iter().map(Feature::to_line).collect::<Vec<_>>()
            );
        }
    }
}
