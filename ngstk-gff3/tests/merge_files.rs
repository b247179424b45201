use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::tempdir;

use ngstk_gff3::{Gff3, merge_features};

const ANNOTATION_A: &str = "##gff-version 3
chr1\tensembl\texon\t100\t200\t.\t+\t.\tID=exon:A1
chr1\tensembl\texon\t500\t600\t.\t+\t.\tID=exon:A2
chr2\tensembl\texon\t10\t20\t.\t-\t.\tID=exon:A3
";

const ANNOTATION_B: &str = "##gff-version 3
chr1\trepeatmasker\trepeat\t150\t550\t.\t.\t.\tID=rep:B1
chrX\trepeatmasker\trepeat\t1\t5\t.\t.\t.
";

fn write_gz(path: &Path, content: &str) {
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[rstest]
fn test_merge_two_annotation_files() {
    let dir = tempdir().unwrap();
    let path_a = dir.path().join("a.gff3");
    let path_b = dir.path().join("b.gff3.gz");
    std::fs::write(&path_a, ANNOTATION_A).unwrap();
    write_gz(&path_b, ANNOTATION_B);

    let a = Gff3::from_path(&path_a).unwrap();
    let b = Gff3::from_path(&path_b).unwrap();
    let merged = merge_features(&a.features, &b.features).unwrap();

    let lines: Vec<String> = merged.iter().map(|f| f.to_line()).collect();
    assert_eq!(
        lines,
        vec![
            "chr1\tensembl\texon\t100\t149\t.\t+\t.\tID=exon:A1",
            "chr1\tmerge\tsequence_feature\t150\t200\t.\t.\t.\tIDs=exon:A1,rep:B1;Sources=ensembl,repeatmasker;Types=exon,repeat",
            "chr1\trepeatmasker\trepeat\t201\t499\t.\t.\t.\tID=rep:B1",
            "chr1\tmerge\tsequence_feature\t500\t550\t.\t.\t.\tIDs=exon:A2,rep:B1;Sources=ensembl,repeatmasker;Types=exon,repeat",
            "chr1\tensembl\texon\t551\t600\t.\t+\t.\tID=exon:A2",
            "chr2\tensembl\texon\t10\t20\t.\t-\t.\tID=exon:A3",
            "chrX\trepeatmasker\trepeat\t1\t5\t.\t.\t.\t",
        ]
    );

    // coverage is preserved
    assert_eq!(
        merged.sum_intervals(),
        a.features.sum_consolidated_intervals().unwrap() + b.features.sum_intervals()
            - (51 + 51)
    );
}

#[rstest]
fn test_consolidate_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.gff3");
    std::fs::write(&path, ANNOTATION_A).unwrap();

    let mut gff3 = Gff3::from_path(&path).unwrap();
    gff3.features.sort();
    let chr1 = gff3.by_seq_id()["chr1"].to_features();
    assert_eq!(chr1.consolidated().unwrap().len(), 2);

    let out = dir.path().join("sorted.gff3");
    gff3.write(&out).unwrap();
    let again = Gff3::from_path(&out).unwrap();
    assert_eq!(again.features.len(), 3);
    assert_eq!(again.header, vec!["##gff-version 3"]);
}
