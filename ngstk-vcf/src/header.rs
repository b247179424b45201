use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{FORMAT_COLUMN, MANDATORY_COLUMNS};
use crate::errors::VcfError;

/// The `#CHROM` column header. FORMAT is only written when there are samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub samples: Vec<String>,
}

impl FromStr for Header {
    type Err = VcfError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
        if fields.len() < MANDATORY_COLUMNS.len() || fields[0] != MANDATORY_COLUMNS[0] {
            return Err(VcfError::MalformedHeader(line.to_string()));
        }

        let samples = match fields.get(MANDATORY_COLUMNS.len()) {
            Some(&FORMAT_COLUMN) => fields[MANDATORY_COLUMNS.len() + 1..]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Some(_) => return Err(VcfError::MalformedHeader(line.to_string())),
            None => Vec::new(),
        };
        Ok(Header { samples })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MANDATORY_COLUMNS.join("\t"))?;
        if !self.samples.is_empty() {
            write!(f, "\t{}\t{}", FORMAT_COLUMN, self.samples.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO", vec![])]
    #[case("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA001\tNA002", vec!["NA001", "NA002"])]
    fn test_header_round_trip(#[case] line: &str, #[case] samples: Vec<&str>) {
        let header: Header = line.parse().unwrap();
        assert_eq!(header.samples, samples);
        assert_eq!(header.to_string(), line);
    }

    #[rstest]
    #[case("#CHROM\tPOS")]
    #[case("CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO")]
    #[case("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tNA001")]
    fn test_malformed_header(#[case] line: &str) {
        assert!(matches!(
            line.parse::<Header>(),
            Err(VcfError::MalformedHeader(_))
        ));
    }
}
