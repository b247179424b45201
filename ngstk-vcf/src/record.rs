use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::MISSING;
use crate::errors::VcfError;

///
/// One data line. POS and QUAL are `None` when the file has `.` so a missing
/// value is written back as `.` rather than zero.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub chrom: String,
    pub pos: Option<u64>,
    pub id: String,
    pub reference: String,
    pub alt: String,
    pub qual: Option<f64>,
    pub filter: String,
    pub info: String,
    pub format: Option<String>,
    pub samples: Vec<String>,
}

impl Record {
    pub fn from_line(line: &str) -> Result<Self, VcfError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            return Err(VcfError::FieldCount {
                found: fields.len(),
                line: line.to_string(),
            });
        }

        let pos = match fields[1] {
            MISSING => None,
            p => Some(p.parse().map_err(|_| VcfError::InvalidPos(p.to_string()))?),
        };
        let qual = match fields[5] {
            MISSING => None,
            q => Some(q.parse().map_err(|_| VcfError::InvalidQual(q.to_string()))?),
        };

        Ok(Record {
            chrom: fields[0].to_string(),
            pos,
            id: fields[2].to_string(),
            reference: fields[3].to_string(),
            alt: fields[4].to_string(),
            qual,
            filter: fields[6].to_string(),
            info: fields[7].to_string(),
            format: fields.get(8).map(|f| f.to_string()),
            samples: fields.iter().skip(9).map(|s| s.to_string()).collect(),
        })
    }

    pub fn has_genotypes(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Sample values split on `:`, paired with the FORMAT keys.
    pub fn sample_fields(&self, sample: usize) -> Option<Vec<(&str, &str)>> {
        let format = self.format.as_deref()?;
        let values = self.samples.get(sample)?;
        Some(format.split(':').zip(values.split(':')).collect())
    }
}

impl FromStr for Record {
    type Err = VcfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Record::from_line(s)
    }
}

fn or_missing(value: &str) -> &str {
    if value.is_empty() { MISSING } else { value }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.pos.map_or_else(|| MISSING.to_string(), |p| p.to_string());
        let qual = self.qual.map_or_else(|| MISSING.to_string(), |q| q.to_string());
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            or_missing(&self.chrom),
            pos,
            or_missing(&self.id),
            or_missing(&self.reference),
            or_missing(&self.alt),
            qual,
            or_missing(&self.filter),
            or_missing(&self.info),
        )?;

        if self.has_genotypes() {
            write!(f, "\t{}", or_missing(self.format.as_deref().unwrap_or_default()))?;
            for s in &self.samples {
                write!(f, "\t{}", or_missing(s))?;
            }
        }
        Ok(())
    }
}
