use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::allen::{AllenRelation, GenomicInterval};
use crate::consts::{
    DEFAULT_TYPE, ID_ATTR, IDS_ATTR, MERGE_SOURCE, MISSING, SOURCES_ATTR, TYPES_ATTR,
};
use crate::errors::FeatureError;

/// One GFF3 record: a closed, 1-based interval on `seq_id` plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub seq_id: String,
    pub source: String,
    pub feature_type: String,
    pub start: u64,
    pub end: u64,
    pub score: String,
    pub strand: String,
    pub phase: String,
    pub attributes: BTreeMap<String, String>,
    pub line_number: usize,
}

impl Default for Feature {
    fn default() -> Self {
        Feature {
            seq_id: String::new(),
            source: MISSING.to_string(),
            feature_type: DEFAULT_TYPE.to_string(),
            start: 0,
            end: 0,
            score: MISSING.to_string(),
            strand: MISSING.to_string(),
            phase: MISSING.to_string(),
            attributes: BTreeMap::new(),
            line_number: 0,
        }
    }
}

impl GenomicInterval for Feature {
    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> u64 {
        self.end
    }
}

impl Feature {
    pub fn new(seq_id: &str, start: u64, end: u64) -> Self {
        Feature {
            seq_id: seq_id.to_string(),
            start,
            end,
            ..Default::default()
        }
    }

    ///
    /// Parse one tab-delimited GFF3 feature line.
    ///
    /// The line must have 8 or 9 fields. Attributes are `;`-separated
    /// `key=value` pairs; a bare `key` is stored with an empty value and empty
    /// tokens are skipped.
    ///
    pub fn from_line(line: &str) -> Result<Self, FeatureError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 8 && fields.len() != 9 {
            return Err(FeatureError::FieldCount(fields.len()));
        }

        let start = parse_coordinate("start", fields[3])?;
        let end = parse_coordinate("end", fields[4])?;
        if end < start {
            return Err(FeatureError::InvalidInterval { start, end });
        }

        let attributes = match fields.get(8) {
            Some(raw) => parse_attributes(raw),
            None => BTreeMap::new(),
        };

        Ok(Feature {
            seq_id: fields[0].to_string(),
            source: fields[1].to_string(),
            feature_type: fields[2].to_string(),
            start,
            end,
            score: fields[5].to_string(),
            strand: fields[6].to_string(),
            phase: fields[7].to_string(),
            attributes,
            line_number: 0,
        })
    }

    /// Number of bases covered.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The attributes as `key=value` pairs sorted by key and joined with `;`.
    pub fn attributes_string(&self) -> String {
        self.attributes
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(";")
    }

    ///
    /// Like [`Feature::attributes_string`] but only the listed keys, in the
    /// listed order. Keys this feature does not have are skipped.
    ///
    pub fn selected_attributes_string<S: AsRef<str>>(&self, keys: &[S]) -> String {
        keys.iter()
            .filter_map(|k| {
                self.attributes
                    .get(k.as_ref())
                    .map(|v| format!("{}={}", k.as_ref(), v))
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// The canonical 9-column line form of this feature.
    pub fn to_line(&self) -> String {
        self.to_string()
    }

    ///
    /// Merge `other` into this feature, destructively.
    ///
    /// The interval widens to cover both. Each scalar field is kept if both
    /// features agree and becomes `.` otherwise. An attribute survives only if
    /// both features carry it with the same value.
    ///
    /// Nothing is modified when an error is returned.
    ///
    pub fn merge_in_place(&mut self, other: &Feature) -> Result<(), FeatureError> {
        if self.seq_id != other.seq_id {
            return Err(FeatureError::SeqIdMismatch {
                a: self.seq_id.clone(),
                b: other.seq_id.clone(),
            });
        }
        self.check_interval()?;
        other.check_interval()?;

        self.start = self.start.min(other.start);
        self.end = self.end.max(other.end);

        agree_or_missing(&mut self.source, &other.source);
        agree_or_missing(&mut self.feature_type, &other.feature_type);
        agree_or_missing(&mut self.score, &other.score);
        agree_or_missing(&mut self.strand, &other.strand);
        agree_or_missing(&mut self.phase, &other.phase);

        self.attributes
            .retain(|k, v| other.attributes.get(k).is_some_and(|ov| ov == v));

        Ok(())
    }

    /// Non-destructive [`Feature::merge_in_place`]: returns the merged copy.
    pub fn merged(&self, other: &Feature) -> Result<Feature, FeatureError> {
        let mut merged = self.clone();
        merged.merge_in_place(other)?;
        Ok(merged)
    }

    pub(crate) fn check_interval(&self) -> Result<(), FeatureError> {
        if self.is_valid_interval() {
            Ok(())
        } else {
            Err(FeatureError::InvalidInterval {
                start: self.start,
                end: self.end,
            })
        }
    }

    fn with_span(&self, start: u64, end: u64) -> Feature {
        let mut f = self.clone();
        f.start = start;
        f.end = end;
        f
    }
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<u64, FeatureError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| FeatureError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}

fn parse_attributes(raw: &str) -> BTreeMap<String, String> {
    raw.trim()
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
            None => (token.to_string(), String::new()),
        })
        .collect()
}

fn agree_or_missing(mine: &mut String, theirs: &str) {
    if mine != theirs {
        *mine = MISSING.to_string();
    }
}

impl FromStr for Feature {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::from_line(s)
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seq_id,
            self.source,
            self.feature_type,
            self.start,
            self.end,
            self.score,
            self.strand,
            self.phase,
            self.attributes_string()
        )
    }
}

///
/// Split two features into the minimal set of non-overlapping features that
/// cover exactly the bases of `a ∪ b`.
///
/// Bases covered by both become one overlap feature (source `merge`) whose
/// `Sources`, `Types` and `IDs` attributes record every contributor. Overlap
/// features fed back in are unpacked, so repeated merges never double count.
/// Neither input is modified.
///
/// # Arguments
/// - a: the feature that starts first
/// - b: the feature that starts at or after `a`
///
/// # Returns
/// - the pieces ordered by start
///
pub fn prudent_merge(a: &Feature, b: &Feature) -> Result<Vec<Feature>, FeatureError> {
    a.check_interval()?;
    b.check_interval()?;
    if a.start > b.start {
        return Err(FeatureError::OutOfOrder {
            a_start: a.start,
            b_start: b.start,
        });
    }

    let overlap = |start: u64, end: u64| {
        let mut o = overlap_feature(a, b);
        o.start = start;
        o.end = end;
        o
    };

    let relation = a.relation_to(b);
    let pieces = match relation {
        AllenRelation::Precedes | AllenRelation::Meets => vec![a.clone(), b.clone()],
        AllenRelation::Overlaps => vec![
            a.with_span(a.start, b.start - 1),
            overlap(b.start, a.end),
            b.with_span(a.end + 1, b.end),
        ],
        AllenRelation::Starts => vec![overlap(a.start, a.end), b.with_span(a.end + 1, b.end)],
        AllenRelation::Contains => vec![
            a.with_span(a.start, b.start - 1),
            overlap(b.start, b.end),
            a.with_span(b.end + 1, a.end),
        ],
        AllenRelation::Equals => vec![overlap(a.start, a.end)],
        AllenRelation::IsFinishedBy => {
            vec![a.with_span(a.start, b.start - 1), overlap(b.start, b.end)]
        }
        AllenRelation::IsStartedBy => vec![overlap(b.start, b.end), a.with_span(b.end + 1, a.end)],
        AllenRelation::Finishes
        | AllenRelation::IsContainedBy
        | AllenRelation::IsOverlappedBy
        | AllenRelation::IsMetBy
        | AllenRelation::IsPrecededBy => {
            return Err(FeatureError::UnexpectedRelation {
                relation,
                a: a.to_string(),
                b: b.to_string(),
            });
        }
    };

    Ok(pieces)
}

fn overlap_feature(a: &Feature, b: &Feature) -> Feature {
    let mut sources = BTreeSet::new();
    let mut types = BTreeSet::new();
    let mut ids = BTreeSet::new();

    for f in [a, b] {
        if f.source == MERGE_SOURCE {
            for (attr, set) in [
                (SOURCES_ATTR, &mut sources),
                (TYPES_ATTR, &mut types),
                (IDS_ATTR, &mut ids),
            ] {
                if let Some(packed) = f.attributes.get(attr) {
                    set.extend(
                        packed
                            .split(',')
                            .filter(|s| !s.is_empty())
                            .map(str::to_string),
                    );
                }
            }
        } else {
            sources.insert(f.source.clone());
            types.insert(f.feature_type.clone());
            if let Some(id) = f.attributes.get(ID_ATTR).filter(|id| !id.is_empty()) {
                ids.insert(id.clone());
            }
        }
    }

    let join = |set: BTreeSet<String>| set.into_iter().collect::<Vec<_>>().join(",");

    let mut o = Feature::new(&a.seq_id, a.start, a.end);
    o.source = MERGE_SOURCE.to_string();
    o.attributes.insert(SOURCES_ATTR.to_string(), join(sources));
    o.attributes.insert(TYPES_ATTR.to_string(), join(types));
    if !ids.is_empty() {
        o.attributes.insert(IDS_ATTR.to_string(), join(ids));
    }
    o
}
