use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::VcfError;

///
/// A `##` meta line.
///
/// Structured lines (`##INFO=<ID=DP,Number=1,...>`) keep their inner text as
/// read so they are written back unchanged, along with the key/value pairs
/// in file order. Quoted values may contain commas and `=`.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaLine {
    Unstructured {
        key: String,
        value: String,
    },
    Structured {
        key: String,
        raw: String,
        fields: Vec<(String, String)>,
    },
}

impl MetaLine {
    pub fn key(&self) -> &str {
        match self {
            MetaLine::Unstructured { key, .. } | MetaLine::Structured { key, .. } => key,
        }
    }

    /// Value of `field` in a structured line, without surrounding quotes.
    pub fn field(&self, field: &str) -> Option<&str> {
        match self {
            MetaLine::Unstructured { .. } => None,
            MetaLine::Structured { fields, .. } => fields
                .iter()
                .find(|(k, _)| k == field)
                .map(|(_, v)| v.trim_matches('"')),
        }
    }

    /// `ID` of a structured line such as `##INFO` or `##contig`.
    pub fn id(&self) -> Option<&str> {
        self.field("ID")
    }
}

/// Split on commas that are not inside double quotes.
fn split_unquoted(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

impl FromStr for MetaLine {
    type Err = VcfError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| VcfError::MalformedMeta {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let body = line
            .strip_prefix("##")
            .ok_or_else(|| malformed("meta lines start with ##"))?;
        let (key, value) = body
            .split_once('=')
            .ok_or_else(|| malformed("missing `=` after the key"))?;

        let Some(inner) = value.strip_prefix('<').and_then(|v| v.strip_suffix('>')) else {
            return Ok(MetaLine::Unstructured {
                key: key.to_string(),
                value: value.to_string(),
            });
        };

        let fields = split_unquoted(inner)
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((k, v)) => Ok((k.to_string(), v.to_string())),
                None => Err(malformed("structured field without `=`")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MetaLine::Structured {
            key: key.to_string(),
            raw: inner.to_string(),
            fields,
        })
    }
}

impl fmt::Display for MetaLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaLine::Unstructured { key, value } => write!(f, "##{}={}", key, value),
            MetaLine::Structured { key, raw, .. } => write!(f, "##{}=<{}>", key, raw),
        }
    }
}
