//! Record selectors of the form `operation:subject:pattern`.
//!
//! A selector names what to do (`keep` or `delete`), which field it applies to
//! (for example `seqid`), and a regular expression matched against that field.
//! Only the first two `:` split the string, so the pattern itself may contain `:`.
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SelectorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorOperation {
    Keep,
    Delete,
}

impl FromStr for SelectorOperation {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(SelectorOperation::Keep),
            "delete" => Ok(SelectorOperation::Delete),
            other => Err(SelectorError::UnknownOperation(other.to_string())),
        }
    }
}

impl Display for SelectorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorOperation::Keep => write!(f, "keep"),
            SelectorOperation::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub operation: SelectorOperation,
    pub subject: String,
    pub pattern: String,
}

impl Selector {
    pub fn new(operation: SelectorOperation, subject: &str, pattern: &str) -> Self {
        Selector {
            operation,
            subject: subject.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, ':').collect();
        if parts.len() != 3 || parts[1].is_empty() {
            return Err(SelectorError::MalformedSelector(s.to_string()));
        }

        Ok(Selector {
            operation: parts[0].parse()?,
            subject: parts[1].to_string(),
            pattern: parts[2].to_string(),
        })
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.operation, self.subject, self.pattern)
    }
}

///
/// Parse a list of selector strings, stopping at the first malformed one.
///
pub fn parse_selectors<S: AsRef<str>>(selectors: &[S]) -> Result<Vec<Selector>, SelectorError> {
    selectors.iter().map(|s| s.as_ref().parse()).collect()
}
