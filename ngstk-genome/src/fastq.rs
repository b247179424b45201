use std::fmt::{self, Display};
use std::io::{BufRead, Lines};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FastqError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastqRecord {
    /// Read id without the leading `@`.
    pub id: String,
    pub bases: String,
    pub qualities: String,
}

impl FastqRecord {
    fn from_lines(id: &str, bases: &str, plus: &str, qualities: &str) -> Result<Self, FastqError> {
        let id = id
            .strip_prefix('@')
            .ok_or_else(|| FastqError::MissingAt(id.to_string()))?;
        if !plus.starts_with('+') {
            return Err(FastqError::MissingPlus(id.to_string()));
        }

        let record = FastqRecord {
            id: id.to_string(),
            bases: bases.to_string(),
            qualities: qualities.to_string(),
        };
        record.check_valid()?;
        Ok(record)
    }

    /// Every base needs exactly one quality score.
    pub fn check_valid(&self) -> Result<(), FastqError> {
        if self.bases.len() != self.qualities.len() {
            return Err(FastqError::LengthMismatch {
                id: self.id.clone(),
                bases: self.bases.len(),
                qualities: self.qualities.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

impl FromStr for FastqRecord {
    type Err = FastqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().collect();
        if lines.len() < 4 {
            return Err(FastqError::Truncated(lines.len()));
        }
        FastqRecord::from_lines(lines[0], lines[1], lines[2], lines[3])
    }
}

impl Display for FastqRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@{}", self.id)?;
        writeln!(f, "{}", self.bases)?;
        writeln!(f, "+")?;
        writeln!(f, "{}", self.qualities)
    }
}

///
/// Streaming FASTQ reader. `#` lines at the top of the file are kept as
/// headers, then records are read four lines at a time.
///
pub struct FastqReader<R: BufRead> {
    lines: Lines<R>,
    headers: Vec<String>,
    pending: Option<String>,
    record_count: usize,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Result<Self, FastqError> {
        let mut fastq = FastqReader {
            lines: reader.lines(),
            headers: Vec::new(),
            pending: None,
            record_count: 0,
        };

        for line in fastq.lines.by_ref() {
            let line = line?;
            if line.starts_with('#') {
                fastq.headers.push(line);
            } else {
                fastq.pending = Some(line);
                break;
            }
        }

        Ok(fastq)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    fn next_line(&mut self) -> Result<Option<String>, FastqError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        Ok(self.lines.next().transpose()?)
    }

    fn read_record(&mut self, id: String) -> Result<FastqRecord, FastqError> {
        let mut rest = Vec::with_capacity(3);
        while rest.len() < 3 {
            match self.next_line()? {
                Some(line) => rest.push(line),
                None => return Err(FastqError::Truncated(rest.len() + 1)),
            }
        }
        let record = FastqRecord::from_lines(
            id.trim_end(),
            rest[0].trim_end(),
            &rest[1],
            rest[2].trim_end(),
        )?;
        self.record_count += 1;
        Ok(record)
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = Result<FastqRecord, FastqError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            };
            if id.trim().is_empty() {
                continue;
            }
            return Some(self.read_record(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_record_from_str() {
        let r: FastqRecord = "@read1 extra\nACGT\n+\nIIII\n".parse().unwrap();
        assert_eq!(r.id, "read1 extra");
        assert_eq!(r.bases, "ACGT");
        assert_eq!(r.qualities, "IIII");
        assert_eq!(r.to_string(), "@read1 extra\nACGT\n+\nIIII\n");
    }

    #[rstest]
    #[case("read1\nACGT\n+\nIIII")]
    #[case("@read1\nACGT\n-\nIIII")]
    #[case("@read1\nACGT\n+\nIII")]
    #[case("@read1\nACGT\n+")]
    fn test_invalid_records(#[case] input: &str) {
        assert!(input.parse::<FastqRecord>().is_err());
    }

    #[rstest]
    fn test_reader() {
        let input = "# run 42\n# lane 1\n@r1\nAC\n+r1\n!!\n\n@r2\nGGG\n+\n#A#\n";
        let mut reader = FastqReader::new(Cursor::new(input)).unwrap();
        assert_eq!(reader.headers().len(), 2);

        let records: Vec<FastqRecord> = reader.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "r2");
        assert_eq!(records[1].qualities, "#A#");
        assert_eq!(reader.record_count(), 2);
    }

    #[rstest]
    fn test_reader_truncated() {
        let mut reader = FastqReader::new(Cursor::new("@r1\nAC\n+\n")).unwrap();
        assert!(matches!(reader.next(), Some(Err(FastqError::Truncated(3)))));
    }
}
