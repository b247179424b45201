use serde::{Deserialize, Serialize};

use crate::errors::SequenceError;
use crate::fasta::FastaFile;

/// One named sequence, usually a FASTA record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Header line as read, including the leading `>`.
    pub header: String,
    pub name: String,
    pub info: String,
    pub sequence: String,
    pub fasta_file: Option<FastaFile>,
}

impl Sequence {
    pub fn new(header: &str, sequence: &str) -> Self {
        let mut s = Sequence::from_header(header);
        s.sequence = sequence.to_string();
        s
    }

    ///
    /// An empty sequence named after a FASTA header. The name runs up to the
    /// first whitespace or `|`; the rest, without its leading separators, is
    /// the info.
    ///
    pub fn from_header(header: &str) -> Self {
        let trimmed = header.trim_start_matches([' ', '>']).trim();
        let (name, info) = match trimmed.find(|c: char| c.is_whitespace() || c == '|') {
            Some(idx) => (
                &trimmed[..idx],
                trimmed[idx..].trim_start_matches(|c: char| c.is_whitespace() || c == '|'),
            ),
            None => (trimmed, ""),
        };

        Sequence {
            header: header.to_string(),
            name: name.to_string(),
            info: info.to_string(),
            sequence: String::new(),
            fasta_file: None,
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    ///
    /// Clamp a 1-based position to the sequence.
    ///
    /// # Returns
    /// - the clamped position and whether it was already inside the sequence
    pub fn within_limits(&self, position: i64) -> (usize, bool) {
        let len = self.len();
        if position < 1 {
            (1, false)
        } else if position as u64 > len as u64 {
            (len, false)
        } else {
            (position as usize, true)
        }
    }

    ///
    /// The bases from `start` to `end`, 1-based and inclusive. An `end` of 0
    /// means "to the end of the sequence".
    ///
    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<&str, SequenceError> {
        let len = self.len();
        if start < 1 {
            return Err(SequenceError::StartBeforeOne(start));
        }
        if end > len {
            return Err(SequenceError::EndBeyondSequence { end, len });
        }
        if start > len {
            return Err(SequenceError::StartBeyondSequence { start, len });
        }
        let end = if end == 0 { len } else { end };
        if start > end {
            return Err(SequenceError::StartAfterEnd { start, end });
        }
        self.sequence
            .get(start - 1..end)
            .ok_or(SequenceError::NotOnCharBoundary { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(">chr1", "chr1", "")]
    #[case(">chr1 AC:CM000663.2 gi:568336023", "chr1", "AC:CM000663.2 gi:568336023")]
    #[case("> chr7\tprimary assembly ", "chr7", "primary assembly")]
    #[case(">sp|P69905|HBA_HUMAN", "sp", "P69905|HBA_HUMAN")]
    #[case(">seq1 | some info", "seq1", "some info")]
    fn test_parse_header(#[case] header: &str, #[case] name: &str, #[case] info: &str) {
        let s = Sequence::from_header(header);
        assert_eq!(s.name, name);
        assert_eq!(s.info, info);
        assert_eq!(s.header, header);
    }

    #[fixture]
    fn seq() -> Sequence {
        Sequence::new(">s", "ACGTNACGTN")
    }

    #[rstest]
    #[case(-3, 1, false)]
    #[case(0, 1, false)]
    #[case(1, 1, true)]
    #[case(10, 10, true)]
    #[case(11, 10, false)]
    fn test_within_limits(
        seq: Sequence,
        #[case] position: i64,
        #[case] clamped: usize,
        #[case] inside: bool,
    ) {
        assert_eq!(seq.within_limits(position), (clamped, inside));
    }

    #[rstest]
    #[case(1, 4, "ACGT")]
    #[case(5, 5, "N")]
    #[case(6, 0, "ACGTN")]
    #[case(1, 10, "ACGTNACGTN")]
    fn test_sub_sequence(seq: Sequence, #[case] start: usize, #[case] end: usize, #[case] expected: &str) {
        assert_eq!(seq.sub_sequence(start, end), Ok(expected));
    }

    #[rstest]
    #[case(0, 4, SequenceError::StartBeforeOne(0))]
    #[case(1, 11, SequenceError::EndBeyondSequence { end: 11, len: 10 })]
    #[case(11, 0, SequenceError::StartBeyondSequence { start: 11, len: 10 })]
    #[case(5, 4, SequenceError::StartAfterEnd { start: 5, end: 4 })]
    fn test_sub_sequence_errors(
        seq: Sequence,
        #[case] start: usize,
        #[case] end: usize,
        #[case] expected: SequenceError,
    ) {
        assert_eq!(seq.sub_sequence(start, end), Err(expected));
    }

    #[rstest]
    fn test_sub_sequence_multibyte_does_not_panic() {
        // "é" is two bytes, so byte 2 is inside a character
        let seq = Sequence::new(">odd", "AéGT");
        assert_eq!(
            seq.sub_sequence(2, 2),
            Err(SequenceError::NotOnCharBoundary { start: 2, end: 2 })
        );
        assert_eq!(seq.sub_sequence(2, 3), Ok("é"));
    }
}
