use std::io::{BufRead, Lines};
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use ngstk_core::utils::{get_dynamic_reader, md5_file};

use crate::errors::{FastaError, GenomeError};
use crate::sequence::Sequence;

/// Where a set of sequences came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastaFile {
    pub path: PathBuf,
    /// md5 of the file's bytes as stored on disk.
    pub md5: String,
}

impl FastaFile {
    pub fn from_path(path: &Path) -> Result<Self, GenomeError> {
        Ok(FastaFile {
            path: path.to_path_buf(),
            md5: md5_file(path)?,
        })
    }
}

///
/// Streaming FASTA reader yielding one [`Sequence`] per record.
///
/// `;` comment lines before the first record are collected as file headers.
/// Blank lines are ignored.
///
pub struct FastaReader<R: BufRead> {
    lines: Lines<R>,
    headers: Vec<String>,
    next_header: Option<String>,
    line_number: usize,
    record_count: usize,
    source: Option<FastaFile>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Result<Self, FastaError> {
        let mut fasta = FastaReader {
            lines: reader.lines(),
            headers: Vec::new(),
            next_header: None,
            line_number: 0,
            record_count: 0,
            source: None,
        };

        for line in fasta.lines.by_ref() {
            let line = line?;
            fasta.line_number += 1;
            if line.starts_with(';') {
                fasta.headers.push(line);
            } else if line.starts_with('>') {
                fasta.next_header = Some(line);
                break;
            } else if !line.trim().is_empty() {
                return Err(FastaError::SequenceBeforeHeader(fasta.line_number));
            }
        }

        Ok(fasta)
    }

    /// Attach a file descriptor to every sequence this reader yields.
    pub fn with_source(mut self, source: FastaFile) -> Self {
        self.source = Some(source);
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Records yielded so far.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    fn read_record(&mut self, header: String) -> Result<Sequence, FastaError> {
        let mut seq = Sequence::from_header(&header);
        seq.fasta_file = self.source.clone();

        for line in self.lines.by_ref() {
            let line = line?;
            self.line_number += 1;
            if line.starts_with('>') {
                self.next_header = Some(line);
                break;
            }
            if line.starts_with(';') {
                continue;
            }
            seq.sequence.push_str(line.trim_end());
        }

        self.record_count += 1;
        Ok(seq)
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<Sequence, FastaError>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.next_header.take()?;
        Some(self.read_record(header))
    }
}

///
/// Read every sequence of a FASTA file, gzipped or not. Each sequence
/// references a [`FastaFile`] carrying the file's md5.
///
/// # Arguments
/// - path: path to a `.fa`, `.fasta` or `.gz` file
///
pub fn parse_fasta_file(path: &Path) -> Result<Vec<Sequence>, GenomeError> {
    let wrap = |source: FastaError| GenomeError::Fasta {
        path: path.display().to_string(),
        source,
    };

    let source = FastaFile::from_path(path)?;
    let reader = FastaReader::new(get_dynamic_reader(path)?)
        .map_err(wrap)?
        .with_source(source);
    let sequences = reader.collect::<Result<Vec<_>, _>>().map_err(wrap)?;

    info!("Read {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}
