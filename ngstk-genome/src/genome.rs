use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use ngstk_core::RunParameters;
use ngstk_core::provenance::prepend;
use ngstk_core::utils::sha512t24u;

use crate::consts::{GENOME_SUFFIX, GENOME_VERSION};
use crate::errors::{GenomeError, SeedError};
use crate::fasta::{FastaFile, parse_fasta_file};
use crate::seed::Seed;
use crate::sequence::Sequence;

pub(crate) const TOOL: &str = "ngstk";
pub(crate) const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// A named set of sequences with the files they came from and a provenance
/// chain (most recent run first).
///
/// The identifier is assigned once at creation and survives serialization;
/// every [`Seed`] built from the genome carries it.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub name: String,
    id: String,
    pub sequences: Vec<Sequence>,
    pub fasta_files: Vec<FastaFile>,
    pub provenance: Vec<RunParameters>,
    pub version: String,
}

impl Genome {
    pub fn new(name: &str) -> Self {
        Genome {
            name: name.to_string(),
            id: new_genome_id(name),
            sequences: Vec::new(),
            fasta_files: Vec::new(),
            provenance: vec![RunParameters::capture(TOOL, TOOL_VERSION)],
            version: GENOME_VERSION.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record the current run at the head of the provenance chain.
    pub fn add_provenance(&mut self) {
        prepend(&mut self.provenance, RunParameters::capture(TOOL, TOOL_VERSION));
    }

    ///
    /// Append sequences. Names must be unique across the genome; nothing is
    /// added if any name clashes.
    ///
    /// # Returns
    /// - the number of sequences added
    pub fn add_sequences<I: IntoIterator<Item = Sequence>>(
        &mut self,
        sequences: I,
    ) -> Result<usize, GenomeError> {
        let incoming: Vec<Sequence> = sequences.into_iter().collect();

        let mut seen: HashSet<&str> = self.sequences.iter().map(|s| s.name.as_str()).collect();
        for s in &incoming {
            if !seen.insert(s.name.as_str()) {
                return Err(GenomeError::DuplicateSequence(s.name.clone()));
            }
        }

        let added = incoming.len();
        self.sequences.extend(incoming);
        Ok(added)
    }

    /// Read a FASTA file (gzipped or not) and append its sequences.
    pub fn add_fasta_file(&mut self, path: &Path) -> Result<usize, GenomeError> {
        let sequences = parse_fasta_file(path)?;
        let source = sequences.first().and_then(|s| s.fasta_file.clone());

        let added = self.add_sequences(sequences)?;
        if let Some(source) = source {
            self.fasta_files.push(source);
        }
        info!("Added {} sequences from {} to genome {}", added, path.display(), self.name);
        Ok(added)
    }

    pub fn get_sequence(&self, name: &str) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.name == name)
    }

    pub fn total_length(&self) -> usize {
        self.sequences.iter().map(Sequence::len).sum()
    }

    /// Build a [`Seed`] for `mask` on the global rayon pool.
    pub fn new_seed(&self, mask: &str) -> Result<Seed, SeedError> {
        Seed::from_genome(self, mask)
    }

    /// Build a [`Seed`] for `mask` on a dedicated pool of `threads` workers.
    pub fn new_seed_with_threads(&self, mask: &str, threads: usize) -> Result<Seed, SeedError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.install(|| Seed::from_genome(self, mask))
    }

    ///
    /// Serialize to `<stem>.<id>.genome.bin`.
    ///
    /// # Returns
    /// - the path written
    pub fn write_binary(&self, stem: &Path) -> Result<PathBuf, GenomeError> {
        let mut name = stem.as_os_str().to_owned();
        name.push(format!(".{}.{}", self.id, GENOME_SUFFIX));
        let path = PathBuf::from(name);

        let mut writer = BufWriter::new(File::create(&path)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(path)
    }

    pub fn from_binary(path: &Path) -> Result<Self, GenomeError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

fn new_genome_id(name: &str) -> String {
    let nonce: u64 = rand::random();
    sha512t24u(format!("{}:{}:{}", name, Utc::now().to_rfc3339(), nonce))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[fixture]
    fn genome() -> Genome {
        let mut g = Genome::new("toy");
        g.add_sequences([
            Sequence::new(">chr1 one", "ACGTACGTAC"),
            Sequence::new(">chr2 two", "GGGCCC"),
        ])
        .unwrap();
        g
    }

    #[rstest]
    fn test_new_genome() {
        let a = Genome::new("hg38");
        let b = Genome::new("hg38");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().len(), 32);
        assert_eq!(a.version, "0.1.0");
        assert_eq!(a.provenance.len(), 1);
    }

    #[rstest]
    fn test_get_sequence(genome: Genome) {
        assert_eq!(genome.get_sequence("chr2").unwrap().sequence, "GGGCCC");
        assert!(genome.get_sequence("chr3").is_none());
        assert_eq!(genome.total_length(), 16);
    }

    #[rstest]
    fn test_duplicate_names_rejected(mut genome: Genome) {
        let err = genome
            .add_sequences([Sequence::new(">chr3", "A"), Sequence::new(">chr1 again", "C")])
            .unwrap_err();
        assert!(matches!(err, GenomeError::DuplicateSequence(name) if name == "chr1"));
        assert_eq!(genome.sequences.len(), 2);
    }

    #[rstest]
    fn test_add_provenance_prepends(mut genome: Genome) {
        genome.add_provenance();
        assert_eq!(genome.provenance.len(), 2);
        assert!(genome.provenance[0].started >= genome.provenance[1].started);
    }

    #[rstest]
    fn test_binary_round_trip(genome: Genome) {
        let dir = tempdir().unwrap();
        let path = genome.write_binary(&dir.path().join("toy")).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("toy.{}.genome.bin", genome.id())
        );

        let again = Genome::from_binary(&path).unwrap();
        assert_eq!(again, genome);
        assert_eq!(again.id(), genome.id());
    }

    #[rstest]
    fn test_seed_with_threads(genome: Genome) {
        let pooled = genome.new_seed_with_threads("11", 2).unwrap();
        let global = genome.new_seed("11").unwrap();
        assert_eq!(pooled.coords, global.coords);
        assert_eq!(pooled.offsets, global.offsets);
        assert_eq!(pooled.genome_id(), genome.id());
    }
}
