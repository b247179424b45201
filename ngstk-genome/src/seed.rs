//! Spaced-seed index over the concatenated sequences of a genome.
//!
//! A mask such as `11_1_1` selects which bases of each window are sampled;
//! any character other than `1` is skipped. For every window start the sampled
//! bases form an oligo, and the index maps each oligo to the absolute buffer
//! positions where it was found.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use ngstk_core::RunParameters;
use ngstk_core::provenance::prepend;

use crate::consts::{SEED_SUFFIX, SEED_TEXT_SUFFIX, UNKNOWN_BASE};
use crate::errors::SeedError;
use crate::fasta::FastaFile;
use crate::genome::{Genome, TOOL, TOOL_VERSION};
use crate::sequence::Sequence;

/// A sequence absorbed into a seed: everything but its bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSequence {
    pub header: String,
    pub name: String,
    pub offset: usize,
    pub length: usize,
    pub fasta_file: Option<FastaFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub mask: String,
    pub sequences: Vec<SeedSequence>,
    /// Sequence name to its first byte in `sequence`.
    pub offsets: FxHashMap<String, usize>,
    /// Every absorbed sequence, back to back.
    pub sequence: Vec<u8>,
    /// Oligo to absolute positions in `sequence`, in discovery order.
    pub coords: FxHashMap<String, Vec<usize>>,
    pub provenance: Vec<RunParameters>,
    genome_id: String,
}

impl Seed {
    pub(crate) fn new(mask: &str, genome_id: &str) -> Result<Self, SeedError> {
        sampled_positions(mask)?;
        Ok(Seed {
            mask: mask.to_string(),
            sequences: Vec::new(),
            offsets: FxHashMap::default(),
            sequence: Vec::new(),
            coords: FxHashMap::default(),
            provenance: Vec::new(),
            genome_id: genome_id.to_string(),
        })
    }

    ///
    /// Absorb every sequence of `genome` and index it with `mask`.
    ///
    /// The seed inherits the genome's provenance with the current run
    /// prepended.
    ///
    pub fn from_genome(genome: &Genome, mask: &str) -> Result<Self, SeedError> {
        let mut seed = Seed::new(mask, genome.id())?;
        seed.provenance = genome.provenance.clone();
        seed.add_provenance();

        for s in &genome.sequences {
            debug!("Adding sequence {} to seed {}", s.name, mask);
            seed.add_sequence(s)?;
        }
        seed.apply_seed();

        Ok(seed)
    }

    pub fn genome_id(&self) -> &str {
        &self.genome_id
    }

    pub fn add_provenance(&mut self) {
        prepend(&mut self.provenance, RunParameters::capture(TOOL, TOOL_VERSION));
    }

    ///
    /// Append a sequence's bases to the shared buffer. Its offset is the
    /// buffer length before the append. Bases must be ASCII so every byte
    /// of the buffer is one base.
    ///
    pub fn add_sequence(&mut self, s: &Sequence) -> Result<(), SeedError> {
        if self.offsets.contains_key(&s.name) {
            return Err(SeedError::DuplicateSequence(s.name.clone()));
        }
        if !s.sequence.is_ascii() {
            return Err(SeedError::NonAsciiSequence(s.name.clone()));
        }

        let offset = self.sequence.len();
        self.offsets.insert(s.name.clone(), offset);
        self.sequences.push(SeedSequence {
            header: s.header.clone(),
            name: s.name.clone(),
            offset,
            length: s.len(),
            fasta_file: s.fasta_file.clone(),
        });
        self.sequence.extend_from_slice(s.sequence.as_bytes());
        Ok(())
    }

    ///
    /// Rebuild `coords` from the buffer.
    ///
    /// Window starts run over `[offset, offset + length - mask length)` of each
    /// sequence, so the last `mask length` bases never start a window. A window
    /// is skipped when its first sampled base is `N`; an `N` at any later
    /// sampled position is indexed like any other base.
    ///
    /// Sequences are scanned in parallel and their shards merged in absorption
    /// order, so every position list stays in discovery order.
    ///
    pub fn apply_seed(&mut self) {
        let positions = mask_positions(&self.mask);
        let seed_len = self.mask.len();
        info!("Applying seed {} (sampled positions {:?})", self.mask, positions);

        let buffer = &self.sequence;
        let shards: Vec<(usize, FxHashMap<String, Vec<usize>>)> = self
            .sequences
            .par_iter()
            .map(|s| scan_sequence(buffer, s, seed_len, &positions))
            .collect();

        let mut coords: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut indexed = 0;
        for (count, shard) in shards {
            indexed += count;
            for (oligo, found) in shard {
                coords.entry(oligo).or_default().extend(found);
            }
        }

        info!(
            "Seed {}: {} positions indexed under {} patterns",
            self.mask,
            indexed,
            coords.len()
        );
        self.coords = coords;
    }

    pub fn coords_for(&self, oligo: &str) -> Option<&[usize]> {
        self.coords.get(oligo).map(Vec::as_slice)
    }

    pub fn pattern_count(&self) -> usize {
        self.coords.len()
    }

    pub fn sequence_names(&self) -> Vec<&str> {
        self.sequences.iter().map(|s| s.name.as_str()).collect()
    }

    ///
    /// Map an absolute buffer position back to its sequence.
    ///
    /// # Returns
    /// - the sequence name and the 0-based position within that sequence
    pub fn locate(&self, position: usize) -> Option<(&str, usize)> {
        let idx = self.sequences.partition_point(|s| s.offset <= position);
        let s = self.sequences.get(idx.checked_sub(1)?)?;
        (position < s.offset + s.length).then(|| (s.name.as_str(), position - s.offset))
    }

    /// Fail unless this seed was built from `genome`.
    pub fn check_genome(&self, genome: &Genome) -> Result<(), SeedError> {
        if self.genome_id != genome.id() {
            return Err(SeedError::GenomeMismatch {
                seed: self.genome_id.clone(),
                genome: genome.id().to_string(),
            });
        }
        Ok(())
    }

    fn file_name(&self, suffix: &str) -> String {
        format!("{}.{}.{}", self.mask, self.genome_id, suffix)
    }

    ///
    /// Text dump: the mask and genome id, one `# Offset,<name>,<offset>` line
    /// per sequence by offset, then one `<oligo>:<pos>,<pos>...` line per
    /// pattern in sorted order.
    ///
    pub fn write_text_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Seed: {}", self.mask)?;
        writeln!(writer, "# Genome: {}", self.genome_id)?;

        let mut offsets: Vec<(&String, &usize)> = self.offsets.iter().collect();
        offsets.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        for (name, offset) in offsets {
            writeln!(writer, "# Offset,{},{}", name, offset)?;
        }

        let mut patterns: Vec<&String> = self.coords.keys().collect();
        patterns.sort();
        for oligo in patterns {
            let positions = self.coords[oligo]
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{}:{}", oligo, positions)?;
        }
        Ok(())
    }

    /// Write the text dump to `<dir>/<mask>.<genome id>.seed.txt`.
    pub fn write_text(&self, dir: &Path) -> Result<PathBuf, SeedError> {
        let path = dir.join(self.file_name(SEED_TEXT_SUFFIX));
        let mut writer = BufWriter::new(File::create(&path)?);
        self.write_text_to(&mut writer)?;
        writer.flush()?;
        Ok(path)
    }

    /// Serialize to `<dir>/<mask>.<genome id>.seed.bin`.
    pub fn write_binary(&self, dir: &Path) -> Result<PathBuf, SeedError> {
        let path = dir.join(self.file_name(SEED_SUFFIX));
        let mut writer = BufWriter::new(File::create(&path)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(path)
    }

    pub fn from_binary(path: &Path) -> Result<Self, SeedError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

/// Indices of the `1`s in `mask`, failing on masks that sample nothing.
pub fn sampled_positions(mask: &str) -> Result<Vec<usize>, SeedError> {
    if mask.is_empty() {
        return Err(SeedError::EmptyMask);
    }
    let positions = mask_positions(mask);
    if positions.is_empty() {
        return Err(SeedError::NothingSampled(mask.to_string()));
    }
    Ok(positions)
}

fn mask_positions(mask: &str) -> Vec<usize> {
    mask.bytes()
        .enumerate()
        .filter(|(_, b)| *b == b'1')
        .map(|(i, _)| i)
        .collect()
}

fn scan_sequence(
    buffer: &[u8],
    s: &SeedSequence,
    seed_len: usize,
    positions: &[usize],
) -> (usize, FxHashMap<String, Vec<usize>>) {
    let mut shard: FxHashMap<String, Vec<usize>> = FxHashMap::default();
    let Some(&first) = positions.first() else {
        return (0, shard);
    };

    let stop = (s.offset + s.length).saturating_sub(seed_len);
    let mut indexed = 0;
    let mut oligo = String::with_capacity(positions.len());
    for i in s.offset..stop {
        if buffer[i + first] == UNKNOWN_BASE {
            continue;
        }
        oligo.clear();
        oligo.extend(positions.iter().map(|p| buffer[i + p] as char));

        match shard.get_mut(oligo.as_str()) {
            Some(found) => found.push(i),
            None => {
                shard.insert(oligo.clone(), vec![i]);
            }
        }
        indexed += 1;
    }

    debug!("Indexed {} windows of {}", indexed, s.name);
    (indexed, shard)
}
