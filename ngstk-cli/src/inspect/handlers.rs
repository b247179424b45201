use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use serde_json::{Value, json};

use ngstk_core::RunParameters;
use ngstk_genome::consts::{GENOME_SUFFIX, SEED_SUFFIX};
use ngstk_genome::{Genome, Seed};
use ngstk_vcf::Vcf;

pub fn run_inspect(matches: &ArgMatches) -> Result<()> {
    let file = matches
        .get_one::<String>("FILE")
        .context("A file to inspect is required")?;
    let summary = summarize(Path::new(file))?;

    let rendered = if matches.get_flag("compact") {
        serde_json::to_string(&summary)?
    } else {
        serde_json::to_string_pretty(&summary)?
    };
    println!("{}", rendered);
    Ok(())
}

pub(crate) fn summarize(path: &Path) -> Result<Value> {
    let name = path.to_string_lossy();
    if name.ends_with(GENOME_SUFFIX) {
        let genome = Genome::from_binary(path)
            .with_context(|| format!("Failed to read genome {}", path.display()))?;
        Ok(genome_summary(&genome))
    } else if name.ends_with(SEED_SUFFIX) {
        let seed = Seed::from_binary(path)
            .with_context(|| format!("Failed to read seed {}", path.display()))?;
        Ok(seed_summary(&seed))
    } else if name.ends_with(".vcf") || name.ends_with(".vcf.gz") {
        let vcf = Vcf::from_path(path)
            .with_context(|| format!("Failed to read VCF {}", path.display()))?;
        Ok(vcf_summary(&vcf))
    } else {
        bail!(
            "Don't know how to inspect {}, expected a name ending in {}, {}, .vcf or .vcf.gz",
            path.display(),
            GENOME_SUFFIX,
            SEED_SUFFIX
        )
    }
}

fn provenance_summary(provenance: &[RunParameters]) -> Vec<Value> {
    provenance
        .iter()
        .map(|p| {
            json!({
                "started": p.started.to_rfc3339(),
                "tool": p.tool,
                "version": p.version,
                "command_line": p.command_line.join(" "),
            })
        })
        .collect()
}

fn genome_summary(genome: &Genome) -> Value {
    json!({
        "kind": "genome",
        "name": genome.name,
        "id": genome.id(),
        "version": genome.version,
        "total_length": genome.total_length(),
        "sequences": genome
            .sequences
            .iter()
            .map(|s| json!({ "name": s.name, "length": s.len() }))
            .collect::<Vec<_>>(),
        "fasta_files": genome
            .fasta_files
            .iter()
            .map(|f| json!({ "path": f.path.display().to_string(), "md5": f.md5 }))
            .collect::<Vec<_>>(),
        "provenance": provenance_summary(&genome.provenance),
    })
}

fn seed_summary(seed: &Seed) -> Value {
    let positions: usize = seed.coords.values().map(Vec::len).sum();
    json!({
        "kind": "seed",
        "mask": seed.mask,
        "genome_id": seed.genome_id(),
        "buffer_length": seed.sequence.len(),
        "patterns": seed.pattern_count(),
        "positions": positions,
        "sequences": seed
            .sequences
            .iter()
            .map(|s| json!({ "name": s.name, "offset": s.offset, "length": s.length }))
            .collect::<Vec<_>>(),
        "provenance": provenance_summary(&seed.provenance),
    })
}

fn vcf_summary(vcf: &Vcf) -> Value {
    json!({
        "kind": "vcf",
        "fileformat": vcf.fileformat(),
        "meta_lines": vcf.meta.len(),
        "contigs": vcf.meta_for("contig").filter_map(|m| m.id()).collect::<Vec<_>>(),
        "samples": vcf.header.samples,
        "records": vcf.records.len(),
        "chroms": vcf.chroms(),
    })
}
