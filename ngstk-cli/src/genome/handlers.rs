use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use ngstk_genome::Genome;

use super::cli::BUILD_CMD;

pub fn run_genome(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some((BUILD_CMD, m)) => {
            let name = m
                .get_one::<String>("name")
                .context("--name is required")?;
            let stem = m
                .get_one::<String>("output-stem")
                .context("--output-stem is required")?;

            let fastas: Vec<&String> = m.get_many::<String>("fasta").into_iter().flatten().collect();
            let bar = ProgressBar::new(fastas.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}")?
                    .progress_chars("##-"),
            );

            let mut genome = Genome::new(name);
            for fasta in fastas {
                bar.set_message(fasta.clone());
                genome
                    .add_fasta_file(Path::new(fasta))
                    .with_context(|| format!("Failed to add {} to genome {}", fasta, name))?;
                bar.inc(1);
            }
            bar.finish_and_clear();

            let path = genome.write_binary(Path::new(stem))?;
            info!(
                "Genome {} ({} sequences, {} bases) written to {}",
                genome.id(),
                genome.sequences.len(),
                genome.total_length(),
                path.display()
            );
            println!("{}", path.display());
            Ok(())
        }
        _ => unreachable!("genome subcommand not found"),
    }
}
