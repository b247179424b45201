use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use ngstk_genome::{Genome, SeedConfig};

use super::cli::BUILD_CMD;

pub fn run_seed(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some((BUILD_CMD, m)) => {
            let config = match m.get_one::<String>("config") {
                Some(path) => SeedConfig::try_from(Path::new(path))
                    .with_context(|| format!("Failed to read seed config {}", path))?,
                None => config_from_flags(m)?,
            };
            build_seeds(&config)
        }
        _ => unreachable!("seed subcommand not found"),
    }
}

fn config_from_flags(matches: &ArgMatches) -> Result<SeedConfig> {
    let genome = matches
        .get_one::<String>("genome")
        .context("--genome is required without --config")?;
    Ok(SeedConfig {
        genome: PathBuf::from(genome),
        masks: matches
            .get_many::<String>("mask")
            .into_iter()
            .flatten()
            .cloned()
            .collect(),
        output_dir: matches
            .get_one::<String>("output-dir")
            .map_or_else(|| PathBuf::from("."), PathBuf::from),
        threads: matches.get_one::<usize>("threads").copied(),
        write_text: Some(matches.get_flag("text")),
    })
}

fn build_seeds(config: &SeedConfig) -> Result<()> {
    let invalid = config.invalid_masks();
    if !invalid.is_empty() {
        let reasons: Vec<String> = invalid
            .iter()
            .map(|(mask, reason)| format!("`{}`: {}", mask, reason))
            .collect();
        bail!("Invalid seed masks: {}", reasons.join("; "));
    }

    let genome = Genome::from_binary(&config.genome)
        .with_context(|| format!("Failed to load genome {}", config.genome.display()))?;
    info!(
        "Loaded genome {} ({}) with {} sequences",
        genome.name,
        genome.id(),
        genome.sequences.len()
    );
    create_dir_all(&config.output_dir)?;

    let bar = ProgressBar::new(config.masks.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}")?
            .progress_chars("##-"),
    );

    for mask in &config.masks {
        bar.set_message(mask.clone());
        let seed = match config.threads {
            Some(threads) => genome.new_seed_with_threads(mask, threads)?,
            None => genome.new_seed(mask)?,
        };

        let path = seed.write_binary(&config.output_dir)?;
        info!("Seed {} ({} patterns) written to {}", mask, seed.pattern_count(), path.display());
        if config.write_text() {
            let text = seed.write_text(&config.output_dir)?;
            info!("Seed {} text dump written to {}", mask, text.display());
        }
        bar.inc(1);
    }
    bar.finish_with_message("done");

    Ok(())
}
