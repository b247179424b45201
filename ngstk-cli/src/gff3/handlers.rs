use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use ngstk_core::selector::parse_selectors;
use ngstk_gff3::{Gff3, merge_features};

use super::cli::{CONSOLIDATE_CMD, MERGE_CMD, SELECT_CMD};

pub fn run_gff3(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some((MERGE_CMD, m)) => {
            let a = load_gff3(m, "GFF3_A")?;
            let b = load_gff3(m, "GFF3_B")?;
            let features = merge_features(&a.features, &b.features)
                .with_context(|| format!("Failed to merge {} and {}", a.name, b.name))?;

            let mut header = a.versioned_headers("1");
            header.extend(b.versioned_headers("2"));
            let merged = Gff3 {
                name: features.value.clone(),
                file: None,
                header,
                features,
            };
            write_output(&merged, m.get_one::<String>("output"))
        }
        Some((CONSOLIDATE_CMD, m)) => {
            let mut gff3 = load_gff3(m, "input")?;
            let before = gff3.features.len();
            gff3.features = gff3
                .features
                .consolidated_by_seq_id()
                .with_context(|| format!("Failed to consolidate {}", gff3.name))?;
            info!("Consolidated {} features into {}", before, gff3.features.len());
            write_output(&gff3, m.get_one::<String>("output"))
        }
        Some((SELECT_CMD, m)) => {
            let mut gff3 = load_gff3(m, "input")?;
            let raw: Vec<&String> = m.get_many::<String>("selector").into_iter().flatten().collect();
            for selector in parse_selectors(&raw)? {
                let matched = gff3
                    .apply_selector(&selector)
                    .with_context(|| format!("Failed to apply selector {}", selector))?;
                info!("{} matched {} sequence ids: {:?}", selector, matched.len(), matched);
            }
            write_output(&gff3, m.get_one::<String>("output"))
        }
        _ => unreachable!("gff3 subcommand not found"),
    }
}

fn load_gff3(matches: &ArgMatches, arg: &str) -> Result<Gff3> {
    let path = matches
        .get_one::<String>(arg)
        .with_context(|| format!("Missing required argument {}", arg))?;
    Gff3::from_path(Path::new(path)).with_context(|| format!("Failed to load GFF3 file {}", path))
}

fn write_output(gff3: &Gff3, output: Option<&String>) -> Result<()> {
    match output {
        Some(path) => gff3
            .write(Path::new(path))
            .with_context(|| format!("Failed to write {}", path)),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            gff3.write_to(&mut handle)?;
            handle.flush()?;
            Ok(())
        }
    }
}
