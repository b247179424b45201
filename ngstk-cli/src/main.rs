mod genome;
mod gff3;
mod inspect;
mod logging;
mod seed;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "ngstk";
    pub const VERBOSE_FLAG: &str = "verbose";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Tools for GFF3 feature merging, genome sequence storage and spaced-seed indexing.")
        .subcommand_required(true)
        .arg(
            Arg::new(consts::VERBOSE_FLAG)
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log progress to stderr"),
        )
        .subcommand(gff3::cli::create_gff3_cli())
        .subcommand(genome::cli::create_genome_cli())
        .subcommand(seed::cli::create_seed_cli())
        .subcommand(inspect::cli::create_inspect_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    logging::init_logger(matches.get_flag(consts::VERBOSE_FLAG));

    match matches.subcommand() {
        //
        // GFF3
        //
        Some((gff3::cli::GFF3_CMD, matches)) => {
            gff3::handlers::run_gff3(matches)?;
        }

        //
        // GENOME
        //
        Some((genome::cli::GENOME_CMD, matches)) => {
            genome::handlers::run_genome(matches)?;
        }

        //
        // SEED
        //
        Some((seed::cli::SEED_CMD, matches)) => {
            seed::handlers::run_seed(matches)?;
        }

        //
        // INSPECT
        //
        Some((inspect::cli::INSPECT_CMD, matches)) => {
            inspect::handlers::run_inspect(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    #[case(&["ngstk", "gff3", "merge", "-a", "a.gff3", "-b", "b.gff3"])]
    #[case(&["ngstk", "gff3", "merge", "-a", "a.gff3", "-b", "b.gff3", "-o", "out.gff3"])]
    #[case(&["ngstk", "gff3", "consolidate", "-i", "a.gff3", "-o", "out.gff3"])]
    #[case(&["ngstk", "gff3", "select", "-i", "a.gff3", "-s", "keep:seqid:chr1", "-o", "out.gff3"])]
    #[case(&["ngstk", "-v", "gff3", "select", "-i", "a.gff3", "-s", "keep:seqid:^chr1$", "-s", "delete:seqid:_alt"])]
    #[case(&["ngstk", "genome", "build", "--name", "toy", "--fasta", "a.fa", "b.fa.gz", "--output-stem", "toy"])]
    #[case(&["ngstk", "seed", "build", "--genome", "g.bin", "--mask", "111", "1_1", "--output-dir", "out"])]
    #[case(&["ngstk", "seed", "build", "--config", "seeds.toml", "--verbose"])]
    #[case(&["ngstk", "inspect", "toy.genome.bin"])]
    fn test_accepts(#[case] args: &[&str]) {
        assert!(build_parser().try_get_matches_from(args).is_ok());
    }

    #[rstest]
    #[case(&["ngstk", "seed", "build", "--config", "seeds.toml", "--mask", "111"])]
    #[case(&["ngstk", "seed", "build", "--mask", "111"])]
    #[case(&["ngstk", "gff3", "merge", "-a", "a.gff3"])]
    fn test_rejects(#[case] args: &[&str]) {
        assert!(build_parser().try_get_matches_from(args).is_err());
    }
}
