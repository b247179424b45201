use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

pub const SEED_CMD: &str = "seed";
pub const BUILD_CMD: &str = "build";

pub fn create_seed_cli() -> Command {
    Command::new(SEED_CMD)
        .about("Build spaced-seed indexes over a genome.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(BUILD_CMD)
                .about("Build one seed per mask and write them as <mask>.<genome id>.seed.bin")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .conflicts_with_all(["genome", "mask", "output-dir", "threads", "text"])
                        .help("TOML file with genome, masks, output_dir, threads and write_text"),
                )
                .arg(
                    Arg::new("genome")
                        .long("genome")
                        .short('g')
                        .requires("mask")
                        .help("Genome written by `genome build`"),
                )
                .arg(
                    Arg::new("mask")
                        .long("mask")
                        .short('m')
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .requires("genome")
                        .help("Seed masks; `1` marks a sampled base, e.g. 11_1_1"),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('o')
                        .help("Directory for seed files (default: current directory)"),
                )
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .short('t')
                        .value_parser(value_parser!(usize))
                        .help("Worker threads (default: all cores)"),
                )
                .arg(
                    Arg::new("text")
                        .long("text")
                        .action(ArgAction::SetTrue)
                        .help("Also write a text dump of every seed"),
                )
                .group(
                    ArgGroup::new("source")
                        .args(["config", "genome"])
                        .required(true),
                ),
        )
}
