use clap::{Arg, ArgAction, Command, arg};

pub const GENOME_CMD: &str = "genome";
pub const BUILD_CMD: &str = "build";

pub fn create_genome_cli() -> Command {
    Command::new(GENOME_CMD)
        .about("Build genome sequence stores from FASTA files.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(BUILD_CMD)
                .about("Read FASTA files into a genome and write it as <stem>.<id>.genome.bin")
                .arg(arg!(--name <NAME> "Genome name").required(true))
                .arg(
                    Arg::new("fasta")
                        .long("fasta")
                        .short('f')
                        .required(true)
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .help("FASTA files, gzipped or not"),
                )
                .arg(
                    Arg::new("output-stem")
                        .long("output-stem")
                        .short('o')
                        .required(true)
                        .help("Output path stem; the genome id and suffix are appended"),
                ),
        )
}
