use clap::{Command, arg};

pub const INSPECT_CMD: &str = "inspect";

pub fn create_inspect_cli() -> Command {
    Command::new(INSPECT_CMD)
        .about("Print a JSON summary of a genome.bin, seed.bin or VCF file.")
        .arg(arg!(<FILE> "A .genome.bin, .seed.bin, .vcf or .vcf.gz file").required(true))
        .arg(arg!(--compact "Print the summary on a single line").required(false))
}
