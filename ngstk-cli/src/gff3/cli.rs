use clap::{Arg, ArgAction, Command, arg};

pub const GFF3_CMD: &str = "gff3";
pub const MERGE_CMD: &str = "merge";
pub const CONSOLIDATE_CMD: &str = "consolidate";
pub const SELECT_CMD: &str = "select";

pub fn create_gff3_cli() -> Command {
    Command::new(GFF3_CMD)
        .about("Merge, consolidate and filter GFF3 features.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(MERGE_CMD)
                .about("Merge two GFF3 files, splitting overlaps into their own features.")
                .arg(arg!(-a <GFF3_A> "First GFF3 file").required(true))
                .arg(arg!(-b <GFF3_B> "Second GFF3 file").required(true))
                .arg(arg!(--output <OUTPUT> "Output GFF3 file (default: stdout)").short('o').required(false)),
        )
        .subcommand(
            Command::new(CONSOLIDATE_CMD)
                .about("Collapse overlapping and adjacent features on each sequence.")
                .arg(arg!(--input <GFF3> "Input GFF3 file").short('i').required(true))
                .arg(arg!(--output <OUTPUT> "Output GFF3 file (default: stdout)").short('o').required(false)),
        )
        .subcommand(
            Command::new(SELECT_CMD)
                .about("Keep or delete features by sequence id.")
                .arg(arg!(--input <GFF3> "Input GFF3 file").short('i').required(true))
                .arg(
                    Arg::new("selector")
                        .long("selector")
                        .short('s')
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Selector as operation:subject:pattern, e.g. keep:seqid:^chr[0-9]+$"),
                )
                .arg(arg!(--output <OUTPUT> "Output GFF3 file (default: stdout)").short('o').required(false)),
        )
}
