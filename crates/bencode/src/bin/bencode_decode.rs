//! `bencode-decode`: decode bencode (stdin) and print it as pretty JSON (stdout).
//!
//! Usage:
//!   bencode-decode [--max-depth N]

use std::io::{self, Read, Write};

use bencode_canon::cli::{init_logging, unpack, CliError};
use bencode_canon::{DecodeOptions, DEFAULT_MAX_DEPTH};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "bencode-decode", version, about = "Decode bencode from stdin into JSON")]
struct Args {
    /// Maximum nesting of lists and dictionaries.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn run(args: &Args) -> Result<(), CliError> {
    let options = DecodeOptions::default().with_max_depth(args.max_depth);
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;
    let json = unpack(&input, options)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
