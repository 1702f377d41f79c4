//! `bencode-encode`: encode a JSON document (stdin) as canonical bencode (stdout).
//!
//! Usage:
//!   bencode-encode [--max-depth N] [--reject-bools]
//!
//! Strings prefixed with `data:application/octet-stream;base64,` are written
//! as raw byte strings.

use std::io::{self, Read, Write};

use bencode_canon::cli::{init_logging, pack, CliError};
use bencode_canon::{BoolPolicy, EncodeOptions, DEFAULT_MAX_DEPTH};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "bencode-encode", version, about = "Encode JSON from stdin as canonical bencode")]
struct Args {
    /// Maximum nesting of lists and dictionaries.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Fail on booleans instead of writing them as i1e / i0e.
    #[arg(long)]
    reject_bools: bool,
}

fn run(args: &Args) -> Result<(), CliError> {
    let bools = if args.reject_bools {
        BoolPolicy::Reject
    } else {
        BoolPolicy::AsInteger
    };
    let options = EncodeOptions::default()
        .with_max_depth(args.max_depth)
        .with_bools(bools);

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let bytes = pack(input.trim(), options)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
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
