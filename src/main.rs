use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use pssraw::{CaseParser, Grammar};

/// Parse a PSS/E revision 33 RAW case and print a summary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The PSS/E data file to operate on (.raw)
    file: PathBuf,
}

/// Grammar override from `PSSRAW_GRAMMAR`, or the revision 33 layout.
fn grammar_from_env() -> anyhow::Result<Grammar> {
    match env::var_os("PSSRAW_GRAMMAR") {
        Some(path) => {
            info!("Loading grammar from {}", PathBuf::from(&path).display());
            Grammar::load(&path).context("failed to load PSSRAW_GRAMMAR")
        }
        None => Ok(Grammar::v33()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let grammar = grammar_from_env()?;
    let case = CaseParser::new(&grammar)
        .parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    print!("{}", case);
    Ok(())
}
