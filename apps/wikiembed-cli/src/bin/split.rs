use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use wikiembed_core::config::{expand_path, Config};
use wikiembed_prep::{split_file, DEFAULT_ROWS_PER_PART};

/// Split a Parquet file into `part<N>.parquet` files of at most N rows.
#[derive(Debug, Parser)]
#[command(name = "wikiembed-split", version, about)]
struct Args {
    #[arg(short, long)]
    input: PathBuf,

    /// Created if missing.
    #[arg(short, long)]
    output_dir: String,

    /// Defaults to `split.rows_per_part` from the config, then 10000.
    #[arg(long)]
    rows_per_part: Option<usize>,
}

fn main() {
    wikiembed_cli::run_main(run);
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;
    let rows_per_part = args
        .rows_per_part
        .unwrap_or_else(|| config.get("split.rows_per_part").unwrap_or(DEFAULT_ROWS_PER_PART));
    let output_dir = expand_path(&args.output_dir);
    let parts = split_file(&args.input, &output_dir, rows_per_part)?;
    info!(parts = parts.len(), dir = %output_dir.display(), "splitting completed");
    Ok(())
}
