use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use wikiembed_core::config::Config;
use wikiembed_prep::{concat_file, ConcatOptions};

/// Add the `Concat Abstract` and `Wiki Language` columns to a Wikipedia
/// abstracts file.
#[derive(Debug, Parser)]
#[command(name = "wikiembed-concat", version, about)]
struct Args {
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    output: PathBuf,

    /// Process every row instead of the first ten.
    #[arg(long)]
    all: bool,

    /// Defaults to `embed.wiki_language` from the config.
    #[arg(long)]
    wiki_language: Option<String>,
}

fn main() {
    wikiembed_cli::run_main(run);
}

fn run() -> Result<()> {
    let args = Args::parse();
    let wiki_language = match args.wiki_language {
        Some(language) => language,
        None => Config::load()?.embed_settings()?.wiki_language,
    };
    let options = ConcatOptions { process_all: args.all, wiki_language };
    concat_file(&args.input, &args.output, &options)?;
    Ok(())
}
