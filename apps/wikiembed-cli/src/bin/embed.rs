use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use wikiembed_client::get_default_embedder;
use wikiembed_core::config::Config;
use wikiembed_core::CheckpointBoundary;
use wikiembed_pipeline::{run_embedding_job, EmbedJob};

/// Generate one embedding per row of a Parquet dataset.
#[derive(Debug, Parser)]
#[command(name = "wikiembed-embed", version, about)]
struct Args {
    /// Input Parquet file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output Parquet file (`.parquet`).
    #[arg(short, long)]
    output: PathBuf,

    /// Embedding endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Language tag stored with every output row, e.g. `dewiki`.
    #[arg(long)]
    wiki_language: Option<String>,

    /// Text column to embed.
    #[arg(long)]
    column: Option<String>,

    /// Process the whole file instead of a leading sample.
    #[arg(long)]
    all: bool,

    #[arg(long)]
    sample_rows: Option<usize>,

    /// Enable checkpointing into this directory.
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,

    #[arg(long)]
    checkpoint_interval: Option<usize>,

    #[arg(long, value_enum)]
    checkpoint_boundary: Option<BoundaryArg>,

    /// Attempts per row; 1 disables retries.
    #[arg(long)]
    max_attempts: Option<u32>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    #[arg(long)]
    no_progress: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BoundaryArg {
    Successes,
    RowIndex,
}

impl From<BoundaryArg> for CheckpointBoundary {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Successes => CheckpointBoundary::Successes,
            BoundaryArg::RowIndex => CheckpointBoundary::RowIndex,
        }
    }
}

fn main() {
    wikiembed_cli::run_main(run);
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;
    let mut settings = config.embed_settings()?;

    if let Some(endpoint) = args.endpoint { settings.endpoint = endpoint; }
    if let Some(language) = args.wiki_language { settings.wiki_language = language; }
    if let Some(column) = args.column { settings.input_column = column; }
    if args.all { settings.process_all = true; }
    if let Some(n) = args.sample_rows { settings.sample_rows = n; }
    if let Some(dir) = args.checkpoint_dir {
        settings.checkpoint.enabled = true;
        settings.checkpoint.dir = dir.to_string_lossy().into_owned();
    }
    if let Some(k) = args.checkpoint_interval { settings.checkpoint.interval = k; }
    if let Some(boundary) = args.checkpoint_boundary { settings.checkpoint.boundary = boundary.into(); }
    if let Some(n) = args.max_attempts { settings.retry.max_attempts = n; }
    if args.timeout_secs.is_some() { settings.timeout_secs = args.timeout_secs; }
    if args.no_progress { settings.show_progress = false; }
    settings.validate()?;

    let embedder = get_default_embedder(&settings)?;
    let job = EmbedJob { input: args.input, output: args.output, settings };
    let report = run_embedding_job(&job, embedder.as_ref())?;
    report.log_summary();
    if report.assembly.rows() > 0 {
        info!(path = %job.output.display(), rows = report.assembly.rows(), "output written");
    }
    Ok(())
}
