//! wikiembed-pipeline
//!
//! Embedding generation with checkpointed resumability: read a Parquet
//! dataset, embed one row at a time, periodically persist checkpoint units,
//! and assemble the final three-column output.
pub mod accumulator;
pub mod assemble;
pub mod checkpoint;
pub mod dataset;
pub mod processor;
pub mod schema;
pub mod table;

pub use accumulator::Accumulator;
pub use assemble::{assemble_output, Assembly};
pub use checkpoint::{CheckpointManager, CheckpointUnit};
pub use dataset::Dataset;
pub use processor::{ProcessOutcome, RowProcessor};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, warn};
use wikiembed_core::config::EmbedSettings;
use wikiembed_core::types::group_skips;
use wikiembed_core::{Embedder, Error, Result, SkipReason, SkipRecord};

#[derive(Debug, Clone)]
pub struct EmbedJob {
	pub input: PathBuf,
	pub output: PathBuf,
	pub settings: EmbedSettings,
}

#[derive(Debug)]
pub struct RunReport {
	pub rows_total: usize,
	pub rows_processed: usize,
	pub embedded: usize,
	pub skipped: Vec<SkipRecord>,
	pub checkpoints_written: Vec<CheckpointUnit>,
	pub assembly: Assembly,
	pub elapsed: Duration,
}

impl RunReport {
	/// Skipped row numbers grouped by reason.
	pub fn skip_summary(&self) -> BTreeMap<SkipReason, Vec<usize>> { group_skips(&self.skipped) }

	pub fn log_summary(&self) {
		if self.skipped.is_empty() {
			info!("no rows were skipped");
		} else {
			info!(total = self.skipped.len(), "summary of skipped rows");
			for (reason, rows) in self.skip_summary() {
				info!(%reason, count = rows.len(), rows = ?rows, "skipped rows");
			}
		}
		info!(
			processed = self.rows_processed,
			embedded = self.embedded,
			checkpoints = self.checkpoints_written.len(),
			output_rows = self.assembly.rows(),
			minutes = %format!("{:.2}", self.elapsed.as_secs_f64() / 60.0),
			"processing completed"
		);
	}
}

/// Setup checks on the job's paths: the input must exist, the output must be
/// a `.parquet` file in an existing directory.
pub fn validate_paths(input: &Path, output: &Path) -> Result<()> {
	let is_parquet = output.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
	if !is_parquet {
		return Err(Error::InvalidConfig(format!("output file must be a Parquet file (.parquet): {}", output.display())));
	}
	if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
		if !parent.is_dir() {
			return Err(Error::NotFound(format!("output directory '{}' does not exist", parent.display())));
		}
	}
	if !input.is_file() {
		return Err(Error::NotFound(format!("input file '{}' does not exist", input.display())));
	}
	Ok(())
}

/// Run the whole pipeline. Setup errors are returned before any row is
/// touched; per-row failures only show up in `RunReport::skipped`.
pub fn run_embedding_job(job: &EmbedJob, embedder: &dyn Embedder) -> Result<RunReport> {
	let started = Instant::now();
	let settings = &job.settings;
	settings.validate()?;
	validate_paths(&job.input, &job.output)?;
	let dataset = Dataset::open(&job.input, &settings.input_column)?;
	let checkpoint_dir = settings.checkpoint_dir();

	let mut processor = RowProcessor::new(embedder, &settings.wiki_language).with_progress(settings.show_progress);
	if let Some(dir) = &checkpoint_dir {
		processor = processor.with_checkpoints(CheckpointManager::new(dir, settings.checkpoint.interval, settings.checkpoint.boundary)?);
	}
	let limit = settings.row_limit();
	info!(
		input = %job.input.display(),
		rows = dataset.len(),
		to_process = limit.rows_to_process(dataset.len()),
		embedder = embedder.embedder_id(),
		checkpoints = ?checkpoint_dir,
		"starting embedding run"
	);

	let outcome = processor.run(&dataset, limit)?;
	let assembly = assemble_output(&outcome.accumulator, &outcome.checkpoints, checkpoint_dir.as_deref(), &job.output)?;
	if assembly == Assembly::Nothing {
		warn!(output = %job.output.display(), "no embeddings produced; no output file written");
	}

	Ok(RunReport {
		rows_total: dataset.len(),
		rows_processed: outcome.rows_processed,
		embedded: outcome.embedded,
		skipped: outcome.skipped,
		checkpoints_written: outcome.checkpoints,
		assembly,
		elapsed: started.elapsed(),
	})
}
