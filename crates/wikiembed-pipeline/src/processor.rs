//! Row Processor: drives the run, one row at a time.
//!
//! For each row up to the limit: blank text is skipped as "empty input", an
//! embedding failure is skipped as "embedding failure", and a success is
//! appended to the accumulator (then offered to the checkpoint manager).
//! Skips leave no gaps; surviving rows stay in row-of-origin order.
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use wikiembed_core::{Embedder, Result, RowLimit, SkipRecord};

use crate::accumulator::Accumulator;
use crate::checkpoint::{CheckpointManager, CheckpointUnit};
use crate::dataset::Dataset;

pub struct RowProcessor<'a> {
	embedder: &'a dyn Embedder,
	language: String,
	checkpoints: Option<CheckpointManager>,
	show_progress: bool,
}

#[derive(Debug)]
pub struct ProcessOutcome {
	pub rows_processed: usize,
	pub embedded: usize,
	/// Rows appended since the last checkpoint (all rows without checkpointing).
	pub accumulator: Accumulator,
	pub skipped: Vec<SkipRecord>,
	pub checkpoints: Vec<CheckpointUnit>,
}

impl<'a> RowProcessor<'a> {
	pub fn new(embedder: &'a dyn Embedder, language: &str) -> Self {
		Self { embedder, language: language.to_string(), checkpoints: None, show_progress: false }
	}

	pub fn with_checkpoints(mut self, manager: CheckpointManager) -> Self {
		self.checkpoints = Some(manager);
		self
	}

	pub fn with_progress(mut self, show: bool) -> Self {
		self.show_progress = show;
		self
	}

	/// Process rows `0..limit` in order. Only a failed checkpoint write is fatal.
	pub fn run(mut self, dataset: &Dataset, limit: RowLimit) -> Result<ProcessOutcome> {
		let rows = limit.rows_to_process(dataset.len());
		let mut acc = Accumulator::new(dataset.version_type().clone());
		let mut skipped: Vec<SkipRecord> = Vec::new();
		let mut embedded = 0usize;
		let pb = progress_bar(rows, self.show_progress);

		for index in 0..rows {
			let row = index + 1;
			pb.set_position(index as u64);
			let text = match dataset.text(index) {
				Some(text) if !text.is_empty() => text,
				_ => {
					skipped.push(SkipRecord::empty_input(row));
					warn!(row, skipped = skipped.len(), "skipping row due to empty input");
					continue;
				}
			};
			let embedding = match self.embedder.embed(text) {
				Ok(embedding) => embedding,
				Err(failure) => {
					skipped.push(SkipRecord::embedding_failure(row, &failure));
					warn!(row, skipped = skipped.len(), %failure, "skipping row due to embedding failure");
					continue;
				}
			};
			acc.push(embedding, dataset.version_at(index), &self.language);
			embedded += 1;
			debug!(row, total = rows, "processed row");
			if let Some(manager) = self.checkpoints.as_mut() {
				manager.after_append(index, &mut acc)?;
			}
		}
		pb.set_position(rows as u64);
		pb.finish_and_clear();

		Ok(ProcessOutcome {
			rows_processed: rows,
			embedded,
			accumulator: acc,
			skipped,
			checkpoints: self.checkpoints.map(CheckpointManager::into_written).unwrap_or_default(),
		})
	}
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
	if !visible { return ProgressBar::hidden(); }
	let pb = ProgressBar::new(len as u64);
	let style = ProgressStyle::default_bar()
		.template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")
		.map(|s| s.progress_chars("#>-"))
		.unwrap_or_else(|_| ProgressStyle::default_bar());
	pb.set_style(style);
	pb
}
