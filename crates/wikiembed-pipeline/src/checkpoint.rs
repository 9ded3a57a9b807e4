//! Checkpoint units: immutable Parquet snapshots of the accumulator.
//!
//! A unit is named `checkpoint_<row>.parquet` with the 1-based row number
//! zero-padded to ten digits, and the same number is stored in the file's
//! key/value metadata. Discovery orders units numerically on the stored
//! number, never on the file name string.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use wikiembed_core::{CheckpointBoundary, Error, Result};

use crate::accumulator::Accumulator;
use crate::schema::CHECKPOINT_ROW_KEY;
use crate::table::{read_key_value, read_parquet, write_parquet_atomic};

pub const CHECKPOINT_PREFIX: &str = "checkpoint_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointUnit {
	pub path: PathBuf,
	/// 1-based row number of the row whose append triggered the unit.
	pub row: usize,
}

pub fn unit_file_name(row: usize) -> String { format!("{CHECKPOINT_PREFIX}{row:010}.parquet") }

pub struct CheckpointManager {
	dir: PathBuf,
	interval: usize,
	boundary: CheckpointBoundary,
	since_last: usize,
	written: Vec<CheckpointUnit>,
}

impl CheckpointManager {
	/// Creates `dir` if needed. `interval` must be positive.
	pub fn new(dir: impl Into<PathBuf>, interval: usize, boundary: CheckpointBoundary) -> Result<Self> {
		let dir = dir.into();
		if interval == 0 {
			return Err(Error::InvalidConfig("checkpoint interval must be a positive integer".into()));
		}
		fs::create_dir_all(&dir)
			.map_err(|e| Error::InvalidConfig(format!("cannot create checkpoint directory {}: {e}", dir.display())))?;
		Ok(Self { dir, interval, boundary, since_last: 0, written: Vec::new() })
	}

	pub fn into_written(self) -> Vec<CheckpointUnit> { self.written }

	/// Call after each successful append of the row at 0-based `index`. When
	/// the boundary is reached, persists `acc` as a new unit and clears it.
	pub fn after_append(&mut self, index: usize, acc: &mut Accumulator) -> Result<Option<CheckpointUnit>> {
		self.since_last += 1;
		let due = match self.boundary {
			CheckpointBoundary::Successes => self.since_last >= self.interval,
			CheckpointBoundary::RowIndex => (index + 1) % self.interval == 0,
		};
		if !due || acc.is_empty() { return Ok(None); }
		self.write_unit(index + 1, acc).map(Some)
	}

	fn write_unit(&mut self, row: usize, acc: &mut Accumulator) -> Result<CheckpointUnit> {
		let path = self.dir.join(unit_file_name(row));
		let batch = acc.to_record_batch().map_err(|e| Error::persistence(&path, e))?;
		write_parquet_atomic(&path, &batch, &[(CHECKPOINT_ROW_KEY, row.to_string())])
			.map_err(|e| Error::persistence(&path, format!("{e:#}")))?;
		info!(row, rows = acc.len(), path = %path.display(), "checkpoint saved");
		acc.clear();
		self.since_last = 0;
		let unit = CheckpointUnit { path, row };
		self.written.push(unit.clone());
		Ok(unit)
	}
}

/// All checkpoint units in `dir`, ordered by row number. A missing directory
/// has no units.
pub fn list_units(dir: &Path) -> Result<Vec<CheckpointUnit>> {
	if !dir.is_dir() { return Ok(Vec::new()); }
	let mut units = Vec::new();
	for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
		let entry = entry.map_err(|e| Error::persistence(dir, e))?;
		if !entry.file_type().is_file() { continue; }
		let path = entry.path();
		let Some(name_row) = row_from_file_name(path) else {
			debug!(path = %path.display(), "ignoring non-checkpoint file");
			continue;
		};
		let row = match read_key_value(path, CHECKPOINT_ROW_KEY).map_err(|e| Error::persistence(path, format!("{e:#}")))? {
			Some(value) => value
				.parse::<usize>()
				.map_err(|e| Error::persistence(path, format!("bad {CHECKPOINT_ROW_KEY} value '{value}': {e}")))?,
			None => name_row,
		};
		units.push(CheckpointUnit { path: path.to_path_buf(), row });
	}
	units.sort_by(|a, b| a.row.cmp(&b.row).then_with(|| a.path.cmp(&b.path)));
	Ok(units)
}

/// Load a unit back into an accumulator.
pub fn read_unit(unit: &CheckpointUnit) -> Result<Accumulator> {
	let batch = read_parquet(&unit.path).map_err(|e| Error::persistence(&unit.path, format!("{e:#}")))?;
	Accumulator::from_record_batch(&batch).map_err(|e| Error::persistence(&unit.path, e))
}

fn row_from_file_name(path: &Path) -> Option<usize> {
	if !path.extension()?.to_str()?.eq_ignore_ascii_case("parquet") { return None; }
	path.file_stem()?.to_str()?.strip_prefix(CHECKPOINT_PREFIX)?.parse().ok()
}
