//! Fixed-size splitting of a Parquet file into `part<N>.parquet` files.
use arrow_array::RecordBatch;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use wikiembed_core::{Error, Result};
use wikiembed_pipeline::table::{read_parquet, write_parquet_atomic};

pub const DEFAULT_ROWS_PER_PART: usize = 10_000;
pub const FILE_INFO_NAME: &str = "file_info.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPart {
	pub path: PathBuf,
	/// 1-based, inclusive.
	pub first_row: usize,
	/// 1-based, inclusive.
	pub last_row: usize,
}

impl SplitPart {
	pub fn file_name(&self) -> String {
		self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
	}

	pub fn info_line(&self) -> String { format!("{}-{} in {}", self.first_row, self.last_row, self.file_name()) }
}

/// `(offset, len)` of each part, covering `total` rows in order.
pub fn plan_parts(total: usize, rows_per_part: usize) -> Vec<(usize, usize)> {
	if rows_per_part == 0 { return Vec::new(); }
	(0..total).step_by(rows_per_part).map(|start| (start, rows_per_part.min(total - start))).collect()
}

/// Split `input` into parts under `output_dir` (created if missing) and write
/// `file_info.txt` next to them.
pub fn split_file(input: &Path, output_dir: &Path, rows_per_part: usize) -> Result<Vec<SplitPart>> {
	if rows_per_part == 0 {
		return Err(Error::InvalidConfig("rows per part must be a positive integer".into()));
	}
	if !input.is_file() {
		return Err(Error::NotFound(format!("input file '{}' does not exist", input.display())));
	}
	fs::create_dir_all(output_dir)
		.map_err(|e| Error::InvalidConfig(format!("cannot create output directory {}: {e}", output_dir.display())))?;
	let batch = read_parquet(input).map_err(|e| Error::InvalidInput(format!("failed to read {}: {e:#}", input.display())))?;
	info!(rows = batch.num_rows(), rows_per_part, "splitting input");

	let parts = write_parts(&batch, output_dir, rows_per_part)?;
	let info_path = output_dir.join(FILE_INFO_NAME);
	let info: String = parts.iter().map(|p| p.info_line() + "\n").collect();
	fs::write(&info_path, info).map_err(|e| Error::persistence(&info_path, e))?;
	info!(parts = parts.len(), path = %info_path.display(), "split information saved");
	Ok(parts)
}

fn write_parts(batch: &RecordBatch, output_dir: &Path, rows_per_part: usize) -> Result<Vec<SplitPart>> {
	let mut parts = Vec::new();
	for (i, (offset, len)) in plan_parts(batch.num_rows(), rows_per_part).into_iter().enumerate() {
		let path = output_dir.join(format!("part{}.parquet", i + 1));
		write_parquet_atomic(&path, &batch.slice(offset, len), &[]).map_err(|e| Error::persistence(&path, format!("{e:#}")))?;
		let part = SplitPart { path, first_row: offset + 1, last_row: offset + len };
		info!(file = %part.file_name(), first = part.first_row, last = part.last_row, "part saved");
		parts.push(part);
	}
	Ok(parts)
}
