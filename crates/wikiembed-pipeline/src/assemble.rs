//! Final output assembly: write the accumulator directly, or merge the
//! checkpoint units when the run ended exactly on a checkpoint boundary.
use std::path::Path;

use tracing::info;
use wikiembed_core::{Error, Result};

use crate::accumulator::Accumulator;
use crate::checkpoint::{list_units, read_unit, CheckpointUnit};
use crate::table::write_parquet_atomic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assembly {
	/// The non-empty accumulator was written as-is.
	Direct { rows: usize },
	/// The accumulator was empty; `units` checkpoint units were concatenated.
	Merged { rows: usize, units: usize },
	/// No successes and no checkpoints: no output file was produced.
	Nothing,
}

impl Assembly {
	pub fn rows(&self) -> usize {
		match *self {
			Self::Direct { rows } | Self::Merged { rows, .. } => rows,
			Self::Nothing => 0,
		}
	}
}

/// Write the final output. When the accumulator is empty, the units written
/// by this run are merged; only a run that wrote none falls back to every
/// unit already present in `checkpoint_dir`.
pub fn assemble_output(
	acc: &Accumulator,
	written: &[CheckpointUnit],
	checkpoint_dir: Option<&Path>,
	output: &Path,
) -> Result<Assembly> {
	if !acc.is_empty() {
		write_output(acc, output)?;
		return Ok(Assembly::Direct { rows: acc.len() });
	}
	let Some(dir) = checkpoint_dir else { return Ok(Assembly::Nothing) };
	let units = if written.is_empty() { list_units(dir)? } else { written.to_vec() };
	let Some(merged) = merge_units(&units)? else { return Ok(Assembly::Nothing) };
	if merged.is_empty() { return Ok(Assembly::Nothing); }
	info!(units = units.len(), rows = merged.len(), dir = %dir.display(), "merging checkpoint units");
	write_output(&merged, output)?;
	Ok(Assembly::Merged { rows: merged.len(), units: units.len() })
}

/// Concatenate units end-to-end in the given order. `None` when `units` is empty.
pub fn merge_units(units: &[CheckpointUnit]) -> Result<Option<Accumulator>> {
	let mut merged: Option<Accumulator> = None;
	for unit in units {
		let part = read_unit(unit)?;
		match merged.as_mut() {
			Some(acc) => acc.append(part).map_err(|e| Error::persistence(&unit.path, e))?,
			None => merged = Some(part),
		}
	}
	Ok(merged)
}

pub fn write_output(acc: &Accumulator, output: &Path) -> Result<()> {
	let batch = acc.to_record_batch().map_err(|e| Error::persistence(output, e))?;
	write_parquet_atomic(output, &batch, &[]).map_err(|e| Error::persistence(output, format!("{e:#}")))?;
	info!(rows = acc.len(), path = %output.display(), "final embeddings saved");
	Ok(())
}
