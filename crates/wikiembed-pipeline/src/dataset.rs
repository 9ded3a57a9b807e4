//! Input dataset: one text column plus `Version Control`, read fully into memory.
use arrow_array::{Array, ArrayRef, RecordBatch};
use arrow_schema::DataType;
use std::path::Path;

use wikiembed_core::{Error, Result};

use crate::schema::VERSION_CONTROL_COLUMN;
use crate::table::{read_parquet, string_values};

pub struct Dataset {
	texts: Vec<Option<String>>,
	versions: ArrayRef,
}

impl Dataset {
	pub fn open(path: &Path, input_column: &str) -> Result<Self> {
		if !path.is_file() {
			return Err(Error::NotFound(format!("input file '{}' does not exist", path.display())));
		}
		let batch = read_parquet(path).map_err(|e| Error::InvalidInput(format!("failed to read {}: {e:#}", path.display())))?;
		Self::from_batch(&batch, input_column)
	}

	pub fn from_batch(batch: &RecordBatch, input_column: &str) -> Result<Self> {
		let text_col = batch
			.column_by_name(input_column)
			.ok_or_else(|| Error::InvalidInput(format!("missing column '{input_column}'")))?;
		let versions = batch
			.column_by_name(VERSION_CONTROL_COLUMN)
			.ok_or_else(|| Error::InvalidInput(format!("missing column '{VERSION_CONTROL_COLUMN}'")))?
			.clone();
		let texts = string_values(text_col)
			.ok_or_else(|| Error::InvalidInput(format!("column '{input_column}' has type {}, expected a string column", text_col.data_type())))?;
		Ok(Self { texts, versions })
	}

	pub fn from_parts(texts: Vec<Option<String>>, versions: ArrayRef) -> Result<Self> {
		if texts.len() != versions.len() {
			return Err(Error::InvalidInput(format!("{} texts but {} version values", texts.len(), versions.len())));
		}
		Ok(Self { texts, versions })
	}

	pub fn len(&self) -> usize { self.texts.len() }

	pub fn is_empty(&self) -> bool { self.texts.is_empty() }

	/// Input text at 0-based `index`; `None` when null or out of range.
	pub fn text(&self, index: usize) -> Option<&str> { self.texts.get(index).and_then(|t| t.as_deref()) }

	/// One-element slice of the `Version Control` column at `index`.
	pub fn version_at(&self, index: usize) -> ArrayRef { self.versions.slice(index, 1) }

	pub fn version_type(&self) -> &DataType { self.versions.data_type() }
}
