//! In-memory buffer of embedded rows awaiting persistence.
//!
//! Three parallel sequences (embeddings, version-control values, language
//! tags) that always have the same length. Version-control values are kept as
//! one-row slices of the input column so the output carries the input's Arrow
//! type unchanged.
use arrow_array::cast::AsArray;
use arrow_array::types::{Float32Type, Float64Type};
use arrow_array::{new_empty_array, Array, ArrayRef, ListArray, RecordBatch, StringArray};
use arrow_schema::{ArrowError, DataType};
use arrow_select::concat::concat;
use std::sync::Arc;

use wikiembed_core::{Embedding, Error, Result};

use crate::schema::{build_output_schema, EMBEDDINGS_COLUMN, VERSION_CONTROL_COLUMN, WIKI_LANGUAGE_COLUMN};
use crate::table::string_values;

#[derive(Debug, Clone)]
pub struct Accumulator {
	embeddings: Vec<Embedding>,
	versions: Vec<ArrayRef>,
	languages: Vec<String>,
	version_type: DataType,
}

impl Accumulator {
	pub fn new(version_type: DataType) -> Self {
		Self { embeddings: Vec::new(), versions: Vec::new(), languages: Vec::new(), version_type }
	}

	/// Append one embedded row. `version` must be a one-row array of `version_type`.
	pub fn push(&mut self, embedding: Embedding, version: ArrayRef, language: &str) {
		debug_assert_eq!(version.len(), 1, "version value must be a single-row slice");
		debug_assert_eq!(version.data_type(), &self.version_type);
		self.embeddings.push(embedding);
		self.versions.push(version);
		self.languages.push(language.to_string());
	}

	/// Move every row of `other` to the end of `self`, preserving order.
	pub fn append(&mut self, other: Accumulator) -> Result<()> {
		if other.version_type != self.version_type {
			return Err(Error::InvalidInput(format!(
				"'{VERSION_CONTROL_COLUMN}' type mismatch: {} vs {}",
				self.version_type, other.version_type
			)));
		}
		self.embeddings.extend(other.embeddings);
		self.versions.extend(other.versions);
		self.languages.extend(other.languages);
		Ok(())
	}

	pub fn clear(&mut self) {
		self.embeddings.clear();
		self.versions.clear();
		self.languages.clear();
	}

	pub fn len(&self) -> usize { self.embeddings.len() }

	pub fn is_empty(&self) -> bool { self.embeddings.is_empty() }

	pub fn embeddings(&self) -> &[Embedding] { &self.embeddings }

	pub fn languages(&self) -> &[String] { &self.languages }

	pub fn version_type(&self) -> &DataType { &self.version_type }

	/// The version-control sequence as one contiguous array.
	pub fn version_values(&self) -> std::result::Result<ArrayRef, ArrowError> {
		if self.versions.is_empty() { return Ok(new_empty_array(&self.version_type)); }
		let parts: Vec<&dyn Array> = self.versions.iter().map(|a| a.as_ref()).collect();
		concat(&parts)
	}

	pub fn to_record_batch(&self) -> std::result::Result<RecordBatch, ArrowError> {
		let schema = build_output_schema(&self.version_type);
		let languages = StringArray::from(self.languages.clone());
		let embeddings = ListArray::from_iter_primitive::<Float64Type, _, _>(
			self.embeddings.iter().map(|v| Some(v.iter().copied().map(Some))),
		);
		RecordBatch::try_new(schema, vec![Arc::new(languages), Arc::new(embeddings), self.version_values()?])
	}

	/// Rebuild the three sequences from an output/checkpoint batch. Float32
	/// vectors are widened; list, large-list and fixed-size-list columns are
	/// accepted.
	pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
		let column = |name: &str| batch.column_by_name(name).ok_or_else(|| Error::InvalidInput(format!("missing column '{name}'")));
		let languages = string_values(column(WIKI_LANGUAGE_COLUMN)?)
			.ok_or_else(|| Error::InvalidInput(format!("column '{WIKI_LANGUAGE_COLUMN}' is not a string column")))?
			.into_iter()
			.map(Option::unwrap_or_default)
			.collect();
		let embeddings = list_values(column(EMBEDDINGS_COLUMN)?)?;
		let version_col = column(VERSION_CONTROL_COLUMN)?;
		let versions = (0..version_col.len()).map(|i| version_col.slice(i, 1)).collect();
		Ok(Self { embeddings, versions, languages, version_type: version_col.data_type().clone() })
	}
}

fn list_values(col: &ArrayRef) -> Result<Vec<Embedding>> {
	let rows: Vec<Option<ArrayRef>> = if let Some(list) = col.as_list_opt::<i32>() {
		list.iter().collect()
	} else if let Some(list) = col.as_list_opt::<i64>() {
		list.iter().collect()
	} else if let Some(list) = col.as_fixed_size_list_opt() {
		list.iter().collect()
	} else {
		return Err(Error::InvalidInput(format!("column '{EMBEDDINGS_COLUMN}' has type {}, expected a list", col.data_type())));
	};
	rows.into_iter()
		.enumerate()
		.map(|(i, row)| {
			let values = row.ok_or_else(|| Error::InvalidInput(format!("null embedding at row {}", i + 1)))?;
			float_values(&values).ok_or_else(|| Error::InvalidInput(format!("embedding at row {} is not a non-null float list", i + 1)))
		})
		.collect()
}

fn float_values(values: &ArrayRef) -> Option<Embedding> {
	if values.null_count() > 0 { return None; }
	if let Some(a) = values.as_primitive_opt::<Float64Type>() { return Some(a.values().to_vec()); }
	if let Some(a) = values.as_primitive_opt::<Float32Type>() { return Some(a.values().iter().map(|&x| f64::from(x)).collect()); }
	None
}
