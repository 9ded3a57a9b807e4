//! Title + abstract concatenation.
//!
//! Produces `Title`, `Concat Abstract`, `URL`, `Version Control` and
//! `Wiki Language`, in that order. `Title`, `URL` and `Version Control` are
//! carried through with their input types.
use arrow_array::{Array, ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use wikiembed_core::{Error, Result};
use wikiembed_pipeline::schema::{VERSION_CONTROL_COLUMN, WIKI_LANGUAGE_COLUMN};
use wikiembed_pipeline::table::{read_parquet, string_values, write_parquet_atomic};
use wikiembed_pipeline::validate_paths;

pub const TITLE_COLUMN: &str = "Title";
pub const ABSTRACT_COLUMN: &str = "Abstract";
pub const URL_COLUMN: &str = "URL";
pub const CONCAT_ABSTRACT_COLUMN: &str = "Concat Abstract";

/// Rows kept when `process_all` is off.
pub const CONCAT_SAMPLE_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct ConcatOptions {
	pub process_all: bool,
	pub wiki_language: String,
}

/// Read `input`, concatenate, write `output`. Returns the number of rows written.
pub fn concat_file(input: &Path, output: &Path, options: &ConcatOptions) -> Result<usize> {
	validate_paths(input, output)?;
	let batch = read_parquet(input).map_err(|e| Error::InvalidInput(format!("failed to read {}: {e:#}", input.display())))?;
	let result = concat_batch(&batch, options)?;
	write_parquet_atomic(output, &result, &[]).map_err(|e| Error::persistence(output, format!("{e:#}")))?;
	info!(rows = result.num_rows(), path = %output.display(), "final output saved");
	Ok(result.num_rows())
}

pub fn concat_batch(batch: &RecordBatch, options: &ConcatOptions) -> Result<RecordBatch> {
	if options.wiki_language.trim().is_empty() {
		return Err(Error::InvalidConfig("wiki language tag is empty".into()));
	}
	let rows = if options.process_all { batch.num_rows() } else { batch.num_rows().min(CONCAT_SAMPLE_ROWS) };
	let batch = batch.slice(0, rows);

	let column = |name: &str| -> Result<(Arc<Field>, ArrayRef)> {
		let index = batch.schema().index_of(name).map_err(|_| Error::InvalidInput(format!("missing column '{name}'")))?;
		Ok((batch.schema().fields()[index].clone(), batch.column(index).clone()))
	};
	let (title_field, titles) = column(TITLE_COLUMN)?;
	let (_, abstracts) = column(ABSTRACT_COLUMN)?;
	let (url_field, urls) = column(URL_COLUMN)?;
	let (version_field, versions) = column(VERSION_CONTROL_COLUMN)?;

	let title_values = text_column(TITLE_COLUMN, &titles)?;
	let abstract_values = text_column(ABSTRACT_COLUMN, &abstracts)?;
	let concatenated: StringArray = title_values
		.iter()
		.zip(&abstract_values)
		.map(|(title, summary)| Some(join_title_abstract(title.as_deref(), summary.as_deref())))
		.collect();
	let languages = StringArray::from(vec![options.wiki_language.as_str(); rows]);

	let schema = Arc::new(Schema::new(vec![
		title_field,
		Arc::new(Field::new(CONCAT_ABSTRACT_COLUMN, DataType::Utf8, false)),
		url_field,
		version_field,
		Arc::new(Field::new(WIKI_LANGUAGE_COLUMN, DataType::Utf8, false)),
	]));
	RecordBatch::try_new(schema, vec![titles, Arc::new(concatenated), urls, versions, Arc::new(languages)])
		.map_err(|e| Error::InvalidInput(format!("failed to build concatenated table: {e}")))
}

/// `"<title> <abstract>"` with nulls as empty strings, trimmed.
fn join_title_abstract(title: Option<&str>, summary: Option<&str>) -> String {
	format!("{} {}", title.unwrap_or_default(), summary.unwrap_or_default()).trim().to_string()
}

fn text_column(name: &str, array: &ArrayRef) -> Result<Vec<Option<String>>> {
	string_values(array)
		.ok_or_else(|| Error::InvalidInput(format!("column '{name}' has type {}, expected a string column", array.data_type())))
}
