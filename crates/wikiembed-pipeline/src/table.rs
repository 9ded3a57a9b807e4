//! Parquet file helpers shared by the pipeline and the prep tools.
//!
//! Writes are atomic: the batch goes to a temporary file in the destination
//! directory which is synced and then renamed over the target, so readers
//! only ever see complete files.
use anyhow::{Context, Result};
use arrow_array::cast::AsArray;
use arrow_array::{ArrayRef, RecordBatch};
use arrow_select::concat::concat_batches;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use std::fs::File;
use std::path::Path;

/// Read a whole Parquet file into a single batch.
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
	let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
	let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
	let schema = builder.schema().clone();
	let batches = builder.build()?.collect::<std::result::Result<Vec<_>, _>>()?;
	Ok(concat_batches(&schema, &batches)?)
}

/// Look up one entry of the file-level key/value metadata.
pub fn read_key_value(path: &Path, key: &str) -> Result<Option<String>> {
	let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
	let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
	let value = builder
		.metadata()
		.file_metadata()
		.key_value_metadata()
		.and_then(|kvs| kvs.iter().find(|kv| kv.key == key))
		.and_then(|kv| kv.value.clone());
	Ok(value)
}

pub fn write_parquet_atomic(path: &Path, batch: &RecordBatch, metadata: &[(&str, String)]) -> Result<()> {
	let dir = match path.parent() { Some(p) if !p.as_os_str().is_empty() => p, _ => Path::new(".") };
	let tmp = tempfile::Builder::new()
		.prefix(".wikiembed-")
		.suffix(".parquet.tmp")
		.tempfile_in(dir)
		.with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
	let kvs: Vec<KeyValue> = metadata.iter().map(|(k, v)| KeyValue::new((*k).to_string(), v.clone())).collect();
	let props = WriterProperties::builder()
		.set_compression(Compression::SNAPPY)
		.set_key_value_metadata((!kvs.is_empty()).then_some(kvs))
		.build();
	let mut writer = ArrowWriter::try_new(tmp.as_file().try_clone()?, batch.schema(), Some(props))?;
	writer.write(batch)?;
	writer.close()?;
	tmp.as_file().sync_all()?;
	tmp.persist(path).map_err(|e| e.error).with_context(|| format!("failed to move parquet file into {}", path.display()))?;
	sync_dir(dir)?;
	Ok(())
}

/// Flush the directory entry so a completed rename survives power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
	File::open(dir)
		.and_then(|d| d.sync_all())
		.with_context(|| format!("failed to sync directory {}", dir.display()))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> { Ok(()) }

/// Values of a Utf8 / LargeUtf8 / Utf8View column, or `None` for other types.
pub fn string_values(array: &ArrayRef) -> Option<Vec<Option<String>>> {
	if let Some(a) = array.as_string_opt::<i32>() { return Some(a.iter().map(|v| v.map(str::to_string)).collect()); }
	if let Some(a) = array.as_string_opt::<i64>() { return Some(a.iter().map(|v| v.map(str::to_string)).collect()); }
	if let Some(a) = array.as_string_view_opt() { return Some(a.iter().map(|v| v.map(str::to_string)).collect()); }
	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use arrow_array::types::Int64Type;
	use arrow_array::Int64Array;
	use std::sync::Arc;

	fn batch(values: Vec<i64>) -> RecordBatch {
		RecordBatch::try_from_iter([("n", Arc::new(Int64Array::from(values)) as ArrayRef)]).unwrap()
	}

	#[test]
	fn atomic_write_replaces_target_and_leaves_no_temp_files() {
		let tmp = tempfile::tempdir().unwrap();
		let path = tmp.path().join("out.parquet");
		write_parquet_atomic(&path, &batch(vec![1, 2, 3]), &[]).unwrap();
		write_parquet_atomic(&path, &batch(vec![7]), &[("k", "v".into())]).unwrap();

		let back = read_parquet(&path).unwrap();
		assert_eq!(back.num_rows(), 1);
		assert_eq!(back.column(0).as_primitive::<Int64Type>().value(0), 7);
		assert_eq!(read_key_value(&path, "k").unwrap().as_deref(), Some("v"));
		let names: Vec<String> = std::fs::read_dir(tmp.path()).unwrap().map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect();
		assert_eq!(names, vec!["out.parquet".to_string()]);
	}
}
