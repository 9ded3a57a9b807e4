use arrow_schema::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

pub const VERSION_CONTROL_COLUMN: &str = "Version Control";
pub const WIKI_LANGUAGE_COLUMN: &str = "Wiki Language";
pub const EMBEDDINGS_COLUMN: &str = "Embeddings";

/// Parquet key/value metadata entry holding a checkpoint unit's 1-based row number.
pub const CHECKPOINT_ROW_KEY: &str = "wikiembed.checkpoint_row";

/// Element type of the `Embeddings` list column.
pub fn embedding_item_field() -> Arc<Field> {
	Arc::new(Field::new("item", DataType::Float64, true))
}

/// Output and checkpoint schema. `Version Control` keeps the input column's type.
pub fn build_output_schema(version_type: &DataType) -> SchemaRef {
	Arc::new(Schema::new(vec![
		Field::new(WIKI_LANGUAGE_COLUMN, DataType::Utf8, false),
		Field::new(EMBEDDINGS_COLUMN, DataType::List(embedding_item_field()), false),
		Field::new(VERSION_CONTROL_COLUMN, version_type.clone(), true),
	]))
}
