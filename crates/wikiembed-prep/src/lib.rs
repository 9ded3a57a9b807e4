//! wikiembed-prep
//!
//! Dataset preparation ahead of the embedding run: build the
//! `Concat Abstract` column from titles and abstracts, and cut large
//! Parquet files into fixed-size parts.
pub mod concat;
pub mod split;

pub use concat::{concat_batch, concat_file, ConcatOptions, CONCAT_ABSTRACT_COLUMN, CONCAT_SAMPLE_ROWS};
pub use split::{plan_parts, split_file, SplitPart, DEFAULT_ROWS_PER_PART, FILE_INFO_NAME};
