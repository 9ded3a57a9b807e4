pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use error::{EmbedFailure, Error, Result};
pub use traits::Embedder;
pub use types::{CheckpointBoundary, Embedding, RowLimit, SkipReason, SkipRecord};
