//! Domain types shared by the embedding client and the row pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::EmbedFailure;

/// One vector returned by the embedding service. Dimensionality is whatever
/// the service returns.
pub type Embedding = Vec<f64>;

/// Why a row produced no embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    EmptyInput,
    EmbeddingFailure,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("empty input"),
            Self::EmbeddingFailure => f.write_str("embedding failure"),
        }
    }
}

/// A skipped row. `row` is 1-based (dataset index 0 is row 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRecord {
    pub row: usize,
    pub reason: SkipReason,
    pub detail: Option<String>,
}

impl SkipRecord {
    pub fn empty_input(row: usize) -> Self {
        Self { row, reason: SkipReason::EmptyInput, detail: None }
    }

    pub fn embedding_failure(row: usize, failure: &EmbedFailure) -> Self {
        Self { row, reason: SkipReason::EmbeddingFailure, detail: Some(failure.to_string()) }
    }
}

/// Row numbers grouped by skip reason, each group in row order.
pub fn group_skips(records: &[SkipRecord]) -> BTreeMap<SkipReason, Vec<usize>> {
    let mut grouped: BTreeMap<SkipReason, Vec<usize>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.reason).or_default().push(record.row);
    }
    grouped
}

/// How many leading rows of the dataset to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    All,
    Sample(usize),
}

impl RowLimit {
    pub fn rows_to_process(self, total: usize) -> usize {
        match self {
            Self::All => total,
            Self::Sample(n) => n.min(total),
        }
    }
}

/// When the checkpoint manager writes a unit.
///
/// - `Successes`: after every `k`-th successful append since the last unit,
///   so every unit holds exactly `k` rows.
/// - `RowIndex`: after a successful append at 0-based index `i` when
///   `(i + 1) % k == 0`. Units may hold fewer than `k` rows when rows were
///   skipped, and a boundary falling on a skipped row writes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointBoundary {
    #[default]
    Successes,
    RowIndex,
}
