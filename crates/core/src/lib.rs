//! Core types for orderfill: records, offset tokens and partition plans.

use serde::Serialize;

pub mod catalog;
pub mod offset;
pub mod partition;
pub mod retail;

pub use offset::{OffsetToken, StreamKind};
pub use partition::{plan_partitions, Partition};

/// A single row as handed to an ingest channel: column name to value.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("record did not serialize to a JSON object")]
    NotARow,
    #[error("offset token {token:?} does not start with {prefix:?}")]
    OffsetPrefix { token: String, prefix: &'static str },
    #[error("offset token {token:?} has a non-numeric suffix")]
    OffsetValue {
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("cannot split work across zero partitions")]
    NoPartitions,
    #[error("{customers} customers cannot be split across {partitions} partitions")]
    TooFewCustomers { customers: u64, partitions: usize },
}

/// Records that can be appended to a channel as a single row.
pub trait ToRow: Serialize {
    fn to_row(&self) -> Result<Row, CoreError> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(CoreError::NotARow),
        }
    }
}
