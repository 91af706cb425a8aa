use std::path::PathBuf;

use of_core::{CoreError, StreamKind};

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("failed to open channel {channel}: {reason}")]
    Open { channel: String, reason: String },
    #[error("append to {channel} rejected for offsets {start}..{end}: {reason}")]
    Append {
        channel: String,
        start: String,
        end: String,
        reason: String,
    },
    #[error("{0} ID space exhausted")]
    IdSpaceExhausted(StreamKind),
    #[error("channel {0} is closed")]
    Closed(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io { path: path.into(), source }
    }
}
