//! Streaming orders and order items into durable append channels.
//!
//! The channel itself is an external collaborator reached through
//! [`IngestBackend`] and [`IngestChannel`]. On top of it sit the per-instance
//! [`StreamingManager`] (one channel per logical stream), the offset-backed
//! [`IdTracker`] and the [`BatchWriter`] fill loop.

pub mod channel;
pub mod error;
pub mod file;
pub mod manager;
pub mod memory;
pub mod tracker;
pub mod writer;

pub use channel::{ChannelNames, IngestBackend, IngestChannel};
pub use error::IngestError;
pub use file::FileBackend;
pub use manager::StreamingManager;
pub use memory::MemoryBackend;
pub use tracker::IdTracker;
pub use writer::{BatchWriter, FillObserver, FillSummary, WriterConfig};

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
