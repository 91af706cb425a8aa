//! An in-process backend with failure injection, for tests and dry runs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use of_core::retail::CustomerId;
use of_core::Row;

use crate::channel::{IngestBackend, IngestChannel};
use crate::{IngestError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelLog {
    pub rows: Vec<Row>,
    /// `(start, end)` offset tokens of every accepted append, in order.
    pub appends: Vec<(String, String)>,
    pub committed: Option<String>,
}

#[derive(Default)]
struct MemoryState {
    channels: HashMap<String, ChannelLog>,
    failing: HashSet<String>,
    max_customer_id: Option<CustomerId>,
    open_handles: usize,
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(max_customer_id: CustomerId) -> Self {
        let backend = Self::new();
        backend.state.lock().max_customer_id = Some(max_customer_id);
        backend
    }

    /// Pretends `channel` already committed up to `token`.
    pub fn set_committed_offset(&self, channel: &str, token: &str) {
        let mut state = self.state.lock();
        state.channels.entry(channel.to_string()).or_default().committed = Some(token.to_string());
    }

    /// Every later append to `channel` is rejected.
    pub fn fail_appends(&self, channel: &str) {
        self.state.lock().failing.insert(channel.to_string());
    }

    pub fn channel(&self, name: &str) -> Option<ChannelLog> {
        self.state.lock().channels.get(name).cloned()
    }

    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.state.lock().channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Channels opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.state.lock().open_handles
    }
}

impl IngestBackend for MemoryBackend {
    fn open_channel(&self, name: &str) -> Result<Box<dyn IngestChannel>> {
        let mut state = self.state.lock();
        state.channels.entry(name.to_string()).or_default();
        state.open_handles += 1;
        Ok(Box::new(MemoryChannel {
            name: name.to_string(),
            state: Arc::clone(&self.state),
            open: true,
        }))
    }

    fn max_customer_id(&self) -> Result<Option<CustomerId>> {
        Ok(self.state.lock().max_customer_id)
    }
}

struct MemoryChannel {
    name: String,
    state: Arc<Mutex<MemoryState>>,
    open: bool,
}

impl IngestChannel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn append_rows(&mut self, rows: Vec<Row>, start_offset: &str, end_offset: &str) -> Result<()> {
        if !self.open {
            return Err(IngestError::Closed(self.name.clone()));
        }
        let mut state = self.state.lock();
        if state.failing.contains(&self.name) {
            return Err(IngestError::Append {
                channel: self.name.clone(),
                start: start_offset.to_string(),
                end: end_offset.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        let log = state.channels.entry(self.name.clone()).or_default();
        log.rows.extend(rows);
        log.appends.push((start_offset.to_string(), end_offset.to_string()));
        log.committed = Some(end_offset.to_string());
        Ok(())
    }

    fn latest_committed_offset(&self) -> Result<Option<String>> {
        let state = self.state.lock();
        Ok(state.channels.get(&self.name).and_then(|log| log.committed.clone()))
    }

    fn close(&mut self) -> Result<()> {
        if std::mem::replace(&mut self.open, false) {
            self.state.lock().open_handles -= 1;
        }
        Ok(())
    }
}

impl Drop for MemoryChannel {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
