//! Order and order-item ID issuance recovered from committed offsets.

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use of_core::{OffsetToken, StreamKind};

use crate::manager::StreamingManager;
use crate::{IngestError, Result};

/// Issues gap-free IDs continuing after the last committed offset of each stream.
///
/// Order and item counters are locked independently.
#[derive(Debug)]
pub struct IdTracker {
    order_counter: Mutex<u64>,
    item_counter: Mutex<u64>,
}

impl IdTracker {
    /// Starts counting after the given last-issued IDs.
    pub fn new(last_order_id: u64, last_item_id: u64) -> Self {
        Self {
            order_counter: Mutex::new(last_order_id),
            item_counter: Mutex::new(last_item_id),
        }
    }

    /// Recovers both counters from raw committed tokens. Missing or malformed
    /// tokens fall back to zero.
    pub fn recover(order_token: Option<&str>, item_token: Option<&str>) -> Self {
        let tracker = Self::new(
            recover_base(StreamKind::Orders, order_token),
            recover_base(StreamKind::OrderItems, item_token),
        );
        info!(
            order = tracker.last_order_id(),
            order_item = tracker.last_item_id(),
            "ID tracker initialized"
        );
        tracker
    }

    pub fn from_manager(manager: &StreamingManager) -> Result<Self> {
        let order_token = manager.latest_order_offset()?;
        let item_token = manager.latest_order_item_offset()?;
        Ok(Self::recover(order_token.as_deref(), item_token.as_deref()))
    }

    /// Fails once the order ID space is used up; the counter is left as is.
    pub fn next_order_id(&self) -> Result<u64> {
        let mut counter = self.order_counter.lock();
        let next = counter
            .checked_add(1)
            .ok_or(IngestError::IdSpaceExhausted(StreamKind::Orders))?;
        *counter = next;
        Ok(next)
    }

    /// Reserves `count` consecutive item IDs and returns the first.
    ///
    /// A zero-count block reserves nothing: it returns the ID the next block
    /// will start at and leaves the counter untouched.
    pub fn next_item_id_block(&self, count: usize) -> Result<u64> {
        let exhausted = || IngestError::IdSpaceExhausted(StreamKind::OrderItems);
        let mut counter = self.item_counter.lock();
        let start = counter.checked_add(1).ok_or_else(exhausted)?;
        if count == 0 {
            return Ok(start);
        }
        *counter = counter.checked_add(count as u64).ok_or_else(exhausted)?;
        Ok(start)
    }

    pub fn last_order_id(&self) -> u64 {
        *self.order_counter.lock()
    }

    pub fn last_item_id(&self) -> u64 {
        *self.item_counter.lock()
    }
}

fn recover_base(kind: StreamKind, token: Option<&str>) -> u64 {
    match OffsetToken::parse_committed(kind, token) {
        Ok(Some(token)) => token.id,
        Ok(None) => {
            debug!(stream = %kind, "no committed offset, starting from 0");
            0
        }
        Err(err) => {
            warn!(
                stream = %kind,
                token = token.unwrap_or_default(),
                %err,
                "failed to parse offset token, starting from 0"
            );
            0
        }
    }
}
