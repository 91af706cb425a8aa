use serde::{Deserialize, Serialize};

use of_core::retail::CustomerId;
use of_core::Row;

use crate::Result;

/// One open connection to a named append stream.
pub trait IngestChannel: Send {
    fn name(&self) -> &str;

    /// Appends `rows` as one unit tagged with the first and last offset tokens.
    fn append_rows(&mut self, rows: Vec<Row>, start_offset: &str, end_offset: &str) -> Result<()>;

    /// The token of the last append the stream has durably committed.
    fn latest_committed_offset(&self) -> Result<Option<String>>;

    /// Releases the connection. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// Where channels come from, plus the customer table fills draw IDs from.
pub trait IngestBackend: Send + Sync {
    fn open_channel(&self, name: &str) -> Result<Box<dyn IngestChannel>>;

    /// Highest existing customer ID, `None` when there are no customers.
    fn max_customer_id(&self) -> Result<Option<CustomerId>>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChannelNames {
    pub orders: String,
    pub order_items: String,
    pub customers: String,
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self {
            orders: "ORDERS_CHANNEL".to_string(),
            order_items: "ORDER_ITEMS_CHANNEL".to_string(),
            customers: "CUSTOMERS_CHANNEL".to_string(),
        }
    }
}

impl ChannelNames {
    /// Parallel instances each get their own order and item channels.
    pub fn for_instance(&self, instance: Option<usize>) -> ChannelNames {
        let suffix = instance.map(|i| format!("_instance_{i}")).unwrap_or_default();
        ChannelNames {
            orders: format!("{}{suffix}", self.orders),
            order_items: format!("{}{suffix}", self.order_items),
            customers: self.customers.clone(),
        }
    }
}
