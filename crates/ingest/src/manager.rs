use tracing::{debug, error, info};

use of_core::retail::{Order, OrderItem};
use of_core::{Row, StreamKind, ToRow};

use crate::channel::{ChannelNames, IngestBackend, IngestChannel};
use crate::Result;

/// The order and order-item channels owned by one streaming instance.
///
/// Channels are closed by [`StreamingManager::close`] or, failing that, on drop,
/// so every exit path of an instance releases its connections.
pub struct StreamingManager {
    instance: Option<usize>,
    orders: Box<dyn IngestChannel>,
    order_items: Box<dyn IngestChannel>,
    closed: bool,
}

impl StreamingManager {
    pub fn open(
        backend: &dyn IngestBackend,
        names: &ChannelNames,
        instance: Option<usize>,
    ) -> Result<Self> {
        let names = names.for_instance(instance);
        match instance {
            Some(i) => info!(instance = i, "opening channels for instance"),
            None => info!("opening channels"),
        }

        let mut orders = open_channel(backend, &names.orders)?;
        let order_items = match open_channel(backend, &names.order_items) {
            Ok(channel) => channel,
            Err(err) => {
                if let Err(close_err) = orders.close() {
                    error!(channel = orders.name(), %close_err, "failed to close channel");
                }
                return Err(err);
            }
        };

        info!("all channels initialized");
        Ok(Self {
            instance,
            orders,
            order_items,
            closed: false,
        })
    }

    pub fn instance(&self) -> Option<usize> {
        self.instance
    }

    pub fn insert_orders(&mut self, orders: &[Order]) -> Result<()> {
        append_records(self.orders.as_mut(), StreamKind::Orders, orders, |o| o.order_id)
    }

    pub fn insert_order_items(&mut self, items: &[OrderItem]) -> Result<()> {
        append_records(self.order_items.as_mut(), StreamKind::OrderItems, items, |i| {
            i.order_item_id
        })
    }

    pub fn latest_order_offset(&self) -> Result<Option<String>> {
        self.orders.latest_committed_offset()
    }

    pub fn latest_order_item_offset(&self) -> Result<Option<String>> {
        self.order_items.latest_committed_offset()
    }

    pub fn close(mut self) -> Result<()> {
        self.close_channels()
    }

    fn close_channels(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        info!("closing channels");
        let orders = self.orders.close();
        let items = self.order_items.close();
        orders.and(items)
    }
}

impl Drop for StreamingManager {
    fn drop(&mut self) {
        if let Err(err) = self.close_channels() {
            error!(%err, "error closing streaming manager");
        }
    }
}

fn open_channel(backend: &dyn IngestBackend, name: &str) -> Result<Box<dyn IngestChannel>> {
    let channel = backend.open_channel(name)?;
    let latest = channel.latest_committed_offset()?;
    info!(
        channel = name,
        latest_committed = latest.as_deref().unwrap_or("NULL (new channel)"),
        "channel opened"
    );
    Ok(channel)
}

/// Appends `records` in one call, tagged with the tokens of the first and last IDs.
pub fn append_records<T: ToRow>(
    channel: &mut dyn IngestChannel,
    kind: StreamKind,
    records: &[T],
    id_of: impl Fn(&T) -> u64,
) -> Result<()> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Ok(());
    };
    let start = kind.token(id_of(first)).to_string();
    let end = kind.token(id_of(last)).to_string();
    let rows = records.iter().map(ToRow::to_row).collect::<Result<Vec<Row>, _>>()?;

    channel.append_rows(rows, &start, &end)?;
    debug!(channel = channel.name(), count = records.len(), %start, %end, "appended {kind}");
    Ok(())
}
