use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, Span};

use of_core::retail::CustomerId;
use of_generator::OrderGenerator;

use crate::manager::StreamingManager;
use crate::tracker::IdTracker;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriterConfig {
    /// Orders per append call; each batch's items go out in one call as well.
    pub batch_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self { batch_size: 10_000 }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct FillSummary {
    pub orders: u64,
    pub order_items: u64,
    pub batches: u64,
}

/// Notified after every batch that made it into both streams.
pub trait FillObserver: Send + Sync {
    fn batch_appended(&self, orders: usize, order_items: usize);

    fn append_failed(&self) {}
}

/// Generates orders for a customer range and streams them in fixed-size batches.
///
/// The first failed append aborts the fill. Batches already appended stay
/// committed.
pub struct BatchWriter<R> {
    manager: StreamingManager,
    tracker: IdTracker,
    generator: OrderGenerator<R>,
    customers: RangeInclusive<CustomerId>,
    cfg: WriterConfig,
    observer: Option<Arc<dyn FillObserver>>,
    span: Span,
    progress: FillSummary,
}

impl<R: Rng> BatchWriter<R> {
    pub fn new(
        manager: StreamingManager,
        tracker: IdTracker,
        generator: OrderGenerator<R>,
        customers: RangeInclusive<CustomerId>,
        cfg: WriterConfig,
        span: Span,
    ) -> Self {
        Self {
            manager,
            tracker,
            generator,
            customers,
            cfg,
            observer: None,
            span,
            progress: FillSummary::default(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn FillObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn fill(&mut self, num_orders: u64) -> Result<FillSummary> {
        let span = self.span.clone();
        let _entered = span.enter();
        let batch_size = self.cfg.batch_size.max(1);
        info!(
            num_orders,
            batch_size,
            customers = %format_args!("{}-{}", self.customers.start(), self.customers.end()),
            "starting fill"
        );

        let mut processed = 0u64;
        while processed < num_orders {
            let current = (num_orders - processed).min(batch_size as u64) as usize;
            let item_count = match self.stream_batch(current) {
                Ok(item_count) => item_count,
                Err(err) => {
                    if let Some(observer) = &self.observer {
                        observer.append_failed();
                    }
                    error!(position = processed, %err, "failed to insert batch");
                    return Err(err);
                }
            };

            processed += current as u64;
            self.progress.orders += current as u64;
            self.progress.order_items += item_count as u64;
            self.progress.batches += 1;
            if let Some(observer) = &self.observer {
                observer.batch_appended(current, item_count);
            }
            info!(
                "progress: {processed}/{num_orders} orders streamed ({item_count} order items)"
            );
        }

        info!(num_orders, "fill complete");
        Ok(self.progress)
    }

    /// Generates and appends one batch; returns the number of items written.
    fn stream_batch(&mut self, orders_in_batch: usize) -> Result<usize> {
        let mut orders = Vec::with_capacity(orders_in_batch);
        let mut items = Vec::with_capacity(orders_in_batch * 3);

        for _ in 0..orders_in_batch {
            let customer_id = self.generator.random_customer_id_in_range(self.customers.clone());
            let order_id = self.tracker.next_order_id()?;
            let item_count = self.generator.random_item_count();
            let first_item_id = self.tracker.next_item_id_block(item_count)?;
            let (order, order_items) =
                self.generator.generate(customer_id, order_id, first_item_id, item_count);
            orders.push(order);
            items.extend(order_items);
        }

        self.manager.insert_orders(&orders)?;
        self.manager.insert_order_items(&items)?;
        Ok(items.len())
    }

    pub fn progress(&self) -> FillSummary {
        self.progress
    }

    pub fn manager(&self) -> &StreamingManager {
        &self.manager
    }

    pub fn tracker(&self) -> &IdTracker {
        &self.tracker
    }

    /// Closes the underlying channels.
    pub fn finish(self) -> Result<FillSummary> {
        let progress = self.progress;
        self.manager.close()?;
        Ok(progress)
    }
}
