use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use of_ingest::FillObserver;

#[derive(Clone, Default)]
pub struct IngestMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    orders_appended: AtomicU64,
    order_items_appended: AtomicU64,
    batches_appended: AtomicU64,
    append_failures: AtomicU64,
}

impl IngestMetrics {
    pub fn inc_batches(&self, orders: u64, order_items: u64) {
        self.inner.orders_appended.fetch_add(orders, Ordering::Relaxed);
        self.inner.order_items_appended.fetch_add(order_items, Ordering::Relaxed);
        self.inner.batches_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_append_failures(&self) {
        self.inner.append_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            orders_appended: self.inner.orders_appended.load(Ordering::Relaxed),
            order_items_appended: self.inner.order_items_appended.load(Ordering::Relaxed),
            batches_appended: self.inner.batches_appended.load(Ordering::Relaxed),
            append_failures: self.inner.append_failures.load(Ordering::Relaxed),
        }
    }
}

impl FillObserver for IngestMetrics {
    fn batch_appended(&self, orders: usize, order_items: usize) {
        self.inc_batches(orders as u64, order_items as u64);
    }

    fn append_failed(&self) {
        self.inc_append_failures();
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub orders_appended: u64,
    pub order_items_appended: u64,
    pub batches_appended: u64,
    pub append_failures: u64,
}

impl Add for MetricsSnapshot {
    type Output = MetricsSnapshot;

    fn add(self, rhs: MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            orders_appended: self.orders_appended + rhs.orders_appended,
            order_items_appended: self.order_items_appended + rhs.order_items_appended,
            batches_appended: self.batches_appended + rhs.batches_appended,
            append_failures: self.append_failures + rhs.append_failures,
        }
    }
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            #[serde(flatten)]
            metrics: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Snapshot {
            label,
            metrics: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
