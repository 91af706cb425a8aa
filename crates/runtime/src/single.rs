//! Single-instance streaming over the whole customer range.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span};

use of_generator::OrderGenerator;
use of_ingest::{BatchWriter, FillSummary, IdTracker, IngestBackend, StreamingManager};

use crate::config::FillConfig;
use crate::metrics::Stopwatch;
use crate::orchestrator::{Orchestrator, OrchestratorError};

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct OffsetStatus {
    pub orders: Option<String>,
    pub order_items: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SingleRun {
    pub summary: FillSummary,
    pub offsets: OffsetStatus,
    pub duration_ms: u64,
}

/// Streams `num_orders` orders through the unsuffixed channels, drawing
/// customers from `1..=max_customer_id`.
pub fn stream_orders(
    cfg: &FillConfig,
    backend: Arc<dyn IngestBackend>,
    num_orders: u64,
) -> Result<SingleRun, OrchestratorError> {
    let span = info_span!("stream", num_orders);
    let _entered = span.enter();
    let stopwatch = Stopwatch::start();

    let max_customer_id = Orchestrator::from_config(cfg, Arc::clone(&backend)).max_customer_id()?;
    info!("will generate orders for customer IDs in range 1-{max_customer_id}");

    let manager = StreamingManager::open(backend.as_ref(), &cfg.stream.channels, None)?;
    let tracker = IdTracker::from_manager(&manager)?;
    let generator = OrderGenerator::for_instance(cfg.generator.clone(), 0);
    let mut writer = BatchWriter::new(
        manager,
        tracker,
        generator,
        1..=max_customer_id,
        cfg.writer_config(),
        span.clone(),
    );

    let summary = writer.fill(num_orders)?;
    let offsets = OffsetStatus {
        orders: writer.manager().latest_order_offset()?,
        order_items: writer.manager().latest_order_item_offset()?,
    };
    info!("=== offset token status ===");
    info!("orders: {}", offsets.orders.as_deref().unwrap_or("NULL"));
    info!("order items: {}", offsets.order_items.as_deref().unwrap_or("NULL"));
    writer.finish()?;

    Ok(SingleRun {
        summary,
        offsets,
        duration_ms: u64::try_from(stopwatch.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}
