use std::sync::Arc;

use of_ingest::{FileBackend, IngestBackend, MemoryBackend};
use of_runtime::config::{from_toml_str, FillConfig};
use of_runtime::orchestrator::OrchestratorError;
use of_runtime::seed::seed_customers;
use of_runtime::single::stream_orders;

fn config() -> FillConfig {
    from_toml_str("[batch]\nsize = 25\n[generator]\nseed = 1\n").unwrap()
}

#[test]
fn single_instance_reports_final_offsets() {
    let backend = MemoryBackend::with_customers(40);
    let run = stream_orders(&config(), Arc::new(backend.clone()), 60).unwrap();

    assert_eq!(run.summary.orders, 60);
    assert_eq!(run.summary.batches, 3);
    assert_eq!(run.offsets.orders.as_deref(), Some("order_60"));
    assert_eq!(run.offsets.order_items, Some(format!("item_{}", run.summary.order_items)));
    assert_eq!(backend.channel("ORDERS_CHANNEL").unwrap().rows.len(), 60);
    assert_eq!(backend.open_handles(), 0);
}

#[test]
fn single_instance_needs_customers() {
    let backend = MemoryBackend::new();
    let err = stream_orders(&config(), Arc::new(backend), 10).unwrap_err();
    assert!(matches!(err, OrchestratorError::NoCustomers));
}

#[test]
fn seeded_customers_feed_the_file_backend_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config();
    let backend = FileBackend::new(dir.path(), cfg.stream.channels.customers.clone()).unwrap();

    let first = seed_customers(&cfg, &backend, 60).unwrap().unwrap();
    assert_eq!((first.first_id, first.last_id), (1, 60));
    assert_eq!(backend.max_customer_id().unwrap(), Some(60));

    let second = seed_customers(&cfg, &backend, 15).unwrap().unwrap();
    assert_eq!((second.first_id, second.last_id), (61, 75));
    assert_eq!(backend.max_customer_id().unwrap(), Some(75));

    assert_eq!(seed_customers(&cfg, &backend, 0).unwrap(), None);

    let run = stream_orders(&cfg, Arc::new(backend), 30).unwrap();
    assert_eq!(run.summary.orders, 30);
}
