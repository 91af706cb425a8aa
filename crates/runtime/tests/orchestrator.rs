use std::sync::Arc;

use pretty_assertions::assert_eq;

use of_core::CoreError;
use of_generator::GeneratorConfig;
use of_ingest::{ChannelNames, MemoryBackend, WriterConfig};
use of_runtime::{Orchestrator, OrchestratorError};

fn orchestrator(backend: &MemoryBackend) -> Orchestrator {
    Orchestrator::new(
        Arc::new(backend.clone()),
        ChannelNames::default(),
        WriterConfig { batch_size: 50 },
        GeneratorConfig { seed: Some(7), ..GeneratorConfig::default() },
    )
}

#[test]
fn partitions_split_orders_and_customers() {
    let backend = MemoryBackend::with_customers(90);
    let report = orchestrator(&backend).run(1000, 3).unwrap();

    assert!(report.is_success());
    assert_eq!(report.successful(), 3);
    assert_eq!(report.total_orders_generated(), 1000);
    let credited: Vec<u64> = report.partitions.iter().map(|p| p.orders_generated).collect();
    assert_eq!(credited, vec![333, 333, 334]);
    assert_eq!(report.metrics().orders_appended, 1000);

    let ranges = [1..=30, 31..=60, 61..=90];
    for (index, range) in ranges.iter().enumerate() {
        let orders = backend.channel(&format!("ORDERS_CHANNEL_instance_{index}")).unwrap();
        assert_eq!(orders.rows.len() as u64, credited[index]);
        // Each instance recovers its own channel, so IDs restart per instance.
        assert_eq!(orders.appends.first().unwrap().0, "order_1");
        assert_eq!(orders.committed, Some(format!("order_{}", credited[index])));
        for row in &orders.rows {
            assert!(range.contains(&row["CUSTOMER_ID"].as_u64().unwrap()));
        }

        let items = backend.channel(&format!("ORDER_ITEMS_CHANNEL_instance_{index}")).unwrap();
        assert_eq!(items.rows.len() as u64, report.partitions[index].metrics.order_items_appended);
    }
    assert_eq!(backend.open_handles(), 0);
}

#[test]
fn failed_partition_is_reported_without_cancelling_siblings() {
    let backend = MemoryBackend::with_customers(90);
    backend.fail_appends("ORDERS_CHANNEL_instance_2");

    let report = orchestrator(&backend).run(1000, 3).unwrap();

    assert!(!report.is_success());
    assert_eq!(report.successful(), 2);
    assert_eq!(report.failed_indices(), vec![2]);
    assert_eq!(report.total_orders_generated(), 666);

    let failed = &report.partitions[2];
    assert_eq!(failed.orders_generated, 0);
    assert_eq!(failed.metrics.append_failures, 1);
    assert!(failed.error.as_deref().unwrap().contains("ORDERS_CHANNEL_instance_2"));

    for index in 0..2 {
        let orders = backend.channel(&format!("ORDERS_CHANNEL_instance_{index}")).unwrap();
        assert_eq!(orders.rows.len(), 333);
    }
    // The failing instance still released its channels.
    assert_eq!(backend.open_handles(), 0);
}

#[test]
fn resumes_each_instance_from_its_committed_offsets() {
    let backend = MemoryBackend::with_customers(10);
    backend.set_committed_offset("ORDERS_CHANNEL_instance_1", "order_417");
    backend.set_committed_offset("ORDER_ITEMS_CHANNEL_instance_1", "garbage");

    let report = orchestrator(&backend).run(4, 2).unwrap();
    assert!(report.is_success());

    let orders = backend.channel("ORDERS_CHANNEL_instance_1").unwrap();
    assert_eq!(orders.appends, vec![("order_418".to_string(), "order_419".to_string())]);
    let items = backend.channel("ORDER_ITEMS_CHANNEL_instance_1").unwrap();
    assert_eq!(items.appends[0].0, "item_1");
}

#[test]
fn no_customers_is_fatal_before_any_work() {
    let backend = MemoryBackend::new();
    let err = orchestrator(&backend).run(100, 2).unwrap_err();
    assert!(matches!(err, OrchestratorError::NoCustomers));
    assert!(backend.channel_names().is_empty());
}

#[test]
fn more_instances_than_customers_is_rejected() {
    let backend = MemoryBackend::with_customers(2);
    let err = orchestrator(&backend).run(100, 3).unwrap_err();
    assert!(matches!(err, OrchestratorError::Plan(CoreError::TooFewCustomers { .. })));
}

#[test]
fn customer_override_skips_the_lookup() {
    let backend = MemoryBackend::new();
    let report = orchestrator(&backend).with_max_customer_id(Some(5)).run(10, 1).unwrap();
    assert!(report.is_success());
    assert_eq!(report.total_orders_generated(), 10);
}
