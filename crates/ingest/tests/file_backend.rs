use serde_json::json;

use of_core::Row;
use of_ingest::{ChannelNames, FileBackend, IdTracker, IngestBackend, StreamingManager};

fn row(value: serde_json::Value) -> Row {
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn appends_persist_rows_and_committed_offset() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(dir.path(), "CUSTOMERS").unwrap();

    let mut channel = backend.open_channel("ORDERS").unwrap();
    assert_eq!(channel.latest_committed_offset().unwrap(), None);

    channel
        .append_rows(
            vec![row(json!({"ORDER_ID": 1})), row(json!({"ORDER_ID": 2}))],
            "order_1",
            "order_2",
        )
        .unwrap();
    channel.append_rows(vec![row(json!({"ORDER_ID": 3}))], "order_3", "order_3").unwrap();
    assert_eq!(channel.latest_committed_offset().unwrap().as_deref(), Some("order_3"));
    channel.close().unwrap();
    assert!(channel.append_rows(Vec::new(), "order_4", "order_4").is_err());

    let rows = backend.read_rows("ORDERS").unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r["ORDER_ID"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn reopened_channels_resume_id_tracking() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(dir.path(), "CUSTOMERS").unwrap();
    let names = ChannelNames::default();

    {
        let mut orders = backend.open_channel("ORDERS_CHANNEL_instance_1").unwrap();
        orders.append_rows(vec![row(json!({"ORDER_ID": 41}))], "order_41", "order_41").unwrap();
    }

    let manager = StreamingManager::open(&backend, &names, Some(1)).unwrap();
    let tracker = IdTracker::from_manager(&manager).unwrap();
    assert_eq!(tracker.next_order_id().unwrap(), 42);
    assert_eq!(tracker.next_item_id_block(1).unwrap(), 1);
    manager.close().unwrap();
}

#[test]
fn max_customer_id_reads_customer_channel() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(dir.path(), "CUSTOMERS").unwrap();
    assert_eq!(backend.max_customer_id().unwrap(), None);

    let mut customers = backend.open_channel("CUSTOMERS").unwrap();
    customers
        .append_rows(
            vec![
                row(json!({"CUSTOMER_ID": 7})),
                row(json!({"CUSTOMER_ID": 12})),
                row(json!({"CUSTOMER_ID": 3})),
            ],
            "customer_7",
            "customer_3",
        )
        .unwrap();
    assert_eq!(backend.max_customer_id().unwrap(), Some(12));
}
