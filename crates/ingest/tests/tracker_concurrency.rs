use std::thread;

use of_ingest::IdTracker;

const THREADS: usize = 8;
const CALLS: usize = 2_000;

#[test]
fn concurrent_order_ids_are_a_contiguous_run() {
    let tracker = IdTracker::recover(Some("order_100"), None);

    let mut ids: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    let mut local = Vec::with_capacity(CALLS);
                    for _ in 0..CALLS {
                        let id = tracker.next_order_id().unwrap();
                        // Each caller sees its own IDs strictly increase.
                        if let Some(prev) = local.last() {
                            assert!(id > *prev);
                        }
                        local.push(id);
                    }
                    local
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    ids.sort_unstable();
    let expected: Vec<u64> = (101..=100 + (THREADS * CALLS) as u64).collect();
    assert_eq!(ids, expected);
}

#[test]
fn concurrent_item_blocks_are_disjoint_and_contiguous() {
    let tracker = IdTracker::new(0, 0);

    let mut blocks: Vec<(u64, u64)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let tracker = &tracker;
                scope.spawn(move || {
                    (0..CALLS)
                        .map(|i| {
                            let count = 1 + (t + i) % 5;
                            let start = tracker.next_item_id_block(count).unwrap();
                            (start, start + count as u64 - 1)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    blocks.sort_unstable();
    assert_eq!(blocks[0].0, 1);
    for pair in blocks.windows(2) {
        assert_eq!(
            pair[1].0,
            pair[0].1 + 1,
            "blocks {:?} and {:?} are not adjacent",
            pair[0],
            pair[1]
        );
    }
    assert_eq!(blocks.last().unwrap().1, tracker.last_item_id());
}

#[test]
fn order_and_item_counters_are_independent() {
    let tracker = IdTracker::recover(Some("order_417"), Some("item_9"));
    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..500 {
                tracker.next_item_id_block(2).unwrap();
            }
        });
        scope.spawn(|| {
            for _ in 0..500 {
                tracker.next_order_id().unwrap();
            }
        });
    });
    assert_eq!(tracker.last_order_id(), 917);
    assert_eq!(tracker.last_item_id(), 1_009);
}
