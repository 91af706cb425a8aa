//! Seeding the customer table that fills draw customer IDs from.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, info_span};

use of_core::retail::CustomerId;
use of_core::StreamKind;
use of_generator::CustomerGenerator;
use of_ingest::manager::append_records;
use of_ingest::{IngestBackend, IngestChannel, IngestError};

use crate::config::FillConfig;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SeedSummary {
    pub first_id: CustomerId,
    pub last_id: CustomerId,
    pub count: u64,
}

/// Appends `count` customers with IDs continuing after the current maximum.
pub fn seed_customers(
    cfg: &FillConfig,
    backend: &dyn IngestBackend,
    count: u64,
) -> Result<Option<SeedSummary>, IngestError> {
    let span = info_span!("seed_customers", count);
    let _entered = span.enter();
    if count == 0 {
        info!("nothing to seed");
        return Ok(None);
    }

    let first_id = backend.max_customer_id()?.unwrap_or(0) + 1;
    let rng = match cfg.generator.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let registration_start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
    let mut generator = CustomerGenerator::new(rng, registration_start);

    let mut channel = backend.open_channel(&cfg.stream.channels.customers)?;
    let batch_size = cfg.batch.size.max(1);
    let result = append_all(channel.as_mut(), &mut generator, first_id, count, batch_size);
    let closed = channel.close();
    result?;
    closed?;

    let summary = SeedSummary {
        first_id,
        last_id: first_id + count - 1,
        count,
    };
    info!(first_id, last_id = summary.last_id, "customers seeded");
    Ok(Some(summary))
}

fn append_all(
    channel: &mut dyn IngestChannel,
    generator: &mut CustomerGenerator<StdRng>,
    first_id: CustomerId,
    count: u64,
    batch_size: usize,
) -> Result<(), IngestError> {
    let end = first_id + count;
    let mut next = first_id;
    while next < end {
        let n = (end - next).min(batch_size as u64);
        let customers = generator.generate_batch(next, n);
        append_records(channel, StreamKind::Customers, &customers, |c| c.customer_id)?;
        next += n;
        info!("progress: {}/{count} customers", next - first_id);
    }
    Ok(())
}
