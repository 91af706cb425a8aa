//! Partitioned parallel fills.
//!
//! The orchestrator splits a fill into disjoint customer ranges and order
//! counts, runs one instance per partition on its own worker, and collects a
//! report. Instances share nothing: each opens its own channels and recovers
//! its own [`IdTracker`]. A failing instance never cancels its siblings.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, info_span, Span};

use of_core::retail::CustomerId;
use of_core::{plan_partitions, CoreError, Partition};
use of_generator::{GeneratorConfig, OrderGenerator};
use of_ingest::{
    BatchWriter, ChannelNames, IdTracker, IngestBackend, IngestError, StreamingManager,
    WriterConfig,
};

use crate::config::FillConfig;
use crate::metrics::{IngestMetrics, MetricsSnapshot, Stopwatch};
use crate::run_workers;

#[derive(thiserror::Error, Debug)]
pub enum OrchestratorError {
    #[error("no customers found; seed customers before generating orders")]
    NoCustomers,
    #[error("failed to look up customers: {0}")]
    CustomerLookup(#[source] IngestError),
    #[error(transparent)]
    Plan(#[from] CoreError),
    #[error("streaming failed: {0}")]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Pool(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PartitionOutcome {
    pub index: usize,
    pub success: bool,
    /// Orders credited to this partition; zero unless it completed.
    pub orders_generated: u64,
    pub duration_ms: u64,
    pub metrics: MetricsSnapshot,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub requested_orders: u64,
    pub partitions: Vec<PartitionOutcome>,
}

impl RunReport {
    pub fn successful(&self) -> usize {
        self.partitions.iter().filter(|p| p.success).count()
    }

    pub fn failed(&self) -> usize {
        self.partitions.len() - self.successful()
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.partitions.iter().filter(|p| !p.success).map(|p| p.index).collect()
    }

    pub fn total_orders_generated(&self) -> u64 {
        self.partitions.iter().map(|p| p.orders_generated).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.partitions
            .iter()
            .fold(MetricsSnapshot::default(), |acc, p| acc + p.metrics)
    }

    pub fn log(&self) {
        info!("=== parallel streaming completed ===");
        info!("successful instances: {}/{}", self.successful(), self.partitions.len());
        info!("failed instances: {}", self.failed());
        info!("total orders generated: {}", self.total_orders_generated());
        if !self.is_success() {
            let missing = self.requested_orders - self.total_orders_generated();
            error!(
                failed = ?self.failed_indices(),
                missing,
                "fill incomplete; re-run for the missing orders"
            );
        }
    }
}

pub struct Orchestrator {
    backend: Arc<dyn IngestBackend>,
    channels: ChannelNames,
    writer: WriterConfig,
    generator: GeneratorConfig,
    max_customer_override: Option<CustomerId>,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn IngestBackend>,
        channels: ChannelNames,
        writer: WriterConfig,
        generator: GeneratorConfig,
    ) -> Self {
        Self {
            backend,
            channels,
            writer,
            generator,
            max_customer_override: None,
        }
    }

    pub fn from_config(cfg: &FillConfig, backend: Arc<dyn IngestBackend>) -> Self {
        Self::new(backend, cfg.stream.channels.clone(), cfg.writer_config(), cfg.generator.clone())
            .with_max_customer_id(cfg.customers.max_id)
    }

    pub fn with_max_customer_id(mut self, max_customer_id: Option<CustomerId>) -> Self {
        self.max_customer_override = max_customer_id;
        self
    }

    /// Queried once per run, before any partition starts.
    pub fn max_customer_id(&self) -> Result<CustomerId, OrchestratorError> {
        let max = match self.max_customer_override {
            Some(max) => Some(max),
            None => self.backend.max_customer_id().map_err(OrchestratorError::CustomerLookup)?,
        };
        match max {
            Some(max) if max > 0 => Ok(max),
            _ => Err(OrchestratorError::NoCustomers),
        }
    }

    pub fn run(&self, total_orders: u64, instances: usize) -> Result<RunReport, OrchestratorError> {
        let run_span = info_span!("fill_run", total_orders, instances);
        let _entered = run_span.enter();
        info!("=== parallel streaming orchestrator ===");

        let max_customer_id = self.max_customer_id()?;
        info!(max_customer_id, "total customers available");

        let plan = plan_partitions(total_orders, instances, max_customer_id)?;
        for partition in &plan {
            info!("{partition}");
        }

        let job = Arc::new(PartitionJob {
            backend: Arc::clone(&self.backend),
            channels: self.channels.clone(),
            writer: self.writer.clone(),
            generator: self.generator.clone(),
            parent: run_span.clone(),
        });
        let shared_plan = Arc::new(plan.clone());
        let results = run_workers(instances, move |index| job.run(shared_plan[index]))?;
        info!("all {instances} instances finished");

        let partitions = results
            .into_iter()
            .zip(plan)
            .map(|(result, partition)| match result {
                Ok(outcome) => outcome,
                Err(panic) => {
                    error!(instance = partition.index, %panic, "instance panicked");
                    PartitionOutcome {
                        index: partition.index,
                        success: false,
                        orders_generated: 0,
                        duration_ms: 0,
                        metrics: MetricsSnapshot::default(),
                        error: Some(format!("panicked: {panic}")),
                    }
                }
            })
            .collect();

        let report = RunReport {
            requested_orders: total_orders,
            partitions,
        };
        report.log();
        Ok(report)
    }
}

/// Everything one instance needs; shared read-only across workers.
struct PartitionJob {
    backend: Arc<dyn IngestBackend>,
    channels: ChannelNames,
    writer: WriterConfig,
    generator: GeneratorConfig,
    parent: Span,
}

impl PartitionJob {
    fn run(&self, partition: Partition) -> PartitionOutcome {
        let span = info_span!(
            parent: &self.parent,
            "instance",
            index = partition.index,
            customers = %format_args!("{}-{}", partition.customer_start, partition.customer_end)
        );
        let stopwatch = Stopwatch::start();
        let metrics = IngestMetrics::default();

        let result = {
            let _entered = span.enter();
            info!(orders = partition.orders, "instance starting");
            self.fill(&partition, span.clone(), &metrics)
        };
        let duration_ms = duration_ms(stopwatch.elapsed());

        let _entered = span.enter();
        match result {
            Ok(()) => {
                info!(orders = partition.orders, duration_ms, "instance completed");
                PartitionOutcome {
                    index: partition.index,
                    success: true,
                    orders_generated: partition.orders,
                    duration_ms,
                    metrics: metrics.snapshot(),
                    error: None,
                }
            }
            Err(err) => {
                let snapshot = metrics.snapshot();
                error!(%err, appended_before_failure = snapshot.orders_appended, "instance failed");
                PartitionOutcome {
                    index: partition.index,
                    success: false,
                    orders_generated: 0,
                    duration_ms,
                    metrics: snapshot,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn fill(
        &self,
        partition: &Partition,
        span: Span,
        metrics: &IngestMetrics,
    ) -> Result<(), IngestError> {
        let manager =
            StreamingManager::open(self.backend.as_ref(), &self.channels, Some(partition.index))?;
        let tracker = IdTracker::from_manager(&manager)?;
        let generator = OrderGenerator::for_instance(self.generator.clone(), partition.index);
        let mut writer = BatchWriter::new(
            manager,
            tracker,
            generator,
            partition.customers(),
            self.writer.clone(),
            span,
        )
        .with_observer(Arc::new(metrics.clone()));

        // On error the writer is dropped here, which closes its channels.
        writer.fill(partition.orders)?;
        writer.finish()?;
        Ok(())
    }
}

fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
