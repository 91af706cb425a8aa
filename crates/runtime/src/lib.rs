//! Runtime bootstrap for orderfill: tracing, the worker pool and the
//! orchestration entry points the binaries drive.

use anyhow::{anyhow, Result};
use tracing::{info, Level};

pub mod config;
pub mod metrics;
pub mod orchestrator;
pub mod seed;
pub mod single;

pub use config::{ConfigError, FillConfig, Profile};
pub use orchestrator::{Orchestrator, OrchestratorError, PartitionOutcome, RunReport};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .try_init();
}

/// Runs `f` once on each of `workers` process-local timely workers and waits
/// for all of them.
///
/// Results come back in worker-index order. A worker that panicked yields
/// `Err` with the panic payload; the others are unaffected.
pub fn run_workers<T, F>(workers: usize, f: F) -> Result<Vec<Result<T, String>>>
where
    T: Send + 'static,
    F: Fn(usize) -> T + Send + Sync + 'static,
{
    info!(%workers, "starting worker pool");
    let guards = timely::execute(timely::Config::process(workers), move |worker| f(worker.index()))
        .map_err(|e| anyhow!("failed to start worker pool: {e}"))?;
    Ok(guards.join())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workers_report_in_index_order() {
        let results = run_workers(4, |index| index * 10).unwrap();
        let values: Vec<usize> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![0, 10, 20, 30]);
    }

    #[test]
    fn a_panicking_worker_does_not_take_down_its_siblings() {
        let results = run_workers(3, |index| {
            if index == 1 {
                panic!("worker {index} exploded");
            }
            index
        })
        .unwrap();
        assert_eq!(results[0], Ok(0));
        assert!(results[1].is_err());
        assert_eq!(results[2], Ok(2));
    }
}
