//! Plumbing shared by the orderfill binaries.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info_span, Span};

use of_ingest::IngestBackend;
use of_runtime::{FillConfig, Orchestrator, Profile, RunReport};

/// Loaded inputs of one command invocation.
pub struct Invocation {
    pub cfg: FillConfig,
    pub profile: Profile,
    pub backend: Arc<dyn IngestBackend>,
}

impl Invocation {
    pub fn load(config_file: Option<&Path>, profile_file: Option<&Path>) -> Result<Self> {
        let cfg = FillConfig::load(config_file)?;
        let profile = Profile::load(profile_file)?;
        let backend = cfg.build_backend()?;
        Ok(Self { cfg, profile, backend })
    }

    /// Root span for everything this invocation logs, named after the profile.
    pub fn client_span(&self, command: &'static str) -> Span {
        info_span!("client", command, name = %self.profile.client_name())
    }

    pub fn orchestrate(&self, total_records: u64, instances: usize) -> Result<RunReport> {
        let span = self.client_span("orchestrate");
        let _entered = span.enter();
        let report = Orchestrator::from_config(&self.cfg, Arc::clone(&self.backend))
            .run(total_records, instances)?;
        Ok(report)
    }
}

/// Process exit status for an orchestrated run: 0 only when every partition
/// succeeded.
pub fn exit_status(outcome: &Result<RunReport>) -> u8 {
    match outcome {
        Ok(report) if report.is_success() => 0,
        _ => 1,
    }
}
