use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use of_cli::{exit_status, Invocation};
use of_runtime::init_tracing;
use of_runtime::metrics::Stopwatch;

/// Stream synthetic orders from several parallel instances.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Total orders to generate across all instances.
    total_records: u64,
    /// Number of parallel instances.
    num_parallel_instances: usize,
    /// Fill configuration (TOML). Defaults to ./config.toml.
    config_file: Option<PathBuf>,
    /// Connection profile (JSON). Defaults to ./profile.json.
    profile_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    info!(
        total_records = args.total_records,
        instances = args.num_parallel_instances,
        "orderfill-orchestrate starting"
    );

    let stopwatch = Stopwatch::start();
    let outcome = Invocation::load(args.config_file.as_deref(), args.profile_file.as_deref())
        .and_then(|invocation| {
            invocation.orchestrate(args.total_records, args.num_parallel_instances)
        });
    match &outcome {
        Ok(report) => {
            let line = report.metrics().to_json_line("orchestrate", Some(stopwatch.elapsed()));
            println!("{line}");
        }
        Err(err) => error!("orchestrator error: {err:#}"),
    }
    ExitCode::from(exit_status(&outcome))
}
