use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use of_cli::Invocation;
use of_runtime::init_tracing;
use of_runtime::seed::seed_customers;

/// Append synthetic customers after the current highest customer ID.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Customers to create.
    count: u64,
    /// Fill configuration (TOML). Defaults to ./config.toml.
    config_file: Option<PathBuf>,
    /// Connection profile (JSON). Defaults to ./profile.json.
    profile_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let invocation = Invocation::load(args.config_file.as_deref(), args.profile_file.as_deref())?;
    let span = invocation.client_span("seed_customers");
    let _entered = span.enter();

    match seed_customers(&invocation.cfg, invocation.backend.as_ref(), args.count)? {
        Some(summary) => info!(
            "created customers {}-{} ({} total)",
            summary.first_id, summary.last_id, summary.count
        ),
        None => info!("no customers created"),
    }
    Ok(())
}
