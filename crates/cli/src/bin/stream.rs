use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use of_cli::Invocation;
use of_runtime::init_tracing;
use of_runtime::metrics::Stopwatch;
use of_runtime::single::stream_orders;

/// Stream synthetic orders from a single instance.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Orders to generate. Defaults to `stream.default_orders` from the config.
    num_orders: Option<u64>,
    /// Fill configuration (TOML). Defaults to ./config.toml.
    config_file: Option<PathBuf>,
    /// Connection profile (JSON). Defaults to ./profile.json.
    profile_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let invocation = Invocation::load(args.config_file.as_deref(), args.profile_file.as_deref())?;
    let span = invocation.client_span("stream");
    let _entered = span.enter();
    info!("orderfill-stream starting");

    let stopwatch = Stopwatch::start();
    let num_orders = args.num_orders.unwrap_or(invocation.cfg.stream.default_orders);
    let run = stream_orders(&invocation.cfg, invocation.backend.clone(), num_orders)?;
    info!(
        orders = run.summary.orders,
        order_items = run.summary.order_items,
        batches = run.summary.batches,
        elapsed_ms = stopwatch.elapsed().as_millis() as u64,
        "stream finished"
    );
    info!("application completed successfully");
    Ok(())
}
