use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::rc::Rc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::LocalSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use xfce_rs_device_restored::{Daemon, DaemonConfig, PulseLookup};

#[derive(Parser, Debug)]
#[command(
    name = "xfce-rs-device-restored",
    version,
    about = "Remembers the default audio output and input across restarts"
)]
struct Args {
    /// Configuration file (default: ~/.config/xfce-rs/device-restore.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the default-sink and default-source state files
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Default device restore daemon starting");

    let result = LocalSet::new().run_until(run(args)).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

async fn run(args: Args) -> Result<()> {
    let mut config = DaemonConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(state_dir) = args.state_dir {
        config.state_dir = Some(state_dir);
    }

    let lookup = Rc::new(
        PulseLookup::connect(config.manual.clone()).context("PulseAudio is not available")?,
    );
    lookup.apply_manual_defaults();

    let daemon = Daemon::start(lookup, &config)?;

    wait_for_shutdown().await?;
    info!("Shutting down");
    daemon.shutdown();
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("Failed to listen for SIGINT")?,
        _ = terminate.recv() => {}
    }
    Ok(())
}
