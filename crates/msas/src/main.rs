//! msas - Minecraft server auto shutdown
//!
//! Wires the pieces together for one run:
//! - Settings loading and the interactive setup
//! - Server supervision on the shared console
//! - History log, window gate, countdown and power-off

mod console;
mod setup;

use anyhow::Result;
use clap::Parser;
use msas_config::{load_settings, save_settings};
use msas_core::{RunFlow, StdinOperator};
use msas_host::{ConsoleSupervisor, SystemPower};
use msas_store::FileHistory;
use msas_util::{MSAS_DATA_DIR_ENV, config_path, data_dir_without_env, history_path};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleReporter;
use crate::setup::Prompter;

/// msas - Run a Minecraft server and shut the PC down after it stops
#[derive(Parser, Debug)]
#[command(name = "msas")]
#[command(about = "Run a Minecraft server and shut the PC down after it stops", long_about = None)]
struct Args {
    /// Directory holding config.json and System.log (or set MSAS_DATA_DIR env var)
    #[arg(short, long, env = MSAS_DATA_DIR_ENV, default_value_os_t = data_dir_without_env())]
    data_dir: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout belongs to the server console
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %args.data_dir.display(),
        mock_time = msas_util::is_mock_time_active(),
        "msas starting"
    );

    let config_path = config_path(&args.data_dir);
    let settings = load_settings(&config_path);

    let settings = {
        let stdin = std::io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
        match prompter.setup(settings.clone(), |s| save_settings(&config_path, s)) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Setup interrupted, using loaded settings");
                settings
            }
        }
    };

    let flow = RunFlow::new(
        settings,
        Arc::new(ConsoleSupervisor::new()),
        Arc::new(SystemPower::new()),
        Arc::new(FileHistory::open(history_path(&args.data_dir))),
        Arc::new(StdinOperator::new()),
    );

    let mut reporter = ConsoleReporter::new(std::io::stdout());
    let report = flow.run(&mut reporter).await;
    reporter.finish();

    info!(
        ?report,
        shutdown_attempted = report.shutdown_attempted(),
        "msas finished"
    );
    Ok(())
}
