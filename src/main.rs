// gridspy - scripted grid session harness
//
// Runs the demo session against the sample inventory with real timing and
// prints the captured buffer to stdout. Logs go to stderr.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use gridspy::cli::{self, Cli, Commands, OutputFormat};
use gridspy::config::{Config, VERSION};
use gridspy::{demo, logging, TelemetryService};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands exit early
    let format = match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            return cli::handle_config(show, reset, path);
        }
        Some(Commands::Demo { format }) => format,
        None => OutputFormat::Pretty,
    };

    // Ensure config template exists (helps users discover options)
    let created = Config::ensure_config_exists();

    let config = Config::load()?;

    // Guard must outlive the session so file logs flush
    let _log_guard = logging::init(&config.logging)?;

    match created {
        Ok(Some(path)) => tracing::info!("Wrote default config to {}", path.display()),
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not write default config: {:#}", e),
    }

    tracing::info!(
        version = VERSION,
        buffer_capacity = config.telemetry.buffer_capacity,
        scroll_debounce_ms = config.telemetry.scroll_debounce_ms,
        "gridspy starting"
    );

    let service = Arc::new(TelemetryService::from_config(&config.telemetry));
    tracing::debug!(sinks = ?service.sink_names(), "Telemetry service ready");

    let service = demo::run_demo(&config, service).await;

    let stdout = std::io::stdout();
    cli::write_events(
        &mut stdout.lock(),
        format,
        &service.snapshot(),
        &service.summary(),
    )?;

    service.shutdown();
    Ok(())
}
