// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - demo [--format pretty|jsonl|summary]: scripted grid session (default)
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --path: Show config file path

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;

use crate::config::{Config, VERSION};
use crate::events::TelemetryEvent;
use crate::telemetry::TelemetrySummary;

/// gridspy - telemetry capture for data grid views
#[derive(Parser, Debug)]
#[command(name = "gridspy")]
#[command(version = VERSION)]
#[command(about = "Telemetry capture for data grid views", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted grid session against the sample inventory
    Demo {
        /// How to print the captured events
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Event output format for the demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header line plus indented JSON per event
    Pretty,
    /// One JSON object per line
    Jsonl,
    /// Counts per event type
    Summary,
}

/// Handle `gridspy config`
pub fn handle_config(show: bool, reset: bool, path: bool) -> Result<()> {
    if path {
        let path = Config::config_path().context("could not determine config path")?;
        println!("{}", path.display());
    } else if show {
        let config = Config::load()?;
        println!("# Effective configuration (env > file > defaults)");
        println!();
        print!("{}", config.to_toml());
    } else if reset {
        let path = Config::config_path().context("could not determine config path")?;
        Config::write_default(&path)?;
        println!("Config reset to defaults: {}", path.display());
    } else {
        println!("Usage: gridspy config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    Ok(())
}

/// Print buffered events (newest first) in the requested format
pub fn write_events(
    out: &mut impl Write,
    format: OutputFormat,
    events: &[TelemetryEvent],
    summary: &TelemetrySummary,
) -> Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for event in events {
                serde_json::to_writer(&mut *out, event)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Pretty => {
            for event in events {
                writeln!(
                    out,
                    "── {} {:<26} {}",
                    event.timestamp.format("%H:%M:%S%.3f"),
                    event.event_type(),
                    event.id
                )?;
                writeln!(out, "{}", serde_json::to_string_pretty(&event.payload)?)?;
            }
            writeln!(out)?;
            write_summary(out, summary)?;
        }
        OutputFormat::Summary => write_summary(out, summary)?,
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &TelemetrySummary) -> Result<()> {
    writeln!(out, "{} event(s) buffered", summary.total)?;
    for (event_type, count) in &summary.by_type {
        writeln!(out, "  {:<26} {}", event_type, count)?;
    }
    if let (Some(oldest), Some(newest)) = (summary.oldest, summary.newest) {
        let span = newest - oldest;
        writeln!(out, "  span: {}ms", span.num_milliseconds())?;
    }
    Ok(())
}
