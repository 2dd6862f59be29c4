// SPDX-License-Identifier: LGPL-3.0-or-later

//! `fracdelay`: design per-channel fractional-delay correction filters
//! for a multiplexed ADC and print them as tables for external plotting.

mod logger;
mod output;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use fracdelay_units::DesignConfig;
use fracdelay_units::design::{design, tone_check};
use log::{debug, info, warn};

use crate::logger::ColorLogger;
use crate::output::{Format, check_header, check_rows, sweep_rows, taps_rows, write_rows};

#[derive(Parser, Debug)]
#[command(name = "fracdelay", version, about)]
struct Cli {
    /// JSON design configuration; missing fields take the reference
    /// board defaults
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Suppress all log output
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    /// Print diagnostic messages
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-channel filter taps
    Taps(TableArgs),
    /// Frequency response sweep of each channel's filter
    Sweep {
        #[command(flatten)]
        table: TableArgs,
        /// Only these channels (repeatable) [default: all]
        #[arg(long = "channel")]
        channels: Vec<usize>,
    },
    /// In-band error summaries and test-tone errors per order and group
    Check(TableArgs),
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Args, Debug)]
struct TableArgs {
    /// Filter order (tap count) to design; repeatable [default: from config]
    #[arg(short = 'n', long = "order")]
    orders: Vec<usize>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Csv)]
    format: Format,
}

fn load_config(path: Option<&Path>) -> Result<DesignConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => DesignConfig::default(),
    };
    Ok(config)
}

fn with_orders(mut config: DesignConfig, orders: &[usize]) -> DesignConfig {
    if !orders.is_empty() {
        config.orders = orders.to_vec();
    }
    config
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    debug!("configuration: {:?}", config);
    execute(cli.command, config, io::stdout().lock())
}

/// Run one command against `config`, writing its table to `out`.
fn execute<W: Write>(command: Command, config: DesignConfig, mut out: W) -> Result<()> {
    match command {
        Command::Config => {
            config.validate().context("invalid configuration")?;
            serde_json::to_writer_pretty(&mut out, &config)?;
            writeln!(out)?;
        }
        Command::Taps(args) => {
            let config = with_orders(config, &args.orders);
            let designs = design(&config)?;
            let (header, rows) = taps_rows(&designs);
            write_rows(&mut out, args.format, &header, &rows)?;
        }
        Command::Sweep { table, channels } => {
            let config = with_orders(config, &table.orders);
            let num_channels = config.num_channels();
            if let Some(&c) = channels.iter().find(|&&c| c >= num_channels) {
                bail!("channel {} out of range, {} channels configured", c, num_channels);
            }
            let designs = design(&config)?;
            let (header, rows) = sweep_rows(&designs, &channels);
            write_rows(&mut out, table.format, &header, &rows)?;
        }
        Command::Check(args) => {
            let config = with_orders(config, &args.orders);
            let designs = design(&config)?;

            let mut rows = Vec::new();
            let mut failed = Vec::new();
            for d in &designs {
                let tones = tone_check(&config, d.order)?;
                if let Some(worst) = d.worst_summary() {
                    info!(
                        "order {}: latency {} samples, in-band error {:.3e} dB / {:.3e} deg up to {} Hz",
                        d.order,
                        d.latency,
                        worst.max_magnitude_error_db,
                        worst.max_phase_error_deg,
                        worst.band_edge
                    );
                    if worst.max_magnitude_error_db > config.magnitude_tolerance_db {
                        failed.push(d.order);
                    }
                }
                for t in tones.iter().filter(|t| t.max_error > t.uncorrected_error) {
                    warn!(
                        "order {}, group {}: correction increases tone error ({:.3e} > {:.3e})",
                        d.order, t.group, t.max_error, t.uncorrected_error
                    );
                }
                rows.extend(check_rows(d, &tones));
            }

            write_rows(&mut out, args.format, &check_header(), &rows)?;
            if !failed.is_empty() {
                bail!(
                    "orders {:?} exceed the {} dB magnitude tolerance",
                    failed,
                    config.magnitude_tolerance_db
                );
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ColorLogger::new(cli.quiet, cli.verbose).init()?;
    run(cli)
}
