use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tax_cli::{OutputFormat, app, logging, report};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// US federal, payroll and state tax estimator.
///
/// Reads one or more scenario files (TOML) and prints the estimated
/// liability. Two or more scenarios are shown side by side.
#[derive(Debug, Parser)]
#[command(name = "tax-estimator", version, about)]
struct Cli {
    /// Scenario files to estimate.
    #[arg(required = true, value_name = "SCENARIO")]
    scenarios: Vec<PathBuf>,

    /// Tax year to use, overriding each scenario's `tax_year`.
    #[arg(long)]
    year: Option<i32>,

    /// Load tax tables from this directory instead of the built-in set.
    #[arg(long, value_name = "DIR")]
    tables: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log filter (e.g. `debug` or `warn,tax_core=debug`). Overrides `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let tables = app::load_tables(cli.tables.as_deref())?;
    info!(years = ?tables.years().collect::<Vec<_>>(), "Tax tables ready");

    let estimates = cli
        .scenarios
        .iter()
        .map(|path| {
            app::estimate_file(path, &tables, cli.year)
                .with_context(|| format!("failed to estimate {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let output = report::render(&estimates, cli.format).context("failed to render report")?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}
