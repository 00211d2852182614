use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use tax_core::{TaxEngine, TaxResult};
use tax_data::TaxTables;
use tracing::{debug, info};

use crate::scenario::Scenario;

/// One scenario and the engine's result for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub label: String,
    pub result: TaxResult,
}

/// Picks the tax year for a run.
///
/// An explicit `--year` wins, then the scenario's `tax_year`. Otherwise the
/// previous calendar year is used when tables exist for it, else the latest
/// year available.
pub fn resolve_year(
    explicit: Option<i32>,
    scenario_year: Option<i32>,
    tables: &TaxTables,
) -> Option<i32> {
    if let Some(year) = explicit.or(scenario_year) {
        return Some(year);
    }
    let previous = Local::now().year() - 1;
    if tables.get(previous).is_ok() {
        return Some(previous);
    }
    tables.latest().map(|constants| constants.tax_year)
}

/// Runs the engine for an already-validated scenario.
pub fn estimate(
    scenario: &Scenario,
    tables: &TaxTables,
    year: Option<i32>,
) -> Result<Estimate> {
    let tax_year = resolve_year(year, scenario.tax_year, tables)
        .context("no tax tables are loaded")?;
    let constants = tables
        .get(tax_year)
        .with_context(|| format!("cannot estimate '{}'", scenario.label()))?;
    let engine = TaxEngine::new(constants)
        .with_context(|| format!("tax year {tax_year} constants are invalid"))?;

    debug!(scenario = scenario.label(), tax_year, "Running estimate");
    let result = engine.calculate(
        &scenario.income,
        &scenario.personal,
        &scenario.deductions,
        &scenario.credit_inputs(),
    );
    info!(
        scenario = scenario.label(),
        tax_year,
        total_tax = %result.total_tax,
        balance_due = %result.balance_due,
        "Estimate complete"
    );

    Ok(Estimate {
        label: scenario.label().to_string(),
        result,
    })
}

/// Loads the scenario at `path` and estimates it.
pub fn estimate_file(
    path: &Path,
    tables: &TaxTables,
    year: Option<i32>,
) -> Result<Estimate> {
    let scenario = Scenario::load(path)?;
    estimate(&scenario, tables, year)
}

/// The built-in tables, or those under `dir` when given.
pub fn load_tables(dir: Option<&Path>) -> Result<TaxTables> {
    match dir {
        Some(dir) => TaxTables::load_dir(dir)
            .with_context(|| format!("failed to load tax tables from {}", dir.display())),
        None => TaxTables::builtin().context("built-in tax tables are invalid"),
    }
}
