//! Tax-year constant tables.
//!
//! Each year lives in its own directory of data files
//! (`parameters.toml`, `ordinary_brackets.csv`, `preferential_brackets.csv`,
//! `state_rates.csv`). The shipped years are embedded at compile time;
//! [`TaxTables::load_dir`] reads the same layout from disk.

mod error;
pub mod loader;
pub mod parameters;
mod tables;

pub use error::DataError;
pub use loader::{StateRateLoader, TaxBracketLoader, TaxBracketRecord};
pub use parameters::YearParameters;
pub use tables::{
    ORDINARY_BRACKETS_FILE, PARAMETERS_FILE, PREFERENTIAL_BRACKETS_FILE, STATE_RATES_FILE,
    TaxTables, YearSources, load_year,
};
