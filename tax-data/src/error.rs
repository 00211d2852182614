use std::path::PathBuf;

use tax_core::ConstantsError;
use thiserror::Error;

/// Errors that can occur when loading tax-year tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Schedule {schedule} missing from {table} brackets")]
    MissingSchedule { table: &'static str, schedule: &'static str },

    #[error("{table} bracket row for {found} found in the {expected} tables")]
    YearMismatch {
        table: &'static str,
        expected: i32,
        found: i32,
    },

    #[error("State code '{0}' is not two uppercase letters")]
    InvalidStateCode(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No tax tables found under {0}")]
    NoTables(PathBuf),

    #[error("Tax year {year} is not supported (available: {available})")]
    UnsupportedYear { year: i32, available: String },

    #[error("Invalid constants: {0}")]
    Constants(#[from] ConstantsError),
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for DataError {
    fn from(err: toml::de::Error) -> Self {
        DataError::TomlParse(err.to_string())
    }
}
