use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tax_core::{StateTaxTable, TaxYearConstants};
use tracing::{debug, info};

use crate::DataError;
use crate::loader::{StateRateLoader, TaxBracketLoader};
use crate::parameters::YearParameters;

pub const PARAMETERS_FILE: &str = "parameters.toml";
pub const ORDINARY_BRACKETS_FILE: &str = "ordinary_brackets.csv";
pub const PREFERENTIAL_BRACKETS_FILE: &str = "preferential_brackets.csv";
pub const STATE_RATES_FILE: &str = "state_rates.csv";

/// The four source texts that make up one tax year.
#[derive(Debug, Clone, Copy)]
pub struct YearSources<'a> {
    pub parameters: &'a str,
    pub ordinary_brackets: &'a str,
    pub preferential_brackets: &'a str,
    pub state_rates: &'a str,
}

const BUILTIN: &[YearSources<'static>] = &[YearSources {
    parameters: include_str!("../data/2025/parameters.toml"),
    ordinary_brackets: include_str!("../data/2025/ordinary_brackets.csv"),
    preferential_brackets: include_str!("../data/2025/preferential_brackets.csv"),
    state_rates: include_str!("../data/2025/state_rates.csv"),
}];

/// Assembles and validates one year of constants.
pub fn load_year(sources: YearSources<'_>) -> Result<TaxYearConstants, DataError> {
    let params = YearParameters::parse(sources.parameters)?;
    let tax_year = params.tax_year;

    let ordinary = TaxBracketLoader::parse(sources.ordinary_brackets.as_bytes())?;
    let preferential = TaxBracketLoader::parse(sources.preferential_brackets.as_bytes())?;
    let state_rates = StateRateLoader::parse(sources.state_rates.as_bytes())?;

    let constants = TaxYearConstants {
        tax_year,
        ordinary_brackets: TaxBracketLoader::build("ordinary", tax_year, &ordinary)?,
        preferential_brackets: TaxBracketLoader::build("preferential", tax_year, &preferential)?,
        standard_deduction: params.standard_deduction,
        additional_standard_deduction: params.additional_standard_deduction,
        capital_loss_limit: params.capital_loss_limit,
        social_security_inclusion_rate: params.social_security_inclusion_rate,
        payroll: params.payroll,
        niit: params.niit,
        amt: params.amt.into_constants(),
        deductions: params.deductions,
        credits: params.credits,
        state: StateTaxTable {
            default_rate: params.state.default_rate,
            rates: state_rates,
        },
    };
    constants.validate()?;

    debug!(
        tax_year,
        states = constants.state.rates.len(),
        "Loaded tax year constants"
    );
    Ok(constants)
}

/// Validated constants keyed by tax year.
#[derive(Debug, Clone, Default)]
pub struct TaxTables {
    years: BTreeMap<i32, TaxYearConstants>,
}

impl TaxTables {
    /// The tables shipped with the crate.
    pub fn builtin() -> Result<Self, DataError> {
        let mut tables = Self::default();
        for sources in BUILTIN {
            tables.insert(load_year(*sources)?)?;
        }
        Ok(tables)
    }

    /// Loads tables from `dir`.
    ///
    /// `dir` is either one year's directory (holding `parameters.toml`) or a
    /// directory of such year directories.
    pub fn load_dir(dir: &Path) -> Result<Self, DataError> {
        let mut tables = Self::default();

        if dir.join(PARAMETERS_FILE).is_file() {
            tables.insert(load_year_dir(dir)?)?;
        } else {
            let entries = fs::read_dir(dir).map_err(|source| DataError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let mut year_dirs: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.join(PARAMETERS_FILE).is_file())
                .collect();
            year_dirs.sort();

            for year_dir in year_dirs {
                tables.insert(load_year_dir(&year_dir)?)?;
            }
        }

        if tables.years.is_empty() {
            return Err(DataError::NoTables(dir.to_path_buf()));
        }
        info!(dir = %dir.display(), years = ?tables.years().collect::<Vec<_>>(), "Loaded tax tables");
        Ok(tables)
    }

    /// Adds or replaces one year after validating it.
    pub fn insert(
        &mut self,
        constants: TaxYearConstants,
    ) -> Result<(), DataError> {
        constants.validate()?;
        self.years.insert(constants.tax_year, constants);
        Ok(())
    }

    pub fn get(
        &self,
        tax_year: i32,
    ) -> Result<&TaxYearConstants, DataError> {
        self.years
            .get(&tax_year)
            .ok_or_else(|| DataError::UnsupportedYear {
                year: tax_year,
                available: self
                    .years()
                    .map(|year| year.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn latest(&self) -> Option<&TaxYearConstants> {
        self.years.values().next_back()
    }
}

fn load_year_dir(dir: &Path) -> Result<TaxYearConstants, DataError> {
    let read = |name: &str| {
        let path = dir.join(name);
        fs::read_to_string(&path).map_err(|source| DataError::Io { path, source })
    };

    let parameters = read(PARAMETERS_FILE)?;
    let ordinary_brackets = read(ORDINARY_BRACKETS_FILE)?;
    let preferential_brackets = read(PREFERENTIAL_BRACKETS_FILE)?;
    let state_rates = read(STATE_RATES_FILE)?;

    load_year(YearSources {
        parameters: &parameters,
        ordinary_brackets: &ordinary_brackets,
        preferential_brackets: &preferential_brackets,
        state_rates: &state_rates,
    })
}
