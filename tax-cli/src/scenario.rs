//! TOML scenario files.
//!
//! A scenario describes one return: who is filing, their income records,
//! deduction and credit inputs, and optionally the tax year.
//!
//! ```toml
//! tax_year = 2025
//! estimated_payments = "2000"
//!
//! [personal]
//! filing_status = "MFJ"
//! age = 41
//! spouse_age = 39
//! state = "CA"
//!
//! [[personal.dependents]]
//! age = 6
//!
//! [[income]]
//! type = "wage"
//! employer = "Acme"
//! wages = "95000"
//! federal_withheld = "9000"
//!
//! [deductions.itemized]
//! property_tax = "6000"
//!
//! [credits]
//! child_care_expenses = "4000"
//! ```
//!
//! Amounts may be decimal strings or plain numbers.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    CreditInputs, DeductionInputs, IncomeRecord, InputError, PersonalInfo, validate_inputs,
};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid scenario: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: InputError,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Display name; defaults to the file stem.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tax_year: Option<i32>,
    /// Added to `credits.estimated_payments`.
    #[serde(default)]
    pub estimated_payments: Decimal,
    pub personal: PersonalInfo,
    #[serde(default)]
    pub income: Vec<IncomeRecord>,
    #[serde(default)]
    pub deductions: DeductionInputs,
    #[serde(default)]
    pub credits: CreditInputs,
}

impl Scenario {
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Reads, parses and validates the scenario at `path`.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let source = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scenario = Self::parse(&source).map_err(|e| ScenarioError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        scenario.validate().map_err(|source| ScenarioError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        if scenario.name.is_none() {
            scenario.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        debug!(
            path = %path.display(),
            records = scenario.income.len(),
            "Loaded scenario"
        );
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        validate_inputs(
            &self.income,
            &self.personal,
            &self.deductions,
            &self.credit_inputs(),
        )
    }

    /// Credit inputs with the top-level estimated payments folded in.
    pub fn credit_inputs(&self) -> CreditInputs {
        CreditInputs {
            estimated_payments: self.credits.estimated_payments + self.estimated_payments,
            ..self.credits.clone()
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("scenario")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::FilingStatus;

    use super::*;

    const MINIMAL: &str = r#"
[personal]
filing_status = "S"
age = 30
state = "TX"
"#;

    #[test]
    fn parses_minimal_scenario() {
        let scenario = Scenario::parse(MINIMAL).expect("Failed to parse");

        assert_eq!(scenario.personal.filing_status, FilingStatus::Single);
        assert_eq!(scenario.tax_year, None);
        assert!(scenario.income.is_empty());
        assert_eq!(scenario.deductions, DeductionInputs::default());
    }

    #[test]
    fn parses_tagged_income_records() {
        let source = format!(
            r#"{MINIMAL}
[[income]]
type = "wage"
wages = "75000"
federal_withheld = 8000

[[income]]
type = "capital_sale"
term = "long"
gain = "1200.50"

[[income]]
type = "other"
kind = "social_security"
amount = "18000"
"#
        );

        let scenario = Scenario::parse(&source).expect("Failed to parse");

        assert_eq!(scenario.income.len(), 3);
        let IncomeRecord::Wage {
            wages,
            federal_withheld,
            ..
        } = &scenario.income[0]
        else {
            panic!("expected wage record, got {:?}", scenario.income[0]);
        };
        assert_eq!(*wages, dec!(75000));
        assert_eq!(*federal_withheld, dec!(8000));
        assert!(matches!(
            scenario.income[1],
            IncomeRecord::CapitalSale { gain, .. } if gain == dec!(1200.50)
        ));
    }

    #[test]
    fn rejects_unknown_income_type() {
        let source = format!("{MINIMAL}\n[[income]]\ntype = \"lottery\"\namount = 5\n");

        assert!(Scenario::parse(&source).is_err());
    }

    #[test]
    fn rejects_unknown_top_level_key() {
        let source = format!("filing_status = \"S\"\n{MINIMAL}");

        assert!(Scenario::parse(&source).is_err());
    }

    #[test]
    fn folds_estimated_payments_into_credits() {
        let source = format!(
            "estimated_payments = \"1500\"\n{MINIMAL}\n[credits]\nestimated_payments = \"500\"\n"
        );
        let scenario = Scenario::parse(&source).expect("Failed to parse");

        assert_eq!(scenario.credit_inputs().estimated_payments, dec!(2000));
    }

    #[test]
    fn validate_reports_bad_state() {
        let source = MINIMAL.replace("\"TX\"", "\"Texas\"");
        let scenario = Scenario::parse(&source).expect("Failed to parse");

        assert_eq!(
            scenario.validate(),
            Err(InputError::InvalidStateCode("Texas".to_string()))
        );
    }

    #[test]
    fn label_defaults() {
        let scenario = Scenario::parse(MINIMAL).expect("Failed to parse");

        assert_eq!(scenario.label(), "scenario");
    }
}
