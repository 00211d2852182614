use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{ByFilingStatus, FilingStatus, TaxBracket};

use crate::DataError;

/// Maps a schedule code to its filing status.
///
/// Both IRS schedule designations and filing status codes are accepted:
/// - Schedule X or S → Single
/// - Schedule Y-1 or MFJ → Married Filing Jointly
/// - Schedule Y-2 or MFS → Married Filing Separately
/// - Schedule Z or HOH → Head of Household
fn schedule_to_filing_status(schedule: &str) -> Result<FilingStatus, DataError> {
    match schedule {
        "X" => Ok(FilingStatus::Single),
        "Y-1" => Ok(FilingStatus::MarriedFilingJointly),
        "Y-2" => Ok(FilingStatus::MarriedFilingSeparately),
        "Z" => Ok(FilingStatus::HeadOfHousehold),
        code => FilingStatus::parse(code)
            .ok_or_else(|| DataError::InvalidSchedule(schedule.to_string())),
    }
}

fn schedule_code(status: FilingStatus) -> &'static str {
    match status {
        FilingStatus::Single => "X",
        FilingStatus::MarriedFilingJointly => "Y-1",
        FilingStatus::MarriedFilingSeparately => "Y-2",
        FilingStatus::HeadOfHousehold => "Z",
    }
}

/// A single record from a tax brackets CSV file.
///
/// - `tax_year`: The tax year (e.g., 2025)
/// - `schedule`: The IRS schedule code (X, Y-1, Y-2, Z) or status code
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `base_tax`: The tax owed on all income below `min_income`
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket schedules stored as CSV.
///
/// The same format serves the ordinary and the preferential (capital gains)
/// schedules; the caller names which one it is loading for error messages.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, DataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into one schedule per filing status, ordered by
    /// `min_income`.
    ///
    /// Every record must belong to `tax_year` and every filing status must
    /// have at least one row. Schedule consistency (contiguity, `base_tax`)
    /// is checked later by [`tax_core::TaxYearConstants::validate`].
    pub fn build(
        table: &'static str,
        tax_year: i32,
        records: &[TaxBracketRecord],
    ) -> Result<ByFilingStatus<Vec<TaxBracket>>, DataError> {
        let mut grouped: BTreeMap<FilingStatus, Vec<TaxBracket>> = BTreeMap::new();

        for record in records {
            if record.tax_year != tax_year {
                return Err(DataError::YearMismatch {
                    table,
                    expected: tax_year,
                    found: record.tax_year,
                });
            }
            let status = schedule_to_filing_status(&record.schedule)?;
            grouped.entry(status).or_default().push(TaxBracket {
                min_income: record.min_income,
                max_income: record.max_income,
                tax_rate: record.rate,
                base_tax: record.base_tax,
            });
        }

        for brackets in grouped.values_mut() {
            brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        }

        let mut take = |status: FilingStatus| {
            grouped
                .remove(&status)
                .ok_or(DataError::MissingSchedule {
                    table,
                    schedule: schedule_code(status),
                })
        };

        Ok(ByFilingStatus {
            single: take(FilingStatus::Single)?,
            married_joint: take(FilingStatus::MarriedFilingJointly)?,
            married_separate: take(FilingStatus::MarriedFilingSeparately)?,
            head_of_household: take(FilingStatus::HeadOfHousehold)?,
        })
    }
}

/// A single record from the state rates CSV file: `state,rate`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateRateRecord {
    pub state: String,
    pub rate: Decimal,
}

pub struct StateRateLoader;

impl StateRateLoader {
    pub fn parse<R: Read>(reader: R) -> Result<BTreeMap<String, Decimal>, DataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rates = BTreeMap::new();

        for result in csv_reader.deserialize() {
            let record: StateRateRecord = result?;
            let code = record.state.trim();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(DataError::InvalidStateCode(record.state));
            }
            rates.insert(code.to_string(), record.rate);
        }

        Ok(rates)
    }
}
