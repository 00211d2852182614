//! Tax-year constant tables.
//!
//! A [`TaxYearConstants`] value holds every bracket, limit, threshold and rate
//! the engine reads for one tax year. It has no behaviour beyond lookup and
//! [`TaxYearConstants::validate`]; the numbers themselves are data supplied by
//! the `tax-data` crate.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ByFilingStatus, FilingStatus, TaxBracket};

/// Problems found by [`TaxYearConstants::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstantsError {
    #[error("schedule '{0}' has no brackets")]
    EmptySchedule(String),

    #[error("schedule '{schedule}' must start at zero, starts at {found}")]
    ScheduleStartsAboveZero { schedule: String, found: Decimal },

    #[error("schedule '{schedule}' has a gap or overlap at {at}")]
    NonContiguousSchedule { schedule: String, at: Decimal },

    #[error("schedule '{0}' must end with an unbounded bracket")]
    BoundedTopBracket(String),

    #[error(
        "schedule '{schedule}' bracket at {min_income} has base tax {found}, expected {expected}"
    )]
    InconsistentBaseTax {
        schedule: String,
        min_income: Decimal,
        expected: Decimal,
        found: Decimal,
    },

    #[error("{field} must be between 0 and 1, got {rate}")]
    RateOutOfRange { field: String, rate: Decimal },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: String, value: Decimal },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: Decimal },

    #[error("{field} phaseout ends at {end} before it starts at {start}")]
    InvertedPhaseout {
        field: String,
        start: Decimal,
        end: Decimal,
    },

    #[error("EITC tables must be non-empty and the same length")]
    EitcTableMismatch,
}

/// A linear phaseout range: full benefit at or below `start`, none at or
/// above `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phaseout {
    pub start: Decimal,
    pub end: Decimal,
}

impl Phaseout {
    /// Fraction of the benefit that survives at `income`, in `[0, 1]`.
    ///
    /// A degenerate range (`end == start`) is a hard cutoff at `start`.
    pub fn remaining_fraction(
        &self,
        income: Decimal,
    ) -> Decimal {
        if self.end <= self.start {
            return if income < self.start {
                Decimal::ONE
            } else {
                Decimal::ZERO
            };
        }
        if income <= self.start {
            Decimal::ONE
        } else if income >= self.end {
            Decimal::ZERO
        } else {
            Decimal::ONE - (income - self.start) / (self.end - self.start)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConstants {
    /// Maximum earnings subject to Social Security tax.
    pub ss_wage_base: Decimal,
    pub ss_rate_employee: Decimal,
    pub medicare_rate_employee: Decimal,
    /// Combined employer + employee Social Security rate on SE earnings.
    pub ss_rate_self: Decimal,
    /// Combined employer + employee Medicare rate on SE earnings.
    pub medicare_rate_self: Decimal,
    /// Share of SE net profit that counts as net earnings (92.35%).
    pub net_earnings_factor: Decimal,
    /// Share of SE tax deductible above the line (50%).
    pub se_deduction_factor: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold: ByFilingStatus<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiitConstants {
    pub rate: Decimal,
    pub threshold: ByFilingStatus<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtConstants {
    pub exemption: ByFilingStatus<Decimal>,
    pub phaseout_start: ByFilingStatus<Decimal>,
    /// Exemption lost per dollar of AMTI above `phaseout_start`.
    pub phaseout_rate: Decimal,
    pub brackets: Vec<TaxBracket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLimits {
    pub salt_cap: Decimal,
    /// Acquisition debt above which mortgage interest is pro-rated.
    pub mortgage_debt_limit: Decimal,
    /// Medical expenses are deductible only above this share of AGI.
    pub medical_agi_floor_rate: Decimal,
    pub qbi_rate: Decimal,
    pub qbi_threshold: ByFilingStatus<Decimal>,
    pub home_office_rate_per_sqft: Decimal,
    pub home_office_max_sqft: Decimal,
    pub educator_expense_max: Decimal,
    pub student_loan_interest_max: Decimal,
    pub student_loan_phaseout: ByFilingStatus<Phaseout>,
    pub ira_limit: Decimal,
    pub ira_catch_up: Decimal,
    pub ira_catch_up_age: u32,
    /// Applied only when the filer is covered by an employer plan.
    pub ira_phaseout: ByFilingStatus<Phaseout>,
    pub hsa_self_only_limit: Decimal,
    pub hsa_family_limit: Decimal,
    pub hsa_catch_up: Decimal,
    pub hsa_catch_up_age: u32,
    pub elective_deferral_limit: Decimal,
    pub elective_deferral_catch_up: Decimal,
    pub elective_deferral_catch_up_age: u32,
    pub elective_deferral_super_catch_up: Decimal,
    pub super_catch_up_min_age: u32,
    pub super_catch_up_max_age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildTaxCreditLimits {
    pub per_child: Decimal,
    pub per_other_dependent: Decimal,
    pub refundable_per_child: Decimal,
    /// Children at or below this age qualify (16 means "under 17").
    pub qualifying_child_max_age: u32,
    pub phaseout_start: ByFilingStatus<Decimal>,
    pub phaseout_step: Decimal,
    pub phaseout_per_step: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentCareLimits {
    pub one_person_expense_cap: Decimal,
    pub two_or_more_expense_cap: Decimal,
    pub max_rate: Decimal,
    pub min_rate: Decimal,
    pub rate_agi_floor: Decimal,
    pub rate_step: Decimal,
    pub rate_step_reduction: Decimal,
    pub qualifying_max_age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationLimits {
    pub aotc_full_expenses: Decimal,
    pub aotc_partial_expenses: Decimal,
    pub aotc_partial_rate: Decimal,
    pub aotc_max_years: u32,
    pub llc_rate: Decimal,
    pub llc_max_expenses: Decimal,
    pub phaseout: ByFilingStatus<Phaseout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyLimits {
    pub home_improvement_rate: Decimal,
    pub home_improvement_cap: Decimal,
    pub clean_vehicle_rate: Decimal,
    pub clean_vehicle_cap: Decimal,
    pub clean_energy_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaversTier {
    pub agi_max: Decimal,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaversLimits {
    pub contribution_cap: Decimal,
    /// Ascending by `agi_max`; AGI above the last tier earns nothing.
    pub tiers: ByFilingStatus<Vec<SaversTier>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcLimits {
    /// Indexed by number of qualifying children, the last entry covering
    /// that many or more.
    pub max_credit: Vec<Decimal>,
    pub income_limit: ByFilingStatus<Vec<Decimal>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLimits {
    pub child_tax_credit: ChildTaxCreditLimits,
    pub dependent_care: DependentCareLimits,
    pub education: EducationLimits,
    pub energy: EnergyLimits,
    pub savers: SaversLimits,
    pub eitc: EitcLimits,
}

/// Flat top-marginal state rates keyed by two-letter code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxTable {
    /// Used for codes missing from `rates`.
    pub default_rate: Decimal,
    pub rates: BTreeMap<String, Decimal>,
}

impl StateTaxTable {
    pub fn rate_for(
        &self,
        state: &str,
    ) -> Decimal {
        self.rates
            .get(state)
            .copied()
            .unwrap_or(self.default_rate)
    }
}

/// Every constant the engine needs for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConstants {
    pub tax_year: i32,
    pub ordinary_brackets: ByFilingStatus<Vec<TaxBracket>>,
    /// Long-term capital gain / qualified dividend schedule (0% / 15% / 20%).
    pub preferential_brackets: ByFilingStatus<Vec<TaxBracket>>,
    pub standard_deduction: ByFilingStatus<Decimal>,
    /// Added once per qualifying condition (65+ or blind) per person.
    pub additional_standard_deduction: ByFilingStatus<Decimal>,
    pub capital_loss_limit: Decimal,
    /// Flat inclusion rate for Social Security benefits.
    pub social_security_inclusion_rate: Decimal,
    pub payroll: PayrollConstants,
    pub niit: NiitConstants,
    pub amt: AmtConstants,
    pub deductions: DeductionLimits,
    pub credits: CreditLimits,
    pub state: StateTaxTable,
}

impl TaxYearConstants {
    pub fn ordinary_schedule(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.ordinary_brackets.get(status)
    }

    pub fn preferential_schedule(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.preferential_brackets.get(status)
    }

    /// Checks that the tables are internally consistent.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConstantsError`] found: a malformed bracket
    /// schedule, a rate outside `[0, 1]`, a non-positive wage base or limit,
    /// an inverted phaseout range, or mismatched EITC tables.
    pub fn validate(&self) -> Result<(), ConstantsError> {
        for (status, schedule) in self.ordinary_brackets.iter() {
            validate_schedule(&format!("ordinary/{}", status.as_str()), schedule)?;
        }
        for (status, schedule) in self.preferential_brackets.iter() {
            validate_schedule(&format!("preferential/{}", status.as_str()), schedule)?;
        }
        validate_schedule("amt", &self.amt.brackets)?;

        let payroll = &self.payroll;
        positive("payroll.ss_wage_base", payroll.ss_wage_base)?;
        rate("payroll.ss_rate_employee", payroll.ss_rate_employee)?;
        rate("payroll.medicare_rate_employee", payroll.medicare_rate_employee)?;
        rate("payroll.ss_rate_self", payroll.ss_rate_self)?;
        rate("payroll.medicare_rate_self", payroll.medicare_rate_self)?;
        rate("payroll.se_deduction_factor", payroll.se_deduction_factor)?;
        rate(
            "payroll.additional_medicare_rate",
            payroll.additional_medicare_rate,
        )?;
        positive("payroll.net_earnings_factor", payroll.net_earnings_factor)?;
        rate("payroll.net_earnings_factor", payroll.net_earnings_factor)?;

        rate("niit.rate", self.niit.rate)?;
        rate("amt.phaseout_rate", self.amt.phaseout_rate)?;
        non_negative("capital_loss_limit", self.capital_loss_limit)?;
        rate(
            "social_security_inclusion_rate",
            self.social_security_inclusion_rate,
        )?;

        let deductions = &self.deductions;
        non_negative("deductions.salt_cap", deductions.salt_cap)?;
        positive(
            "deductions.mortgage_debt_limit",
            deductions.mortgage_debt_limit,
        )?;
        rate(
            "deductions.medical_agi_floor_rate",
            deductions.medical_agi_floor_rate,
        )?;
        rate("deductions.qbi_rate", deductions.qbi_rate)?;
        for (status, phaseout) in deductions.student_loan_phaseout.iter() {
            ordered(
                &format!("deductions.student_loan_phaseout/{}", status.as_str()),
                phaseout,
            )?;
        }
        for (status, phaseout) in deductions.ira_phaseout.iter() {
            ordered(
                &format!("deductions.ira_phaseout/{}", status.as_str()),
                phaseout,
            )?;
        }

        let credits = &self.credits;
        positive(
            "credits.child_tax_credit.phaseout_step",
            credits.child_tax_credit.phaseout_step,
        )?;
        positive(
            "credits.dependent_care.rate_step",
            credits.dependent_care.rate_step,
        )?;
        rate("credits.dependent_care.max_rate", credits.dependent_care.max_rate)?;
        rate("credits.dependent_care.min_rate", credits.dependent_care.min_rate)?;
        for (status, phaseout) in credits.education.phaseout.iter() {
            ordered(
                &format!("credits.education.phaseout/{}", status.as_str()),
                phaseout,
            )?;
        }
        let eitc = &credits.eitc;
        if eitc.max_credit.is_empty()
            || eitc
                .income_limit
                .iter()
                .any(|(_, limits)| limits.len() != eitc.max_credit.len())
        {
            return Err(ConstantsError::EitcTableMismatch);
        }

        rate("state.default_rate", self.state.default_rate)?;
        for (code, state_rate) in &self.state.rates {
            rate(&format!("state.rates/{code}"), *state_rate)?;
        }

        Ok(())
    }
}

/// Base tax may be rounded to cents in published tables.
const BASE_TAX_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

fn validate_schedule(
    name: &str,
    schedule: &[TaxBracket],
) -> Result<(), ConstantsError> {
    let Some(first) = schedule.first() else {
        return Err(ConstantsError::EmptySchedule(name.to_string()));
    };
    if first.min_income != Decimal::ZERO {
        return Err(ConstantsError::ScheduleStartsAboveZero {
            schedule: name.to_string(),
            found: first.min_income,
        });
    }

    let mut expected_base = Decimal::ZERO;
    for (index, bracket) in schedule.iter().enumerate() {
        rate(&format!("{name} rate"), bracket.tax_rate)?;

        if (bracket.base_tax - expected_base).abs() > BASE_TAX_TOLERANCE {
            return Err(ConstantsError::InconsistentBaseTax {
                schedule: name.to_string(),
                min_income: bracket.min_income,
                expected: expected_base,
                found: bracket.base_tax,
            });
        }

        match (bracket.max_income, schedule.get(index + 1)) {
            (Some(max), Some(next)) => {
                if next.min_income != max || max <= bracket.min_income {
                    return Err(ConstantsError::NonContiguousSchedule {
                        schedule: name.to_string(),
                        at: max,
                    });
                }
                expected_base += (max - bracket.min_income) * bracket.tax_rate;
            }
            (Some(_), None) => {
                return Err(ConstantsError::BoundedTopBracket(name.to_string()));
            }
            (None, Some(next)) => {
                return Err(ConstantsError::NonContiguousSchedule {
                    schedule: name.to_string(),
                    at: next.min_income,
                });
            }
            (None, None) => {}
        }
    }

    Ok(())
}

fn rate(
    field: &str,
    value: Decimal,
) -> Result<(), ConstantsError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConstantsError::RateOutOfRange {
            field: field.to_string(),
            rate: value,
        });
    }
    Ok(())
}

fn positive(
    field: &str,
    value: Decimal,
) -> Result<(), ConstantsError> {
    if value <= Decimal::ZERO {
        return Err(ConstantsError::NonPositive {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn non_negative(
    field: &str,
    value: Decimal,
) -> Result<(), ConstantsError> {
    if value < Decimal::ZERO {
        return Err(ConstantsError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn ordered(
    field: &str,
    phaseout: &Phaseout,
) -> Result<(), ConstantsError> {
    if phaseout.end < phaseout.start {
        return Err(ConstantsError::InvertedPhaseout {
            field: field.to_string(),
            start: phaseout.start,
            end: phaseout.end,
        });
    }
    Ok(())
}
