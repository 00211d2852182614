//! Boundary validation for user-supplied inputs.
//!
//! The engine assumes well-formed inputs. Callers run
//! [`validate_inputs`] first and report any [`InputError`] to the user.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{CreditInputs, DeductionInputs, IncomeRecord, PersonalInfo};

/// Oldest age accepted for the filer, spouse or a dependent.
pub const MAX_AGE: u32 = 125;

static STATE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("state code pattern is a valid regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("office of {office} sq ft is larger than the {home} sq ft home")]
    OfficeLargerThanHome { office: Decimal, home: Decimal },

    #[error("{who} age {age} is not plausible")]
    ImplausibleAge { who: String, age: u32 },

    #[error("state code '{0}' must be two uppercase letters")]
    InvalidStateCode(String),

    #[error("spouse details given on a {0} return")]
    SpouseOnUnmarriedReturn(String),

    #[error("American Opportunity Credit years claimed must be 0 to {max}, got {years}")]
    AotcYearsOutOfRange { years: u32, max: u32 },
}

/// Checks every input of one return.
///
/// # Errors
///
/// Returns the first [`InputError`] found.
pub fn validate_inputs(
    records: &[IncomeRecord],
    personal: &PersonalInfo,
    deductions: &DeductionInputs,
    credits: &CreditInputs,
) -> Result<(), InputError> {
    validate_personal(personal)?;
    for (index, record) in records.iter().enumerate() {
        validate_record(index, record)?;
    }
    validate_deductions(deductions)?;
    validate_credits(credits)
}

pub fn validate_personal(personal: &PersonalInfo) -> Result<(), InputError> {
    if !STATE_CODE.is_match(&personal.state) {
        return Err(InputError::InvalidStateCode(personal.state.clone()));
    }

    age("filer", personal.age)?;
    if let Some(spouse_age) = personal.spouse_age {
        age("spouse", spouse_age)?;
    }
    if !personal.filing_status.is_married()
        && (personal.spouse_age.is_some() || personal.spouse_blind)
    {
        return Err(InputError::SpouseOnUnmarriedReturn(
            personal.filing_status.label().to_string(),
        ));
    }
    for (index, dependent) in personal.dependents.iter().enumerate() {
        age(&format!("dependent {}", index + 1), dependent.age)?;
    }

    Ok(())
}

pub fn validate_record(
    index: usize,
    record: &IncomeRecord,
) -> Result<(), InputError> {
    let field = |name: &str| format!("income[{index}].{name}");

    match record {
        IncomeRecord::Wage {
            wages,
            federal_withheld,
            state_withheld,
            social_security_withheld,
            medicare_withheld,
            elective_deferrals_401k,
            employer_hsa,
            ..
        } => {
            non_negative(&field("wages"), *wages)?;
            non_negative(&field("federal_withheld"), *federal_withheld)?;
            non_negative(&field("state_withheld"), *state_withheld)?;
            non_negative(&field("social_security_withheld"), *social_security_withheld)?;
            non_negative(&field("medicare_withheld"), *medicare_withheld)?;
            non_negative(&field("elective_deferrals_401k"), *elective_deferrals_401k)?;
            non_negative(&field("employer_hsa"), *employer_hsa)
        }
        IncomeRecord::EquityVest { amount }
        | IncomeRecord::Dividend { amount, .. }
        | IncomeRecord::Interest { amount }
        | IncomeRecord::Other { amount, .. } => non_negative(&field("amount"), *amount),
        IncomeRecord::CapitalSale { gain, loss, .. } => {
            non_negative(&field("gain"), *gain)?;
            non_negative(&field("loss"), *loss)
        }
        IncomeRecord::SelfEmployment {
            gross,
            expenses,
            home_office,
        } => {
            non_negative(&field("gross"), *gross)?;
            non_negative(&field("expenses"), *expenses)?;
            if let Some(office) = home_office {
                non_negative(&field("office_sqft"), office.office_sqft)?;
                non_negative(&field("home_sqft"), office.home_sqft)?;
                non_negative(&field("home_expenses"), office.home_expenses)?;
                if office.office_sqft > office.home_sqft {
                    return Err(InputError::OfficeLargerThanHome {
                        office: office.office_sqft,
                        home: office.home_sqft,
                    });
                }
            }
            Ok(())
        }
    }
}

pub fn validate_deductions(inputs: &DeductionInputs) -> Result<(), InputError> {
    let above = &inputs.above_the_line;
    let itemized = &inputs.itemized;

    [
        ("ira", above.ira),
        ("hsa", above.hsa),
        ("student_loan_interest", above.student_loan_interest),
        ("educator_expenses", above.educator_expenses),
        ("se_health_insurance", above.se_health_insurance),
        ("alimony_paid", above.alimony_paid),
        ("military_moving", above.military_moving),
        ("state_local_income_tax", itemized.state_local_income_tax),
        ("property_tax", itemized.property_tax),
        ("mortgage_interest", itemized.mortgage_interest),
        ("mortgage_debt", itemized.mortgage_debt),
        ("mortgage_insurance", itemized.mortgage_insurance),
        ("charitable_cash", itemized.charitable_cash),
        ("charitable_noncash", itemized.charitable_noncash),
        ("medical_expenses", itemized.medical_expenses),
        ("casualty_losses", itemized.casualty_losses),
    ]
    .into_iter()
    .try_for_each(|(name, value)| non_negative(&format!("deductions.{name}"), value))
}

pub fn validate_credits(inputs: &CreditInputs) -> Result<(), InputError> {
    const AOTC_MAX_YEARS: u32 = 4;
    if inputs.aotc_years_claimed > AOTC_MAX_YEARS {
        return Err(InputError::AotcYearsOutOfRange {
            years: inputs.aotc_years_claimed,
            max: AOTC_MAX_YEARS,
        });
    }

    [
        ("child_care_expenses", inputs.child_care_expenses),
        ("education_expenses", inputs.education_expenses),
        ("energy_improvements", inputs.energy_improvements),
        ("ev_purchase_price", inputs.ev_purchase_price),
        ("solar_cost", inputs.solar_cost),
        ("savers_contributions", inputs.savers_contributions),
        ("foreign_tax_paid", inputs.foreign_tax_paid),
        ("estimated_payments", inputs.estimated_payments),
    ]
    .into_iter()
    .try_for_each(|(name, value)| non_negative(&format!("credits.{name}"), value))
}

fn non_negative(
    field: &str,
    value: Decimal,
) -> Result<(), InputError> {
    if value < Decimal::ZERO {
        return Err(InputError::NegativeAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn age(
    who: &str,
    age: u32,
) -> Result<(), InputError> {
    if age > MAX_AGE {
        return Err(InputError::ImplausibleAge {
            who: who.to_string(),
            age,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Dependent, FilingStatus, HomeOffice};

    fn valid_personal() -> PersonalInfo {
        PersonalInfo::new(FilingStatus::Single, 34, "CO")
    }

    #[test]
    fn validate_inputs_accepts_defaults() {
        let result = validate_inputs(
            &[IncomeRecord::Interest { amount: dec!(10) }],
            &valid_personal(),
            &DeductionInputs::default(),
            &CreditInputs::default(),
        );

        assert_eq!(result, Ok(()));
    }

    #[test]
    fn rejects_lowercase_state_code() {
        let mut personal = valid_personal();
        personal.state = "co".to_string();

        assert_eq!(
            validate_personal(&personal),
            Err(InputError::InvalidStateCode("co".to_string()))
        );
    }

    #[test]
    fn rejects_three_letter_state_code() {
        let mut personal = valid_personal();
        personal.state = "COL".to_string();

        assert!(matches!(
            validate_personal(&personal),
            Err(InputError::InvalidStateCode(_))
        ));
    }

    #[test]
    fn state_code_check_is_reusable_across_calls() {
        let mut personal = valid_personal();
        for code in ["CO", "DC", "PR", "TX"] {
            personal.state = code.to_string();
            assert_eq!(validate_personal(&personal), Ok(()));
        }
        personal.state = "T1".to_string();

        assert_eq!(
            validate_personal(&personal),
            Err(InputError::InvalidStateCode("T1".to_string()))
        );
    }

    #[test]
    fn rejects_spouse_on_single_return() {
        let mut personal = valid_personal();
        personal.spouse_age = Some(30);

        assert_eq!(
            validate_personal(&personal),
            Err(InputError::SpouseOnUnmarriedReturn("Single".to_string()))
        );
    }

    #[test]
    fn rejects_implausible_dependent_age() {
        let mut personal = valid_personal();
        personal.dependents = vec![Dependent { age: 4 }, Dependent { age: 300 }];

        assert_eq!(
            validate_personal(&personal),
            Err(InputError::ImplausibleAge {
                who: "dependent 2".to_string(),
                age: 300,
            })
        );
    }

    #[test]
    fn rejects_negative_wage() {
        let record = IncomeRecord::Wage {
            employer: String::new(),
            wages: dec!(-1),
            federal_withheld: dec!(0),
            state_withheld: dec!(0),
            social_security_withheld: dec!(0),
            medicare_withheld: dec!(0),
            elective_deferrals_401k: dec!(0),
            employer_hsa: dec!(0),
        };

        assert_eq!(
            validate_record(2, &record),
            Err(InputError::NegativeAmount {
                field: "income[2].wages".to_string(),
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn rejects_office_larger_than_home() {
        let record = IncomeRecord::SelfEmployment {
            gross: dec!(1000),
            expenses: dec!(0),
            home_office: Some(HomeOffice {
                office_sqft: dec!(500),
                home_sqft: dec!(400),
                home_expenses: dec!(0),
            }),
        };

        assert_eq!(
            validate_record(0, &record),
            Err(InputError::OfficeLargerThanHome {
                office: dec!(500),
                home: dec!(400),
            })
        );
    }

    #[test]
    fn rejects_negative_itemized_amount() {
        let mut inputs = DeductionInputs::default();
        inputs.itemized.medical_expenses = dec!(-20);

        assert_eq!(
            validate_deductions(&inputs),
            Err(InputError::NegativeAmount {
                field: "deductions.medical_expenses".to_string(),
                value: dec!(-20),
            })
        );
    }

    #[test]
    fn rejects_aotc_years_out_of_range() {
        let inputs = CreditInputs {
            aotc_years_claimed: 7,
            ..CreditInputs::default()
        };

        assert_eq!(
            validate_credits(&inputs),
            Err(InputError::AotcYearsOutOfRange { years: 7, max: 4 })
        );
    }
}
