//! The `parameters.toml` half of a tax year: every constant that is not a
//! bracket schedule or a state rate.

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    AmtConstants, ByFilingStatus, CreditLimits, DeductionLimits, NiitConstants,
    PayrollConstants, TaxBracket,
};

use crate::DataError;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct YearParameters {
    pub tax_year: i32,
    pub capital_loss_limit: Decimal,
    pub social_security_inclusion_rate: Decimal,
    pub standard_deduction: ByFilingStatus<Decimal>,
    pub additional_standard_deduction: ByFilingStatus<Decimal>,
    pub payroll: PayrollConstants,
    pub niit: NiitConstants,
    pub amt: AmtParameters,
    pub deductions: DeductionLimits,
    pub credits: CreditLimits,
    pub state: StateParameters,
}

/// AMT constants with the bracket schedule given as upper bounds only.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AmtParameters {
    pub exemption: ByFilingStatus<Decimal>,
    pub phaseout_start: ByFilingStatus<Decimal>,
    pub phaseout_rate: Decimal,
    pub brackets: Vec<RateBound>,
}

/// One bracket by its upper bound; the last has none.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateBound {
    #[serde(default)]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StateParameters {
    /// Rate for states missing from `state_rates.csv`.
    pub default_rate: Decimal,
}

impl YearParameters {
    pub fn parse(source: &str) -> Result<Self, DataError> {
        Ok(toml::from_str(source)?)
    }
}

impl AmtParameters {
    pub fn into_constants(self) -> AmtConstants {
        let bounds: Vec<(Option<Decimal>, Decimal)> = self
            .brackets
            .iter()
            .map(|bound| (bound.max_income, bound.rate))
            .collect();

        AmtConstants {
            exemption: self.exemption,
            phaseout_start: self.phaseout_start,
            phaseout_rate: self.phaseout_rate,
            brackets: TaxBracket::schedule(&bounds),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const PARAMETERS_2025: &str = include_str!("../data/2025/parameters.toml");

    #[test]
    fn parses_shipped_parameters() {
        let params = YearParameters::parse(PARAMETERS_2025).expect("Failed to parse TOML");

        assert_eq!(params.tax_year, 2025);
        assert_eq!(params.standard_deduction.married_joint, dec!(30000));
        assert_eq!(params.payroll.ss_wage_base, dec!(176100));
        assert_eq!(params.deductions.ira_phaseout.married_joint.end, dec!(146000));
        assert_eq!(params.credits.savers.tiers.head_of_household[2].agi_max, dec!(59062));
        assert_eq!(params.credits.eitc.max_credit.len(), 4);
        assert_eq!(params.state.default_rate, dec!(0.05));
    }

    #[test]
    fn amt_bounds_become_schedule() {
        let params = YearParameters::parse(PARAMETERS_2025).expect("Failed to parse TOML");

        let amt = params.amt.into_constants();

        assert_eq!(amt.brackets.len(), 2);
        assert_eq!(amt.brackets[1].min_income, dec!(232600));
        assert_eq!(amt.brackets[1].base_tax, dec!(60476.00));
        assert_eq!(amt.brackets[1].max_income, None);
    }

    #[test]
    fn rejects_unknown_top_level_key() {
        let source = format!("surprise = 1\n{PARAMETERS_2025}");

        let err = YearParameters::parse(&source).expect_err("Should fail");

        assert!(matches!(err, DataError::TomlParse(_)));
    }

    #[test]
    fn rejects_missing_section() {
        let err = YearParameters::parse("tax_year = 2025").expect_err("Should fail");

        let DataError::TomlParse(msg) = err else {
            panic!("Expected TomlParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "got: {}", msg);
    }
}
