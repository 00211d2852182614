//! The tax engine: sequences aggregation, deductions, rate schedules,
//! surtaxes, payroll taxes and credits into a [`TaxResult`].
//!
//! # Order of operations
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Aggregate income records |
//! | 2    | Self-employment tax, so its deductible half is known |
//! | 3    | Above-the-line deductions (including half of SE tax) → AGI |
//! | 4    | Standard vs. itemized deduction, then QBI |
//! | 5    | Taxable income split into ordinary and preferential parts |
//! | 6    | Ordinary brackets on the ordinary part; preferential brackets on the rest, stacked on top |
//! | 7    | Net Investment Income Tax |
//! | 8    | Simplified AMT, applied only when it exceeds regular tax |
//! | 9    | Employee FICA and Additional Medicare Tax |
//! | 10   | Credits: nonrefundable down to zero, then refundable |
//! | 11   | Flat-rate state tax on taxable income |
//! | 12   | Total liability, payments and balance due |
//!
//! A run has no side effects, so the same engine can be reused for any
//! number of scenarios.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::brackets::{bracket_tax, marginal_rate, stacked_breakdown, stacked_tax};
use crate::calculations::common::{floor_at_zero, max, min, round_half_up};
use crate::calculations::credits::CreditEngine;
use crate::calculations::deductions::DeductionResolver;
use crate::calculations::income::IncomeAggregator;
use crate::calculations::payroll::PayrollTaxes;
use crate::models::{
    AggregatedIncome, Contribution, ContributionSummary, ConstantsError, CreditInputs,
    DeductionChoice, DeductionInputs, DeductionProfile, FilingStatus, IncomeRecord, Payments,
    PersonalInfo, TaxResult, TaxYearConstants,
};

/// Regular and minimum tax before credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmtComparison {
    pub amti: Decimal,
    pub exemption: Decimal,
    pub tentative: Decimal,
    /// Excess of `tentative` over regular tax, or zero.
    pub additional: Decimal,
}

#[derive(Debug, Clone)]
pub struct TaxEngine<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> TaxEngine<'a> {
    /// Creates an engine for one tax year.
    ///
    /// # Errors
    ///
    /// Returns [`ConstantsError`] if the constant tables are inconsistent.
    pub fn new(constants: &'a TaxYearConstants) -> Result<Self, ConstantsError> {
        constants.validate()?;
        Ok(Self { constants })
    }

    pub fn constants(&self) -> &TaxYearConstants {
        self.constants
    }

    /// Runs one calculation.
    ///
    /// Inputs are expected to have passed [`crate::validation`]; nothing in
    /// here fails. Negative intermediates are clamped to zero.
    pub fn calculate(
        &self,
        records: &[IncomeRecord],
        personal: &PersonalInfo,
        deduction_inputs: &DeductionInputs,
        credit_inputs: &CreditInputs,
    ) -> TaxResult {
        let constants = self.constants;
        let status = personal.filing_status;
        let payroll = PayrollTaxes::new(&constants.payroll);
        let resolver = DeductionResolver::new(constants);

        // Step 1
        let income = IncomeAggregator::new(constants).aggregate(records);

        // Step 2
        let self_employment = payroll.self_employment_tax(income.se_net_income, income.wages);

        // Steps 3-4
        let deductions = resolver.resolve(
            personal,
            deduction_inputs,
            &income,
            self_employment.deduction,
        );
        let agi = deductions.agi;

        // Step 5
        let taxable_income = floor_at_zero(
            "taxable_income",
            agi - deductions.applied - deductions.qbi,
        );
        let preferential_taxable = min(income.preferential_income, taxable_income);
        let ordinary_taxable = taxable_income - preferential_taxable;

        // Step 6
        let ordinary_schedule = constants.ordinary_schedule(status);
        let ordinary_tax = bracket_tax(ordinary_taxable, ordinary_schedule);
        let preferential_schedule = constants.preferential_schedule(status);
        let capital_gains_tax =
            stacked_tax(ordinary_taxable, preferential_taxable, preferential_schedule);
        let capital_gains_breakdown =
            stacked_breakdown(ordinary_taxable, preferential_taxable, preferential_schedule);
        let regular_tax = ordinary_tax + capital_gains_tax;

        // Step 7
        let niit = self.net_investment_income_tax(income.investment_income, agi, status);

        // Step 8
        let amt = self.alternative_minimum_tax(taxable_income, &deductions, regular_tax, status);
        let federal_tax_before_credits = regular_tax + amt.additional;

        // Step 9
        let fica = payroll.fica(income.wages, self_employment.net_earnings, status);

        // Step 10
        let earned_income = income.wages + income.se_net_income;
        let credits = CreditEngine::new(constants).compute_credits(
            personal,
            credit_inputs,
            agi,
            earned_income,
        );
        let nonrefundable_credits_applied =
            min(credits.nonrefundable_total(), federal_tax_before_credits);
        let refundable_credits = credits.refundable_total();
        let federal_tax =
            federal_tax_before_credits - nonrefundable_credits_applied - refundable_credits;

        // Step 11
        let state_rate = constants.state.rate_for(&personal.state);
        let state_tax = round_half_up(taxable_income * state_rate);

        // Step 12
        let total_tax = federal_tax + niit + fica.total + self_employment.total + state_tax;
        let payments = payments(&income, credit_inputs.estimated_payments);
        let balance_due = total_tax - payments.total;

        let effective_rate = if income.gross_income > Decimal::ZERO {
            (total_tax / income.gross_income).round_dp(4)
        } else {
            Decimal::ZERO
        };
        let contributions = self.contributions(personal, deduction_inputs, &income);

        debug!(
            taxable_income = %taxable_income,
            regular_tax = %regular_tax,
            amt = %amt.additional,
            niit = %niit,
            federal_tax = %federal_tax,
            total_tax = %total_tax,
            balance_due = %balance_due,
            "Calculated return"
        );

        TaxResult {
            tax_year: constants.tax_year,
            filing_status: status,
            agi,
            taxable_income,
            preferential_taxable,
            ordinary_tax,
            capital_gains_tax,
            capital_gains_breakdown,
            regular_tax,
            amt_tentative: amt.tentative,
            amt: amt.additional,
            federal_tax_before_credits,
            credits,
            nonrefundable_credits_applied,
            refundable_credits,
            federal_tax,
            niit,
            fica,
            self_employment,
            state_rate,
            state_tax,
            total_tax,
            payments,
            balance_due,
            marginal_rate: marginal_rate(ordinary_taxable, ordinary_schedule),
            effective_rate,
            contributions,
            income,
            deductions,
        }
    }

    /// NIIT on the smaller of investment income and AGI above the threshold.
    pub fn net_investment_income_tax(
        &self,
        investment_income: Decimal,
        agi: Decimal,
        status: FilingStatus,
    ) -> Decimal {
        let niit = &self.constants.niit;
        let excess = max(agi - *niit.threshold.get(status), Decimal::ZERO);
        round_half_up(min(investment_income, excess) * niit.rate)
    }

    /// Simplified AMT.
    ///
    /// AMTI is taxable income plus the SALT deduction when itemizing. The
    /// exemption shrinks by `phaseout_rate` per dollar of AMTI above the
    /// phaseout start. The tentative tax only counts where it exceeds
    /// `regular_tax`.
    pub fn alternative_minimum_tax(
        &self,
        taxable_income: Decimal,
        deductions: &DeductionProfile,
        regular_tax: Decimal,
        status: FilingStatus,
    ) -> AmtComparison {
        let amt = &self.constants.amt;
        let salt_add_back = match deductions.choice {
            DeductionChoice::Itemized => deductions.itemized.salt,
            DeductionChoice::Standard => Decimal::ZERO,
        };
        let amti = taxable_income + salt_add_back;

        let reduction = max(amti - *amt.phaseout_start.get(status), Decimal::ZERO) * amt.phaseout_rate;
        let exemption = round_half_up(max(*amt.exemption.get(status) - reduction, Decimal::ZERO));
        let tentative = bracket_tax(max(amti - exemption, Decimal::ZERO), &amt.brackets);
        let additional = max(tentative - regular_tax, Decimal::ZERO);

        if additional > Decimal::ZERO {
            debug!(
                tentative = %tentative,
                regular_tax = %regular_tax,
                "Tentative minimum tax exceeds regular tax"
            );
        }

        AmtComparison {
            amti,
            exemption,
            tentative,
            additional,
        }
    }

    fn contributions(
        &self,
        personal: &PersonalInfo,
        inputs: &DeductionInputs,
        income: &AggregatedIncome,
    ) -> ContributionSummary {
        let resolver = DeductionResolver::new(self.constants);
        ContributionSummary {
            elective_deferral_401k: Contribution {
                contributed: income.elective_deferrals_401k,
                limit: resolver.elective_deferral_limit(personal.age),
            },
            ira: Contribution {
                contributed: inputs.above_the_line.ira,
                limit: resolver.ira_limit(personal.age),
            },
            hsa: Contribution {
                contributed: inputs.above_the_line.hsa + income.employer_hsa,
                limit: resolver.hsa_limit(personal),
            },
        }
    }
}

fn payments(
    income: &AggregatedIncome,
    estimated_payments: Decimal,
) -> Payments {
    let total = income.federal_withheld
        + income.state_withheld
        + income.social_security_withheld
        + income.medicare_withheld
        + estimated_payments;

    Payments {
        federal_withheld: income.federal_withheld,
        state_withheld: income.state_withheld,
        social_security_withheld: income.social_security_withheld,
        medicare_withheld: income.medicare_withheld,
        estimated_payments,
        total,
    }
}
