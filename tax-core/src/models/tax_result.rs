use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AggregatedIncome, BracketSlice, CreditSet, DeductionProfile, FilingStatus};

/// Employee-side payroll taxes on W-2 wages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FicaTax {
    pub social_security: Decimal,
    pub medicare: Decimal,
    /// Additional Medicare Tax on wages plus SE earnings above the threshold.
    pub additional_medicare: Decimal,
    pub total: Decimal,
}

/// Self-employment tax, following Schedule SE.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelfEmploymentTax {
    /// Net profit × net earnings factor.
    pub net_earnings: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub total: Decimal,
    /// Deductible half, taken above the line.
    pub deduction: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Payments {
    pub federal_withheld: Decimal,
    pub state_withheld: Decimal,
    pub social_security_withheld: Decimal,
    pub medicare_withheld: Decimal,
    pub estimated_payments: Decimal,
    pub total: Decimal,
}

/// Amount put into a tax-advantaged account against its annual limit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contribution {
    pub contributed: Decimal,
    pub limit: Decimal,
}

impl Contribution {
    pub fn remaining(&self) -> Decimal {
        (self.limit - self.contributed).max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContributionSummary {
    pub elective_deferral_401k: Contribution,
    pub ira: Contribution,
    /// Personal plus employer contributions.
    pub hsa: Contribution,
}

/// The outcome of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub income: AggregatedIncome,
    pub deductions: DeductionProfile,
    pub agi: Decimal,
    pub taxable_income: Decimal,
    /// Part of `taxable_income` taxed at preferential rates.
    pub preferential_taxable: Decimal,
    pub ordinary_tax: Decimal,
    pub capital_gains_tax: Decimal,
    /// How `preferential_taxable` splits across the preferential brackets.
    pub capital_gains_breakdown: Vec<BracketSlice>,
    /// `ordinary_tax + capital_gains_tax`.
    pub regular_tax: Decimal,
    /// Tentative minimum tax, whether or not it applied.
    pub amt_tentative: Decimal,
    /// Excess of tentative minimum tax over regular tax; zero when regular
    /// tax is higher.
    pub amt: Decimal,
    pub federal_tax_before_credits: Decimal,
    pub credits: CreditSet,
    pub nonrefundable_credits_applied: Decimal,
    pub refundable_credits: Decimal,
    /// May be negative when refundable credits exceed the tax.
    pub federal_tax: Decimal,
    pub niit: Decimal,
    pub fica: FicaTax,
    pub self_employment: SelfEmploymentTax,
    pub state_rate: Decimal,
    pub state_tax: Decimal,
    pub total_tax: Decimal,
    pub payments: Payments,
    /// Positive means tax owed, negative means refund.
    pub balance_due: Decimal,
    pub marginal_rate: Decimal,
    /// `total_tax / gross_income`, zero for zero income.
    pub effective_rate: Decimal,
    pub contributions: ContributionSummary,
}

impl TaxResult {
    pub fn is_refund(&self) -> bool {
        self.balance_due < Decimal::ZERO
    }
}
