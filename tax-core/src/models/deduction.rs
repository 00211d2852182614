use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw above-the-line deduction inputs, before limits are applied.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AboveTheLineInputs {
    /// Traditional IRA contributions.
    pub ira: Decimal,
    /// Personal HSA contributions, excluding employer contributions.
    pub hsa: Decimal,
    pub student_loan_interest: Decimal,
    pub educator_expenses: Decimal,
    pub se_health_insurance: Decimal,
    pub alimony_paid: Decimal,
    pub military_moving: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemizedInputs {
    pub state_local_income_tax: Decimal,
    pub property_tax: Decimal,
    pub mortgage_interest: Decimal,
    /// Outstanding acquisition debt; zero means "under the limit".
    pub mortgage_debt: Decimal,
    pub mortgage_insurance: Decimal,
    pub charitable_cash: Decimal,
    pub charitable_noncash: Decimal,
    pub medical_expenses: Decimal,
    pub casualty_losses: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionInputs {
    pub above_the_line: AboveTheLineInputs,
    pub itemized: ItemizedInputs,
}

/// Above-the-line deductions after limits and phaseouts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AboveTheLine {
    pub ira: Decimal,
    pub hsa: Decimal,
    pub student_loan_interest: Decimal,
    pub educator_expenses: Decimal,
    pub half_se_tax: Decimal,
    pub se_health_insurance: Decimal,
    pub alimony_paid: Decimal,
    pub military_moving: Decimal,
    pub total: Decimal,
}

/// Itemized deduction lines after caps and floors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemizedBreakdown {
    pub salt: Decimal,
    pub mortgage_interest: Decimal,
    pub mortgage_insurance: Decimal,
    pub charitable: Decimal,
    pub medical: Decimal,
    pub casualty_losses: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionChoice {
    #[default]
    Standard,
    Itemized,
}

/// Both deduction candidates plus the one applied.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeductionProfile {
    pub above_the_line: AboveTheLine,
    /// Gross income less above-the-line deductions, floored at zero.
    pub agi: Decimal,
    pub standard: Decimal,
    pub itemized: ItemizedBreakdown,
    pub choice: DeductionChoice,
    /// `max(standard, itemized.total)`.
    pub applied: Decimal,
    pub qbi: Decimal,
}
