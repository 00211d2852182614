use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    #[default]
    Stock,
    Crypto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingTerm {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherIncomeKind {
    /// Net rental income; counts toward investment income.
    Rental,
    RetirementDistribution,
    /// Gross benefits; only the inclusion share is taxable.
    SocialSecurity,
    Unemployment,
    Gambling,
    Alimony,
    EsppDiscount,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HomeOffice {
    pub office_sqft: Decimal,
    pub home_sqft: Decimal,
    /// Annual rent/mortgage interest, utilities, insurance and repairs.
    pub home_expenses: Decimal,
}

/// A single piece of reported income.
///
/// Amounts are non-negative; capital losses are reported in `loss`, never as
/// a negative `gain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomeRecord {
    /// A W-2. `wages` is box 1 and already includes any equity-vest income.
    Wage {
        #[serde(default)]
        employer: String,
        wages: Decimal,
        #[serde(default)]
        federal_withheld: Decimal,
        #[serde(default)]
        state_withheld: Decimal,
        #[serde(default)]
        social_security_withheld: Decimal,
        #[serde(default)]
        medicare_withheld: Decimal,
        #[serde(default)]
        elective_deferrals_401k: Decimal,
        #[serde(default)]
        employer_hsa: Decimal,
    },
    /// RSU/stock vest income. Reported for display only.
    EquityVest { amount: Decimal },
    CapitalSale {
        #[serde(default)]
        asset: AssetClass,
        term: HoldingTerm,
        #[serde(default)]
        gain: Decimal,
        #[serde(default)]
        loss: Decimal,
    },
    Dividend {
        amount: Decimal,
        #[serde(default)]
        qualified: bool,
    },
    Interest { amount: Decimal },
    SelfEmployment {
        gross: Decimal,
        #[serde(default)]
        expenses: Decimal,
        #[serde(default)]
        home_office: Option<HomeOffice>,
    },
    Other {
        kind: OtherIncomeKind,
        amount: Decimal,
    },
}

/// Which home-office method produced the deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeOfficeMethod {
    #[default]
    None,
    Simplified,
    Regular,
}

/// Totals derived from a set of [`IncomeRecord`]s.
///
/// `gross_income` is `ordinary_income + preferential_income`. Equity-vest
/// income appears only in `equity_vest_income`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregatedIncome {
    pub wages: Decimal,
    pub equity_vest_income: Decimal,
    pub interest: Decimal,
    pub ordinary_dividends: Decimal,
    pub qualified_dividends: Decimal,
    pub short_term_net: Decimal,
    pub long_term_net: Decimal,
    /// Short-term plus long-term, before the loss cap.
    pub net_capital_gain: Decimal,
    /// Long-term gain that survives netting; taxed at preferential rates.
    pub net_long_term_gain: Decimal,
    /// Loss taken against ordinary income this year (zero or negative).
    pub capital_loss_deduction: Decimal,
    /// Unused loss carried to future years (zero or negative).
    pub capital_loss_carryforward: Decimal,
    pub se_gross: Decimal,
    pub se_expenses: Decimal,
    pub home_office_deduction: Decimal,
    pub home_office_method: HomeOfficeMethod,
    pub se_net_income: Decimal,
    pub rental_income: Decimal,
    pub social_security_benefits: Decimal,
    pub taxable_social_security: Decimal,
    pub other_income: Decimal,
    pub ordinary_income: Decimal,
    /// Net long-term gain plus qualified dividends.
    pub preferential_income: Decimal,
    pub investment_income: Decimal,
    pub gross_income: Decimal,
    pub federal_withheld: Decimal,
    pub state_withheld: Decimal,
    pub social_security_withheld: Decimal,
    pub medicare_withheld: Decimal,
    pub elective_deferrals_401k: Decimal,
    pub employer_hsa: Decimal,
}
