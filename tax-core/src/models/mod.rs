mod credit;
mod deduction;
mod filing_status;
mod income;
mod personal;
mod tax_bracket;
mod tax_result;
mod tax_year_config;

pub use credit::{CreditAmount, CreditInputs, CreditKind, CreditSet};
pub use deduction::{
    AboveTheLine, AboveTheLineInputs, DeductionChoice, DeductionInputs, DeductionProfile,
    ItemizedBreakdown, ItemizedInputs,
};
pub use filing_status::{ByFilingStatus, FilingStatus};
pub use income::{
    AggregatedIncome, AssetClass, HoldingTerm, HomeOffice, HomeOfficeMethod, IncomeRecord,
    OtherIncomeKind,
};
pub use personal::{Dependent, PersonalInfo};
pub use tax_bracket::{BracketSlice, TaxBracket};
pub use tax_result::{
    Contribution, ContributionSummary, FicaTax, Payments, SelfEmploymentTax, TaxResult,
};
pub use tax_year_config::{
    AmtConstants, ChildTaxCreditLimits, ConstantsError, CreditLimits, DeductionLimits,
    DependentCareLimits, EducationLimits, EitcLimits, EnergyLimits, NiitConstants,
    PayrollConstants, Phaseout, SaversLimits, SaversTier, StateTaxTable, TaxYearConstants,
};
