//! Tax calculation modules.
//!
//! Each stage of the computation lives in its own module and is usable on
//! its own; [`TaxEngine`] sequences them.

pub mod brackets;
pub mod common;
pub mod credits;
pub mod deductions;
pub mod engine;
pub mod income;
pub mod payroll;

pub use credits::CreditEngine;
pub use deductions::DeductionResolver;
pub use engine::{AmtComparison, TaxEngine};
pub use income::IncomeAggregator;
pub use payroll::PayrollTaxes;
