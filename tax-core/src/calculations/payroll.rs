//! Payroll taxes: employee FICA on wages and self-employment tax.
//!
//! Self-employment tax follows the Schedule SE line structure:
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Net profit from self-employment |
//! | 2    | Net earnings: Line 1 × 92.35% |
//! | 3    | Medicare tax: Line 2 × 2.9% |
//! | 4    | Remaining Social Security wage base after W-2 wages |
//! | 5    | Smaller of Line 2 or Line 4 |
//! | 6    | Social Security tax: Line 5 × 12.4% |
//! | 7    | Self-employment tax: Line 3 + Line 6 |
//! | 8    | Deductible part: Line 7 × 50% |
//!
//! Zero or negative net profit owes no SE tax.
//!
//! The Additional Medicare Tax is charged on W-2 wages plus SE net earnings
//! above the filing-status threshold and reported with FICA.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{ByFilingStatus, PayrollConstants};
//! use tax_core::calculations::payroll::PayrollTaxes;
//!
//! let constants = PayrollConstants {
//!     ss_wage_base: dec!(176100),
//!     ss_rate_employee: dec!(0.062),
//!     medicare_rate_employee: dec!(0.0145),
//!     ss_rate_self: dec!(0.124),
//!     medicare_rate_self: dec!(0.029),
//!     net_earnings_factor: dec!(0.9235),
//!     se_deduction_factor: dec!(0.50),
//!     additional_medicare_rate: dec!(0.009),
//!     additional_medicare_threshold: ByFilingStatus::uniform(dec!(200000)),
//! };
//!
//! let payroll = PayrollTaxes::new(&constants);
//! let se = payroll.self_employment_tax(dec!(100000), dec!(50000));
//!
//! assert_eq!(se.total, dec!(14129.55));
//! assert_eq!(se.deduction, dec!(7064.78));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{max, min, round_half_up};
use crate::models::{FicaTax, FilingStatus, PayrollConstants, SelfEmploymentTax};

#[derive(Debug, Clone)]
pub struct PayrollTaxes<'a> {
    constants: &'a PayrollConstants,
}

impl<'a> PayrollTaxes<'a> {
    pub fn new(constants: &'a PayrollConstants) -> Self {
        Self { constants }
    }

    /// Self-employment tax on `se_net_income`, sharing the Social Security
    /// wage base with `w2_wages`.
    pub fn self_employment_tax(
        &self,
        se_net_income: Decimal,
        w2_wages: Decimal,
    ) -> SelfEmploymentTax {
        if se_net_income <= Decimal::ZERO {
            return SelfEmploymentTax::default();
        }

        // Line 2
        let net_earnings = self.net_earnings(se_net_income);

        // Line 3
        let medicare = self.se_medicare_tax(net_earnings);

        // Lines 4-5
        let remaining_base = self.remaining_ss_wage_base(w2_wages);
        let ss_taxable = min(net_earnings, remaining_base);

        // Line 6
        let social_security = self.se_social_security_tax(ss_taxable);

        // Lines 7-8
        let total = round_half_up(medicare + social_security);
        let deduction = self.se_tax_deduction(total);

        debug!(
            net_earnings = %net_earnings,
            social_security = %social_security,
            medicare = %medicare,
            deduction = %deduction,
            "Computed self-employment tax"
        );

        SelfEmploymentTax {
            net_earnings,
            social_security,
            medicare,
            total,
            deduction,
        }
    }

    /// Employee FICA on wages plus the Additional Medicare Tax.
    ///
    /// `se_net_earnings` only feeds the Additional Medicare base.
    pub fn fica(
        &self,
        wages: Decimal,
        se_net_earnings: Decimal,
        status: FilingStatus,
    ) -> FicaTax {
        let social_security =
            round_half_up(min(wages, self.constants.ss_wage_base) * self.constants.ss_rate_employee);
        let medicare = round_half_up(wages * self.constants.medicare_rate_employee);
        let additional_medicare = self.additional_medicare_tax(wages + se_net_earnings, status);

        FicaTax {
            social_security,
            medicare,
            additional_medicare,
            total: social_security + medicare + additional_medicare,
        }
    }

    fn net_earnings(
        &self,
        se_net_income: Decimal,
    ) -> Decimal {
        round_half_up(se_net_income * self.constants.net_earnings_factor)
    }

    fn se_medicare_tax(
        &self,
        net_earnings: Decimal,
    ) -> Decimal {
        round_half_up(net_earnings * self.constants.medicare_rate_self)
    }

    fn remaining_ss_wage_base(
        &self,
        w2_wages: Decimal,
    ) -> Decimal {
        max(self.constants.ss_wage_base - w2_wages, Decimal::ZERO)
    }

    fn se_social_security_tax(
        &self,
        ss_taxable: Decimal,
    ) -> Decimal {
        round_half_up(ss_taxable * self.constants.ss_rate_self)
    }

    fn se_tax_deduction(
        &self,
        total: Decimal,
    ) -> Decimal {
        round_half_up(total * self.constants.se_deduction_factor)
    }

    fn additional_medicare_tax(
        &self,
        medicare_wages: Decimal,
        status: FilingStatus,
    ) -> Decimal {
        let threshold = *self.constants.additional_medicare_threshold.get(status);
        round_half_up(
            max(medicare_wages - threshold, Decimal::ZERO)
                * self.constants.additional_medicare_rate,
        )
    }
}
