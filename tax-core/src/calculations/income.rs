//! Income aggregation.
//!
//! Folds a list of [`IncomeRecord`]s into an [`AggregatedIncome`]:
//!
//! - Wages are summed as reported. Equity-vest income is tracked separately
//!   for display only since it already sits inside W-2 wages.
//! - Short- and long-term capital results are netted together, stock and
//!   crypto alike. A net gain is split into a preferential part (the
//!   long-term gain that survives netting) and an ordinary part. A net loss
//!   offsets ordinary income up to the annual limit and the remainder is a
//!   signed carryforward.
//! - Qualified dividends join the preferential pool; other dividends are
//!   ordinary.
//! - Each self-employment record nets gross receipts against expenses and
//!   the better of the two home-office methods.
//! - Social Security benefits are included at a flat rate.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{floor_at_zero, max, min, round_half_up};
use crate::models::{
    AggregatedIncome, HoldingTerm, HomeOffice, HomeOfficeMethod, IncomeRecord, OtherIncomeKind,
    TaxYearConstants,
};

/// Home-office deduction for one business, with the method that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeOfficeDeduction {
    pub simplified: Decimal,
    pub regular: Decimal,
    pub method: HomeOfficeMethod,
    pub amount: Decimal,
}

/// Capital results after netting and the annual loss cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapitalNetting {
    pub net: Decimal,
    /// Long-term gain taxed at preferential rates.
    pub preferential: Decimal,
    /// Gain taxed as ordinary income, or the allowed loss (negative).
    pub ordinary: Decimal,
    /// Loss beyond the annual limit (zero or negative).
    pub carryforward: Decimal,
}

#[derive(Debug, Clone)]
pub struct IncomeAggregator<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> IncomeAggregator<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// Aggregates `records` into derived totals.
    ///
    /// Records are assumed to have passed boundary validation; amounts are
    /// non-negative.
    pub fn aggregate(
        &self,
        records: &[IncomeRecord],
    ) -> AggregatedIncome {
        let mut totals = AggregatedIncome::default();
        let mut largest_home_office = Decimal::ZERO;

        for record in records {
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
                    totals.wages += *wages;
                    totals.federal_withheld += *federal_withheld;
                    totals.state_withheld += *state_withheld;
                    totals.social_security_withheld += *social_security_withheld;
                    totals.medicare_withheld += *medicare_withheld;
                    totals.elective_deferrals_401k += *elective_deferrals_401k;
                    totals.employer_hsa += *employer_hsa;
                }
                IncomeRecord::EquityVest { amount } => totals.equity_vest_income += *amount,
                IncomeRecord::CapitalSale {
                    term, gain, loss, ..
                } => match term {
                    HoldingTerm::Short => totals.short_term_net += *gain - *loss,
                    HoldingTerm::Long => totals.long_term_net += *gain - *loss,
                },
                IncomeRecord::Dividend { amount, qualified } => {
                    if *qualified {
                        totals.qualified_dividends += *amount;
                    } else {
                        totals.ordinary_dividends += *amount;
                    }
                }
                IncomeRecord::Interest { amount } => totals.interest += *amount,
                IncomeRecord::SelfEmployment {
                    gross,
                    expenses,
                    home_office,
                } => {
                    let office = home_office
                        .as_ref()
                        .map(|office| self.home_office_deduction(office));
                    let office_amount = office.map_or(Decimal::ZERO, |o| o.amount);
                    if let Some(office) = office.filter(|o| o.amount > largest_home_office) {
                        largest_home_office = office.amount;
                        totals.home_office_method = office.method;
                    }

                    totals.se_gross += *gross;
                    totals.se_expenses += *expenses;
                    totals.home_office_deduction += office_amount;
                    totals.se_net_income +=
                        floor_at_zero("se_net_income", *gross - *expenses - office_amount);
                }
                IncomeRecord::Other { kind, amount } => match kind {
                    OtherIncomeKind::Rental => totals.rental_income += *amount,
                    OtherIncomeKind::SocialSecurity => totals.social_security_benefits += *amount,
                    _ => totals.other_income += *amount,
                },
            }
        }

        let capital = self.net_capital(totals.short_term_net, totals.long_term_net);
        totals.net_capital_gain = capital.net;
        totals.net_long_term_gain = capital.preferential;
        totals.capital_loss_deduction = min(capital.ordinary, Decimal::ZERO);
        totals.capital_loss_carryforward = capital.carryforward;

        totals.taxable_social_security = round_half_up(
            totals.social_security_benefits * self.constants.social_security_inclusion_rate,
        );

        totals.ordinary_income = floor_at_zero(
            "ordinary_income",
            totals.wages
                + totals.interest
                + totals.ordinary_dividends
                + capital.ordinary
                + totals.se_net_income
                + totals.rental_income
                + totals.taxable_social_security
                + totals.other_income,
        );
        totals.preferential_income = totals.net_long_term_gain + totals.qualified_dividends;
        totals.investment_income = totals.interest
            + totals.ordinary_dividends
            + totals.qualified_dividends
            + totals.rental_income
            + max(capital.net, Decimal::ZERO);
        totals.gross_income = totals.ordinary_income + totals.preferential_income;

        debug!(
            gross_income = %totals.gross_income,
            ordinary_income = %totals.ordinary_income,
            preferential_income = %totals.preferential_income,
            investment_income = %totals.investment_income,
            "Aggregated income"
        );

        totals
    }

    /// Nets short- and long-term results and applies the annual loss cap.
    pub fn net_capital(
        &self,
        short_term: Decimal,
        long_term: Decimal,
    ) -> CapitalNetting {
        let net = short_term + long_term;

        if net >= Decimal::ZERO {
            let preferential = max(min(long_term, net), Decimal::ZERO);
            return CapitalNetting {
                net,
                preferential,
                ordinary: net - preferential,
                carryforward: Decimal::ZERO,
            };
        }

        let allowed = max(net, -self.constants.capital_loss_limit);
        let carryforward = net - allowed;
        if carryforward < Decimal::ZERO {
            warn!(
                net_loss = %net,
                limit = %self.constants.capital_loss_limit,
                carryforward = %carryforward,
                "Capital loss exceeds annual limit; excess carried forward"
            );
        }

        CapitalNetting {
            net,
            preferential: Decimal::ZERO,
            ordinary: allowed,
            carryforward,
        }
    }

    /// Larger of the simplified and regular home-office methods; ties go to
    /// simplified.
    pub fn home_office_deduction(
        &self,
        office: &HomeOffice,
    ) -> HomeOfficeDeduction {
        let limits = &self.constants.deductions;

        let simplified = round_half_up(
            min(office.office_sqft, limits.home_office_max_sqft)
                * limits.home_office_rate_per_sqft,
        );
        let regular = if office.home_sqft > Decimal::ZERO {
            round_half_up(office.home_expenses * office.office_sqft / office.home_sqft)
        } else {
            Decimal::ZERO
        };

        let (method, amount) = if simplified == Decimal::ZERO && regular == Decimal::ZERO {
            (HomeOfficeMethod::None, Decimal::ZERO)
        } else if regular > simplified {
            (HomeOfficeMethod::Regular, regular)
        } else {
            (HomeOfficeMethod::Simplified, simplified)
        };

        HomeOfficeDeduction {
            simplified,
            regular,
            method,
            amount,
        }
    }
}
