//! Progressive rate schedules.
//!
//! Ordinary income is taxed with [`bracket_tax`]. Preferential income
//! (long-term gains and qualified dividends) is taxed with [`stacked_tax`],
//! which places it in the schedule *above* the ordinary income so that the
//! rate depends on the combined total:
//!
//! | Ordinary | Preferential | Falls in                        |
//! |----------|--------------|---------------------------------|
//! | 40,000   | 20,000       | 8,350 at 0%, 11,650 at 15%      |
//! | 0        | 20,000       | 20,000 at 0%                    |
//! | 600,000  | 20,000       | 20,000 at 20%                   |
//!
//! (Single filer, 2025 preferential schedule.)

use rust_decimal::Decimal;

use crate::{BracketSlice, TaxBracket};
use crate::calculations::common::round_half_up;

/// Tax on `income` under `brackets`.
///
/// Uses the bracket's precomputed `base_tax`, so the result equals the sum of
/// each bracket's rate times the income falling inside it. Zero or negative
/// income owes nothing.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxBracket;
/// use tax_core::calculations::brackets::bracket_tax;
///
/// let schedule = TaxBracket::schedule(&[
///     (Some(dec!(11925)), dec!(0.10)),
///     (Some(dec!(48475)), dec!(0.12)),
///     (None, dec!(0.22)),
/// ]);
///
/// assert_eq!(bracket_tax(dec!(50000), &schedule), dec!(5914.00));
/// ```
pub fn bracket_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match brackets.iter().find(|b| b.contains(income)) {
        Some(bracket) => {
            round_half_up(bracket.base_tax + (income - bracket.min_income) * bracket.tax_rate)
        }
        None => stacked_tax(Decimal::ZERO, income, brackets),
    }
}

/// Rate applied to the next dollar above `income`.
pub fn marginal_rate(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    if income <= Decimal::ZERO {
        return brackets.first().map_or(Decimal::ZERO, |b| b.tax_rate);
    }
    brackets
        .iter()
        .find(|b| b.contains(income))
        .or_else(|| brackets.last())
        .map_or(Decimal::ZERO, |b| b.tax_rate)
}

/// Tax on `stacked` dollars that sit on top of `base` dollars already placed
/// in the schedule.
///
/// Each bracket taxes only the part of `[base, base + stacked]` that lies
/// inside it, so the preferential rate is set by the cumulative position and
/// never by `stacked` alone.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxBracket;
/// use tax_core::calculations::brackets::stacked_tax;
///
/// let ltcg = TaxBracket::schedule(&[
///     (Some(dec!(48350)), dec!(0.00)),
///     (Some(dec!(533400)), dec!(0.15)),
///     (None, dec!(0.20)),
/// ]);
///
/// // 8,350 at 0% and 11,650 at 15%
/// assert_eq!(stacked_tax(dec!(40000), dec!(20000), &ltcg), dec!(1747.50));
/// ```
pub fn stacked_tax(
    base: Decimal,
    stacked: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    let tax: Decimal = stacked_slices(base, stacked, brackets)
        .iter()
        .map(|slice| slice.amount * slice.rate)
        .sum();
    round_half_up(tax)
}

/// Splits `stacked` into per-bracket slices above `base`, skipping brackets
/// it does not reach.
pub fn stacked_breakdown(
    base: Decimal,
    stacked: Decimal,
    brackets: &[TaxBracket],
) -> Vec<BracketSlice> {
    stacked_slices(base, stacked, brackets)
        .into_iter()
        .map(|slice| BracketSlice {
            tax: round_half_up(slice.amount * slice.rate),
            ..slice
        })
        .collect()
}

fn stacked_slices(
    base: Decimal,
    stacked: Decimal,
    brackets: &[TaxBracket],
) -> Vec<BracketSlice> {
    if stacked <= Decimal::ZERO {
        return Vec::new();
    }
    let low = base.max(Decimal::ZERO);
    let high = low + stacked;

    brackets
        .iter()
        .filter_map(|bracket| {
            let amount = bracket.overlap(low, high);
            (amount > Decimal::ZERO).then_some(BracketSlice {
                rate: bracket.tax_rate,
                amount,
                tax: Decimal::ZERO,
            })
        })
        .collect()
}
