use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The part of an amount that falls in one bracket of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: Decimal,
    pub amount: Decimal,
    pub tax: Decimal,
}

/// One row of a progressive rate schedule.
///
/// `base_tax` is the tax owed on all income below `min_income`, so the tax on
/// an amount inside this bracket is `base_tax + (income - min_income) * tax_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    /// Builds a contiguous schedule starting at zero from `(upper_bound, rate)`
    /// pairs, filling in `min_income` and `base_tax`.
    ///
    /// The last pair should have `None` as its upper bound.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::TaxBracket;
    ///
    /// let schedule = TaxBracket::schedule(&[
    ///     (Some(dec!(11925)), dec!(0.10)),
    ///     (Some(dec!(48475)), dec!(0.12)),
    ///     (None, dec!(0.22)),
    /// ]);
    ///
    /// assert_eq!(schedule[1].min_income, dec!(11925));
    /// assert_eq!(schedule[2].base_tax, dec!(5578.50));
    /// ```
    pub fn schedule(bounds: &[(Option<Decimal>, Decimal)]) -> Vec<TaxBracket> {
        let mut brackets = Vec::with_capacity(bounds.len());
        let mut min_income = Decimal::ZERO;
        let mut base_tax = Decimal::ZERO;

        for &(max_income, tax_rate) in bounds {
            brackets.push(TaxBracket {
                min_income,
                max_income,
                tax_rate,
                base_tax,
            });
            if let Some(max) = max_income {
                base_tax += (max - min_income) * tax_rate;
                min_income = max;
            }
        }

        brackets
    }

    /// True when `income` falls in `(min_income, max_income]`.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income > self.min_income && self.max_income.is_none_or(|max| income <= max)
    }

    /// Portion of the interval `[low, high]` that lies inside this bracket.
    pub fn overlap(
        &self,
        low: Decimal,
        high: Decimal,
    ) -> Decimal {
        let start = low.max(self.min_income);
        let end = match self.max_income {
            Some(max) => high.min(max),
            None => high,
        };
        if end > start { end - start } else { Decimal::ZERO }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn schedule_accumulates_base_tax() {
        let schedule = TaxBracket::schedule(&[
            (Some(dec!(48350)), dec!(0.00)),
            (Some(dec!(533400)), dec!(0.15)),
            (None, dec!(0.20)),
        ]);

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[1].base_tax, dec!(0));
        assert_eq!(schedule[2].min_income, dec!(533400));
        assert_eq!(schedule[2].base_tax, dec!(72757.50));
        assert_eq!(schedule[2].max_income, None);
    }

    #[test]
    fn contains_is_exclusive_below_inclusive_above() {
        let bracket = TaxBracket {
            min_income: dec!(100),
            max_income: Some(dec!(200)),
            tax_rate: dec!(0.10),
            base_tax: dec!(0),
        };

        assert!(!bracket.contains(dec!(100)));
        assert!(bracket.contains(dec!(100.01)));
        assert!(bracket.contains(dec!(200)));
        assert!(!bracket.contains(dec!(200.01)));
    }

    #[test]
    fn overlap_clips_to_bracket_edges() {
        let bracket = TaxBracket {
            min_income: dec!(100),
            max_income: Some(dec!(200)),
            tax_rate: dec!(0.10),
            base_tax: dec!(0),
        };

        assert_eq!(bracket.overlap(dec!(50), dec!(150)), dec!(50));
        assert_eq!(bracket.overlap(dec!(150), dec!(400)), dec!(50));
        assert_eq!(bracket.overlap(dec!(0), dec!(90)), dec!(0));
        assert_eq!(bracket.overlap(dec!(250), dec!(300)), dec!(0));
    }

    #[test]
    fn overlap_unbounded_top_bracket() {
        let bracket = TaxBracket {
            min_income: dec!(100),
            max_income: None,
            tax_rate: dec!(0.37),
            base_tax: dec!(0),
        };

        assert_eq!(bracket.overlap(dec!(50), dec!(1000)), dec!(900));
    }
}
