use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw credit-eligibility inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditInputs {
    pub child_care_expenses: Decimal,
    pub education_expenses: Decimal,
    /// Years the American Opportunity Credit was already claimed for the
    /// student.
    pub aotc_years_claimed: u32,
    pub energy_improvements: Decimal,
    pub ev_purchase_price: Decimal,
    pub solar_cost: Decimal,
    /// Retirement contributions counted for the Saver's Credit.
    pub savers_contributions: Decimal,
    pub foreign_tax_paid: Decimal,
    pub estimated_payments: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    ChildTax,
    DependentCare,
    Education,
    EnergyImprovement,
    CleanVehicle,
    CleanEnergy,
    Savers,
    EarnedIncome,
    ForeignTax,
}

impl CreditKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChildTax => "Child Tax Credit",
            Self::DependentCare => "Child and Dependent Care Credit",
            Self::Education => "Education Credit",
            Self::EnergyImprovement => "Energy Efficient Home Improvement",
            Self::CleanVehicle => "Clean Vehicle Credit",
            Self::CleanEnergy => "Residential Clean Energy",
            Self::Savers => "Saver's Credit",
            Self::EarnedIncome => "Earned Income Credit",
            Self::ForeignTax => "Foreign Tax Credit",
        }
    }
}

impl fmt::Display for CreditKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A computed credit. `refundable` is the part of `amount` that may push
/// liability below zero; the rest is nonrefundable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreditAmount {
    pub amount: Decimal,
    pub refundable: Decimal,
}

impl CreditAmount {
    pub fn nonrefundable(amount: Decimal) -> Self {
        Self {
            amount,
            refundable: Decimal::ZERO,
        }
    }

    pub fn refundable(amount: Decimal) -> Self {
        Self {
            amount,
            refundable: amount,
        }
    }

    pub fn nonrefundable_part(&self) -> Decimal {
        self.amount - self.refundable
    }
}

/// Credits keyed by kind. Only non-zero credits are stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreditSet {
    credits: BTreeMap<CreditKind, CreditAmount>,
}

impl CreditSet {
    pub fn insert(
        &mut self,
        kind: CreditKind,
        credit: CreditAmount,
    ) {
        if credit.amount > Decimal::ZERO {
            self.credits.insert(kind, credit);
        }
    }

    pub fn get(
        &self,
        kind: CreditKind,
    ) -> Decimal {
        self.credits
            .get(&kind)
            .map_or(Decimal::ZERO, |credit| credit.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CreditKind, &CreditAmount)> {
        self.credits.iter().map(|(kind, credit)| (*kind, credit))
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.credits.values().map(|c| c.amount).sum()
    }

    pub fn nonrefundable_total(&self) -> Decimal {
        self.credits.values().map(CreditAmount::nonrefundable_part).sum()
    }

    pub fn refundable_total(&self) -> Decimal {
        self.credits.values().map(|c| c.refundable).sum()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn zero_credits_are_not_stored() {
        let mut set = CreditSet::default();
        set.insert(CreditKind::Savers, CreditAmount::nonrefundable(dec!(0)));

        assert!(set.is_empty());
        assert_eq!(set.get(CreditKind::Savers), dec!(0));
    }

    #[test]
    fn totals_split_refundable_part() {
        let mut set = CreditSet::default();
        set.insert(
            CreditKind::ChildTax,
            CreditAmount {
                amount: dec!(4000),
                refundable: dec!(3400),
            },
        );
        set.insert(CreditKind::EarnedIncome, CreditAmount::refundable(dec!(649)));
        set.insert(CreditKind::Education, CreditAmount::nonrefundable(dec!(2500)));

        assert_eq!(set.total(), dec!(7149));
        assert_eq!(set.refundable_total(), dec!(4049));
        assert_eq!(set.nonrefundable_total(), dec!(3100));
    }
}
