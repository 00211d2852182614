//! Tax credits.
//!
//! Each credit is a free function over the few values it depends on, so no
//! credit can observe another. [`CreditEngine::compute_credits`] only gathers
//! those values and collects the results into a [`CreditSet`]. Whether a
//! credit may take liability below zero is carried on each
//! [`CreditAmount`]; applying credits against tax happens in the engine.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{floor_at_zero, min, round_half_up};
use crate::models::{
    ChildTaxCreditLimits, CreditAmount, CreditInputs, CreditKind, CreditSet,
    DependentCareLimits, EducationLimits, EitcLimits, EnergyLimits, FilingStatus, PersonalInfo,
    SaversLimits, TaxYearConstants,
};

#[derive(Debug, Clone)]
pub struct CreditEngine<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> CreditEngine<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// Computes every credit the return is eligible for.
    ///
    /// Ineligible or missing inputs give a zero credit, which is left out of
    /// the returned set.
    pub fn compute_credits(
        &self,
        personal: &PersonalInfo,
        inputs: &CreditInputs,
        agi: Decimal,
        earned_income: Decimal,
    ) -> CreditSet {
        let limits = &self.constants.credits;
        let status = personal.filing_status;
        let qualifying_children =
            personal.dependents_at_most(limits.child_tax_credit.qualifying_child_max_age);
        let other_dependents = personal.dependents.len() - qualifying_children;
        let care_persons = personal.dependents_at_most(limits.dependent_care.qualifying_max_age);

        let mut credits = CreditSet::default();
        credits.insert(
            CreditKind::ChildTax,
            child_tax_credit(
                &limits.child_tax_credit,
                status,
                qualifying_children,
                other_dependents,
                agi,
            ),
        );
        credits.insert(
            CreditKind::DependentCare,
            CreditAmount::nonrefundable(dependent_care_credit(
                &limits.dependent_care,
                care_persons,
                inputs.child_care_expenses,
                agi,
            )),
        );
        credits.insert(
            CreditKind::Education,
            CreditAmount::nonrefundable(education_credit(
                &limits.education,
                status,
                inputs.education_expenses,
                inputs.aotc_years_claimed,
                agi,
            )),
        );
        credits.insert(
            CreditKind::EnergyImprovement,
            CreditAmount::nonrefundable(energy_improvement_credit(
                &limits.energy,
                inputs.energy_improvements,
            )),
        );
        credits.insert(
            CreditKind::CleanVehicle,
            CreditAmount::nonrefundable(clean_vehicle_credit(
                &limits.energy,
                inputs.ev_purchase_price,
            )),
        );
        credits.insert(
            CreditKind::CleanEnergy,
            CreditAmount::nonrefundable(clean_energy_credit(&limits.energy, inputs.solar_cost)),
        );
        credits.insert(
            CreditKind::Savers,
            CreditAmount::nonrefundable(savers_credit(
                &limits.savers,
                status,
                inputs.savers_contributions,
                agi,
            )),
        );
        credits.insert(
            CreditKind::EarnedIncome,
            CreditAmount::refundable(earned_income_credit(
                &limits.eitc,
                status,
                qualifying_children,
                agi,
                earned_income,
            )),
        );
        credits.insert(
            CreditKind::ForeignTax,
            CreditAmount::nonrefundable(inputs.foreign_tax_paid),
        );

        debug!(
            total = %credits.total(),
            refundable = %credits.refundable_total(),
            "Computed credits"
        );

        credits
    }
}

/// Child Tax Credit with the stepped AGI phaseout.
///
/// Each full `phaseout_step` of AGI above the threshold removes
/// `phaseout_per_step`. Up to `refundable_per_child` per qualifying child of
/// what remains is refundable.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{ByFilingStatus, ChildTaxCreditLimits, FilingStatus};
/// use tax_core::calculations::credits::child_tax_credit;
///
/// let limits = ChildTaxCreditLimits {
///     per_child: dec!(2000),
///     per_other_dependent: dec!(500),
///     refundable_per_child: dec!(1700),
///     qualifying_child_max_age: 16,
///     phaseout_start: ByFilingStatus::uniform(dec!(200000)),
///     phaseout_step: dec!(1000),
///     phaseout_per_step: dec!(50),
/// };
///
/// // 10,500 over the threshold: ten full steps
/// let credit = child_tax_credit(&limits, FilingStatus::Single, 2, 0, dec!(210500));
/// assert_eq!(credit.amount, dec!(3500));
/// assert_eq!(credit.refundable, dec!(3400));
/// ```
pub fn child_tax_credit(
    limits: &ChildTaxCreditLimits,
    status: FilingStatus,
    qualifying_children: usize,
    other_dependents: usize,
    agi: Decimal,
) -> CreditAmount {
    let children = Decimal::from(qualifying_children);
    let base =
        children * limits.per_child + Decimal::from(other_dependents) * limits.per_other_dependent;
    if base <= Decimal::ZERO {
        return CreditAmount::default();
    }

    let excess = floor_at_zero("ctc_excess", agi - *limits.phaseout_start.get(status));
    let reduction = (excess / limits.phaseout_step).floor() * limits.phaseout_per_step;
    let amount = floor_at_zero("child_tax_credit", base - reduction);

    CreditAmount {
        amount,
        refundable: min(amount, children * limits.refundable_per_child),
    }
}

/// Child and Dependent Care Credit.
///
/// The rate starts at `max_rate` and drops `rate_step_reduction` for each
/// full `rate_step` of AGI above `rate_agi_floor`, never below `min_rate`.
pub fn dependent_care_credit(
    limits: &DependentCareLimits,
    qualifying_persons: usize,
    expenses: Decimal,
    agi: Decimal,
) -> Decimal {
    if qualifying_persons == 0 || expenses <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let cap = if qualifying_persons == 1 {
        limits.one_person_expense_cap
    } else {
        limits.two_or_more_expense_cap
    };
    let steps = (floor_at_zero("care_excess", agi - limits.rate_agi_floor) / limits.rate_step).floor();
    let rate = (limits.max_rate - steps * limits.rate_step_reduction).max(limits.min_rate);

    round_half_up(min(expenses, cap) * rate)
}

/// American Opportunity Credit while fewer than `aotc_max_years` have been
/// claimed, otherwise the Lifetime Learning Credit. Both phase out linearly.
pub fn education_credit(
    limits: &EducationLimits,
    status: FilingStatus,
    expenses: Decimal,
    years_claimed: u32,
    agi: Decimal,
) -> Decimal {
    if expenses <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let credit = if years_claimed < limits.aotc_max_years {
        let partial = min(
            floor_at_zero("aotc_partial", expenses - limits.aotc_full_expenses),
            limits.aotc_partial_expenses,
        );
        min(expenses, limits.aotc_full_expenses) + partial * limits.aotc_partial_rate
    } else {
        min(expenses, limits.llc_max_expenses) * limits.llc_rate
    };

    round_half_up(credit * limits.phaseout.get(status).remaining_fraction(agi))
}

pub fn energy_improvement_credit(
    limits: &EnergyLimits,
    cost: Decimal,
) -> Decimal {
    round_half_up(min(cost * limits.home_improvement_rate, limits.home_improvement_cap))
}

/// Simplified clean vehicle credit: a share of the purchase price, capped.
pub fn clean_vehicle_credit(
    limits: &EnergyLimits,
    purchase_price: Decimal,
) -> Decimal {
    round_half_up(min(purchase_price * limits.clean_vehicle_rate, limits.clean_vehicle_cap))
}

pub fn clean_energy_credit(
    limits: &EnergyLimits,
    cost: Decimal,
) -> Decimal {
    round_half_up(cost * limits.clean_energy_rate)
}

/// Saver's Credit: the rate of the first tier whose AGI ceiling is not
/// exceeded, times contributions up to the cap.
pub fn savers_credit(
    limits: &SaversLimits,
    status: FilingStatus,
    contributions: Decimal,
    agi: Decimal,
) -> Decimal {
    if contributions <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    limits
        .tiers
        .get(status)
        .iter()
        .find(|tier| agi <= tier.agi_max)
        .map_or(Decimal::ZERO, |tier| {
            round_half_up(min(contributions, limits.contribution_cap) * tier.rate)
        })
}

/// Simplified EITC: the maximum credit for the number of qualifying children
/// when AGI is within the limit, never more than earned income.
pub fn earned_income_credit(
    limits: &EitcLimits,
    status: FilingStatus,
    qualifying_children: usize,
    agi: Decimal,
    earned_income: Decimal,
) -> Decimal {
    if earned_income <= Decimal::ZERO || limits.max_credit.is_empty() {
        return Decimal::ZERO;
    }

    let index = qualifying_children.min(limits.max_credit.len() - 1);
    let within_limit = limits
        .income_limit
        .get(status)
        .get(index)
        .is_some_and(|limit| agi <= *limit);
    if !within_limit {
        return Decimal::ZERO;
    }

    min(limits.max_credit[index], earned_income)
}
