//! Deduction resolution.
//!
//! [`DeductionResolver::resolve`] runs these steps in order:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Above-the-line deductions, limited and phased out against gross income |
//! | 2    | AGI = gross income − step 1, floored at zero |
//! | 3    | Standard deduction: base + one addition per 65+/blind condition |
//! | 4    | Itemized deductions, with the medical floor measured against AGI |
//! | 5    | Applied = larger of 3 and 4; a tie keeps the standard deduction |
//! | 6    | QBI deduction against taxable income before QBI |

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{floor_at_zero, max, min, round_half_up};
use crate::models::{
    AboveTheLine, AboveTheLineInputs, AggregatedIncome, DeductionChoice, DeductionInputs,
    DeductionProfile, FilingStatus, ItemizedBreakdown, ItemizedInputs, PersonalInfo,
    TaxYearConstants,
};

#[derive(Debug, Clone)]
pub struct DeductionResolver<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> DeductionResolver<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// Resolves every deduction for one return.
    ///
    /// `half_se_tax` is the deductible half of self-employment tax, computed
    /// before this step and subtracted here exactly once.
    pub fn resolve(
        &self,
        personal: &PersonalInfo,
        inputs: &DeductionInputs,
        income: &AggregatedIncome,
        half_se_tax: Decimal,
    ) -> DeductionProfile {
        let above_the_line =
            self.above_the_line(personal, &inputs.above_the_line, income, half_se_tax);
        let agi = floor_at_zero("agi", income.gross_income - above_the_line.total);

        let standard = self.standard_deduction(personal);
        let itemized = self.itemized(&inputs.itemized, agi);
        let (choice, applied) = select(standard, itemized.total);

        let taxable_before_qbi = floor_at_zero("taxable_before_qbi", agi - applied);
        let qbi = self.qbi_deduction(
            personal.filing_status,
            income.se_net_income,
            taxable_before_qbi,
        );

        debug!(
            agi = %agi,
            standard = %standard,
            itemized = %itemized.total,
            choice = ?choice,
            qbi = %qbi,
            "Resolved deductions"
        );

        DeductionProfile {
            above_the_line,
            agi,
            standard,
            itemized,
            choice,
            applied,
            qbi,
        }
    }

    /// Above-the-line deductions after limits and phaseouts.
    ///
    /// Phaseouts are measured against gross income, since AGI is not known
    /// until these deductions are taken.
    pub fn above_the_line(
        &self,
        personal: &PersonalInfo,
        inputs: &AboveTheLineInputs,
        income: &AggregatedIncome,
        half_se_tax: Decimal,
    ) -> AboveTheLine {
        let limits = &self.constants.deductions;
        let status = personal.filing_status;
        let gross = income.gross_income;

        let ira = {
            let capped = capped("ira", inputs.ira, self.ira_limit(personal.age));
            if personal.employer_plan {
                round_half_up(capped * limits.ira_phaseout.get(status).remaining_fraction(gross))
            } else {
                capped
            }
        };

        let hsa = capped(
            "hsa",
            inputs.hsa,
            floor_at_zero("hsa_room", self.hsa_limit(personal) - income.employer_hsa),
        );

        let student_loan_interest = round_half_up(
            capped(
                "student_loan_interest",
                inputs.student_loan_interest,
                limits.student_loan_interest_max,
            ) * limits
                .student_loan_phaseout
                .get(status)
                .remaining_fraction(gross),
        );

        let educator_expenses = if personal.educator {
            capped(
                "educator_expenses",
                inputs.educator_expenses,
                limits.educator_expense_max,
            )
        } else {
            Decimal::ZERO
        };

        let se_health_insurance = min(inputs.se_health_insurance, income.se_net_income);

        let total = ira
            + hsa
            + student_loan_interest
            + educator_expenses
            + half_se_tax
            + se_health_insurance
            + inputs.alimony_paid
            + inputs.military_moving;

        AboveTheLine {
            ira,
            hsa,
            student_loan_interest,
            educator_expenses,
            half_se_tax,
            se_health_insurance,
            alimony_paid: inputs.alimony_paid,
            military_moving: inputs.military_moving,
            total: round_half_up(total),
        }
    }

    /// Base standard deduction plus one addition per 65+/blind condition.
    pub fn standard_deduction(
        &self,
        personal: &PersonalInfo,
    ) -> Decimal {
        let status = personal.filing_status;
        let additions = Decimal::from(personal.additional_deduction_count());

        round_half_up(
            *self.constants.standard_deduction.get(status)
                + additions * *self.constants.additional_standard_deduction.get(status),
        )
    }

    /// Itemized deduction lines. `agi` sets the medical expense floor.
    pub fn itemized(
        &self,
        inputs: &ItemizedInputs,
        agi: Decimal,
    ) -> ItemizedBreakdown {
        let limits = &self.constants.deductions;

        let salt = capped(
            "salt",
            inputs.state_local_income_tax + inputs.property_tax,
            limits.salt_cap,
        );

        let mortgage_interest = if inputs.mortgage_debt > limits.mortgage_debt_limit {
            round_half_up(
                inputs.mortgage_interest * limits.mortgage_debt_limit / inputs.mortgage_debt,
            )
        } else {
            inputs.mortgage_interest
        };

        let charitable = inputs.charitable_cash + inputs.charitable_noncash;
        let medical = round_half_up(floor_at_zero(
            "medical",
            inputs.medical_expenses - agi * limits.medical_agi_floor_rate,
        ));

        let total = salt
            + mortgage_interest
            + inputs.mortgage_insurance
            + charitable
            + medical
            + inputs.casualty_losses;

        ItemizedBreakdown {
            salt,
            mortgage_interest,
            mortgage_insurance: inputs.mortgage_insurance,
            charitable,
            medical,
            casualty_losses: inputs.casualty_losses,
            total: round_half_up(total),
        }
    }

    /// Qualified business income deduction.
    ///
    /// Taxable income above the filing-status threshold loses the deduction
    /// entirely; there is no phase-in range. Below it, the deduction is the
    /// QBI rate times the smaller of QBI and taxable income.
    pub fn qbi_deduction(
        &self,
        status: FilingStatus,
        qbi_income: Decimal,
        taxable_before_qbi: Decimal,
    ) -> Decimal {
        let limits = &self.constants.deductions;
        if qbi_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let threshold = *limits.qbi_threshold.get(status);
        if taxable_before_qbi > threshold {
            warn!(
                taxable_income = %taxable_before_qbi,
                threshold = %threshold,
                "Taxable income above QBI threshold; no QBI deduction"
            );
            return Decimal::ZERO;
        }

        round_half_up(min(qbi_income, taxable_before_qbi) * limits.qbi_rate)
    }

    /// Traditional IRA limit including the catch-up at `age`.
    pub fn ira_limit(
        &self,
        age: u32,
    ) -> Decimal {
        let limits = &self.constants.deductions;
        if age >= limits.ira_catch_up_age {
            limits.ira_limit + limits.ira_catch_up
        } else {
            limits.ira_limit
        }
    }

    /// HSA limit for the filer's coverage and age, before employer
    /// contributions.
    pub fn hsa_limit(
        &self,
        personal: &PersonalInfo,
    ) -> Decimal {
        let limits = &self.constants.deductions;
        let base = if personal.hsa_family_coverage {
            limits.hsa_family_limit
        } else {
            limits.hsa_self_only_limit
        };
        if personal.age >= limits.hsa_catch_up_age {
            base + limits.hsa_catch_up
        } else {
            base
        }
    }

    /// 401(k) elective deferral limit at `age`; ages in the super catch-up
    /// window get the larger catch-up instead of the regular one.
    pub fn elective_deferral_limit(
        &self,
        age: u32,
    ) -> Decimal {
        let limits = &self.constants.deductions;
        if (limits.super_catch_up_min_age..=limits.super_catch_up_max_age).contains(&age) {
            limits.elective_deferral_limit + limits.elective_deferral_super_catch_up
        } else if age >= limits.elective_deferral_catch_up_age {
            limits.elective_deferral_limit + limits.elective_deferral_catch_up
        } else {
            limits.elective_deferral_limit
        }
    }
}

/// Picks the larger deduction. Equal amounts keep the standard deduction.
pub fn select(
    standard: Decimal,
    itemized: Decimal,
) -> (DeductionChoice, Decimal) {
    if itemized > standard {
        (DeductionChoice::Itemized, itemized)
    } else {
        (DeductionChoice::Standard, max(standard, Decimal::ZERO))
    }
}

fn capped(
    line: &'static str,
    amount: Decimal,
    limit: Decimal,
) -> Decimal {
    if amount > limit {
        debug!(line, amount = %amount, limit = %limit, "Amount capped at limit");
        limit
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::fixtures::constants_2025;

    fn single(age: u32) -> PersonalInfo {
        PersonalInfo::new(FilingStatus::Single, age, "TX")
    }

    fn income_with_gross(gross: Decimal) -> AggregatedIncome {
        AggregatedIncome {
            wages: gross,
            ordinary_income: gross,
            gross_income: gross,
            ..AggregatedIncome::default()
        }
    }

    // =========================================================================
    // standard_deduction tests
    // =========================================================================

    #[test]
    fn standard_deduction_base_amount() {
        let constants = constants_2025();
        let resolver = DeductionResolver::new(&constants);

        assert_eq!(resolver.standard_deduction(&single(30)), dec!(15000));
    }

    #[test]
    fn standard_deduction_counts_each_condition() {
        let constants = constants_2025();
        let resolver = DeductionResolver::new(&constants);
        let mut personal = single(67);
        personal.blind = true;

        assert_eq!(resolver.standard_deduction(&personal), dec!(19000));
    }

    #[test]
    fn standard_deduction_joint_includes_spouse() {
        let constants = constants_2025();
        let resolver = DeductionResolver::new(&constants);
        let mut personal = PersonalInfo::new(FilingStatus::MarriedFilingJointly, 66, "TX");
        personal.spouse_age = Some(65);

        assert_eq!(resolver.standard_deduction(&personal), dec!(33200));
    }

    // =========================================================================
    // itemized tests
    // =========================================================================

    #[test]
    fn itemized_caps_salt() {
        let constants = constants_2025();
        let inputs = ItemizedInputs {
            state_local_income_tax: dec!(9000),
            property_tax: dec!(7000),
            ..ItemizedInputs::default()
        };

        let result = DeductionResolver::new(&constants).itemized(&inputs, dec!(200000));

        assert_eq!(result.salt, dec!(10000));
        assert_eq!(result.total, dec!(10000));
    }

    #[test]
    fn itemized_prorates_mortgage_interest_over_debt_limit() {
        let constants = constants_2025();
        let inputs = ItemizedInputs {
            mortgage_interest: dec!(40000),
            mortgage_debt: dec!(1000000),
            ..ItemizedInputs::default()
        };

        let result = DeductionResolver::new(&constants).itemized(&inputs, dec!(300000));

        assert_eq!(result.mortgage_interest, dec!(30000));
    }

    #[test]
    fn itemized_medical_only_above_agi_floor() {
        let constants = constants_2025();
        let inputs = ItemizedInputs {
            medical_expenses: dec!(10000),
            ..ItemizedInputs::default()
        };
        let resolver = DeductionResolver::new(&constants);

        assert_eq!(resolver.itemized(&inputs, dec!(100000)).medical, dec!(2500));
        assert_eq!(resolver.itemized(&inputs, dec!(200000)).medical, dec!(0));
    }

    #[test]
    fn itemized_sums_all_lines() {
        let constants = constants_2025();
        let inputs = ItemizedInputs {
            state_local_income_tax: dec!(4000),
            property_tax: dec!(3000),
            mortgage_interest: dec!(12000),
            mortgage_debt: dec!(400000),
            mortgage_insurance: dec!(600),
            charitable_cash: dec!(2000),
            charitable_noncash: dec!(500),
            medical_expenses: dec!(0),
            casualty_losses: dec!(1000),
        };

        let result = DeductionResolver::new(&constants).itemized(&inputs, dec!(150000));

        assert_eq!(result.charitable, dec!(2500));
        assert_eq!(result.total, dec!(23100));
    }

    // =========================================================================
    // select tests
    // =========================================================================

    #[test]
    fn select_prefers_larger_itemized() {
        assert_eq!(
            select(dec!(15000), dec!(15000.01)),
            (DeductionChoice::Itemized, dec!(15000.01))
        );
    }

    #[test]
    fn select_tie_goes_to_standard() {
        assert_eq!(
            select(dec!(15000), dec!(15000)),
            (DeductionChoice::Standard, dec!(15000))
        );
    }

    // =========================================================================
    // above_the_line tests
    // =========================================================================

    #[test]
    fn above_the_line_caps_ira_with_catch_up() {
        let constants = constants_2025();
        let inputs = AboveTheLineInputs {
            ira: dec!(9000),
            ..AboveTheLineInputs::default()
        };
        let resolver = DeductionResolver::new(&constants);

        let young = resolver.above_the_line(&single(35), &inputs, &income_with_gross(dec!(60000)), dec!(0));
        let older = resolver.above_the_line(&single(52), &inputs, &income_with_gross(dec!(60000)), dec!(0));

        assert_eq!(young.ira, dec!(7000));
        assert_eq!(older.ira, dec!(8000));
    }

    #[test]
    fn above_the_line_phases_out_ira_with_employer_plan() {
        let constants = constants_2025();
        let inputs = AboveTheLineInputs {
            ira: dec!(7000),
            ..AboveTheLineInputs::default()
        };
        let mut personal = single(35);
        personal.employer_plan = true;

        let result = DeductionResolver::new(&constants).above_the_line(
            &personal,
            &inputs,
            &income_with_gross(dec!(84000)),
            dec!(0),
        );

        assert_eq!(result.ira, dec!(3500));
    }

    #[test]
    fn above_the_line_hsa_room_reduced_by_employer() {
        let constants = constants_2025();
        let inputs = AboveTheLineInputs {
            hsa: dec!(4300),
            ..AboveTheLineInputs::default()
        };
        let income = AggregatedIncome {
            employer_hsa: dec!(1000),
            ..income_with_gross(dec!(70000))
        };

        let result =
            DeductionResolver::new(&constants).above_the_line(&single(40), &inputs, &income, dec!(0));

        assert_eq!(result.hsa, dec!(3300));
    }

    #[test]
    fn above_the_line_student_loan_unavailable_when_married_separate() {
        let constants = constants_2025();
        let inputs = AboveTheLineInputs {
            student_loan_interest: dec!(2000),
            ..AboveTheLineInputs::default()
        };
        let personal = PersonalInfo::new(FilingStatus::MarriedFilingSeparately, 30, "TX");

        let result = DeductionResolver::new(&constants).above_the_line(
            &personal,
            &inputs,
            &income_with_gross(dec!(40000)),
            dec!(0),
        );

        assert_eq!(result.student_loan_interest, dec!(0));
    }

    #[test]
    fn above_the_line_student_loan_partially_phased_out() {
        let constants = constants_2025();
        let inputs = AboveTheLineInputs {
            student_loan_interest: dec!(3000),
            ..AboveTheLineInputs::default()
        };

        let result = DeductionResolver::new(&constants).above_the_line(
            &single(30),
            &inputs,
            &income_with_gross(dec!(90000)),
            dec!(0),
        );

        // capped at 2,500, then one third phased out
        assert_eq!(result.student_loan_interest, dec!(1666.67));
    }

    #[test]
    fn above_the_line_educator_only_when_educator() {
        let constants = constants_2025();
        let inputs = AboveTheLineInputs {
            educator_expenses: dec!(450),
            ..AboveTheLineInputs::default()
        };
        let resolver = DeductionResolver::new(&constants);
        let mut educator_filer = single(40);
        educator_filer.educator = true;

        let income = income_with_gross(dec!(55000));
        assert_eq!(
            resolver.above_the_line(&educator_filer, &inputs, &income, dec!(0)).educator_expenses,
            dec!(300)
        );
        assert_eq!(
            resolver.above_the_line(&single(40), &inputs, &income, dec!(0)).educator_expenses,
            dec!(0)
        );
    }

    #[test]
    fn above_the_line_includes_half_se_tax_once() {
        let constants = constants_2025();
        let inputs = AboveTheLineInputs {
            se_health_insurance: dec!(6000),
            ..AboveTheLineInputs::default()
        };
        let income = AggregatedIncome {
            se_net_income: dec!(5000),
            ..income_with_gross(dec!(5000))
        };

        let result =
            DeductionResolver::new(&constants).above_the_line(&single(40), &inputs, &income, dec!(353.26));

        assert_eq!(result.half_se_tax, dec!(353.26));
        assert_eq!(result.se_health_insurance, dec!(5000));
        assert_eq!(result.total, dec!(5353.26));
    }

    // =========================================================================
    // qbi_deduction tests
    // =========================================================================

    #[test]
    fn qbi_deduction_below_threshold() {
        let constants = constants_2025();
        let result = DeductionResolver::new(&constants).qbi_deduction(
            FilingStatus::Single,
            dec!(90000),
            dec!(70000),
        );

        assert_eq!(result, dec!(14000));
    }

    #[test]
    fn qbi_deduction_hard_cutoff_above_threshold() {
        let constants = constants_2025();
        let result = DeductionResolver::new(&constants).qbi_deduction(
            FilingStatus::Single,
            dec!(250000),
            dec!(197300.01),
        );

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn qbi_deduction_zero_without_business_income() {
        let constants = constants_2025();
        let result = DeductionResolver::new(&constants).qbi_deduction(
            FilingStatus::MarriedFilingJointly,
            dec!(0),
            dec!(100000),
        );

        assert_eq!(result, dec!(0));
    }

    // =========================================================================
    // contribution limit tests
    // =========================================================================

    #[test]
    fn elective_deferral_limit_by_age() {
        let constants = constants_2025();
        let resolver = DeductionResolver::new(&constants);

        assert_eq!(resolver.elective_deferral_limit(45), dec!(23500));
        assert_eq!(resolver.elective_deferral_limit(55), dec!(31000));
        assert_eq!(resolver.elective_deferral_limit(61), dec!(34750));
        assert_eq!(resolver.elective_deferral_limit(64), dec!(31000));
    }

    #[test]
    fn hsa_limit_family_with_catch_up() {
        let constants = constants_2025();
        let mut personal = single(56);
        personal.hsa_family_coverage = true;

        assert_eq!(
            DeductionResolver::new(&constants).hsa_limit(&personal),
            dec!(9550)
        );
    }

    // =========================================================================
    // resolve tests
    // =========================================================================

    #[test]
    fn resolve_uses_itemized_when_larger() {
        let constants = constants_2025();
        let inputs = DeductionInputs {
            itemized: ItemizedInputs {
                state_local_income_tax: dec!(12000),
                mortgage_interest: dec!(9000),
                ..ItemizedInputs::default()
            },
            ..DeductionInputs::default()
        };

        let profile = DeductionResolver::new(&constants).resolve(
            &single(40),
            &inputs,
            &income_with_gross(dec!(150000)),
            dec!(0),
        );

        assert_eq!(profile.agi, dec!(150000));
        assert_eq!(profile.choice, DeductionChoice::Itemized);
        assert_eq!(profile.applied, dec!(19000));
    }

    #[test]
    fn resolve_floors_agi_at_zero() {
        let constants = constants_2025();
        let inputs = DeductionInputs {
            above_the_line: AboveTheLineInputs {
                alimony_paid: dec!(5000),
                ..AboveTheLineInputs::default()
            },
            ..DeductionInputs::default()
        };

        let profile = DeductionResolver::new(&constants).resolve(
            &single(40),
            &inputs,
            &income_with_gross(dec!(2000)),
            dec!(0),
        );

        assert_eq!(profile.agi, dec!(0));
        assert_eq!(profile.choice, DeductionChoice::Standard);
    }
}
