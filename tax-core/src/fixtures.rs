//! 2025 constant tables for unit tests.
//!
//! These mirror `tax-data/data/2025`; the tax-data integration tests check
//! the shipped tables against the same values.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::*;

fn by_status<T: Clone>(
    single: T,
    married_joint: T,
    married_separate: T,
    head_of_household: T,
) -> ByFilingStatus<T> {
    ByFilingStatus {
        single,
        married_joint,
        married_separate,
        head_of_household,
    }
}

fn phaseout(
    start: Decimal,
    end: Decimal,
) -> Phaseout {
    Phaseout { start, end }
}

fn tiers(rows: &[(Decimal, Decimal)]) -> Vec<SaversTier> {
    rows.iter()
        .map(|&(agi_max, rate)| SaversTier { agi_max, rate })
        .collect()
}

pub(crate) fn ordinary_single() -> Vec<TaxBracket> {
    TaxBracket::schedule(&[
        (Some(dec!(11925)), dec!(0.10)),
        (Some(dec!(48475)), dec!(0.12)),
        (Some(dec!(103350)), dec!(0.22)),
        (Some(dec!(197300)), dec!(0.24)),
        (Some(dec!(250525)), dec!(0.32)),
        (Some(dec!(626350)), dec!(0.35)),
        (None, dec!(0.37)),
    ])
}

pub(crate) fn ordinary_married_joint() -> Vec<TaxBracket> {
    TaxBracket::schedule(&[
        (Some(dec!(23850)), dec!(0.10)),
        (Some(dec!(96950)), dec!(0.12)),
        (Some(dec!(206700)), dec!(0.22)),
        (Some(dec!(394600)), dec!(0.24)),
        (Some(dec!(501050)), dec!(0.32)),
        (Some(dec!(751600)), dec!(0.35)),
        (None, dec!(0.37)),
    ])
}

fn ordinary_married_separate() -> Vec<TaxBracket> {
    TaxBracket::schedule(&[
        (Some(dec!(11925)), dec!(0.10)),
        (Some(dec!(48475)), dec!(0.12)),
        (Some(dec!(103350)), dec!(0.22)),
        (Some(dec!(197300)), dec!(0.24)),
        (Some(dec!(250525)), dec!(0.32)),
        (Some(dec!(375800)), dec!(0.35)),
        (None, dec!(0.37)),
    ])
}

fn ordinary_head_of_household() -> Vec<TaxBracket> {
    TaxBracket::schedule(&[
        (Some(dec!(17000)), dec!(0.10)),
        (Some(dec!(64850)), dec!(0.12)),
        (Some(dec!(103350)), dec!(0.22)),
        (Some(dec!(197300)), dec!(0.24)),
        (Some(dec!(250500)), dec!(0.32)),
        (Some(dec!(626350)), dec!(0.35)),
        (None, dec!(0.37)),
    ])
}

fn preferential(
    zero_top: Decimal,
    fifteen_top: Decimal,
) -> Vec<TaxBracket> {
    TaxBracket::schedule(&[
        (Some(zero_top), dec!(0.00)),
        (Some(fifteen_top), dec!(0.15)),
        (None, dec!(0.20)),
    ])
}

pub(crate) fn constants_2025() -> TaxYearConstants {
    let state_rates: BTreeMap<String, Decimal> = [
        ("AK", dec!(0)),
        ("CA", dec!(0.133)),
        ("FL", dec!(0)),
        ("IL", dec!(0.0495)),
        ("NY", dec!(0.109)),
        ("TX", dec!(0)),
        ("WA", dec!(0)),
    ]
    .into_iter()
    .map(|(code, rate)| (code.to_string(), rate))
    .collect();

    TaxYearConstants {
        tax_year: 2025,
        ordinary_brackets: by_status(
            ordinary_single(),
            ordinary_married_joint(),
            ordinary_married_separate(),
            ordinary_head_of_household(),
        ),
        preferential_brackets: by_status(
            preferential(dec!(48350), dec!(533400)),
            preferential(dec!(96700), dec!(600050)),
            preferential(dec!(48350), dec!(300000)),
            preferential(dec!(64750), dec!(566700)),
        ),
        standard_deduction: by_status(dec!(15000), dec!(30000), dec!(15000), dec!(22500)),
        additional_standard_deduction: by_status(dec!(2000), dec!(1600), dec!(1600), dec!(2000)),
        capital_loss_limit: dec!(3000),
        social_security_inclusion_rate: dec!(0.85),
        payroll: PayrollConstants {
            ss_wage_base: dec!(176100),
            ss_rate_employee: dec!(0.062),
            medicare_rate_employee: dec!(0.0145),
            ss_rate_self: dec!(0.124),
            medicare_rate_self: dec!(0.029),
            net_earnings_factor: dec!(0.9235),
            se_deduction_factor: dec!(0.50),
            additional_medicare_rate: dec!(0.009),
            additional_medicare_threshold: by_status(
                dec!(200000),
                dec!(250000),
                dec!(125000),
                dec!(200000),
            ),
        },
        niit: NiitConstants {
            rate: dec!(0.038),
            threshold: by_status(dec!(200000), dec!(250000), dec!(125000), dec!(200000)),
        },
        amt: AmtConstants {
            exemption: by_status(dec!(88100), dec!(137000), dec!(68500), dec!(88100)),
            phaseout_start: by_status(
                dec!(626350),
                dec!(1252700),
                dec!(626350),
                dec!(626350),
            ),
            phaseout_rate: dec!(0.25),
            brackets: TaxBracket::schedule(&[
                (Some(dec!(232600)), dec!(0.26)),
                (None, dec!(0.28)),
            ]),
        },
        deductions: DeductionLimits {
            salt_cap: dec!(10000),
            mortgage_debt_limit: dec!(750000),
            medical_agi_floor_rate: dec!(0.075),
            qbi_rate: dec!(0.20),
            qbi_threshold: by_status(dec!(197300), dec!(394600), dec!(197300), dec!(197300)),
            home_office_rate_per_sqft: dec!(5),
            home_office_max_sqft: dec!(300),
            educator_expense_max: dec!(300),
            student_loan_interest_max: dec!(2500),
            student_loan_phaseout: by_status(
                phaseout(dec!(85000), dec!(100000)),
                phaseout(dec!(145000), dec!(175000)),
                phaseout(dec!(0), dec!(0)),
                phaseout(dec!(85000), dec!(100000)),
            ),
            ira_limit: dec!(7000),
            ira_catch_up: dec!(1000),
            ira_catch_up_age: 50,
            ira_phaseout: by_status(
                phaseout(dec!(79000), dec!(89000)),
                phaseout(dec!(126000), dec!(146000)),
                phaseout(dec!(0), dec!(10000)),
                phaseout(dec!(79000), dec!(89000)),
            ),
            hsa_self_only_limit: dec!(4300),
            hsa_family_limit: dec!(8550),
            hsa_catch_up: dec!(1000),
            hsa_catch_up_age: 55,
            elective_deferral_limit: dec!(23500),
            elective_deferral_catch_up: dec!(7500),
            elective_deferral_catch_up_age: 50,
            elective_deferral_super_catch_up: dec!(11250),
            super_catch_up_min_age: 60,
            super_catch_up_max_age: 63,
        },
        credits: CreditLimits {
            child_tax_credit: ChildTaxCreditLimits {
                per_child: dec!(2000),
                per_other_dependent: dec!(500),
                refundable_per_child: dec!(1700),
                qualifying_child_max_age: 16,
                phaseout_start: by_status(
                    dec!(200000),
                    dec!(400000),
                    dec!(200000),
                    dec!(200000),
                ),
                phaseout_step: dec!(1000),
                phaseout_per_step: dec!(50),
            },
            dependent_care: DependentCareLimits {
                one_person_expense_cap: dec!(3000),
                two_or_more_expense_cap: dec!(6000),
                max_rate: dec!(0.35),
                min_rate: dec!(0.20),
                rate_agi_floor: dec!(15000),
                rate_step: dec!(2000),
                rate_step_reduction: dec!(0.01),
                qualifying_max_age: 12,
            },
            education: EducationLimits {
                aotc_full_expenses: dec!(2000),
                aotc_partial_expenses: dec!(2000),
                aotc_partial_rate: dec!(0.25),
                aotc_max_years: 4,
                llc_rate: dec!(0.20),
                llc_max_expenses: dec!(10000),
                phaseout: by_status(
                    phaseout(dec!(80000), dec!(90000)),
                    phaseout(dec!(160000), dec!(180000)),
                    phaseout(dec!(80000), dec!(90000)),
                    phaseout(dec!(80000), dec!(90000)),
                ),
            },
            energy: EnergyLimits {
                home_improvement_rate: dec!(0.30),
                home_improvement_cap: dec!(3200),
                clean_vehicle_rate: dec!(0.10),
                clean_vehicle_cap: dec!(7500),
                clean_energy_rate: dec!(0.30),
            },
            savers: SaversLimits {
                contribution_cap: dec!(2000),
                tiers: by_status(
                    tiers(&[
                        (dec!(23750), dec!(0.50)),
                        (dec!(25500), dec!(0.20)),
                        (dec!(39375), dec!(0.10)),
                    ]),
                    tiers(&[
                        (dec!(47500), dec!(0.50)),
                        (dec!(51000), dec!(0.20)),
                        (dec!(78750), dec!(0.10)),
                    ]),
                    tiers(&[
                        (dec!(23750), dec!(0.50)),
                        (dec!(25500), dec!(0.20)),
                        (dec!(39375), dec!(0.10)),
                    ]),
                    tiers(&[
                        (dec!(35625), dec!(0.50)),
                        (dec!(38250), dec!(0.20)),
                        (dec!(59062), dec!(0.10)),
                    ]),
                ),
            },
            eitc: EitcLimits {
                max_credit: vec![dec!(649), dec!(4328), dec!(7152), dec!(8046)],
                income_limit: by_status(
                    vec![dec!(19104), dec!(50434), dec!(57310), dec!(61555)],
                    vec![dec!(26214), dec!(57554), dec!(64430), dec!(68675)],
                    vec![dec!(19104), dec!(50434), dec!(57310), dec!(61555)],
                    vec![dec!(19104), dec!(50434), dec!(57310), dec!(61555)],
                ),
            },
        },
        state: StateTaxTable {
            default_rate: dec!(0.05),
            rates: state_rates,
        },
    }
}
