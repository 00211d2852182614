//! Rendering estimates for the terminal or as JSON.

use std::fmt::Write;

use clap::ValueEnum;
use rust_decimal::Decimal;
use tax_core::{DeductionChoice, HomeOfficeMethod, TaxResult};

use crate::app::Estimate;
use crate::utils::{format_delta, format_money, format_rate};

const LABEL_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders one estimate as a detailed summary, or several side by side.
pub fn render(
    estimates: &[Estimate],
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match (format, estimates) {
        (OutputFormat::Json, [single]) => serde_json::to_string_pretty(single),
        (OutputFormat::Json, _) => serde_json::to_string_pretty(estimates),
        (OutputFormat::Text, [single]) => Ok(summary(single)),
        (OutputFormat::Text, _) => Ok(comparison(estimates)),
    }
}

fn line(
    out: &mut String,
    label: &str,
    value: impl AsRef<str>,
) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}", value.as_ref());
}

fn money_line(
    out: &mut String,
    label: &str,
    value: Decimal,
) {
    line(out, label, format_money(value));
}

/// Like [`money_line`] but omitted when zero.
fn optional_line(
    out: &mut String,
    label: &str,
    value: Decimal,
) {
    if !value.is_zero() {
        money_line(out, label, value);
    }
}

pub fn summary(estimate: &Estimate) -> String {
    let r = &estimate.result;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({}, {})",
        estimate.label,
        r.tax_year,
        r.filing_status.label()
    );

    let _ = writeln!(out, "Income");
    money_line(&mut out, "Gross income", r.income.gross_income);
    optional_line(&mut out, "  Wages", r.income.wages);
    optional_line(&mut out, "  Self-employment (net)", r.income.se_net_income);
    optional_line(&mut out, "  Preferential income", r.income.preferential_income);
    if r.income.capital_loss_carryforward < Decimal::ZERO {
        money_line(&mut out, "  Loss carryforward", r.income.capital_loss_carryforward);
    }
    if r.income.home_office_method != HomeOfficeMethod::None {
        let method = match r.income.home_office_method {
            HomeOfficeMethod::Simplified => "simplified",
            HomeOfficeMethod::Regular => "regular",
            HomeOfficeMethod::None => "none",
        };
        line(
            &mut out,
            &format!("  Home office ({method})"),
            format_money(r.income.home_office_deduction),
        );
    }

    let _ = writeln!(out, "Deductions");
    optional_line(&mut out, "Adjustments", r.deductions.above_the_line.total);
    money_line(&mut out, "Adjusted gross income", r.agi);
    let choice = match r.deductions.choice {
        DeductionChoice::Standard => "Standard deduction",
        DeductionChoice::Itemized => "Itemized deductions",
    };
    money_line(&mut out, choice, r.deductions.applied);
    optional_line(&mut out, "QBI deduction", r.deductions.qbi);
    money_line(&mut out, "Taxable income", r.taxable_income);

    let _ = writeln!(out, "Federal");
    money_line(&mut out, "Ordinary tax", r.ordinary_tax);
    if r.capital_gains_breakdown.is_empty() {
        optional_line(&mut out, "Capital gains tax", r.capital_gains_tax);
    } else {
        money_line(&mut out, "Capital gains tax", r.capital_gains_tax);
        for slice in &r.capital_gains_breakdown {
            line(
                &mut out,
                &format!(
                    "  {} at {}",
                    format_money(slice.amount),
                    format_rate(slice.rate)
                ),
                format_money(slice.tax),
            );
        }
    }
    optional_line(&mut out, "Alternative minimum tax", r.amt);
    for (kind, credit) in r.credits.iter() {
        money_line(&mut out, &format!("  {}", kind.label()), -credit.amount);
    }
    money_line(&mut out, "Federal income tax", r.federal_tax);
    optional_line(&mut out, "Net investment income tax", r.niit);

    let _ = writeln!(out, "Payroll and state");
    money_line(&mut out, "FICA", r.fica.total);
    optional_line(&mut out, "Self-employment tax", r.self_employment.total);
    line(
        &mut out,
        &format!("State tax ({})", format_rate(r.state_rate)),
        format_money(r.state_tax),
    );

    let _ = writeln!(out, "Total");
    money_line(&mut out, "Total tax", r.total_tax);
    money_line(&mut out, "Payments", r.payments.total);
    balance_line(&mut out, r);
    line(&mut out, "Marginal rate", format_rate(r.marginal_rate));
    line(&mut out, "Effective rate", format_rate(r.effective_rate));

    out
}

fn balance_line(
    out: &mut String,
    r: &TaxResult,
) {
    if r.is_refund() {
        money_line(out, "Refund", -r.balance_due);
    } else {
        money_line(out, "Balance due", r.balance_due);
    }
}

/// Side-by-side "what-if" table; the first estimate is the baseline.
pub fn comparison(estimates: &[Estimate]) -> String {
    type Row = (&'static str, fn(&TaxResult) -> String);
    let rows: [Row; 13] = [
        ("Gross income", |r| format_money(r.income.gross_income)),
        ("Adjusted gross income", |r| format_money(r.agi)),
        ("Deduction", |r| format_money(r.deductions.applied)),
        ("Taxable income", |r| format_money(r.taxable_income)),
        ("Federal income tax", |r| format_money(r.federal_tax)),
        ("Net investment income tax", |r| format_money(r.niit)),
        ("FICA", |r| format_money(r.fica.total)),
        ("Self-employment tax", |r| format_money(r.self_employment.total)),
        ("State tax", |r| format_money(r.state_tax)),
        ("Total tax", |r| format_money(r.total_tax)),
        ("Payments", |r| format_money(r.payments.total)),
        ("Balance due", |r| format_money(r.balance_due)),
        ("Effective rate", |r| format_rate(r.effective_rate)),
    ];

    let mut out = String::new();
    let _ = write!(out, "{:<LABEL_WIDTH$}", "");
    for estimate in estimates {
        let _ = write!(out, "{:>VALUE_WIDTH$}", estimate.label);
    }
    let _ = writeln!(out);

    for (label, value) in rows {
        let _ = write!(out, "{label:<LABEL_WIDTH$}");
        for estimate in estimates {
            let _ = write!(out, "{:>VALUE_WIDTH$}", value(&estimate.result));
        }
        let _ = writeln!(out);
    }

    if let Some((base, rest)) = estimates.split_first() {
        let _ = write!(out, "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}", "Total tax vs first", "");
        for estimate in rest {
            let delta = estimate.result.total_tax - base.result.total_tax;
            let _ = write!(out, "{:>VALUE_WIDTH$}", format_delta(delta));
        }
        let _ = writeln!(out);
    }

    out
}
