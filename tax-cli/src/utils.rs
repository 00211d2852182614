use rust_decimal::{Decimal, RoundingStrategy};

/// Inserts comma thousands separators into a run of digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a dollar amount as `$1,234.56`, with a leading minus for
/// negatives.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((&text, "00"));
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a rate such as `0.2235` as `22.35%`.
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.2}%")
}

/// Formats a change, always signed: `+$120.00`, `-$5.00`, `$0.00`.
pub fn format_delta(delta: Decimal) -> String {
    if delta > Decimal::ZERO {
        format!("+{}", format_money(delta))
    } else {
        format_money(delta)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_money(dec!(100000)), "$100,000.00");
        assert_eq!(format_money(dec!(999.5)), "$999.50");
    }

    #[test]
    fn format_money_small_and_zero() {
        assert_eq!(format_money(dec!(0)), "$0.00");
        assert_eq!(format_money(dec!(0.005)), "$0.01");
    }

    #[test]
    fn format_money_negative() {
        assert_eq!(format_money(dec!(-9022)), "-$9,022.00");
    }

    #[test]
    fn format_rate_as_percent() {
        assert_eq!(format_rate(dec!(0.1557)), "15.57%");
        assert_eq!(format_rate(dec!(0.37)), "37.00%");
        assert_eq!(format_rate(dec!(0)), "0.00%");
    }

    #[test]
    fn format_delta_signs() {
        assert_eq!(format_delta(dec!(120)), "+$120.00");
        assert_eq!(format_delta(dec!(-5)), "-$5.00");
        assert_eq!(format_delta(dec!(0)), "$0.00");
    }
}
