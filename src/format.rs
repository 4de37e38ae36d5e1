use crate::{config::LedgerConfig, totals::LedgerTotals};
use rust_decimal::{Decimal, RoundingStrategy};

/// Render an amount for display, e.g. `৳12,345.5`.
///
/// The amount is rounded to the configured precision and trailing zeros are dropped.
/// Digits before the decimal point are grouped in threes.
pub fn format_amount(amount: Decimal, config: &LedgerConfig) -> String {
    let rounded = amount
        .round_dp_with_strategy(
            config.display_precision(),
            RoundingStrategy::MidpointAwayFromZero,
        )
        .normalize();

    let digits = rounded.abs().to_string();
    let (whole, fraction) = match digits.find('.') {
        Some(i) => (&digits[..i], Some(&digits[i + 1..])),
        None => (&digits[..], None),
    };

    let mut out = String::with_capacity(digits.len() + 8);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(config.currency_symbol());
    out.push_str(&group_thousands(whole));
    if let Some(f) = fraction {
        out.push('.');
        out.push_str(f);
    }

    out
}

/// Labelled dashboard lines for a set of totals
pub fn summary_lines(totals: &LedgerTotals, config: &LedgerConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Gross Earnings", format_amount(totals.earnings, config)),
        ("Total Collections", format_amount(totals.collections, config)),
        ("Total Costs", format_amount(totals.expense_total, config)),
        ("Take-Home Profit", format_amount(totals.net_profit, config)),
    ]
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);

    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_amount_grouping() {
        let config = LedgerConfig::default();
        assert_eq!(format_amount(dec!(0), &config), "৳0");
        assert_eq!(format_amount(dec!(999), &config), "৳999");
        assert_eq!(format_amount(dec!(1000), &config), "৳1,000");
        assert_eq!(format_amount(dec!(1234567.5), &config), "৳1,234,567.5");
    }

    #[test]
    fn format_amount_rounding() {
        let config = LedgerConfig::default();
        assert_eq!(format_amount(dec!(10.005), &config), "৳10.01");
        assert_eq!(format_amount(dec!(10.004), &config), "৳10");
        assert_eq!(format_amount(dec!(80.00), &config), "৳80");
    }

    #[test]
    fn format_amount_negative() {
        let config = LedgerConfig::default();
        assert_eq!(format_amount(dec!(-1200), &config), "-৳1,200");
        assert_eq!(format_amount(dec!(-0.001), &config), "৳0");
    }

    #[test]
    fn format_amount_custom_symbol() {
        let mut config = LedgerConfig::default();
        config.with_currency_symbol("BDT ").with_display_precision(0);
        assert_eq!(format_amount(dec!(1520.6), &config), "BDT 1,521");
    }

    #[test]
    fn summary_lines_labels() {
        let totals = LedgerTotals {
            earnings: dec!(120),
            collections: dec!(500),
            expense_total: dec!(40),
            net_profit: dec!(80),
        };
        let lines = summary_lines(&totals, &LedgerConfig::default());

        assert_eq!(
            lines,
            vec![
                ("Gross Earnings", "৳120".to_string()),
                ("Total Collections", "৳500".to_string()),
                ("Total Costs", "৳40".to_string()),
                ("Take-Home Profit", "৳80".to_string()),
            ]
        );
    }
}
