//! VAT and total derived from an offer's base price.
//!
//! Amounts are [`Decimal`] and rounded to two places with
//! [`RoundingStrategy::MidpointAwayFromZero`], so `0.005` becomes `0.01`
//! and `-0.005` becomes `-0.01`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default VAT rate (19%)
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

/// Rounds to two decimal places, half away from zero
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Base price plus derived tax and total. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base: Decimal,
    pub rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn compute(base: Decimal, rate: Decimal) -> Self {
        let tax = round2(base * rate);
        let total = round2(base + tax);
        Self {
            base,
            rate,
            tax,
            total,
        }
    }

    /// Rate as a whole-number percentage label, e.g. `19%`
    pub fn rate_label(&self) -> String {
        format!("{}%", (self.rate * Decimal::ONE_HUNDRED).normalize())
    }
}

/// Formats an amount with thousands separators and two decimals: `1,783.81 EUR`
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = round2(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac} {currency}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn default_rate_is_nineteen_percent() {
        assert_eq!(DEFAULT_TAX_RATE, dec!(0.19));
    }

    #[test]
    fn compute_matches_reference_price() {
        let breakdown = PriceBreakdown::compute(dec!(1499.00), dec!(0.19));

        assert_eq!(breakdown.tax, dec!(284.81));
        assert_eq!(breakdown.total, dec!(1783.81));
    }

    #[test]
    fn total_is_base_plus_tax() {
        for base in [dec!(0), dec!(9.99), dec!(249.50), dec!(1299), dec!(4999.95)] {
            let breakdown = PriceBreakdown::compute(base, dec!(0.19));

            assert_eq!(breakdown.tax, round2(base * dec!(0.19)));
            assert_eq!(breakdown.total, breakdown.base + breakdown.tax);
        }
    }

    #[test]
    fn round2_rounds_midpoint_away_from_zero() {
        assert_eq!(round2(dec!(0.005)), dec!(0.01));
        assert_eq!(round2(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round2(dec!(1.234)), dec!(1.23));
    }

    #[test]
    fn tax_rounding_on_midpoint() {
        // 0.50 * 0.19 = 0.095
        let breakdown = PriceBreakdown::compute(dec!(0.50), dec!(0.19));

        assert_eq!(breakdown.tax, dec!(0.10));
        assert_eq!(breakdown.total, dec!(0.60));
    }

    #[test]
    fn zero_rate_has_no_tax() {
        let breakdown = PriceBreakdown::compute(dec!(100), Decimal::ZERO);

        assert_eq!(breakdown.tax, dec!(0));
        assert_eq!(breakdown.total, dec!(100));
    }

    #[test]
    fn rate_label() {
        assert_eq!(PriceBreakdown::compute(dec!(1), dec!(0.19)).rate_label(), "19%");
        assert_eq!(PriceBreakdown::compute(dec!(1), dec!(0.075)).rate_label(), "7.5%");
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(dec!(1783.81), "EUR"), "1,783.81 EUR");
        assert_eq!(format_money(dec!(1234567.8), "EUR"), "1,234,567.80 EUR");
        assert_eq!(format_money(dec!(999), "EUR"), "999.00 EUR");
        assert_eq!(format_money(dec!(-1500), "EUR"), "-1,500.00 EUR");
    }
}
