//! Decimal helpers shared by the tax, savings and forecast calculators, plus
//! coercion of free-text form fields into amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Rounds to cents, with exact half-cents going away from zero.
///
/// Every money figure the engine reports passes through here.
///
/// ```
/// use rust_decimal_macros::dec;
/// use plan_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(5426.004)), dec!(5426.00));
/// assert_eq!(round_half_up(dec!(4356.375)), dec!(4356.38));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Negative amounts become zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Restricts `value` to the inclusive range `[lower, upper]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use plan_core::calculations::common::clamp;
///
/// assert_eq!(clamp(dec!(120), dec!(0), dec!(100)), dec!(100));
/// assert_eq!(clamp(dec!(-3), dec!(0), dec!(100)), dec!(0));
/// ```
pub fn clamp(
    value: Decimal,
    lower: Decimal,
    upper: Decimal,
) -> Decimal {
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}

/// Clamps a percentage into `[0, 100]`.
pub fn clamp_percent(value: Decimal) -> Decimal {
    clamp(value, Decimal::ZERO, dec!(100))
}

/// Converts a whole percentage (6 = 6%) into a rate (0.06).
pub fn percent_to_rate(percent: Decimal) -> Decimal {
    percent / dec!(100)
}

/// Strips surrounding blanks, a leading `$` and thousands separators.
fn normalize_amount_input(s: &str) -> String {
    s.trim().trim_start_matches('$').replace(',', "")
}

/// Coerces a free-text form field into a non-negative amount.
///
/// Blank input is zero. Input that does not parse is logged and treated as
/// zero; negative amounts are treated as zero as well.
pub fn coerce_amount(s: &str) -> Decimal {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    match normalized.parse::<Decimal>() {
        Ok(value) => non_negative(value),
        Err(e) => {
            tracing::warn!(input = %s, "unparsable amount coerced to zero: {}", e);
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // rounding
    // =========================================================================

    #[test]
    fn round_half_up_keeps_cents_below_half() {
        assert_eq!(round_half_up(dec!(29042.504)), dec!(29042.50));
    }

    #[test]
    fn round_half_up_lifts_exact_half_cent() {
        assert_eq!(round_half_up(dec!(4356.375)), dec!(4356.38));
    }

    #[test]
    fn round_half_up_moves_negative_half_cent_away_from_zero() {
        assert_eq!(round_half_up(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn round_half_up_compounded_total() {
        assert_eq!(round_half_up(dec!(2327596.988499484)), dec!(2327596.99));
    }

    // =========================================================================
    // bounds
    // =========================================================================

    #[test]
    fn non_negative_floors_at_zero() {
        assert_eq!(non_negative(dec!(-250)), Decimal::ZERO);
        assert_eq!(non_negative(dec!(250)), dec!(250));
    }

    #[test]
    fn clamp_keeps_values_inside_range() {
        assert_eq!(clamp(dec!(42), dec!(0), dec!(45)), dec!(42));
    }

    #[test]
    fn clamp_percent_limits_both_ends() {
        assert_eq!(clamp_percent(dec!(140)), dec!(100));
        assert_eq!(clamp_percent(dec!(-1)), dec!(0));
    }

    // =========================================================================
    // coerce_amount
    // =========================================================================

    #[test]
    fn coerce_amount_accepts_thousands_separator() {
        assert_eq!(coerce_amount("1,250,000"), dec!(1250000));
        assert_eq!(coerce_amount("$600,000"), dec!(600000));
    }

    #[test]
    fn coerce_amount_blank_is_zero() {
        assert_eq!(coerce_amount(""), Decimal::ZERO);
        assert_eq!(coerce_amount("   "), Decimal::ZERO);
    }

    #[test]
    fn coerce_amount_unparsable_is_zero() {
        assert_eq!(coerce_amount("abc"), Decimal::ZERO);
    }

    #[test]
    fn coerce_amount_negative_is_zero() {
        assert_eq!(coerce_amount("-5"), Decimal::ZERO);
    }
}
