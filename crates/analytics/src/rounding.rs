use rust_decimal::prelude::*;

/// Rounds `value` to `dp` decimal places, half away from zero.
///
/// Goes through `Decimal` so the rounding acts on the decimal value the user
/// typed rather than on its binary approximation. Non-finite input is returned as is.
pub fn round_to(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// `part / whole * 100` rounded to `dp` places, or 0 for an empty whole.
pub fn percentage(part: usize, whole: usize, dp: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, dp)
}
