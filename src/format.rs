use num_format::{Locale, ToFormattedString};

/// Placeholder for values that cannot be shown (NaN, infinities).
pub const PLACEHOLDER: &str = "—";

/// Render an amount as a whole-unit currency string, e.g. `¥1,234,568`.
///
/// The value is rounded to the nearest integer and thousands-grouped; the
/// sign goes in front of the symbol. Non-finite values and values beyond
/// `i128` render as [`PLACEHOLDER`].
pub fn format_currency(value: f64, symbol: &str) -> String {
    let Some(whole) = whole_units(value) else {
        return PLACEHOLDER.to_string();
    };
    let digits = whole.unsigned_abs().to_formatted_string(&Locale::en);
    if whole < 0 {
        format!("-{symbol}{digits}")
    } else {
        format!("{symbol}{digits}")
    }
}

// `as` saturates, so anything outside i128 is rejected instead of clamped.
fn whole_units(value: f64) -> Option<i128> {
    let whole = value.round();
    (whole.is_finite() && whole.abs() < i128::MAX as f64).then_some(whole as i128)
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{value:.1}%")
}

/// Quantities are usually whole; only show decimals when there are some.
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value.fract() == 0.0 {
        whole_units(value).map_or_else(
            || PLACEHOLDER.to_string(),
            |whole| whole.to_formatted_string(&Locale::en),
        )
    } else {
        format!("{value:.2}")
    }
}
