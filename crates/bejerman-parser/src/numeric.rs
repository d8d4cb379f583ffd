//! Locale numeric parsing ("1.234,56" notation)

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount written with `.` thousands and `,` decimals.
///
/// Total function: empty or malformed input yields zero.
pub fn parse_amount(s: &str) -> Decimal {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = compact
        .replace('.', "")  // thousands separators
        .replace(',', "."); // decimal separator

    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}
