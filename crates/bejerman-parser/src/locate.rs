//! Tolerant field locators
//!
//! Real exports are not reliably aligned, so the date is searched across the
//! whole line and amounts are searched inside their slice after removing the
//! padding whitespace.

use once_cell::sync::OnceCell;
use regex::Regex;
use rust_decimal::Decimal;

use crate::numeric::parse_amount;

/// Find the first date-shaped token anywhere in `line`.
///
/// `d/m/y` or `d-m-y` with a 1-2 digit day and month and a 2-4 digit year.
pub fn find_date(line: &str) -> Option<&str> {
    static DATE_PATTERN: OnceCell<Regex> = OnceCell::new();
    let date_regex = DATE_PATTERN
        .get_or_init(|| Regex::new(r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b").expect("valid date pattern"));

    date_regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Find the first amount token in a slice's text, ignoring whitespace.
///
/// Returns zero when no token is found.
pub fn find_amount(slice_text: &str) -> Decimal {
    // optional sign, digits with thousands dots, comma and two decimals
    static AMOUNT_PATTERN: OnceCell<Regex> = OnceCell::new();
    let amount_regex =
        AMOUNT_PATTERN.get_or_init(|| Regex::new(r"-?\d[\d.]*,\d{2}").expect("valid amount pattern"));

    let compact: String = slice_text.chars().filter(|c| !c.is_whitespace()).collect();
    amount_regex
        .find(&compact)
        .map(|m| parse_amount(m.as_str()))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_date_anywhere() {
        assert_eq!(find_date("ACME     01/02/23   venta"), Some("01/02/23"));
        assert_eq!(find_date("x 5-6-2024 y"), Some("5-6-2024"));
        assert_eq!(find_date("31/12/2023"), Some("31/12/2023"));
    }

    #[test]
    fn test_find_date_first_match_wins() {
        assert_eq!(find_date("a 01/01/2024 b 02/02/2024"), Some("01/01/2024"));
    }

    #[test]
    fn test_find_date_requires_word_boundaries() {
        assert_eq!(find_date("123/01/2024"), None);
        assert_eq!(find_date("01/01/20245"), None);
        assert_eq!(find_date("no date here 1.500,00"), None);
        assert_eq!(find_date("2024-01-15"), None);
    }

    #[test]
    fn test_find_amount_in_padded_slice() {
        assert_eq!(find_amount("      1.500,00     "), Decimal::new(150000, 2));
        assert_eq!(find_amount("  1. 500 ,00"), Decimal::new(150000, 2));
        assert_eq!(find_amount("   -12,00"), Decimal::new(-1200, 2));
    }

    #[test]
    fn test_find_amount_requires_two_decimals() {
        assert_eq!(find_amount("1500"), Decimal::ZERO);
        assert_eq!(find_amount("1.500,0"), Decimal::ZERO);
        assert_eq!(find_amount(""), Decimal::ZERO);
        // extra digits after the second decimal are left out of the token
        assert_eq!(find_amount("1.500,005"), Decimal::new(150000, 2));
    }

    #[test]
    fn test_find_amount_skips_leading_noise() {
        assert_eq!(find_amount("ARS 250,75"), Decimal::new(25075, 2));
    }
}
