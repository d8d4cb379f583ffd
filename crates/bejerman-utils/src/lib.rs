//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};
use unicode_normalization::UnicodeNormalization;

/// Default maximum length of a sanitized filename part
pub const MAX_LABEL_LENGTH: usize = 60;

/// Fallback used when a label sanitizes to nothing
pub const DEFAULT_LABEL: &str = "empresa";

/// Format an integer part with `.` as thousands separator
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;
    for c in s.chars().rev() {
        if count == 3 {
            result.push('.');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format an amount as `-1.234,56`, rounded to two decimals
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };

    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{}{},{}", sign, format_number(int_part), frac_part)
}

/// Turn an arbitrary label into a filename-safe identifier.
///
/// Accents are stripped to their ASCII base letter, everything outside
/// `[A-Za-z0-9 _-]` is removed, space runs become `_`, surrounding `_` are
/// trimmed and the result is cut to `max_len`. Falls back to `fallback`
/// when nothing is left.
pub fn sanitize_filename_part(label: &str, max_len: usize, fallback: &str) -> String {
    let ascii: String = label
        .trim()
        .nfkd()
        .filter(|c| c.is_ascii())
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    let joined = ascii
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let mut slug = joined.trim_matches('_').to_string();
    slug.truncate(max_len);

    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// [`sanitize_filename_part`] with the default length and fallback
pub fn sanitize(label: &str) -> String {
    sanitize_filename_part(label, MAX_LABEL_LENGTH, DEFAULT_LABEL)
}
