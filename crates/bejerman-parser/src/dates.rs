//! Day-first date coercion

use chrono::{Datelike, Local, NaiveDate};

/// Turns raw date tokens such as `01/02/23` into calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCoercion {
    /// Year around which two-digit years are expanded
    pub reference_year: i32,
}

impl Default for DateCoercion {
    fn default() -> Self {
        Self {
            reference_year: Local::now().year(),
        }
    }
}

impl DateCoercion {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Coerce `d/m/y` (or `d-m-y`) text, reading the first field as the day.
    ///
    /// When the second field cannot be a month but the first can, the two are
    /// swapped. Anything that is not a real calendar date yields `None`.
    pub fn coerce(&self, text: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = text.trim().split(['/', '-']).collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
            return None;
        }

        let first: u32 = parts[0].parse().ok()?;
        let second: u32 = parts[1].parse().ok()?;
        let year_raw: i32 = parts[2].parse().ok()?;

        let year = if parts[2].len() <= 2 {
            expand_two_digit_year(year_raw, self.reference_year)
        } else {
            year_raw
        };
        if !(EARLIEST_YEAR..=LATEST_YEAR).contains(&year) {
            return None;
        }

        let (day, month) = if second > 12 && first <= 12 {
            (second, first)
        } else {
            (first, second)
        };

        NaiveDate::from_ymd_opt(year, month, day).filter(|date| in_supported_range(*date))
    }
}

const EARLIEST_YEAR: i32 = 1677;
const LATEST_YEAR: i32 = 2262;

/// Dates between 1677-09-21 and 2262-04-11; anything outside is treated as
/// unparseable, like `01/01/999` or `01/01/0023`
fn in_supported_range(date: NaiveDate) -> bool {
    let earliest = NaiveDate::from_ymd_opt(EARLIEST_YEAR, 9, 21);
    let latest = NaiveDate::from_ymd_opt(LATEST_YEAR, 4, 11);
    matches!((earliest, latest), (Some(lo), Some(hi)) if lo <= date && date <= hi)
}

/// Place a two-digit year within fifty years of `reference_year`
pub fn expand_two_digit_year(year: i32, reference_year: i32) -> i32 {
    let century = reference_year / 100 * 100;
    let mut expanded = century + year;
    if expanded >= reference_year + 50 {
        expanded -= 100;
    } else if expanded < reference_year - 50 {
        expanded += 100;
    }
    expanded
}
