//! Single-line record parsing

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::layout::RecordLayout;
use crate::locate::{find_amount, find_date};
use crate::slice::slice_text;

/// A line accepted by [`parse_line`], with the date still as matched text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub company: String,
    pub account: String,
    pub date_text: String,
    pub description: String,
    pub credit: Decimal,
    pub debit: Decimal,
}

impl RawRecord {
    /// Net amount, credit minus debit
    pub fn movement(&self) -> Decimal {
        self.credit - self.debit
    }
}

/// A consolidated accounting movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub company: String,
    pub account: String,
    /// `None` when the matched date text is not a real calendar date
    pub date: Option<NaiveDate>,
    pub description: String,
    pub credit: Decimal,
    pub debit: Decimal,
    /// Identifier of the document the line came from
    pub source_file: String,
}

impl FinancialRecord {
    /// Net amount, credit minus debit
    pub fn movement(&self) -> Decimal {
        self.credit - self.debit
    }
}

/// Parse one raw line (without its terminator).
///
/// Returns `None` only when no date token exists anywhere in the line;
/// unreadable amounts become zero.
pub fn parse_line(line: &str, layout: &RecordLayout) -> Option<RawRecord> {
    let line = line.trim_end_matches(['\r', '\n']);

    let company = slice_text(line, layout.company).trim().to_string();
    let account = slice_text(line, layout.account).trim().to_string();
    let description = slice_text(line, layout.description).trim().to_string();

    let date_text = find_date(line)?.to_string();

    let credit = find_amount(&slice_text(line, layout.credit));
    let debit = find_amount(&slice_text(line, layout.debit));

    Some(RawRecord {
        company,
        account,
        date_text,
        description,
        credit,
        debit,
    })
}
