//! Whole-document parsing

use serde::{Deserialize, Serialize};

use crate::dates::DateCoercion;
use crate::layout::RecordLayout;
use crate::record::{parse_line, FinancialRecord, RawRecord};

/// Line counts gathered while parsing one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub lines: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Accepted lines whose date text is not a calendar date
    pub undated: usize,
}

/// Parsed records of one document, in line order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedBatch {
    pub records: Vec<FinancialRecord>,
    pub stats: BatchStats,
}

/// Split text on every universal line terminator.
///
/// `\r\n` counts as one terminator and a trailing terminator does not add an
/// empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..idx]);
        let mut next_start = idx + c.len_utf8();
        if c == '\r' {
            if let Some(&(_, '\n')) = chars.peek() {
                chars.next();
                next_start += 1;
            }
        }
        start = next_start;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Parse every line of `content`, keep accepted ones in order and coerce
/// their dates. Unparseable dates become `None`; the record is kept.
pub fn parse_batch(
    content: &str,
    source: &str,
    layout: &RecordLayout,
    dates: &DateCoercion,
) -> ParsedBatch {
    let mut stats = BatchStats::default();

    let raw: Vec<RawRecord> = split_lines(content)
        .into_iter()
        .inspect(|_| stats.lines += 1)
        .filter_map(|line| parse_line(line, layout))
        .collect();

    stats.accepted = raw.len();
    stats.rejected = stats.lines - stats.accepted;

    let records: Vec<FinancialRecord> = raw
        .into_iter()
        .map(|r| {
            let date = dates.coerce(&r.date_text);
            if date.is_none() {
                stats.undated += 1;
                log::debug!("{}: date '{}' is not a calendar date", source, r.date_text);
            }
            FinancialRecord {
                company: r.company,
                account: r.account,
                date,
                description: r.description,
                credit: r.credit,
                debit: r.debit,
                source_file: source.to_string(),
            }
        })
        .collect();

    log::debug!(
        "{}: {} lines, {} accepted, {} rejected, {} without a valid date",
        source,
        stats.lines,
        stats.accepted,
        stats.rejected,
        stats.undated
    );

    ParsedBatch { records, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::build_line;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_split_lines_terminators() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\u{2028}b\x0cc"), vec!["a", "b", "c"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_parse_batch_keeps_order_and_tags_source() {
        let content = [
            build_line(&[(0, "ACME"), (100, "01/02/23"), (672, "1.500,00")]),
            build_line(&[(0, "no date"), (672, "9,99")]),
            build_line(&[(0, "BETA"), (100, "15/01/2023"), (695, "10,00")]),
        ]
        .join("\n");

        let batch = parse_batch(&content, "a.rec", &RecordLayout::default(), &DateCoercion::new(2024));
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].company, "ACME");
        assert_eq!(batch.records[0].date, NaiveDate::from_ymd_opt(2023, 2, 1));
        assert_eq!(batch.records[0].movement(), Decimal::new(150000, 2));
        assert_eq!(batch.records[1].company, "BETA");
        assert_eq!(batch.records[1].movement(), Decimal::new(-1000, 2));
        assert!(batch.records.iter().all(|r| r.source_file == "a.rec"));

        assert_eq!(batch.stats.lines, 3);
        assert_eq!(batch.stats.accepted, 2);
        assert_eq!(batch.stats.rejected, 1);
        assert_eq!(batch.stats.undated, 0);
    }

    #[test]
    fn test_bad_calendar_date_keeps_record() {
        let content = build_line(&[(0, "ACME"), (100, "31/02/2023"), (672, "1,00")]);
        let batch = parse_batch(&content, "a.rec", &RecordLayout::default(), &DateCoercion::new(2024));
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].date, None);
        assert_eq!(batch.stats.undated, 1);
    }

    #[test]
    fn test_empty_document() {
        let batch = parse_batch("", "empty.rec", &RecordLayout::default(), &DateCoercion::new(2024));
        assert!(batch.records.is_empty());
        assert_eq!(batch.stats, BatchStats::default());
    }
}
