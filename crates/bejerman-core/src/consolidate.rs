//! Multi-document merge, dedupe and ordering

use bejerman_parser::{FinancialRecord, ParsedBatch, RecordParserTrait, TextEncoding};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};

/// Raw input handed over by the shell
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Identifier used as the records' source tag
    pub name: String,
    pub bytes: Vec<u8>,
    pub encoding: TextEncoding,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, encoding: TextEncoding) -> Self {
        Self {
            name: name.into(),
            bytes,
            encoding,
        }
    }
}

/// Per-document outcome shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub records: usize,
}

/// A parsed document, before consolidation
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub name: String,
    pub batch: ParsedBatch,
}

impl LoadedDocument {
    pub fn report(&self) -> FileReport {
        FileReport {
            file: self.name.clone(),
            records: self.batch.records.len(),
        }
    }
}

/// Decode and parse each document in order, keeping at most `max_documents`
pub fn load_documents(
    parser: &dyn RecordParserTrait,
    documents: &[SourceDocument],
    max_documents: usize,
) -> Vec<LoadedDocument> {
    if documents.len() > max_documents {
        log::warn!(
            "{} documents supplied, only the first {} will be processed",
            documents.len(),
            max_documents
        );
    }

    documents
        .iter()
        .take(max_documents)
        .map(|doc| {
            let batch = parser.parse_bytes(&doc.bytes, doc.encoding, &doc.name);
            if batch.records.is_empty() {
                log::warn!("{}: no valid records (decoded as {})", doc.name, doc.encoding);
            } else {
                log::info!("{}: {} records", doc.name, batch.records.len());
            }
            LoadedDocument {
                name: doc.name.clone(),
                batch,
            }
        })
        .collect()
}

/// Figures shown next to the consolidated table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationStats {
    /// Documents that contributed at least one record
    pub documents: usize,
    pub records: usize,
    pub unique_accounts: usize,
    pub duplicates_dropped: usize,
}

/// Deduplicated records sorted by date, account and description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedSet {
    records: Vec<FinancialRecord>,
    stats: ConsolidationStats,
}

impl ConsolidatedSet {
    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn stats(&self) -> &ConsolidationStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Account of the first record in consolidated order
    pub fn first_account(&self) -> Option<&str> {
        self.records.first().map(|r| r.account.trim())
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct DedupKey {
    source_file: String,
    company: String,
    account: String,
    date: Option<NaiveDate>,
    description: String,
    credit: Decimal,
    debit: Decimal,
    movement: Decimal,
}

impl From<&FinancialRecord> for DedupKey {
    fn from(r: &FinancialRecord) -> Self {
        Self {
            source_file: r.source_file.clone(),
            company: r.company.clone(),
            account: r.account.clone(),
            date: r.date,
            description: r.description.clone(),
            credit: r.credit,
            debit: r.debit,
            movement: r.movement(),
        }
    }
}

/// Merge documents in order, drop exact duplicates from the same source
/// (first occurrence wins) and sort.
///
/// Fails with [`CoreError::NoValidRecords`] when nothing was parsed.
pub fn consolidate(documents: Vec<LoadedDocument>) -> CoreResult<ConsolidatedSet> {
    if documents.is_empty() {
        return Err(CoreError::NoDocuments);
    }

    let document_count = documents.len();
    let contributing = documents.iter().filter(|d| !d.batch.records.is_empty()).count();
    let merged: Vec<FinancialRecord> = documents
        .into_iter()
        .flat_map(|d| d.batch.records)
        .collect();

    if merged.is_empty() {
        return Err(CoreError::NoValidRecords { documents: document_count });
    }

    let before = merged.len();
    let mut records = dedupe(merged);
    let duplicates_dropped = before - records.len();
    if duplicates_dropped > 0 {
        log::info!("Dropped {} duplicate records", duplicates_dropped);
    }

    sort_records(&mut records);

    let unique_accounts = records
        .iter()
        .map(|r| r.account.as_str())
        .collect::<HashSet<_>>()
        .len();

    let stats = ConsolidationStats {
        documents: contributing,
        records: records.len(),
        unique_accounts,
        duplicates_dropped,
    };
    log::info!(
        "Consolidated {} records from {} documents ({} accounts)",
        stats.records,
        stats.documents,
        stats.unique_accounts
    );

    Ok(ConsolidatedSet { records, stats })
}

/// Keep the first occurrence of every full-tuple duplicate, preserving order
pub fn dedupe(records: Vec<FinancialRecord>) -> Vec<FinancialRecord> {
    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(DedupKey::from(r)))
        .collect()
}

/// Stable sort by (date, account, description), missing dates last
pub fn sort_records(records: &mut [FinancialRecord]) {
    records.sort_by(|a, b| {
        compare_dates(a.date, b.date)
            .then_with(|| a.account.cmp(&b.account))
            .then_with(|| a.description.cmp(&b.description))
    });
}

fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{document, line, record};
    use bejerman_parser::DefaultRecordParser;

    fn parser() -> DefaultRecordParser {
        DefaultRecordParser::default().with_reference_year(2024)
    }

    #[test]
    fn test_load_documents_reports_counts() {
        let docs = vec![
            document("a.rec", &[line("ACME", "01/02/23", "1", "x", "1.500,00", ""), "sin fecha".to_string()]),
            document("b.rec", &["nada".to_string()]),
        ];
        let loaded = load_documents(&parser(), &docs, 3);
        let reports: Vec<FileReport> = loaded.iter().map(|d| d.report()).collect();
        assert_eq!(
            reports,
            vec![
                FileReport { file: "a.rec".to_string(), records: 1 },
                FileReport { file: "b.rec".to_string(), records: 0 },
            ]
        );
    }

    #[test]
    fn test_load_documents_caps_count() {
        let docs: Vec<SourceDocument> = (0..5)
            .map(|i| document(&format!("{}.rec", i), &[line("ACME", "01/02/23", "1", "x", "1,00", "")]))
            .collect();
        let loaded = load_documents(&parser(), &docs, 3);
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[2].name, "2.rec");
    }

    #[test]
    fn test_same_document_twice_under_different_names_doubles() {
        let lines = [
            line("ACME", "01/02/23", "1", "a", "1,00", ""),
            line("BETA", "02/02/23", "2", "b", "", "2,00"),
        ];
        let once = consolidate(load_documents(&parser(), &[document("a.rec", &lines)], 3)).unwrap();
        let twice = consolidate(load_documents(
            &parser(),
            &[document("a.rec", &lines), document("b.rec", &lines)],
            3,
        ))
        .unwrap();
        assert_eq!(once.len(), 2);
        assert_eq!(twice.len(), 4);
        assert_eq!(twice.stats().duplicates_dropped, 0);
        assert_eq!(twice.stats().documents, 2);
    }

    #[test]
    fn test_same_document_twice_under_same_name_collapses() {
        let lines = [
            line("ACME", "01/02/23", "1", "a", "1,00", ""),
            line("BETA", "02/02/23", "2", "b", "", "2,00"),
        ];
        let set = consolidate(load_documents(
            &parser(),
            &[document("a.rec", &lines), document("a.rec", &lines)],
            3,
        ))
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.stats().duplicates_dropped, 2);
    }

    #[test]
    fn test_repeated_line_within_document_collapses() {
        let l = line("ACME", "01/02/23", "1", "a", "1,00", "");
        let set = consolidate(load_documents(&parser(), &[document("a.rec", &[l.clone(), l])], 3)).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_sort_order_with_missing_dates_last() {
        let records = vec![
            record("A", "2", None, "z", "a.rec"),
            record("A", "9", NaiveDate::from_ymd_opt(2023, 5, 1), "a", "a.rec"),
            record("A", "1", NaiveDate::from_ymd_opt(2023, 5, 1), "b", "a.rec"),
            record("A", "1", NaiveDate::from_ymd_opt(2023, 5, 1), "a", "a.rec"),
            record("A", "5", NaiveDate::from_ymd_opt(2022, 1, 1), "a", "a.rec"),
        ];
        let mut sorted = records.clone();
        sort_records(&mut sorted);
        let keys: Vec<(&str, &str)> = sorted
            .iter()
            .map(|r| (r.account.as_str(), r.description.as_str()))
            .collect();
        assert_eq!(keys, vec![("5", "a"), ("1", "a"), ("1", "b"), ("9", "a"), ("2", "z")]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 1);
        let mut first = record("ACME", "1", date, "same", "a.rec");
        first.credit = Decimal::new(1, 0);
        let mut second = record("BETA", "1", date, "same", "a.rec");
        second.credit = Decimal::new(2, 0);
        let mut third = record("ACME", "1", date, "same", "b.rec");
        third.credit = Decimal::new(3, 0);

        let mut records = vec![first, second, third];
        sort_records(&mut records);
        let credits: Vec<Decimal> = records.iter().map(|r| r.credit).collect();
        assert_eq!(credits, vec![Decimal::new(1, 0), Decimal::new(2, 0), Decimal::new(3, 0)]);
    }

    #[test]
    fn test_dedupe_treats_missing_dates_as_equal() {
        let a = record("ACME", "1", None, "x", "a.rec");
        let b = a.clone();
        assert_eq!(dedupe(vec![a, b]).len(), 1);
    }

    #[test]
    fn test_dedupe_compares_amounts_numerically() {
        let mut a = record("ACME", "1", None, "x", "a.rec");
        a.credit = Decimal::new(1500, 0);
        let mut b = a.clone();
        b.credit = Decimal::new(150000, 2);
        assert_eq!(dedupe(vec![a, b]).len(), 1);
    }

    #[test]
    fn test_no_valid_records() {
        let docs = vec![document("a.rec", &["sin fecha".to_string()]), document("b.rec", &[])];
        let err = consolidate(load_documents(&parser(), &docs, 3)).unwrap_err();
        assert!(matches!(err, CoreError::NoValidRecords { documents: 2 }));
    }

    #[test]
    fn test_no_documents() {
        assert!(matches!(consolidate(vec![]), Err(CoreError::NoDocuments)));
    }

    #[test]
    fn test_stats_and_first_account() {
        let docs = vec![document(
            "a.rec",
            &[
                line("ACME", "05/02/23", "2.1.01", "b", "1,00", ""),
                line("ACME", "01/02/23", "1.1.01", "a", "1,00", ""),
                line("BETA", "03/02/23", "1.1.01", "c", "", "5,00"),
            ],
        )];
        let set = consolidate(load_documents(&parser(), &docs, 3)).unwrap();
        assert_eq!(set.first_account(), Some("1.1.01"));
        assert_eq!(set.stats().records, 3);
        assert_eq!(set.stats().unique_accounts, 2);
        assert_eq!(set.stats().documents, 1);
    }
}
