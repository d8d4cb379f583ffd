//! Per-company totals

use bejerman_parser::FinancialRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the company summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company: String,
    pub credit: Decimal,
    pub debit: Decimal,
    pub movement: Decimal,
}

impl CompanySummary {
    fn new(company: &str) -> Self {
        Self {
            company: company.to_string(),
            credit: Decimal::ZERO,
            debit: Decimal::ZERO,
            movement: Decimal::ZERO,
        }
    }

    fn add(&mut self, record: &FinancialRecord) {
        self.credit += record.credit;
        self.debit += record.debit;
        self.movement += record.movement();
    }
}

/// Sum credit, debit and movement per exact company name, ordered by name
pub fn summarize_by_company(records: &[FinancialRecord]) -> Vec<CompanySummary> {
    let mut groups: BTreeMap<&str, CompanySummary> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.company.as_str())
            .or_insert_with(|| CompanySummary::new(&record.company))
            .add(record);
    }
    groups.into_values().collect()
}

/// Grand total across summary rows
pub fn total(summaries: &[CompanySummary]) -> CompanySummary {
    let mut total = CompanySummary::new("Total");
    for row in summaries {
        total.credit += row.credit;
        total.debit += row.debit;
        total.movement += row.movement;
    }
    total
}
