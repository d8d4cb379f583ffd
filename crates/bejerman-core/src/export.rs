//! Tabular views and spreadsheet export

use bejerman_config::OutputConfig;
use bejerman_parser::FinancialRecord;
use bejerman_utils::sanitize_filename_part;
use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use serde::Serialize;

use crate::consolidate::ConsolidatedSet;
use crate::error::CoreResult;
use crate::summary::CompanySummary;

/// Extension of the exported workbook
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// Column headers of the movements sheet
pub const RECORD_COLUMNS: [&str; 7] = [
    "Empresa",
    "Cuenta",
    "Fecha",
    "Descripción",
    "Crédito",
    "Débito",
    "Movimiento",
];

/// Column headers of the company summary sheet
pub const SUMMARY_COLUMNS: [&str; 4] = ["Empresa", "Crédito", "Débito", "Movimiento"];

/// Record as exposed to the shell, without its source tag
#[derive(Debug, Serialize)]
pub struct RecordRow<'a> {
    pub company: &'a str,
    pub account: &'a str,
    pub date: Option<NaiveDate>,
    pub description: &'a str,
    pub credit: Decimal,
    pub debit: Decimal,
    pub movement: Decimal,
}

impl<'a> From<&'a FinancialRecord> for RecordRow<'a> {
    fn from(r: &'a FinancialRecord) -> Self {
        Self {
            company: &r.company,
            account: &r.account,
            date: r.date,
            description: &r.description,
            credit: r.credit,
            debit: r.debit,
            movement: r.movement(),
        }
    }
}

/// Rows of the movements table in consolidated order
pub fn record_rows(set: &ConsolidatedSet) -> Vec<RecordRow<'_>> {
    set.records().iter().map(RecordRow::from).collect()
}

/// `<prefix>_<sanitized first account>.xlsx`
pub fn output_file_name(set: &ConsolidatedSet, output: &OutputConfig) -> String {
    let label = set.first_account().unwrap_or(&output.empty_set_label);
    let slug = sanitize_filename_part(label, output.max_label_length, &output.fallback_label);
    format!("{}_{}.{}", output.file_prefix, slug, WORKBOOK_EXTENSION)
}

/// Build the two-sheet workbook in memory
pub fn write_workbook(
    set: &ConsolidatedSet,
    summary: &[CompanySummary],
    output: &OutputConfig,
) -> CoreResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let amount_format = Format::new().set_num_format("#,##0.00");

    let records_sheet = workbook.add_worksheet();
    records_sheet.set_name(&output.records_sheet)?;
    write_records_sheet(records_sheet, set.records(), &header, &date_format, &amount_format)?;

    let summary_sheet = workbook.add_worksheet();
    summary_sheet.set_name(&output.summary_sheet)?;
    write_summary_sheet(summary_sheet, summary, &header, &amount_format)?;

    let buffer = workbook.save_to_buffer()?;
    log::debug!("Workbook built: {} bytes", buffer.len());
    Ok(buffer)
}

fn write_records_sheet(
    sheet: &mut Worksheet,
    records: &[FinancialRecord],
    header: &Format,
    date_format: &Format,
    amount_format: &Format,
) -> CoreResult<()> {
    for (col, title) in RECORD_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, record.company.as_str())?;
        sheet.write_string(row, 1, record.account.as_str())?;
        match record.date.and_then(excel_date) {
            Some(cell) => {
                sheet.write_datetime_with_format(row, 2, &cell, date_format)?;
            }
            None => {
                if let Some(date) = record.date {
                    sheet.write_string(row, 2, date.format("%d/%m/%Y").to_string())?;
                }
            }
        }
        sheet.write_string(row, 3, record.description.as_str())?;
        sheet.write_number_with_format(row, 4, to_f64(record.credit), amount_format)?;
        sheet.write_number_with_format(row, 5, to_f64(record.debit), amount_format)?;
        sheet.write_number_with_format(row, 6, to_f64(record.movement()), amount_format)?;
    }
    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    summary: &[CompanySummary],
    header: &Format,
    amount_format: &Format,
) -> CoreResult<()> {
    for (col, title) in SUMMARY_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    for (idx, row_data) in summary.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, row_data.company.as_str())?;
        sheet.write_number_with_format(row, 1, to_f64(row_data.credit), amount_format)?;
        sheet.write_number_with_format(row, 2, to_f64(row_data.debit), amount_format)?;
        sheet.write_number_with_format(row, 3, to_f64(row_data.movement), amount_format)?;
    }
    Ok(())
}

/// `None` for dates the spreadsheet cannot represent (before 1900)
fn excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}

fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}
