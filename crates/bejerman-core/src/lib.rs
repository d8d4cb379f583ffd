//! Consolidation of Bejerman `.rec` documents
//!
//! Parses up to three documents, merges them into one deduplicated and
//! sorted record set, totals it per company and exports both tables.

pub mod consolidate;
pub mod error;
pub mod export;
pub mod summary;

use bejerman_config::Config;
use bejerman_parser::{DefaultRecordParser, ParserRef};
use std::sync::Arc;

pub use consolidate::{
    consolidate, load_documents, ConsolidatedSet, ConsolidationStats, FileReport, LoadedDocument,
    SourceDocument,
};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use export::{output_file_name, record_rows, write_workbook, RecordRow};
pub use summary::{summarize_by_company, CompanySummary};

/// Runs the parse, consolidate, summarize and export steps with one configuration
pub struct Consolidator {
    config: Config,
    parser: ParserRef,
}

impl Consolidator {
    /// Create a consolidator using the configured layout
    pub fn new(config: Config) -> Self {
        let parser = Arc::new(DefaultRecordParser::new(config.layout));
        Self { config, parser }
    }

    /// Use a custom parser
    pub fn with_parser(config: Config, parser: ParserRef) -> Self {
        Self { config, parser }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse each document; the result carries one report per document
    pub fn load(&self, documents: &[SourceDocument]) -> Vec<LoadedDocument> {
        load_documents(self.parser.as_ref(), documents, self.config.input.max_files)
    }

    /// Merge, dedupe and sort loaded documents
    pub fn consolidate(&self, documents: Vec<LoadedDocument>) -> CoreResult<ConsolidatedSet> {
        consolidate(documents)
    }

    /// Per-company totals of a consolidated set
    pub fn summarize(&self, set: &ConsolidatedSet) -> Vec<CompanySummary> {
        summarize_by_company(set.records())
    }

    /// Name of the exported workbook
    pub fn output_file_name(&self, set: &ConsolidatedSet) -> String {
        output_file_name(set, &self.config.output)
    }

    /// Build the two-sheet workbook
    pub fn export(&self, set: &ConsolidatedSet, summary: &[CompanySummary]) -> CoreResult<Vec<u8>> {
        write_workbook(set, summary, &self.config.output)
    }
}

// ==================== Tests ====================
