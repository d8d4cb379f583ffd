//! Bejerman `.rec` parser implementation
//!
//! Reads fixed-width accounting export lines: fields come from fixed
//! character offsets, while the date and the amounts are located with
//! tolerant regexes because real exports drift out of alignment.

use std::sync::Arc;

pub mod batch;
pub mod dates;
pub mod encoding;
pub mod error;
pub mod layout;
pub mod locate;
pub mod numeric;
pub mod record;
pub mod slice;

pub use batch::{parse_batch, split_lines, BatchStats, ParsedBatch};
pub use dates::DateCoercion;
pub use encoding::TextEncoding;
pub use error::{ParseError, ParseResult};
pub use layout::{FieldSlice, RecordLayout};
pub use locate::{find_amount, find_date};
pub use numeric::parse_amount;
pub use record::{parse_line, FinancialRecord, RawRecord};
pub use slice::slice_text;

// ==================== Parser Trait ====================

/// Parser reference type
pub type ParserRef = Arc<dyn RecordParserTrait>;

/// Trait for `.rec` parsers
pub trait RecordParserTrait: Send + Sync {
    /// Parse a single line, `None` when it is not a record
    fn parse_line(&self, line: &str) -> Option<RawRecord>;

    /// Parse a decoded document, tagging every record with `source`
    fn parse_document(&self, content: &str, source: &str) -> ParsedBatch;

    /// Decode raw bytes and parse them
    fn parse_bytes(&self, bytes: &[u8], encoding: TextEncoding, source: &str) -> ParsedBatch {
        let content = encoding.decode(bytes);
        self.parse_document(&content, source)
    }
}

/// Default parser implementation
#[derive(Debug, Clone, Default)]
pub struct DefaultRecordParser {
    layout: RecordLayout,
    dates: DateCoercion,
}

impl DefaultRecordParser {
    pub fn new(layout: RecordLayout) -> Self {
        Self {
            layout,
            dates: DateCoercion::default(),
        }
    }

    /// Fix the year used to expand two-digit years
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.dates = DateCoercion::new(year);
        self
    }
}

impl RecordParserTrait for DefaultRecordParser {
    fn parse_line(&self, line: &str) -> Option<RawRecord> {
        record::parse_line(line, &self.layout)
    }

    fn parse_document(&self, content: &str, source: &str) -> ParsedBatch {
        parse_batch(content, source, &self.layout, &self.dates)
    }
}
