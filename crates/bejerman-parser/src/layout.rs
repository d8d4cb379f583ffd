//! Fixed field layout of a Bejerman `.rec` line
//!
//! Offsets are zero-based character positions, end exclusive. Every format
//! revision should only have to touch [`RecordLayout::BEJERMAN`].

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// Half-open character range `[start, end)` inside a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSlice {
    pub start: usize,
    pub end: usize,
}

impl FieldSlice {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered by the slice
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    fn validate(&self, field: &str) -> ParseResult<()> {
        if self.start >= self.end {
            return Err(ParseError::InvalidLayout {
                field: field.to_string(),
                reason: format!("start ({}) must be lower than end ({})", self.start, self.end),
            });
        }
        Ok(())
    }
}

/// Positions of every fixed-column field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLayout {
    #[serde(default = "default_company")]
    pub company: FieldSlice,
    #[serde(default = "default_account")]
    pub account: FieldSlice,
    #[serde(default = "default_description")]
    pub description: FieldSlice,
    #[serde(default = "default_credit")]
    pub credit: FieldSlice,
    #[serde(default = "default_debit")]
    pub debit: FieldSlice,
}

impl RecordLayout {
    /// Authoritative offsets of the Bejerman export.
    ///
    /// Credit covers columns 670-688 and debit 688-709 (1-based, inclusive),
    /// so both slices share offset 687.
    pub const BEJERMAN: RecordLayout = RecordLayout {
        company: FieldSlice::new(0, 40),
        account: FieldSlice::new(286, 300),
        description: FieldSlice::new(383, 460),
        credit: FieldSlice::new(669, 688),
        debit: FieldSlice::new(687, 709),
    };

    /// Check that every slice is a non-empty range
    pub fn validate(&self) -> ParseResult<()> {
        self.company.validate("company")?;
        self.account.validate("account")?;
        self.description.validate("description")?;
        self.credit.validate("credit")?;
        self.debit.validate("debit")?;
        Ok(())
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::BEJERMAN
    }
}

fn default_company() -> FieldSlice {
    RecordLayout::BEJERMAN.company
}

fn default_account() -> FieldSlice {
    RecordLayout::BEJERMAN.account
}

fn default_description() -> FieldSlice {
    RecordLayout::BEJERMAN.description
}

fn default_credit() -> FieldSlice {
    RecordLayout::BEJERMAN.credit
}

fn default_debit() -> FieldSlice {
    RecordLayout::BEJERMAN.debit
}
