//! Segment classification.
//!
//! A segment is one fixed-width line. Column 5 carries the segment type,
//! which also decides whether the line starts a report or adds detail to
//! the Group A incident being built.
//!
//! ```text
//!  1   4 5 6 7 8 9  12 13  16 17     25 26        37 38 ...
//! ┌─────┬─┬─┬───┬─────┬──────┬─────────┬────────────┬──────────────┐
//! │ len │T│A│ mm│ yyyy│ city │   ORI   │ incident # │ type-specific│
//! └─────┴─┴─┴───┴─────┴──────┴─────────┴────────────┴──────────────┘
//! ```
//!
//! Columns 7-16 only carry tape month/year and city on report-level
//! segments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::ledger::{DecodeError, ErrorCode, ErrorContext};

/// 1-based column holding the segment type character.
pub const SEGMENT_TYPE_COLUMN: usize = 5;
/// 1-based column holding the report action type.
pub const ACTION_TYPE_COLUMN: usize = 6;
/// Originating agency identifier columns.
pub const ORI_COLUMNS: (usize, usize) = (17, 25);
/// Incident number / unique identifier columns.
pub const IDENTIFIER_COLUMNS: (usize, usize) = (26, 37);

// =============================================================================
// Segment types
// =============================================================================

/// Report-level segment types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    /// `0` - agency had nothing to report for the month.
    Zero,
    /// `1` - Group A administrative segment.
    GroupAIncident,
    /// `7` - Group B arrestee segment.
    GroupBArrest,
}

/// Detail-level segment types (Group A only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailType {
    /// `2`
    Offense,
    /// `3`
    Property,
    /// `4`
    Victim,
    /// `5`
    Offender,
    /// `6` - Group A arrestee.
    Arrestee,
}

/// Record category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentLevel {
    Report,
    Detail,
}

/// Concrete segment type, grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentType {
    Report(ReportType),
    Detail(DetailType),
}

impl SegmentType {
    /// Map a discriminator character to a segment type.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Report(ReportType::Zero)),
            '1' => Some(Self::Report(ReportType::GroupAIncident)),
            '2' => Some(Self::Detail(DetailType::Offense)),
            '3' => Some(Self::Detail(DetailType::Property)),
            '4' => Some(Self::Detail(DetailType::Victim)),
            '5' => Some(Self::Detail(DetailType::Offender)),
            '6' => Some(Self::Detail(DetailType::Arrestee)),
            '7' => Some(Self::Report(ReportType::GroupBArrest)),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Report(ReportType::Zero) => '0',
            Self::Report(ReportType::GroupAIncident) => '1',
            Self::Detail(DetailType::Offense) => '2',
            Self::Detail(DetailType::Property) => '3',
            Self::Detail(DetailType::Victim) => '4',
            Self::Detail(DetailType::Offender) => '5',
            Self::Detail(DetailType::Arrestee) => '6',
            Self::Report(ReportType::GroupBArrest) => '7',
        }
    }

    pub fn level(self) -> SegmentLevel {
        match self {
            Self::Report(_) => SegmentLevel::Report,
            Self::Detail(_) => SegmentLevel::Detail,
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// =============================================================================
// Segment
// =============================================================================

/// One classified line.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    data: String,
    source_name: Arc<str>,
    line_number: usize,
    segment_type: SegmentType,
    length: usize,
}

impl Segment {
    /// Raw line text.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn source_name(&self) -> &Arc<str> {
        &self.source_name
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    pub fn level(&self) -> SegmentLevel {
        self.segment_type.level()
    }

    pub fn type_char(&self) -> char {
        self.segment_type.as_char()
    }

    /// Total length in characters; selects the decoding profile.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext::new(Arc::clone(&self.source_name), self.line_number)
    }

    /// Raw text of a 1-based inclusive column range.
    pub fn column(&self, start: usize, end: usize) -> &str {
        column(&self.data, start, end)
    }

    /// Trimmed text of a column range, `None` when blank.
    pub fn text(&self, start: usize, end: usize) -> Option<String> {
        non_blank(self.column(start, end))
    }

    pub fn action_type(&self) -> Option<String> {
        self.text(ACTION_TYPE_COLUMN, ACTION_TYPE_COLUMN)
    }

    pub fn ori(&self) -> Option<String> {
        self.text(ORI_COLUMNS.0, ORI_COLUMNS.1)
    }

    /// Incident number (Group A) or arrest transaction number (Group B).
    pub fn unique_identifier(&self) -> Option<String> {
        self.text(IDENTIFIER_COLUMNS.0, IDENTIFIER_COLUMNS.1)
    }
}

/// Classify one raw line.
///
/// Never fails fatally: an unusable line becomes a [`DecodeError`].
pub fn classify(
    line: impl Into<String>,
    source_name: Arc<str>,
    line_number: usize,
) -> Result<Segment, DecodeError> {
    let data = line.into();
    let context = ErrorContext::new(Arc::clone(&source_name), line_number);

    if data.trim().is_empty() {
        return Err(DecodeError::new(ErrorCode::EmptySegment, context));
    }

    let Some(type_char) = data.chars().nth(SEGMENT_TYPE_COLUMN - 1) else {
        return Err(DecodeError::new(ErrorCode::MissingSegmentType, context)
            .with_value(data.chars().count().to_string()));
    };

    let Some(segment_type) = SegmentType::from_char(type_char) else {
        return Err(DecodeError::new(ErrorCode::UnrecognizedSegmentType, context)
            .with_segment_type(type_char)
            .with_value(type_char.to_string()));
    };

    let length = data.chars().count();
    Ok(Segment {
        data,
        source_name,
        line_number,
        segment_type,
        length,
    })
}

/// Slice a 1-based inclusive character range; out-of-range columns are empty.
pub fn column(data: &str, start: usize, end: usize) -> &str {
    if start == 0 || end < start {
        return "";
    }
    let mut offsets = data
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(data.len()));
    let Some(begin) = offsets.nth(start - 1) else {
        return "";
    };
    let finish = offsets.nth(end - start).unwrap_or(data.len());
    &data[begin..finish]
}

/// Trim, mapping blank to `None`.
pub fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
