//! Decode-time error records and the pending-error ledger.
//!
//! Every problem found while classifying or decoding a line becomes a
//! [`DecodeError`]. Errors wait in the [`ErrorLedger`]'s pending buffer until
//! the report they belong to is finalized; at that point the ledger stamps
//! them with the report's [`ReportRef`] and hands them over together with the
//! report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::layout::Field;

// =============================================================================
// Context
// =============================================================================

/// Where an error (or a report) came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    /// Name of the input (usually the file path).
    pub source_name: Arc<str>,
    /// 1-based line number.
    pub line_number: usize,
}

impl ErrorContext {
    pub fn new(source_name: Arc<str>, line_number: usize) -> Self {
        Self {
            source_name,
            line_number,
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_name, self.line_number)
    }
}

// =============================================================================
// Codes
// =============================================================================

/// Broad class of a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The line's shape is wrong (length, missing discriminator, or a
    /// mandatory report field that cannot be read).
    Structural,
    /// One column range holds unparseable content.
    Field,
    /// The segment type character is not recognized.
    Dispatch,
    /// A detail segment had no Group A incident to attach to.
    Handoff,
}

/// Symbolic error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "code", content = "field", rename_all = "camelCase")]
pub enum ErrorCode {
    ZeroReportLength,
    AdministrativeLength,
    GroupBArresteeLength,
    GroupAArresteeLength,
    OffenderLength,
    VictimLength,
    PropertyLength,
    OffenseLength,
    EmptySegment,
    MissingSegmentType,
    UnrecognizedSegmentType,
    DetailWithoutIncident,
    /// A typed column range could not be converted.
    InvalidValue(Field),
}

impl ErrorCode {
    /// Default kind for this code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroReportLength
            | Self::AdministrativeLength
            | Self::GroupBArresteeLength
            | Self::GroupAArresteeLength
            | Self::OffenderLength
            | Self::VictimLength
            | Self::PropertyLength
            | Self::OffenseLength
            | Self::EmptySegment
            | Self::MissingSegmentType => ErrorKind::Structural,
            Self::UnrecognizedSegmentType => ErrorKind::Dispatch,
            Self::DetailWithoutIncident => ErrorKind::Handoff,
            Self::InvalidValue(_) => ErrorKind::Field,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::ZeroReportLength => "zero report segment has an invalid length".into(),
            Self::AdministrativeLength => {
                "administrative segment has an invalid length".into()
            }
            Self::GroupBArresteeLength => {
                "Group B arrestee segment has an invalid length".into()
            }
            Self::GroupAArresteeLength => {
                "Group A arrestee segment has an invalid length".into()
            }
            Self::OffenderLength => "offender segment has an invalid length".into(),
            Self::VictimLength => "victim segment has an invalid length".into(),
            Self::PropertyLength => "property segment has an invalid length".into(),
            Self::OffenseLength => "offense segment has an invalid length".into(),
            Self::EmptySegment => "empty segment".into(),
            Self::MissingSegmentType => "segment is too short to carry a segment type".into(),
            Self::UnrecognizedSegmentType => "unrecognized segment type".into(),
            Self::DetailWithoutIncident => {
                "detail segment outside a Group A incident".into()
            }
            Self::InvalidValue(field) => format!("invalid value for {}", field),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// =============================================================================
// Report reference
// =============================================================================

/// Reference to the report an error is attributed to.
///
/// Errors never own their report; they carry its position in the run and
/// its unique description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRef {
    /// 1-based position of the report among the run's finalized reports.
    pub ordinal: u64,
    pub description: String,
}

impl ReportRef {
    pub fn new(ordinal: u64, description: impl Into<String>) -> Self {
        Self {
            ordinal,
            description: description.into(),
        }
    }
}

impl fmt::Display for ReportRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.ordinal, self.description)
    }
}

// =============================================================================
// Decode error
// =============================================================================

/// One decode-time problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeError {
    #[serde(flatten)]
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub context: ErrorContext,
    /// Offending raw value (substring, length, or type character).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_type: Option<char>,
    /// Set when the owning report is finalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportRef>,
}

impl DecodeError {
    pub fn new(code: ErrorCode, context: ErrorContext) -> Self {
        Self {
            code,
            kind: code.kind(),
            context,
            value: None,
            segment_type: None,
            report: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_segment_type(mut self, segment_type: char) -> Self {
        self.segment_type = Some(segment_type);
        self
    }

    /// Reclassify as structural (used for mandatory report-level fields).
    pub fn structural(mut self) -> Self {
        self.kind = ErrorKind::Structural;
        self
    }

    /// NIBRS-style three digit code, e.g. `201` for an offense length error.
    pub fn nibrs_code(&self) -> String {
        let family = self.segment_type.unwrap_or('0');
        match self.code {
            ErrorCode::ZeroReportLength => "001".into(),
            ErrorCode::AdministrativeLength => "101".into(),
            ErrorCode::OffenseLength => "201".into(),
            ErrorCode::PropertyLength => "301".into(),
            ErrorCode::VictimLength => "401".into(),
            ErrorCode::OffenderLength => "501".into(),
            ErrorCode::GroupAArresteeLength => "601".into(),
            ErrorCode::GroupBArresteeLength => "701".into(),
            ErrorCode::EmptySegment | ErrorCode::MissingSegmentType => "050".into(),
            ErrorCode::UnrecognizedSegmentType => "051".into(),
            ErrorCode::DetailWithoutIncident => "055".into(),
            ErrorCode::InvalidValue(_) => format!("{}04", family),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.context, self.nibrs_code())?;
        if let Some(segment_type) = self.segment_type {
            write!(f, " segment '{}'", segment_type)?;
        }
        write!(f, ": {}", self.code)?;
        if let Some(ref value) = self.value {
            write!(f, " (value '{}')", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {}

// =============================================================================
// Ledger
// =============================================================================

/// Run-level error counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTotals {
    pub structural: usize,
    pub field: usize,
    pub dispatch: usize,
    pub handoff: usize,
}

impl ErrorTotals {
    fn count(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::Structural => self.structural += 1,
            ErrorKind::Field => self.field += 1,
            ErrorKind::Dispatch => self.dispatch += 1,
            ErrorKind::Handoff => self.handoff += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.structural + self.field + self.dispatch + self.handoff
    }
}

/// Pending errors plus run totals.
///
/// Only the errors raised since the last finalized report are held.
#[derive(Debug, Default)]
pub struct ErrorLedger {
    pending: Vec<DecodeError>,
    totals: ErrorTotals,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one error to the pending buffer.
    pub fn record(&mut self, error: DecodeError) {
        self.totals.count(error.kind);
        self.pending.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = DecodeError>) {
        for error in errors {
            self.record(error);
        }
    }

    pub fn pending(&self) -> &[DecodeError] {
        &self.pending
    }

    /// Tag every pending error with `report` and hand them over.
    pub fn flush(&mut self, report: &ReportRef) -> Vec<DecodeError> {
        let mut flushed = std::mem::take(&mut self.pending);
        for error in &mut flushed {
            error.report = Some(report.clone());
        }
        flushed
    }

    /// Drain errors that never found a report.
    pub fn take_unattributed(&mut self) -> Vec<DecodeError> {
        std::mem::take(&mut self.pending)
    }

    pub fn totals(&self) -> ErrorTotals {
        self.totals
    }
}
