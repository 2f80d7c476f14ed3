//! Declarative fixed-column layouts.
//!
//! Each segment type is described by a [`SegmentLayout`]: a set of
//! [`LengthProfile`]s, each selected by the exact line length, listing the
//! [`FieldSpec`]s to read. One routine ([`extract`]) interprets every table,
//! so blank-versus-invalid handling lives in a single place:
//!
//! - blank column range → field absent, no error (unless the field is
//!   required, which makes it structurally invalid)
//! - unparseable content → field absent, one [`ErrorCode::InvalidValue`]
//! - every other field is read regardless
//!
//! ## Usage Flow
//!
//! ```text
//! Segment → SegmentLayout::profile_for(len) → extract(FieldSpec…) → Assign::assign
//! ```

pub mod assign;
pub mod decode;
pub mod field;
pub mod tables;

use chrono::NaiveDate;

use crate::ledger::{DecodeError, ErrorCode};
use crate::segment::{column, non_blank, Segment};

pub use decode::{decode_detail, decode_report, Decoded, ReportDecode};
pub use field::Field;

// =============================================================================
// Table types
// =============================================================================

/// How a column range is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Trimmed text.
    Text,
    /// Signed integer.
    Integer,
    /// `YYYYMMDD` calendar date.
    Date,
    /// Nine whole digits followed by three fractional digits.
    Quantity,
}

/// One column-range-to-field mapping. Columns are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub start: usize,
    pub end: usize,
    pub kind: ValueKind,
    /// Number of repetitions (1 for plain fields).
    pub count: usize,
    /// Column distance between repetitions.
    pub stride: usize,
    /// A blank or unparseable value makes the whole segment structurally
    /// invalid.
    pub required: bool,
}

impl FieldSpec {
    const fn new(field: Field, start: usize, end: usize, kind: ValueKind) -> Self {
        Self {
            field,
            start,
            end,
            kind,
            count: 1,
            stride: 0,
            required: false,
        }
    }

    pub const fn text(field: Field, start: usize, end: usize) -> Self {
        Self::new(field, start, end, ValueKind::Text)
    }

    pub const fn integer(field: Field, start: usize, end: usize) -> Self {
        Self::new(field, start, end, ValueKind::Integer)
    }

    pub const fn date(field: Field, start: usize, end: usize) -> Self {
        Self::new(field, start, end, ValueKind::Date)
    }

    pub const fn quantity(field: Field, start: usize, end: usize) -> Self {
        Self::new(field, start, end, ValueKind::Quantity)
    }

    pub const fn repeat(mut self, count: usize, stride: usize) -> Self {
        self.count = count;
        self.stride = stride;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Column range of the `index`-th repetition.
    pub fn columns(&self, index: usize) -> (usize, usize) {
        let offset = index * self.stride;
        (self.start + offset, self.end + offset)
    }
}

/// Optional trailing block a profile adds on top of the base layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    CargoTheft,
    Leoka,
    MultipleBiasMotivations,
    OffenderEthnicity,
}

/// Field tables that apply to one set of exact line lengths.
#[derive(Debug)]
pub struct LengthProfile {
    pub lengths: &'static [usize],
    pub groups: &'static [&'static [FieldSpec]],
    pub extension: Option<Extension>,
}

impl LengthProfile {
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let groups: &'static [&'static [FieldSpec]] = self.groups;
        groups.iter().copied().flat_map(|group| group.iter())
    }
}

/// Every accepted shape of one segment type.
#[derive(Debug)]
pub struct SegmentLayout {
    /// Code reported when the length matches no profile.
    pub length_error: ErrorCode,
    pub profiles: &'static [LengthProfile],
}

impl SegmentLayout {
    pub fn profile_for(&self, length: usize) -> Option<&LengthProfile> {
        self.profiles.iter().find(|p| p.lengths.contains(&length))
    }
}

// =============================================================================
// Values
// =============================================================================

/// A converted column value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Quantity(f64),
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|i| i32::try_from(i).ok())
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Quantity(q) => Some(*q),
            _ => None,
        }
    }
}

/// Receives converted values for the fields an entity owns.
///
/// `value` is `None` for blank or invalid ranges so repeated fields keep
/// their positions.
pub trait Assign {
    fn assign(&mut self, field: Field, index: usize, value: Option<FieldValue>);
}

/// Unparseable content.
struct Invalid;

fn read_value(kind: ValueKind, raw: &str) -> Result<Option<FieldValue>, Invalid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match kind {
        ValueKind::Text => Ok(Some(FieldValue::Text(trimmed.to_string()))),
        ValueKind::Integer => trimmed
            .parse::<i64>()
            .map(|i| Some(FieldValue::Integer(i)))
            .map_err(|_| Invalid),
        ValueKind::Date => {
            if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Invalid);
            }
            NaiveDate::parse_from_str(trimmed, "%Y%m%d")
                .map(|d| Some(FieldValue::Date(d)))
                .map_err(|_| Invalid)
        }
        ValueKind::Quantity => read_quantity(raw),
    }
}

/// Whole part is the range minus its last three columns; a blank whole part
/// means "not reported" and a blank fraction reads as `000`.
fn read_quantity(raw: &str) -> Result<Option<FieldValue>, Invalid> {
    let width = raw.chars().count();
    let split = width.saturating_sub(3);
    let whole = column(raw, 1, split).trim();
    let fraction = column(raw, split + 1, width).trim();

    if whole.is_empty() {
        return Ok(None);
    }
    let fraction = if fraction.is_empty() { "000" } else { fraction };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !digits(fraction) {
        return Err(Invalid);
    }
    format!("{}.{}", whole, fraction)
        .parse::<f64>()
        .map(|q| Some(FieldValue::Quantity(q)))
        .map_err(|_| Invalid)
}

// =============================================================================
// Extraction
// =============================================================================

/// Read every field of `profile` from `segment` into `target`.
///
/// Returns one error per unparseable range, in table order.
pub fn extract<T: Assign>(segment: &Segment, profile: &LengthProfile, target: &mut T) -> Vec<DecodeError> {
    let mut errors = Vec::new();

    for spec in profile.fields() {
        for index in 0..spec.count {
            let (start, end) = spec.columns(index);
            let raw = segment.column(start, end);
            let value = match read_value(spec.kind, raw) {
                Ok(None) if spec.required => Err(Invalid),
                other => other,
            };
            match value {
                Ok(value) => target.assign(spec.field, index, value),
                Err(Invalid) => {
                    target.assign(spec.field, index, None);
                    let mut error = DecodeError::new(
                        ErrorCode::InvalidValue(spec.field),
                        segment.context(),
                    )
                    .with_segment_type(segment.type_char())
                    .with_value(non_blank(raw).unwrap_or_default());
                    if spec.required {
                        error = error.structural();
                    }
                    errors.push(error);
                }
            }
        }
    }

    errors
}

/// Store `value` at `index`, growing the slots as needed.
pub(crate) fn put<T>(slots: &mut Vec<Option<T>>, index: usize, value: Option<T>) {
    if slots.len() <= index {
        slots.resize_with(index + 1, || None);
    }
    slots[index] = value;
}
