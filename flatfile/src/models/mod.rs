//! Domain models for decoded NIBRS reports.
//!
//! - [`Report`] - the aggregate emitted to sinks (zero, Group A, Group B)
//! - [`ReportHeader`] - fields common to every report-level segment
//! - [`GroupAIncident`] - administrative segment plus attached details
//! - [`GroupBArrest`] - a Group B arrest with its single arrestee
//! - [`detail`] - offense, property, victim, offender and arrestee entities

pub mod detail;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::ErrorContext;
use crate::segment::{ReportType, Segment};

pub use detail::{Arrestee, Detail, Offender, Offense, Property, SegmentHeader, Victim};

// =============================================================================
// Report header
// =============================================================================

/// Columns shared by every report-level segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ori: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    pub month_of_tape: Option<i32>,
    pub year_of_tape: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_indicator: Option<String>,
    /// Line the report started on.
    pub source: ErrorContext,
}

impl ReportHeader {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            ori: segment.ori(),
            action_type: segment.action_type(),
            month_of_tape: None,
            year_of_tape: None,
            city_indicator: None,
            source: segment.context(),
        }
    }
}

// =============================================================================
// Report variants
// =============================================================================

/// Zero report: the agency had no incidents for the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZeroReport {
    pub header: ReportHeader,
    pub zero_reporting_month: Option<i32>,
    pub zero_reporting_year: Option<i32>,
    pub has_upstream_errors: bool,
}

/// Group A incident: the administrative segment and everything attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAIncident {
    pub header: ReportHeader,
    pub incident_number: Option<String>,
    pub incident_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date_indicator: Option<String>,
    pub incident_hour: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exceptional_clearance_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exceptional_clearance_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_theft_indicator: Option<String>,
    /// The administrative segment used the cargo-theft length.
    pub includes_cargo_theft: bool,
    /// At least one victim segment used the LEOKA length.
    pub includes_leoka: bool,
    pub offenses: Vec<Offense>,
    pub properties: Vec<Property>,
    pub victims: Vec<Victim>,
    pub offenders: Vec<Offender>,
    pub arrestees: Vec<Arrestee>,
    pub has_upstream_errors: bool,
}

impl GroupAIncident {
    pub fn new(header: ReportHeader) -> Self {
        Self {
            header,
            incident_number: None,
            incident_date: None,
            report_date_indicator: None,
            incident_hour: None,
            exceptional_clearance_code: None,
            exceptional_clearance_date: None,
            cargo_theft_indicator: None,
            includes_cargo_theft: false,
            includes_leoka: false,
            offenses: Vec::new(),
            properties: Vec::new(),
            victims: Vec::new(),
            offenders: Vec::new(),
            arrestees: Vec::new(),
            has_upstream_errors: false,
        }
    }

    /// Attach a decoded detail to the matching collection.
    pub fn add_detail(&mut self, detail: Detail) {
        match detail {
            Detail::Offense(o) => self.offenses.push(o),
            Detail::Property(p) => self.properties.push(p),
            Detail::Victim(v) => self.victims.push(v),
            Detail::Offender(o) => self.offenders.push(o),
            Detail::Arrestee(a) => self.arrestees.push(a),
        }
    }

    pub fn detail_count(&self) -> usize {
        self.offenses.len()
            + self.properties.len()
            + self.victims.len()
            + self.offenders.len()
            + self.arrestees.len()
    }
}

/// Group B arrest report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBArrest {
    pub header: ReportHeader,
    pub arrestee: Arrestee,
    pub has_upstream_errors: bool,
}

// =============================================================================
// Report
// =============================================================================

/// A report-level aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Report {
    Zero(ZeroReport),
    GroupA(GroupAIncident),
    GroupB(GroupBArrest),
}

impl Report {
    pub fn report_type(&self) -> ReportType {
        match self {
            Report::Zero(_) => ReportType::Zero,
            Report::GroupA(_) => ReportType::GroupAIncident,
            Report::GroupB(_) => ReportType::GroupBArrest,
        }
    }

    pub fn header(&self) -> &ReportHeader {
        match self {
            Report::Zero(r) => &r.header,
            Report::GroupA(r) => &r.header,
            Report::GroupB(r) => &r.header,
        }
    }

    pub fn source(&self) -> &ErrorContext {
        &self.header().source
    }

    pub fn has_upstream_errors(&self) -> bool {
        match self {
            Report::Zero(r) => r.has_upstream_errors,
            Report::GroupA(r) => r.has_upstream_errors,
            Report::GroupB(r) => r.has_upstream_errors,
        }
    }

    /// Flag the report as carrying decode errors.
    pub fn mark_upstream_errors(&mut self) {
        match self {
            Report::Zero(r) => r.has_upstream_errors = true,
            Report::GroupA(r) => r.has_upstream_errors = true,
            Report::GroupB(r) => r.has_upstream_errors = true,
        }
    }

    pub fn as_group_a(&self) -> Option<&GroupAIncident> {
        match self {
            Report::GroupA(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_group_b(&self) -> Option<&GroupBArrest> {
        match self {
            Report::GroupB(r) => Some(r),
            _ => None,
        }
    }

    /// Human-readable identity used in logs and error references.
    pub fn unique_description(&self) -> String {
        let ori = self.header().ori.as_deref().unwrap_or("?");
        match self {
            Report::Zero(r) => format!(
                "Zero report ORI={} {:02}/{}",
                ori,
                r.header.month_of_tape.unwrap_or(0),
                r.header.year_of_tape.unwrap_or(0)
            ),
            Report::GroupA(r) => format!(
                "Group A incident ORI={} #{}",
                ori,
                r.incident_number.as_deref().unwrap_or("?")
            ),
            Report::GroupB(r) => format!(
                "Group B arrest ORI={} #{}",
                ori,
                r.arrestee.arrest_transaction_number.as_deref().unwrap_or("?")
            ),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
