//! Group A detail entities.
//!
//! Each entity is owned by the incident it was attached to. Repeated
//! sub-fields are kept as position-indexed `Vec<Option<_>>`: slot `i` is the
//! `i`-th repetition in the segment, `None` when that repetition was blank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// Header columns every Group A detail segment shares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentHeader {
    pub segment_type: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ori: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_number: Option<String>,
}

impl SegmentHeader {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            segment_type: segment.type_char(),
            action_type: segment.action_type(),
            ori: segment.ori(),
            incident_number: segment.unique_identifier(),
        }
    }
}

/// Offense segment (`2`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offense {
    pub header: SegmentHeader,
    pub ucr_offense_code: Option<String>,
    pub offense_attempted_completed: Option<String>,
    pub offenders_suspected_of_using: Vec<Option<String>>,
    pub location_type: Option<String>,
    pub number_of_premises_entered: Option<i32>,
    pub method_of_entry: Option<String>,
    pub type_of_criminal_activity: Vec<Option<String>>,
    pub type_of_weapon_force_involved: Vec<Option<String>>,
    pub automatic_weapon_indicator: Vec<Option<String>>,
    pub bias_motivation: Vec<Option<String>>,
}

/// Property segment (`3`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub header: SegmentHeader,
    pub type_of_property_loss: Option<String>,
    pub property_description: Vec<Option<String>>,
    pub value_of_property: Vec<Option<i64>>,
    pub date_recovered: Vec<Option<NaiveDate>>,
    pub number_of_stolen_motor_vehicles: Option<i32>,
    pub number_of_recovered_motor_vehicles: Option<i32>,
    pub suspected_drug_type: Vec<Option<String>>,
    pub estimated_drug_quantity: Vec<Option<f64>>,
    pub type_drug_measurement: Vec<Option<String>>,
}

/// Victim segment (`4`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Victim {
    pub header: SegmentHeader,
    pub victim_sequence_number: Option<i32>,
    pub ucr_offense_code_connection: Vec<Option<String>>,
    pub type_of_victim: Option<String>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub resident_status: Option<String>,
    pub aggravated_assault_homicide_circumstances: Vec<Option<String>>,
    pub additional_justifiable_homicide_circumstances: Option<String>,
    pub type_of_injury: Vec<Option<String>>,
    pub offender_number_related: Vec<Option<i32>>,
    pub victim_offender_relationship: Vec<Option<String>>,
    /// LEOKA extension (141-character victim segments only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_of_officer_activity_circumstance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officer_assignment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub officer_other_jurisdiction_ori: Option<String>,
}

/// Offender segment (`5`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offender {
    pub header: SegmentHeader,
    pub offender_sequence_number: Option<i32>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
}

/// Arrestee, from a Group A arrestee segment (`6`) or a Group B arrest
/// report (`7`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrestee {
    pub header: SegmentHeader,
    pub arrestee_sequence_number: Option<i32>,
    pub arrest_transaction_number: Option<String>,
    pub arrest_date: Option<NaiveDate>,
    pub type_of_arrest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_arrestee_segments_indicator: Option<String>,
    pub ucr_arrest_offense_code: Option<String>,
    pub arrestee_armed_with: Vec<Option<String>>,
    pub automatic_weapon_indicator: Vec<Option<String>>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub resident_status: Option<String>,
    pub disposition_of_arrestee_under18: Option<String>,
}

/// A decoded detail segment, ready to attach to its incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "camelCase")]
pub enum Detail {
    Offense(Offense),
    Property(Property),
    Victim(Victim),
    Offender(Offender),
    Arrestee(Arrestee),
}

impl Detail {
    pub fn header(&self) -> &SegmentHeader {
        match self {
            Detail::Offense(o) => &o.header,
            Detail::Property(p) => &p.header,
            Detail::Victim(v) => &v.header,
            Detail::Offender(o) => &o.header,
            Detail::Arrestee(a) => &a.header,
        }
    }
}
