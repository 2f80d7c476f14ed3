//! Column tables for every NIBRS segment type.
//!
//! Positions are 1-based and inclusive. Columns 1-37 (length, type, action,
//! tape header, ORI, incident number) are read by the segment itself; the
//! tables below cover everything the segment type adds.

use super::field::Field::*;
use super::{Extension, FieldSpec, LengthProfile, SegmentLayout};
use crate::ledger::ErrorCode;
use crate::segment::{DetailType, ReportType};

// =============================================================================
// Report-level segments
// =============================================================================

/// Month and year of tape are mandatory on every report-level segment.
const TAPE_HEADER: &[FieldSpec] = &[
    FieldSpec::integer(MonthOfTape, 7, 8).required(),
    FieldSpec::integer(YearOfTape, 9, 12).required(),
    FieldSpec::text(CityIndicator, 13, 16),
];

const ZERO_REPORT_FIELDS: &[FieldSpec] = &[
    FieldSpec::integer(ZeroReportingMonth, 38, 39),
    FieldSpec::integer(ZeroReportingYear, 40, 43),
];

pub static ZERO_REPORT: SegmentLayout = SegmentLayout {
    length_error: ErrorCode::ZeroReportLength,
    profiles: &[LengthProfile {
        lengths: &[43],
        groups: &[TAPE_HEADER, ZERO_REPORT_FIELDS],
        extension: None,
    }],
};

const ADMINISTRATIVE_FIELDS: &[FieldSpec] = &[
    FieldSpec::date(IncidentDate, 38, 45),
    FieldSpec::text(ReportDateIndicator, 46, 46),
    FieldSpec::integer(IncidentHour, 47, 48),
    FieldSpec::text(ExceptionalClearance, 49, 49),
    FieldSpec::date(ExceptionalClearanceDate, 50, 57),
];

const CARGO_THEFT_FIELDS: &[FieldSpec] = &[FieldSpec::text(CargoTheftIndicator, 88, 88)];

pub static ADMINISTRATIVE: SegmentLayout = SegmentLayout {
    length_error: ErrorCode::AdministrativeLength,
    profiles: &[
        LengthProfile {
            lengths: &[87],
            groups: &[TAPE_HEADER, ADMINISTRATIVE_FIELDS],
            extension: None,
        },
        LengthProfile {
            lengths: &[88],
            groups: &[TAPE_HEADER, ADMINISTRATIVE_FIELDS, CARGO_THEFT_FIELDS],
            extension: Some(Extension::CargoTheft),
        },
    ],
};

/// Group B arrests reuse the incident-number columns for the transaction
/// number.
const GROUP_B_ARRESTEE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(ArrestTransactionNumber, 26, 37),
    FieldSpec::integer(ArresteeSequenceNumber, 38, 39),
    FieldSpec::date(ArrestDate, 40, 47),
    FieldSpec::text(TypeOfArrest, 48, 48),
    FieldSpec::text(UcrArrestOffenseCode, 49, 51),
    FieldSpec::text(ArresteeArmedWith, 52, 53).repeat(2, 3),
    FieldSpec::text(AutomaticWeaponIndicator, 54, 54).repeat(2, 3),
    FieldSpec::text(Age, 58, 61),
    FieldSpec::text(Sex, 62, 62),
    FieldSpec::text(Race, 63, 63),
    FieldSpec::text(Ethnicity, 64, 64),
    FieldSpec::text(ResidentStatus, 65, 65),
    FieldSpec::text(DispositionOfArresteeUnder18, 66, 66),
];

pub static GROUP_B_ARREST: SegmentLayout = SegmentLayout {
    length_error: ErrorCode::GroupBArresteeLength,
    profiles: &[LengthProfile {
        lengths: &[66],
        groups: &[TAPE_HEADER, GROUP_B_ARRESTEE_FIELDS],
        extension: None,
    }],
};

// =============================================================================
// Detail segments
// =============================================================================

const OFFENSE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(UcrOffenseCode, 38, 40),
    FieldSpec::text(OffenseAttemptedCompleted, 41, 41),
    FieldSpec::text(OffendersSuspectedOfUsing, 42, 42).repeat(3, 1),
    FieldSpec::text(LocationType, 45, 46),
    FieldSpec::integer(NumberOfPremisesEntered, 47, 48),
    FieldSpec::text(MethodOfEntry, 49, 49),
    FieldSpec::text(TypeOfCriminalActivity, 50, 50).repeat(3, 1),
    FieldSpec::text(TypeOfWeaponForceInvolved, 53, 54).repeat(3, 3),
    FieldSpec::text(AutomaticWeaponIndicator, 55, 55).repeat(3, 3),
];

const SINGLE_BIAS_MOTIVATION: &[FieldSpec] = &[FieldSpec::text(BiasMotivation, 62, 63)];

const BIAS_MOTIVATIONS: &[FieldSpec] = &[FieldSpec::text(BiasMotivation, 62, 63).repeat(5, 2)];

pub static OFFENSE: SegmentLayout = SegmentLayout {
    length_error: ErrorCode::OffenseLength,
    profiles: &[
        LengthProfile {
            lengths: &[63],
            groups: &[OFFENSE_FIELDS, SINGLE_BIAS_MOTIVATION],
            extension: None,
        },
        LengthProfile {
            lengths: &[71],
            groups: &[OFFENSE_FIELDS, BIAS_MOTIVATIONS],
            extension: Some(Extension::MultipleBiasMotivations),
        },
    ],
};

const PROPERTY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(TypeOfPropertyLoss, 38, 38),
    FieldSpec::text(PropertyDescription, 39, 40).repeat(10, 19),
    FieldSpec::integer(ValueOfProperty, 41, 49).repeat(10, 19),
    FieldSpec::date(DateRecovered, 50, 57).repeat(10, 19),
    FieldSpec::integer(NumberOfStolenMotorVehicles, 229, 230),
    FieldSpec::integer(NumberOfRecoveredMotorVehicles, 231, 232),
    FieldSpec::text(SuspectedDrugType, 233, 233).repeat(3, 15),
    FieldSpec::quantity(EstimatedDrugQuantity, 234, 245).repeat(3, 15),
    FieldSpec::text(TypeDrugMeasurement, 246, 247).repeat(3, 15),
];

pub static PROPERTY: SegmentLayout = SegmentLayout {
    length_error: ErrorCode::PropertyLength,
    profiles: &[LengthProfile {
        lengths: &[307],
        groups: &[PROPERTY_FIELDS],
        extension: None,
    }],
};

const VICTIM_FIELDS: &[FieldSpec] = &[
    FieldSpec::integer(VictimSequenceNumber, 38, 40),
    FieldSpec::text(UcrOffenseCodeConnection, 41, 43).repeat(10, 3),
    FieldSpec::text(TypeOfVictim, 71, 71),
    FieldSpec::text(Age, 72, 75),
    FieldSpec::text(Sex, 76, 76),
    FieldSpec::text(Race, 77, 77),
    FieldSpec::text(Ethnicity, 78, 78),
    FieldSpec::text(ResidentStatus, 79, 79),
    FieldSpec::text(AggravatedAssaultHomicideCircumstances, 80, 81).repeat(2, 2),
    FieldSpec::text(AdditionalJustifiableHomicideCircumstances, 84, 84),
    FieldSpec::text(TypeOfInjury, 85, 85).repeat(5, 1),
    FieldSpec::integer(OffenderNumberRelated, 90, 91).repeat(10, 4),
    FieldSpec::text(VictimOffenderRelationship, 92, 93).repeat(10, 4),
];

const LEOKA_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(TypeOfOfficerActivityCircumstance, 130, 131),
    FieldSpec::text(OfficerAssignmentType, 132, 132),
    FieldSpec::text(OfficerOtherJurisdictionOri, 133, 141),
];

pub static VICTIM: SegmentLayout = SegmentLayout {
    length_error: ErrorCode::VictimLength,
    profiles: &[
        LengthProfile {
            lengths: &[129],
            groups: &[VICTIM_FIELDS],
            extension: None,
        },
        LengthProfile {
            lengths: &[141],
            groups: &[VICTIM_FIELDS, LEOKA_FIELDS],
            extension: Some(Extension::Leoka),
        },
    ],
};

const OFFENDER_FIELDS: &[FieldSpec] = &[
    FieldSpec::integer(OffenderSequenceNumber, 38, 39),
    FieldSpec::text(Age, 40, 43),
    FieldSpec::text(Sex, 44, 44),
    FieldSpec::text(Race, 45, 45),
];

const OFFENDER_ETHNICITY: &[FieldSpec] = &[FieldSpec::text(Ethnicity, 46, 46)];

pub static OFFENDER: SegmentLayout = SegmentLayout {
    length_error: ErrorCode::OffenderLength,
    profiles: &[
        LengthProfile {
            lengths: &[45],
            groups: &[OFFENDER_FIELDS],
            extension: None,
        },
        LengthProfile {
            lengths: &[46],
            groups: &[OFFENDER_FIELDS, OFFENDER_ETHNICITY],
            extension: Some(Extension::OffenderEthnicity),
        },
    ],
};

const GROUP_A_ARRESTEE_FIELDS: &[FieldSpec] = &[
    FieldSpec::integer(ArresteeSequenceNumber, 38, 39),
    FieldSpec::text(ArrestTransactionNumber, 40, 51),
    FieldSpec::date(ArrestDate, 52, 59),
    FieldSpec::text(TypeOfArrest, 60, 60),
    FieldSpec::text(MultipleArresteeSegmentsIndicator, 61, 61),
    FieldSpec::text(UcrArrestOffenseCode, 62, 64),
    FieldSpec::text(ArresteeArmedWith, 65, 66).repeat(2, 3),
    FieldSpec::text(AutomaticWeaponIndicator, 67, 67).repeat(2, 3),
    FieldSpec::text(Age, 71, 74),
    FieldSpec::text(Sex, 75, 75),
    FieldSpec::text(Race, 76, 76),
    FieldSpec::text(Ethnicity, 77, 77),
    FieldSpec::text(ResidentStatus, 78, 78),
    FieldSpec::text(DispositionOfArresteeUnder18, 79, 79),
];

pub static GROUP_A_ARRESTEE: SegmentLayout = SegmentLayout {
    length_error: ErrorCode::GroupAArresteeLength,
    profiles: &[LengthProfile {
        lengths: &[110],
        groups: &[GROUP_A_ARRESTEE_FIELDS],
        extension: None,
    }],
};

// =============================================================================
// Lookup
// =============================================================================

pub fn report_layout(report_type: ReportType) -> &'static SegmentLayout {
    match report_type {
        ReportType::Zero => &ZERO_REPORT,
        ReportType::GroupAIncident => &ADMINISTRATIVE,
        ReportType::GroupBArrest => &GROUP_B_ARREST,
    }
}

pub fn detail_layout(detail_type: DetailType) -> &'static SegmentLayout {
    match detail_type {
        DetailType::Offense => &OFFENSE,
        DetailType::Property => &PROPERTY,
        DetailType::Victim => &VICTIM,
        DetailType::Offender => &OFFENDER,
        DetailType::Arrestee => &GROUP_A_ARRESTEE,
    }
}
