//! Logical field identities.
//!
//! A [`Field`] names what a column range means, independent of where it sits
//! in a particular segment type. Field-level errors are keyed on it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every logical field a layout table can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    // Report-level header
    MonthOfTape,
    YearOfTape,
    CityIndicator,

    // Zero report
    ZeroReportingMonth,
    ZeroReportingYear,

    // Group A administrative
    IncidentDate,
    ReportDateIndicator,
    IncidentHour,
    ExceptionalClearance,
    ExceptionalClearanceDate,
    CargoTheftIndicator,

    // Offense
    UcrOffenseCode,
    OffenseAttemptedCompleted,
    OffendersSuspectedOfUsing,
    LocationType,
    NumberOfPremisesEntered,
    MethodOfEntry,
    TypeOfCriminalActivity,
    TypeOfWeaponForceInvolved,
    BiasMotivation,

    // Property
    TypeOfPropertyLoss,
    PropertyDescription,
    ValueOfProperty,
    DateRecovered,
    NumberOfStolenMotorVehicles,
    NumberOfRecoveredMotorVehicles,
    SuspectedDrugType,
    EstimatedDrugQuantity,
    TypeDrugMeasurement,

    // Victim
    VictimSequenceNumber,
    UcrOffenseCodeConnection,
    TypeOfVictim,
    AggravatedAssaultHomicideCircumstances,
    AdditionalJustifiableHomicideCircumstances,
    TypeOfInjury,
    OffenderNumberRelated,
    VictimOffenderRelationship,
    TypeOfOfficerActivityCircumstance,
    OfficerAssignmentType,
    OfficerOtherJurisdictionOri,

    // Offender
    OffenderSequenceNumber,

    // Arrestee (Group A and Group B)
    ArresteeSequenceNumber,
    ArrestTransactionNumber,
    ArrestDate,
    TypeOfArrest,
    MultipleArresteeSegmentsIndicator,
    UcrArrestOffenseCode,
    ArresteeArmedWith,
    AutomaticWeaponIndicator,
    DispositionOfArresteeUnder18,

    // Person descriptors shared by victim, offender and arrestee
    Age,
    Sex,
    Race,
    Ethnicity,
    ResidentStatus,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
