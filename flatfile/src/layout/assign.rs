//! Field routing for every decoded entity.
//!
//! Each entity accepts the fields it owns and ignores the rest, so the same
//! table-driven extraction works for every segment type.

use super::{put, Assign, Field, FieldValue};
use crate::models::{
    Arrestee, GroupAIncident, GroupBArrest, Offender, Offense, Property, ReportHeader, Victim,
    ZeroReport,
};

fn text(value: Option<FieldValue>) -> Option<String> {
    value.and_then(FieldValue::into_text)
}

fn int(value: &Option<FieldValue>) -> Option<i32> {
    value.as_ref().and_then(FieldValue::as_i32)
}

impl Assign for ReportHeader {
    fn assign(&mut self, field: Field, _index: usize, value: Option<FieldValue>) {
        match field {
            Field::MonthOfTape => self.month_of_tape = int(&value),
            Field::YearOfTape => self.year_of_tape = int(&value),
            Field::CityIndicator => self.city_indicator = text(value),
            _ => {}
        }
    }
}

impl Assign for ZeroReport {
    fn assign(&mut self, field: Field, index: usize, value: Option<FieldValue>) {
        match field {
            Field::ZeroReportingMonth => self.zero_reporting_month = int(&value),
            Field::ZeroReportingYear => self.zero_reporting_year = int(&value),
            _ => self.header.assign(field, index, value),
        }
    }
}

impl Assign for GroupAIncident {
    fn assign(&mut self, field: Field, index: usize, value: Option<FieldValue>) {
        match field {
            Field::IncidentDate => {
                self.incident_date = value.as_ref().and_then(FieldValue::as_date)
            }
            Field::ReportDateIndicator => self.report_date_indicator = text(value),
            Field::IncidentHour => self.incident_hour = int(&value),
            Field::ExceptionalClearance => self.exceptional_clearance_code = text(value),
            Field::ExceptionalClearanceDate => {
                self.exceptional_clearance_date = value.as_ref().and_then(FieldValue::as_date)
            }
            Field::CargoTheftIndicator => self.cargo_theft_indicator = text(value),
            _ => self.header.assign(field, index, value),
        }
    }
}

impl Assign for GroupBArrest {
    fn assign(&mut self, field: Field, index: usize, value: Option<FieldValue>) {
        match field {
            Field::MonthOfTape | Field::YearOfTape | Field::CityIndicator => {
                self.header.assign(field, index, value)
            }
            _ => self.arrestee.assign(field, index, value),
        }
    }
}

impl Assign for Offense {
    fn assign(&mut self, field: Field, index: usize, value: Option<FieldValue>) {
        match field {
            Field::UcrOffenseCode => self.ucr_offense_code = text(value),
            Field::OffenseAttemptedCompleted => self.offense_attempted_completed = text(value),
            Field::OffendersSuspectedOfUsing => {
                put(&mut self.offenders_suspected_of_using, index, text(value))
            }
            Field::LocationType => self.location_type = text(value),
            Field::NumberOfPremisesEntered => self.number_of_premises_entered = int(&value),
            Field::MethodOfEntry => self.method_of_entry = text(value),
            Field::TypeOfCriminalActivity => {
                put(&mut self.type_of_criminal_activity, index, text(value))
            }
            Field::TypeOfWeaponForceInvolved => {
                put(&mut self.type_of_weapon_force_involved, index, text(value))
            }
            Field::AutomaticWeaponIndicator => {
                put(&mut self.automatic_weapon_indicator, index, text(value))
            }
            Field::BiasMotivation => put(&mut self.bias_motivation, index, text(value)),
            _ => {}
        }
    }
}

impl Assign for Property {
    fn assign(&mut self, field: Field, index: usize, value: Option<FieldValue>) {
        match field {
            Field::TypeOfPropertyLoss => self.type_of_property_loss = text(value),
            Field::PropertyDescription => {
                put(&mut self.property_description, index, text(value))
            }
            Field::ValueOfProperty => put(
                &mut self.value_of_property,
                index,
                value.as_ref().and_then(FieldValue::as_i64),
            ),
            Field::DateRecovered => put(
                &mut self.date_recovered,
                index,
                value.as_ref().and_then(FieldValue::as_date),
            ),
            Field::NumberOfStolenMotorVehicles => {
                self.number_of_stolen_motor_vehicles = int(&value)
            }
            Field::NumberOfRecoveredMotorVehicles => {
                self.number_of_recovered_motor_vehicles = int(&value)
            }
            Field::SuspectedDrugType => put(&mut self.suspected_drug_type, index, text(value)),
            Field::EstimatedDrugQuantity => put(
                &mut self.estimated_drug_quantity,
                index,
                value.as_ref().and_then(FieldValue::as_f64),
            ),
            Field::TypeDrugMeasurement => {
                put(&mut self.type_drug_measurement, index, text(value))
            }
            _ => {}
        }
    }
}

impl Assign for Victim {
    fn assign(&mut self, field: Field, index: usize, value: Option<FieldValue>) {
        match field {
            Field::VictimSequenceNumber => self.victim_sequence_number = int(&value),
            Field::UcrOffenseCodeConnection => {
                put(&mut self.ucr_offense_code_connection, index, text(value))
            }
            Field::TypeOfVictim => self.type_of_victim = text(value),
            Field::Age => self.age = text(value),
            Field::Sex => self.sex = text(value),
            Field::Race => self.race = text(value),
            Field::Ethnicity => self.ethnicity = text(value),
            Field::ResidentStatus => self.resident_status = text(value),
            Field::AggravatedAssaultHomicideCircumstances => put(
                &mut self.aggravated_assault_homicide_circumstances,
                index,
                text(value),
            ),
            Field::AdditionalJustifiableHomicideCircumstances => {
                self.additional_justifiable_homicide_circumstances = text(value)
            }
            Field::TypeOfInjury => put(&mut self.type_of_injury, index, text(value)),
            Field::OffenderNumberRelated => {
                put(&mut self.offender_number_related, index, int(&value))
            }
            Field::VictimOffenderRelationship => {
                put(&mut self.victim_offender_relationship, index, text(value))
            }
            Field::TypeOfOfficerActivityCircumstance => {
                self.type_of_officer_activity_circumstance = text(value)
            }
            Field::OfficerAssignmentType => self.officer_assignment_type = text(value),
            Field::OfficerOtherJurisdictionOri => {
                self.officer_other_jurisdiction_ori = text(value)
            }
            _ => {}
        }
    }
}

impl Assign for Offender {
    fn assign(&mut self, field: Field, _index: usize, value: Option<FieldValue>) {
        match field {
            Field::OffenderSequenceNumber => self.offender_sequence_number = int(&value),
            Field::Age => self.age = text(value),
            Field::Sex => self.sex = text(value),
            Field::Race => self.race = text(value),
            Field::Ethnicity => self.ethnicity = text(value),
            _ => {}
        }
    }
}

impl Assign for Arrestee {
    fn assign(&mut self, field: Field, index: usize, value: Option<FieldValue>) {
        match field {
            Field::ArresteeSequenceNumber => self.arrestee_sequence_number = int(&value),
            Field::ArrestTransactionNumber => self.arrest_transaction_number = text(value),
            Field::ArrestDate => self.arrest_date = value.as_ref().and_then(FieldValue::as_date),
            Field::TypeOfArrest => self.type_of_arrest = text(value),
            Field::MultipleArresteeSegmentsIndicator => {
                self.multiple_arrestee_segments_indicator = text(value)
            }
            Field::UcrArrestOffenseCode => self.ucr_arrest_offense_code = text(value),
            Field::ArresteeArmedWith => put(&mut self.arrestee_armed_with, index, text(value)),
            Field::AutomaticWeaponIndicator => {
                put(&mut self.automatic_weapon_indicator, index, text(value))
            }
            Field::Age => self.age = text(value),
            Field::Sex => self.sex = text(value),
            Field::Race => self.race = text(value),
            Field::Ethnicity => self.ethnicity = text(value),
            Field::ResidentStatus => self.resident_status = text(value),
            Field::DispositionOfArresteeUnder18 => {
                self.disposition_of_arrestee_under18 = text(value)
            }
            _ => {}
        }
    }
}
