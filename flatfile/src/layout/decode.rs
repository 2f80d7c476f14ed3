//! Segment decoding: pick the length profile, extract, and classify the
//! outcome.

use super::tables::{detail_layout, report_layout};
use super::{extract, Assign, Extension, SegmentLayout};
use crate::ledger::{DecodeError, ErrorKind};
use crate::models::{
    Arrestee, Detail, GroupAIncident, GroupBArrest, Offender, Offense, Property, Report,
    ReportHeader, SegmentHeader, Victim, ZeroReport,
};
use crate::segment::{DetailType, ReportType, Segment};

/// An entity together with the errors found while decoding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub entity: T,
    pub errors: Vec<DecodeError>,
    /// Extension block selected by the segment length, if any.
    pub extension: Option<Extension>,
}

impl<T> Decoded<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            entity: f(self.entity),
            errors: self.errors,
            extension: self.extension,
        }
    }
}

fn fill<T: Assign>(segment: &Segment, layout: &SegmentLayout, mut entity: T) -> Decoded<T> {
    match layout.profile_for(segment.length()) {
        Some(profile) => {
            let errors = extract(segment, profile, &mut entity);
            Decoded {
                entity,
                errors,
                extension: profile.extension,
            }
        }
        None => {
            let error = DecodeError::new(layout.length_error, segment.context())
                .with_segment_type(segment.type_char())
                .with_value(segment.length().to_string());
            Decoded {
                entity,
                errors: vec![error],
                extension: None,
            }
        }
    }
}

/// Decode a Group A detail segment.
///
/// A length that matches no profile still yields an entity carrying only
/// the shared header columns, plus one length error.
pub fn decode_detail(segment: &Segment, detail_type: DetailType) -> Decoded<Detail> {
    let layout = detail_layout(detail_type);
    let header = SegmentHeader::from_segment(segment);

    match detail_type {
        DetailType::Offense => fill(
            segment,
            layout,
            Offense {
                header,
                ..Default::default()
            },
        )
        .map(Detail::Offense),
        DetailType::Property => fill(
            segment,
            layout,
            Property {
                header,
                ..Default::default()
            },
        )
        .map(Detail::Property),
        DetailType::Victim => fill(
            segment,
            layout,
            Victim {
                header,
                ..Default::default()
            },
        )
        .map(Detail::Victim),
        DetailType::Offender => fill(
            segment,
            layout,
            Offender {
                header,
                ..Default::default()
            },
        )
        .map(Detail::Offender),
        DetailType::Arrestee => fill(
            segment,
            layout,
            Arrestee {
                header,
                ..Default::default()
            },
        )
        .map(Detail::Arrestee),
    }
}

/// Outcome of decoding a report-level segment.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportDecode {
    /// A new report begins. `errors` are field-level problems that belong
    /// to it.
    Started {
        report: Report,
        errors: Vec<DecodeError>,
    },
    /// The segment cannot start a report (bad length or unreadable tape
    /// month/year).
    Rejected(Vec<DecodeError>),
}

/// Decode a report-level segment.
pub fn decode_report(segment: &Segment, report_type: ReportType) -> ReportDecode {
    let layout = report_layout(report_type);
    let header = ReportHeader::from_segment(segment);

    let decoded = match report_type {
        ReportType::Zero => fill(
            segment,
            layout,
            ZeroReport {
                header,
                zero_reporting_month: None,
                zero_reporting_year: None,
                has_upstream_errors: false,
            },
        )
        .map(Report::Zero),
        ReportType::GroupAIncident => {
            let mut incident = GroupAIncident::new(header);
            incident.incident_number = segment.unique_identifier();
            let mut decoded = fill(segment, layout, incident);
            decoded.entity.includes_cargo_theft = decoded.extension == Some(Extension::CargoTheft);
            decoded.map(Report::GroupA)
        }
        ReportType::GroupBArrest => {
            let arrest = GroupBArrest {
                header,
                arrestee: Arrestee {
                    header: SegmentHeader::from_segment(segment),
                    ..Default::default()
                },
                has_upstream_errors: false,
            };
            fill(segment, layout, arrest).map(Report::GroupB)
        }
    };

    if decoded
        .errors
        .iter()
        .any(|e| e.kind == ErrorKind::Structural)
    {
        return ReportDecode::Rejected(decoded.errors);
    }

    let mut report = decoded.entity;
    if !decoded.errors.is_empty() {
        report.mark_upstream_errors();
    }
    ReportDecode::Started {
        report,
        errors: decoded.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Field;
    use crate::ledger::ErrorCode;
    use crate::testing::{self, LineBuilder};
    use chrono::NaiveDate;

    fn started(decode: ReportDecode) -> (Report, Vec<DecodeError>) {
        match decode {
            ReportDecode::Started { report, errors } => (report, errors),
            ReportDecode::Rejected(errors) => panic!("rejected: {:?}", errors),
        }
    }

    #[test]
    fn test_decode_administrative() {
        let seg = testing::segment(&testing::administrative("INC-0001"), 1);
        let (report, errors) = started(decode_report(&seg, ReportType::GroupAIncident));
        assert!(errors.is_empty());

        let incident = report.as_group_a().unwrap();
        assert_eq!(incident.incident_number.as_deref(), Some("INC-0001"));
        assert_eq!(incident.header.ori.as_deref(), Some(testing::ORI));
        assert_eq!(incident.header.month_of_tape, Some(2));
        assert_eq!(incident.header.year_of_tape, Some(2016));
        assert_eq!(
            incident.incident_date,
            NaiveDate::from_ymd_opt(2016, 1, 15)
        );
        assert_eq!(incident.incident_hour, Some(14));
        assert_eq!(incident.exceptional_clearance_code.as_deref(), Some("N"));
        assert!(!incident.includes_cargo_theft);
        assert!(!incident.has_upstream_errors);
    }

    #[test]
    fn test_cargo_theft_length_sets_flag() {
        let line = LineBuilder::new('1', 88)
            .tape("02", "2016")
            .identifier("INC-CT")
            .set(88, "Y")
            .build();
        let seg = testing::segment(&line, 1);
        let (report, _) = started(decode_report(&seg, ReportType::GroupAIncident));
        let incident = report.as_group_a().unwrap();
        assert!(incident.includes_cargo_theft);
        assert_eq!(incident.cargo_theft_indicator.as_deref(), Some("Y"));
    }

    #[test]
    fn test_bad_incident_date_flags_report() {
        let line = LineBuilder::new('1', 87)
            .tape("02", "2016")
            .identifier("INC-0002")
            .set(38, "2016X115")
            .build();
        let seg = testing::segment(&line, 4);
        let (report, errors) = started(decode_report(&seg, ReportType::GroupAIncident));

        assert!(report.has_upstream_errors());
        assert_eq!(report.as_group_a().unwrap().incident_date, None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::InvalidValue(Field::IncidentDate));
        assert_eq!(errors[0].value.as_deref(), Some("2016X115"));
    }

    #[test]
    fn test_unreadable_tape_year_rejects_report() {
        let line = LineBuilder::new('1', 87)
            .tape("02", "20X6")
            .identifier("INC-0003")
            .build();
        let seg = testing::segment(&line, 1);
        match decode_report(&seg, ReportType::GroupAIncident) {
            ReportDecode::Rejected(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, ErrorKind::Structural);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_tape_month_rejects_report() {
        let line = LineBuilder::new('1', 87)
            .tape("  ", "2016")
            .identifier("INC-0004")
            .build();
        let seg = testing::segment(&line, 1);
        match decode_report(&seg, ReportType::GroupAIncident) {
            ReportDecode::Rejected(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].code, ErrorCode::InvalidValue(Field::MonthOfTape));
                assert_eq!(errors[0].kind, ErrorKind::Structural);
                assert_eq!(errors[0].value.as_deref(), Some(""));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_group_b_tape_rejects_report() {
        let line = LineBuilder::new('7', 66)
            .tape("  ", "    ")
            .identifier("TXN-0001")
            .build();
        let seg = testing::segment(&line, 1);
        match decode_report(&seg, ReportType::GroupBArrest) {
            ReportDecode::Rejected(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().all(|e| e.kind == ErrorKind::Structural));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_report_length_rejects() {
        let line = LineBuilder::new('0', 40).tape("02", "2016").build();
        let seg = testing::segment(&line, 1);
        match decode_report(&seg, ReportType::Zero) {
            ReportDecode::Rejected(errors) => {
                assert_eq!(errors[0].code, ErrorCode::ZeroReportLength);
                assert_eq!(errors[0].value.as_deref(), Some("40"));
                assert_eq!(errors[0].nibrs_code(), "001");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_report_fields() {
        let seg = testing::segment(&testing::zero_report(), 1);
        let (report, errors) = started(decode_report(&seg, ReportType::Zero));
        assert!(errors.is_empty());
        match report {
            Report::Zero(zero) => {
                assert_eq!(zero.zero_reporting_month, Some(2));
                assert_eq!(zero.zero_reporting_year, Some(2016));
            }
            other => panic!("expected zero report, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_zero_reporting_month_flags_report() {
        let line = LineBuilder::new('0', 43)
            .tape("02", "2016")
            .set(38, "X2")
            .set(40, "2016")
            .build();
        let seg = testing::segment(&line, 1);
        let (report, errors) = started(decode_report(&seg, ReportType::Zero));

        assert!(report.has_upstream_errors());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].code,
            ErrorCode::InvalidValue(Field::ZeroReportingMonth)
        );
    }

    #[test]
    fn test_group_b_arrest() {
        let seg = testing::segment(&testing::group_b_arrest("TXN-77"), 1);
        let (report, errors) = started(decode_report(&seg, ReportType::GroupBArrest));
        assert!(errors.is_empty());

        let arrest = report.as_group_b().unwrap();
        assert_eq!(
            arrest.arrestee.arrest_transaction_number.as_deref(),
            Some("TXN-77")
        );
        assert_eq!(arrest.arrestee.arrest_date, NaiveDate::from_ymd_opt(2016, 2, 3));
        assert_eq!(arrest.arrestee.ucr_arrest_offense_code.as_deref(), Some("90D"));
        assert_eq!(
            arrest.arrestee.arrestee_armed_with,
            vec![Some("01".to_string()), None]
        );
        assert_eq!(arrest.arrestee.age.as_deref(), Some("33"));
        assert_eq!(report.unique_description(), "Group B arrest ORI=WA1234567 #TXN-77");
    }

    #[test]
    fn test_decode_offense() {
        let seg = testing::segment(&testing::offense("INC-0001"), 2);
        let decoded = decode_detail(&seg, DetailType::Offense);
        assert!(decoded.errors.is_empty());
        match decoded.entity {
            Detail::Offense(offense) => {
                assert_eq!(offense.ucr_offense_code.as_deref(), Some("13A"));
                assert_eq!(offense.location_type.as_deref(), Some("20"));
                assert_eq!(offense.offenders_suspected_of_using, vec![Some("N".into()), None, None]);
                assert_eq!(offense.type_of_weapon_force_involved[0].as_deref(), Some("40"));
                assert_eq!(offense.bias_motivation, vec![Some("88".to_string())]);
                assert_eq!(offense.header.incident_number.as_deref(), Some("INC-0001"));
            }
            other => panic!("expected offense, got {:?}", other),
        }
    }

    #[test]
    fn test_offense_with_five_bias_motivations() {
        let line = LineBuilder::new('2', 71)
            .identifier("INC-0001")
            .set(38, "13A")
            .set(62, "88")
            .set(64, "11")
            .set(70, "22")
            .build();
        let seg = testing::segment(&line, 2);
        let decoded = decode_detail(&seg, DetailType::Offense);
        assert_eq!(decoded.extension, Some(Extension::MultipleBiasMotivations));
        match decoded.entity {
            Detail::Offense(offense) => assert_eq!(
                offense.bias_motivation,
                vec![
                    Some("88".to_string()),
                    Some("11".to_string()),
                    None,
                    None,
                    Some("22".to_string())
                ]
            ),
            other => panic!("expected offense, got {:?}", other),
        }
    }

    #[test]
    fn test_leoka_victim_extension() {
        let seg = testing::segment(&testing::leoka_victim("INC-0001"), 3);
        let decoded = decode_detail(&seg, DetailType::Victim);
        assert_eq!(decoded.extension, Some(Extension::Leoka));
        match decoded.entity {
            Detail::Victim(victim) => {
                assert_eq!(victim.type_of_victim.as_deref(), Some("L"));
                assert_eq!(victim.type_of_officer_activity_circumstance.as_deref(), Some("01"));
                assert_eq!(victim.officer_assignment_type.as_deref(), Some("F"));
                assert_eq!(victim.officer_other_jurisdiction_ori, None);
            }
            other => panic!("expected victim, got {:?}", other),
        }
    }

    #[test]
    fn test_property_values_and_drug_quantity() {
        let line = LineBuilder::new('3', 307)
            .identifier("INC-0001")
            .set(38, "7")
            .set(39, "13")
            .set(41, "000000500")
            .set(58, "20")
            .set(60, "0000000XX")
            .set(233, "E")
            .set(234, "000000012500")
            .set(246, "GM")
            .build();
        let seg = testing::segment(&line, 3);
        let decoded = decode_detail(&seg, DetailType::Property);

        assert_eq!(decoded.errors.len(), 1);
        assert_eq!(
            decoded.errors[0].code,
            ErrorCode::InvalidValue(Field::ValueOfProperty)
        );
        assert_eq!(decoded.errors[0].nibrs_code(), "304");
        match decoded.entity {
            Detail::Property(property) => {
                assert_eq!(property.type_of_property_loss.as_deref(), Some("7"));
                assert_eq!(property.value_of_property.len(), 10);
                assert_eq!(property.value_of_property[0], Some(500));
                assert_eq!(property.value_of_property[1], None);
                assert_eq!(property.property_description[1].as_deref(), Some("20"));
                assert_eq!(property.estimated_drug_quantity[0], Some(12.5));
                assert_eq!(property.type_drug_measurement[0].as_deref(), Some("GM"));
                assert_eq!(property.suspected_drug_type[1], None);
            }
            other => panic!("expected property, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_group_a_arrestee() {
        let seg = testing::segment(&testing::arrestee("INC-0001"), 6);
        let decoded = decode_detail(&seg, DetailType::Arrestee);
        assert!(decoded.errors.is_empty());
        assert_eq!(decoded.extension, None);
        match decoded.entity {
            Detail::Arrestee(arrestee) => {
                assert_eq!(arrestee.header.incident_number.as_deref(), Some("INC-0001"));
                assert_eq!(arrestee.arrestee_sequence_number, Some(1));
                assert_eq!(arrestee.arrest_transaction_number.as_deref(), Some("ARR-0001"));
                assert_eq!(arrestee.arrest_date, NaiveDate::from_ymd_opt(2016, 1, 20));
                assert_eq!(arrestee.type_of_arrest.as_deref(), Some("T"));
                assert_eq!(arrestee.multiple_arrestee_segments_indicator.as_deref(), Some("N"));
                assert_eq!(arrestee.ucr_arrest_offense_code.as_deref(), Some("13A"));
                assert_eq!(arrestee.arrestee_armed_with, vec![Some("12".to_string()), None]);
                assert_eq!(arrestee.automatic_weapon_indicator, vec![Some("A".to_string()), None]);
                assert_eq!(arrestee.age.as_deref(), Some("19"));
                assert_eq!(arrestee.sex.as_deref(), Some("M"));
                assert_eq!(arrestee.race.as_deref(), Some("W"));
                assert_eq!(arrestee.ethnicity, None);
                assert_eq!(arrestee.resident_status.as_deref(), Some("R"));
                assert_eq!(arrestee.disposition_of_arrestee_under18, None);
            }
            other => panic!("expected arrestee, got {:?}", other),
        }
    }

    #[test]
    fn test_group_a_arrestee_length_mismatch() {
        let line = LineBuilder::new('6', 80).identifier("INC-0001").set(38, "01").build();
        let seg = testing::segment(&line, 6);
        let decoded = decode_detail(&seg, DetailType::Arrestee);

        assert_eq!(decoded.errors.len(), 1);
        assert_eq!(decoded.errors[0].code, ErrorCode::GroupAArresteeLength);
        assert_eq!(decoded.errors[0].kind, ErrorKind::Structural);
        assert_eq!(decoded.errors[0].value.as_deref(), Some("80"));
        assert_eq!(decoded.errors[0].nibrs_code(), "601");
        match decoded.entity {
            Detail::Arrestee(arrestee) => {
                assert_eq!(arrestee.header.segment_type, '6');
                assert_eq!(arrestee.arrestee_sequence_number, None);
            }
            other => panic!("expected arrestee, got {:?}", other),
        }
    }

    #[test]
    fn test_length_mismatch_yields_header_only_detail() {
        let line = LineBuilder::new('5', 50).identifier("INC-0001").set(44, "M").build();
        let seg = testing::segment(&line, 5);
        let decoded = decode_detail(&seg, DetailType::Offender);

        assert_eq!(decoded.errors.len(), 1);
        assert_eq!(decoded.errors[0].code, ErrorCode::OffenderLength);
        assert_eq!(decoded.errors[0].value.as_deref(), Some("50"));
        match decoded.entity {
            Detail::Offender(offender) => {
                assert_eq!(offender.header.segment_type, '5');
                assert_eq!(offender.header.ori.as_deref(), Some(testing::ORI));
                assert_eq!(offender.sex, None);
            }
            other => panic!("expected offender, got {:?}", other),
        }
    }
}
