//! Segment-driven report assembly.
//!
//! The assembler holds at most one report under construction. Every
//! report-level segment that decodes cleanly finalizes the previous report
//! and starts a new one; detail segments attach to the Group A incident
//! being built.
//!
//! ```text
//!            report-level (ok)                 report-level (ok)
//!   Idle ───────────────────────▶ Building ─────────────────────▶ Building
//!                                  │    ▲     emits previous report
//!                                  └────┘
//!                              detail segment
//! ```
//!
//! The assembler is a plain value: feed it classified lines with
//! [`Assembler::step`] and call [`Assembler::finish`] at end of input.

use std::mem;

use crate::config::HandoffPolicy;
use crate::error::{IngestError, IngestResult};
use crate::layout::{decode_detail, decode_report, Extension, ReportDecode};
use crate::ledger::{DecodeError, ErrorCode, ErrorKind, ErrorLedger, ErrorTotals, ReportRef};
use crate::models::Report;
use crate::segment::{DetailType, ReportType, Segment, SegmentType};

/// Assembly state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AssemblerState {
    /// No report under construction.
    #[default]
    Idle,
    Building(Report),
}

/// A report leaving the assembler, with the errors attributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedReport {
    pub report: Report,
    pub reference: ReportRef,
    pub errors: Vec<DecodeError>,
}

/// What is left once the input is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The report that was still under construction.
    pub last: Option<FinalizedReport>,
    /// Errors raised after the last report, with no report to own them.
    pub unattributed: Vec<DecodeError>,
    pub totals: ErrorTotals,
    pub reports_built: u64,
}

/// Single-pass report assembler.
#[derive(Debug)]
pub struct Assembler {
    state: AssemblerState,
    ledger: ErrorLedger,
    handoff: HandoffPolicy,
    built: u64,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(HandoffPolicy::default())
    }
}

impl Assembler {
    pub fn new(handoff: HandoffPolicy) -> Self {
        Self {
            state: AssemblerState::Idle,
            ledger: ErrorLedger::new(),
            handoff,
            built: 0,
        }
    }

    pub fn state(&self) -> &AssemblerState {
        &self.state
    }

    /// Errors waiting for the next finalized report.
    pub fn pending_errors(&self) -> &[DecodeError] {
        self.ledger.pending()
    }

    /// Consume one classified line.
    ///
    /// Returns the report this line finalized, if any. Only an `Abort`
    /// hand-off policy makes this fail.
    pub fn step(
        &mut self,
        classified: Result<Segment, DecodeError>,
    ) -> IngestResult<Option<FinalizedReport>> {
        let segment = match classified {
            Ok(segment) => segment,
            Err(error) => {
                if error.kind == ErrorKind::Dispatch {
                    self.mark_incident();
                }
                self.ledger.record(error);
                return Ok(None);
            }
        };

        match segment.segment_type() {
            SegmentType::Report(report_type) => Ok(self.start_report(&segment, report_type)),
            SegmentType::Detail(detail_type) => {
                self.attach_detail(&segment, detail_type)?;
                Ok(None)
            }
        }
    }

    /// Finalize whatever is under construction and drain the ledger.
    pub fn finish(mut self) -> Completion {
        let last = self.finalize();
        let unattributed = self.ledger.take_unattributed();
        Completion {
            last,
            unattributed,
            totals: self.ledger.totals(),
            reports_built: self.built,
        }
    }

    fn start_report(&mut self, segment: &Segment, report_type: ReportType) -> Option<FinalizedReport> {
        match decode_report(segment, report_type) {
            ReportDecode::Rejected(errors) => {
                self.ledger.extend(errors);
                None
            }
            ReportDecode::Started { report, errors } => {
                let previous = self.finalize();
                self.state = AssemblerState::Building(report);
                self.ledger.extend(errors);
                previous
            }
        }
    }

    fn attach_detail(&mut self, segment: &Segment, detail_type: DetailType) -> IngestResult<()> {
        let AssemblerState::Building(Report::GroupA(incident)) = &mut self.state else {
            return self.reject_handoff(segment);
        };

        let decoded = decode_detail(segment, detail_type);
        if decoded.extension == Some(Extension::Leoka) {
            incident.includes_leoka = true;
        }
        if !decoded.errors.is_empty() {
            incident.has_upstream_errors = true;
        }
        incident.add_detail(decoded.entity);
        self.ledger.extend(decoded.errors);
        Ok(())
    }

    fn reject_handoff(&mut self, segment: &Segment) -> IngestResult<()> {
        match self.handoff {
            HandoffPolicy::Record => {
                self.ledger.record(
                    DecodeError::new(ErrorCode::DetailWithoutIncident, segment.context())
                        .with_segment_type(segment.type_char()),
                );
                Ok(())
            }
            HandoffPolicy::Abort => Err(IngestError::HandoffViolation {
                context: segment.context(),
                segment_type: segment.type_char(),
            }),
        }
    }

    fn mark_incident(&mut self) {
        if let AssemblerState::Building(Report::GroupA(incident)) = &mut self.state {
            incident.has_upstream_errors = true;
        }
    }

    fn finalize(&mut self) -> Option<FinalizedReport> {
        match mem::take(&mut self.state) {
            AssemblerState::Idle => None,
            AssemblerState::Building(report) => {
                self.built += 1;
                let reference = ReportRef::new(self.built, report.unique_description());
                let errors = self.ledger.flush(&reference);
                Some(FinalizedReport {
                    report,
                    reference,
                    errors,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Field;
    use crate::segment::classify;
    use crate::testing::{self, LineBuilder};
    use std::sync::Arc;

    fn run(
        lines: &[String],
        policy: HandoffPolicy,
    ) -> IngestResult<(Vec<FinalizedReport>, Completion)> {
        let source: Arc<str> = Arc::from("test.txt");
        let mut assembler = Assembler::new(policy);
        let mut reports = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if let Some(done) = assembler.step(classify(line.as_str(), Arc::clone(&source), i + 1))? {
                reports.push(done);
            }
        }
        let completion = assembler.finish();
        if let Some(ref last) = completion.last {
            reports.push(last.clone());
        }
        Ok((reports, completion))
    }

    fn group_a(done: &FinalizedReport) -> &crate::models::GroupAIncident {
        done.report.as_group_a().unwrap()
    }

    #[test]
    fn test_single_admin_line() {
        let (reports, completion) =
            run(&[testing::administrative("INC-1")], HandoffPolicy::Record).unwrap();

        assert_eq!(reports.len(), 1);
        let incident = group_a(&reports[0]);
        assert_eq!(incident.detail_count(), 0);
        assert!(!incident.has_upstream_errors);
        assert!(reports[0].errors.is_empty());
        assert!(completion.unattributed.is_empty());
        assert_eq!(completion.reports_built, 1);
        assert_eq!(reports[0].reference.ordinal, 1);
    }

    #[test]
    fn test_bad_offense_length_is_header_only_and_flags_report() {
        let bad_offense = LineBuilder::new('2', 60).identifier("INC-1").set(38, "13A").build();
        let (reports, completion) = run(
            &[testing::administrative("INC-1"), bad_offense],
            HandoffPolicy::Record,
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        let incident = group_a(&reports[0]);
        assert_eq!(incident.offenses.len(), 1);
        assert_eq!(incident.offenses[0].ucr_offense_code, None);
        assert_eq!(incident.offenses[0].header.incident_number.as_deref(), Some("INC-1"));
        assert!(incident.has_upstream_errors);

        assert_eq!(reports[0].errors.len(), 1);
        let error = &reports[0].errors[0];
        assert_eq!(error.code, ErrorCode::OffenseLength);
        assert_eq!(error.context.line_number, 2);
        assert_eq!(error.report.as_ref(), Some(&reports[0].reference));
        assert_eq!(completion.totals.structural, 1);
    }

    #[test]
    fn test_two_admin_lines_in_order() {
        let (reports, _) = run(
            &[testing::administrative("INC-1"), testing::administrative("INC-2")],
            HandoffPolicy::Record,
        )
        .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(group_a(&reports[0]).incident_number.as_deref(), Some("INC-1"));
        assert_eq!(group_a(&reports[1]).incident_number.as_deref(), Some("INC-2"));
        assert_eq!(reports[1].reference.ordinal, 2);
        assert!(reports.iter().all(|r| group_a(r).detail_count() == 0));
    }

    #[test]
    fn test_detail_before_any_report_is_attributed_to_next_report() {
        let (reports, completion) = run(
            &[testing::victim("INC-0"), testing::administrative("INC-1")],
            HandoffPolicy::Record,
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(group_a(&reports[0]).victims.len(), 0);
        assert_eq!(reports[0].errors.len(), 1);
        assert_eq!(reports[0].errors[0].code, ErrorCode::DetailWithoutIncident);
        assert_eq!(reports[0].errors[0].segment_type, Some('4'));
        assert_eq!(reports[0].errors[0].nibrs_code(), "055");
        assert!(completion.unattributed.is_empty());
        assert_eq!(completion.totals.handoff, 1);
    }

    #[test]
    fn test_detail_without_any_report_is_unattributed() {
        let (reports, completion) = run(&[testing::victim("INC-0")], HandoffPolicy::Record).unwrap();
        assert!(reports.is_empty());
        assert_eq!(completion.unattributed.len(), 1);
        assert!(completion.unattributed[0].report.is_none());
    }

    #[test]
    fn test_abort_policy_stops_on_orphan_detail() {
        let err = run(
            &[testing::victim("INC-0"), testing::administrative("INC-1")],
            HandoffPolicy::Abort,
        )
        .unwrap_err();
        match err {
            IngestError::HandoffViolation {
                context,
                segment_type,
            } => {
                assert_eq!(segment_type, '4');
                assert_eq!(context.line_number, 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_detail_after_group_b_is_a_handoff_error() {
        let (reports, _) = run(
            &[testing::group_b_arrest("TXN-1"), testing::offense("INC-1")],
            HandoffPolicy::Record,
        )
        .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].errors[0].code, ErrorCode::DetailWithoutIncident);
        assert!(!reports[0].report.has_upstream_errors());
    }

    #[test]
    fn test_details_attach_and_leoka_sets_flag() {
        let (reports, _) = run(
            &[
                testing::administrative("INC-1"),
                testing::offense("INC-1"),
                testing::victim("INC-1"),
                testing::leoka_victim("INC-1"),
                testing::offender("INC-1"),
            ],
            HandoffPolicy::Record,
        )
        .unwrap();

        let incident = group_a(&reports[0]);
        assert_eq!(incident.offenses.len(), 1);
        assert_eq!(incident.victims.len(), 2);
        assert_eq!(incident.offenders.len(), 1);
        assert!(incident.includes_leoka);
        assert!(!incident.has_upstream_errors);
        assert!(reports[0].errors.is_empty());
    }

    #[test]
    fn test_detail_field_error_flags_incident() {
        let property = LineBuilder::new('3', 307)
            .identifier("INC-1")
            .set(38, "7")
            .set(39, "13")
            .set(41, "00000X500")
            .build();
        let (reports, completion) = run(
            &[
                testing::administrative("INC-1"),
                property,
                testing::arrestee("INC-1"),
            ],
            HandoffPolicy::Record,
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        let incident = group_a(&reports[0]);
        assert_eq!(incident.properties.len(), 1);
        assert_eq!(incident.properties[0].value_of_property[0], None);
        assert_eq!(incident.arrestees.len(), 1);
        assert!(incident.has_upstream_errors);

        assert_eq!(reports[0].errors.len(), 1);
        let error = &reports[0].errors[0];
        assert_eq!(error.code, ErrorCode::InvalidValue(Field::ValueOfProperty));
        assert_eq!(error.kind, ErrorKind::Field);
        assert_eq!(error.value.as_deref(), Some("00000X500"));
        assert_eq!(error.context.line_number, 2);
        assert_eq!(error.report.as_ref(), Some(&reports[0].reference));
        assert_eq!(completion.totals.field, 1);
    }

    #[test]
    fn test_unknown_segment_type_flags_incident() {
        let unknown = LineBuilder::new('9', 50).build();
        let (reports, completion) = run(
            &[testing::administrative("INC-1"), unknown, String::new()],
            HandoffPolicy::Record,
        )
        .unwrap();

        assert!(group_a(&reports[0]).has_upstream_errors);
        let codes: Vec<_> = reports[0].errors.iter().map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![ErrorCode::UnrecognizedSegmentType, ErrorCode::EmptySegment]
        );
        assert_eq!(completion.totals.dispatch, 1);
    }

    #[test]
    fn test_empty_line_does_not_flag_incident() {
        let (reports, _) = run(
            &[testing::administrative("INC-1"), "   ".to_string()],
            HandoffPolicy::Record,
        )
        .unwrap();
        assert!(!group_a(&reports[0]).has_upstream_errors);
        assert_eq!(reports[0].errors.len(), 1);
    }

    #[test]
    fn test_rejected_report_keeps_current_incident() {
        let bad_admin = LineBuilder::new('1', 80).tape("02", "2016").identifier("INC-2").build();
        let (reports, _) = run(
            &[
                testing::administrative("INC-1"),
                bad_admin,
                testing::offense("INC-1"),
            ],
            HandoffPolicy::Record,
        )
        .unwrap();

        assert_eq!(reports.len(), 1);
        let incident = group_a(&reports[0]);
        assert_eq!(incident.incident_number.as_deref(), Some("INC-1"));
        assert_eq!(incident.offenses.len(), 1);
        assert_eq!(reports[0].errors[0].code, ErrorCode::AdministrativeLength);
        assert_eq!(reports[0].errors[0].context.line_number, 2);
    }

    #[test]
    fn test_blank_tape_month_neither_starts_nor_replaces_report() {
        let blank_tape = LineBuilder::new('1', 87)
            .tape("  ", "    ")
            .identifier("INC-2")
            .build();

        let (reports, completion) =
            run(std::slice::from_ref(&blank_tape), HandoffPolicy::Record).unwrap();
        assert!(reports.is_empty());
        assert_eq!(completion.reports_built, 0);
        assert_eq!(completion.unattributed.len(), 2);
        assert!(completion
            .unattributed
            .iter()
            .all(|e| e.kind == ErrorKind::Structural));

        let (reports, _) = run(
            &[
                testing::administrative("INC-1"),
                blank_tape,
                testing::offense("INC-1"),
            ],
            HandoffPolicy::Record,
        )
        .unwrap();
        assert_eq!(reports.len(), 1);
        let incident = group_a(&reports[0]);
        assert_eq!(incident.incident_number.as_deref(), Some("INC-1"));
        assert_eq!(incident.offenses.len(), 1);
        let codes: Vec<_> = reports[0].errors.iter().map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![
                ErrorCode::InvalidValue(Field::MonthOfTape),
                ErrorCode::InvalidValue(Field::YearOfTape),
            ]
        );
    }

    #[test]
    fn test_new_report_errors_belong_to_new_report() {
        let flawed_admin = LineBuilder::new('1', 87)
            .tape("02", "2016")
            .identifier("INC-2")
            .set(47, "XX")
            .build();
        let (reports, _) = run(
            &[testing::administrative("INC-1"), flawed_admin],
            HandoffPolicy::Record,
        )
        .unwrap();

        assert!(reports[0].errors.is_empty());
        assert!(!group_a(&reports[0]).has_upstream_errors);
        assert_eq!(reports[1].errors.len(), 1);
        assert!(group_a(&reports[1]).has_upstream_errors);
        assert_eq!(reports[1].errors[0].report.as_ref().map(|r| r.ordinal), Some(2));
    }

    #[test]
    fn test_report_count_matches_clean_report_lines() {
        let bad_zero = LineBuilder::new('0', 44).tape("02", "2016").build();
        let lines = vec![
            testing::zero_report(),
            testing::administrative("INC-1"),
            testing::offense("INC-1"),
            bad_zero,
            testing::group_b_arrest("TXN-1"),
            testing::administrative("INC-2"),
            testing::victim("INC-2"),
        ];
        let (reports, completion) = run(&lines, HandoffPolicy::Record).unwrap();

        assert_eq!(reports.len(), 4);
        assert_eq!(completion.reports_built, 4);
        let ordinals: Vec<_> = reports.iter().map(|r| r.reference.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let lines = vec![
            testing::victim("INC-0"),
            testing::administrative("INC-1"),
            LineBuilder::new('2', 60).identifier("INC-1").build(),
            testing::group_b_arrest("TXN-1"),
        ];
        let first = run(&lines, HandoffPolicy::Record).unwrap();
        let second = run(&lines, HandoffPolicy::Record).unwrap();
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }
}
