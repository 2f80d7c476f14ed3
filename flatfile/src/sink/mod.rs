//! Report sinks.
//!
//! A sink is notified once per finalized report, synchronously and in input
//! order, with the errors attributed to that report. Sinks are registered in
//! a [`SinkSet`]; a failing sink is handled according to the run's
//! [`SinkFailurePolicy`].
//!
//! Provided sinks:
//! - [`TallySink`] - counts reports and errors, logs every created report
//! - [`CollectingSink`] - keeps everything in memory
//! - [`JsonLinesSink`] - one JSON object per report
//! - [`FnSink`] - wraps a closure

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::assembler::FinalizedReport;
use crate::config::SinkFailurePolicy;
use crate::error::{IngestError, IngestResult, SinkResult};
use crate::ledger::{DecodeError, ReportRef};
use crate::logs::{log_report, log_success, LogLevel};
use crate::models::Report;
use crate::segment::ReportType;

/// Receives every finalized report.
pub trait ReportSink {
    /// Name used in logs and failure records.
    fn name(&self) -> &str;

    fn on_report(&mut self, report: &Report, errors: &[DecodeError]) -> SinkResult<()>;
}

/// A sink failure that was isolated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkFailure {
    pub sink: String,
    pub report: ReportRef,
    pub message: String,
}

// =============================================================================
// Sink set
// =============================================================================

/// Ordered collection of registered sinks.
#[derive(Default)]
pub struct SinkSet<'a> {
    sinks: Vec<&'a mut dyn ReportSink>,
}

impl<'a> SinkSet<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Register a sink; sinks are notified in registration order.
    pub fn register(&mut self, sink: &'a mut dyn ReportSink) -> &mut Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Notify every sink of one finalized report.
    ///
    /// Under `Isolate` every sink is notified and the failures are returned;
    /// under `FailFast` the first failure ends the broadcast.
    pub fn broadcast(
        &mut self,
        finalized: &FinalizedReport,
        policy: SinkFailurePolicy,
    ) -> IngestResult<Vec<SinkFailure>> {
        let mut failures = Vec::new();

        for sink in self.sinks.iter_mut() {
            let Err(err) = sink.on_report(&finalized.report, &finalized.errors) else {
                continue;
            };
            match policy {
                SinkFailurePolicy::FailFast => {
                    return Err(IngestError::Sink {
                        sink: sink.name().to_string(),
                        report: finalized.reference.to_string(),
                        source: err,
                    });
                }
                SinkFailurePolicy::Isolate => {
                    log_report(
                        LogLevel::Warning,
                        &finalized.reference,
                        format!("Sink '{}' failed on {}: {}", sink.name(), finalized.reference, err),
                    );
                    failures.push(SinkFailure {
                        sink: sink.name().to_string(),
                        report: finalized.reference.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        Ok(failures)
    }
}

// =============================================================================
// Tally sink
// =============================================================================

/// Per-type report counts and error total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCounts {
    pub zero: usize,
    pub group_a: usize,
    pub group_b: usize,
    pub with_errors: usize,
    pub errors: usize,
}

impl ReportCounts {
    pub fn total(&self) -> usize {
        self.zero + self.group_a + self.group_b
    }
}

/// Counts reports and errors, logging each created report.
#[derive(Debug, Default)]
pub struct TallySink {
    counts: ReportCounts,
    quiet: bool,
}

impl TallySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count without logging each report.
    pub fn quiet() -> Self {
        Self {
            counts: ReportCounts::default(),
            quiet: true,
        }
    }

    pub fn counts(&self) -> ReportCounts {
        self.counts
    }

    /// Count one report. Never fails.
    pub fn record(&mut self, report: &Report, errors: &[DecodeError]) {
        match report.report_type() {
            ReportType::Zero => self.counts.zero += 1,
            ReportType::GroupAIncident => self.counts.group_a += 1,
            ReportType::GroupBArrest => self.counts.group_b += 1,
        }
        self.counts.errors += errors.len();
        if !errors.is_empty() {
            self.counts.with_errors += 1;
        }
        if !self.quiet {
            log_success(format!("Created {}", report.unique_description()));
        }
    }
}

impl ReportSink for TallySink {
    fn name(&self) -> &str {
        "tally"
    }

    fn on_report(&mut self, report: &Report, errors: &[DecodeError]) -> SinkResult<()> {
        self.record(report, errors);
        Ok(())
    }
}

// =============================================================================
// Collecting sink
// =============================================================================

/// A report with its errors, as seen by a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collected {
    pub report: Report,
    pub errors: Vec<DecodeError>,
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Vec<Collected>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[Collected] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<Collected> {
        self.reports
    }
}

impl ReportSink for CollectingSink {
    fn name(&self) -> &str {
        "collect"
    }

    fn on_report(&mut self, report: &Report, errors: &[DecodeError]) -> SinkResult<()> {
        self.reports.push(Collected {
            report: report.clone(),
            errors: errors.to_vec(),
        });
        Ok(())
    }
}

// =============================================================================
// JSON lines sink
// =============================================================================

#[derive(Serialize)]
struct Envelope<'a> {
    report: &'a Report,
    errors: &'a [DecodeError],
}

/// Writes one `{"report": ..., "errors": [...]}` object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn name(&self) -> &str {
        "json-lines"
    }

    fn on_report(&mut self, report: &Report, errors: &[DecodeError]) -> SinkResult<()> {
        serde_json::to_writer(&mut self.writer, &Envelope { report, errors })?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

// =============================================================================
// Closure sink
// =============================================================================

/// Adapts a closure into a sink.
pub struct FnSink<F> {
    name: String,
    f: F,
}

/// Build a sink from a closure.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnSink<F>
where
    F: FnMut(&Report, &[DecodeError]) -> SinkResult<()>,
{
    FnSink {
        name: name.into(),
        f,
    }
}

impl<F> ReportSink for FnSink<F>
where
    F: FnMut(&Report, &[DecodeError]) -> SinkResult<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_report(&mut self, report: &Report, errors: &[DecodeError]) -> SinkResult<()> {
        (self.f)(report, errors)
    }
}
