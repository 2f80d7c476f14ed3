//! Ingest run: line source → classifier → assembler → sinks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nibrs_flatfile::{ingest_path, CollectingSink, IngestOptions, SinkSet};
//!
//! let mut collect = CollectingSink::new();
//! let mut sinks = SinkSet::new();
//! sinks.register(&mut collect);
//! let summary = ingest_path("incidents.txt", &mut sinks, &IngestOptions::from_env()?)?;
//! println!("{} reports, {} errors", summary.reports.total(), summary.errors.total());
//! ```

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::assembler::{Assembler, FinalizedReport};
use crate::config::IngestOptions;
use crate::error::IngestResult;
use crate::ledger::{DecodeError, ErrorTotals};
use crate::logs::{log_info, log_success, log_warning, log_warning_indent};
use crate::segment::classify;
use crate::sink::{ReportCounts, SinkFailure, SinkSet, TallySink};
use crate::source::{LineSource, ReaderSource};

/// Result of a complete ingest run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub source_name: String,
    pub lines_read: usize,
    pub reports: ReportCounts,
    pub errors: ErrorTotals,
    /// Errors raised after the last report with no report to own them.
    pub unattributed_errors: Vec<DecodeError>,
    pub sink_failures: Vec<SinkFailure>,
}

impl IngestSummary {
    pub fn has_errors(&self) -> bool {
        self.errors.total() > 0
    }
}

struct Emitter<'s, 'a> {
    tally: TallySink,
    sinks: &'s mut SinkSet<'a>,
    options: &'s IngestOptions,
    failures: Vec<SinkFailure>,
}

impl Emitter<'_, '_> {
    fn emit(&mut self, finalized: &FinalizedReport) -> IngestResult<()> {
        self.tally.record(&finalized.report, &finalized.errors);
        let failures = self.sinks.broadcast(finalized, self.options.sink_failures)?;
        self.failures.extend(failures);
        Ok(())
    }
}

/// Run one source to completion.
///
/// Stops early only on a source failure, a fail-fast sink failure or an
/// `Abort` hand-off violation; the report under construction is then
/// dropped.
pub fn ingest<S: LineSource + ?Sized>(
    source: &mut S,
    sinks: &mut SinkSet<'_>,
    options: &IngestOptions,
) -> IngestResult<IngestSummary> {
    let name: Arc<str> = Arc::from(
        options
            .source_name
            .as_deref()
            .unwrap_or_else(|| source.source_name()),
    );
    log_info(format!("Ingesting {}", name));

    let mut assembler = Assembler::new(options.handoff);
    let mut emitter = Emitter {
        tally: TallySink::new(),
        sinks,
        options,
        failures: Vec::new(),
    };
    let mut lines_read = 0;

    while let Some(line) = source.next_line()? {
        lines_read += 1;
        if let Some(finalized) = assembler.step(classify(line, Arc::clone(&name), lines_read))? {
            emitter.emit(&finalized)?;
        }
    }

    let completion = assembler.finish();
    if let Some(ref finalized) = completion.last {
        emitter.emit(finalized)?;
    }

    for error in &completion.unattributed {
        log_warning_indent(format!("Unattributed: {}", error), 1);
    }

    let summary = IngestSummary {
        source_name: name.to_string(),
        lines_read,
        reports: emitter.tally.counts(),
        errors: completion.totals,
        unattributed_errors: completion.unattributed,
        sink_failures: emitter.failures,
    };

    if summary.has_errors() || !summary.sink_failures.is_empty() {
        log_warning(format!(
            "Finished {}: {} lines, {} reports, {} decode errors, {} sink failures",
            summary.source_name,
            summary.lines_read,
            summary.reports.total(),
            summary.errors.total(),
            summary.sink_failures.len()
        ));
    } else {
        log_success(format!(
            "Finished {}: {} lines, {} reports",
            summary.source_name,
            summary.lines_read,
            summary.reports.total()
        ));
    }

    Ok(summary)
}

/// Open `path` (honouring the configured encoding) and ingest it.
pub fn ingest_path(
    path: impl AsRef<Path>,
    sinks: &mut SinkSet<'_>,
    options: &IngestOptions,
) -> IngestResult<IngestSummary> {
    let mut source = ReaderSource::from_path(path, options.encoding)?;
    ingest(&mut source, sinks, options)
}
