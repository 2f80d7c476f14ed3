//! # nibrs-flatfile - NIBRS flat-file report assembler
//!
//! Decodes the NIBRS fixed-width flat-file format into hierarchical reports.
//! Lines are classified by their segment type column, decoded through
//! declarative column tables, and assembled into zero reports, Group A
//! incidents (with offenses, property, victims, offenders and arrestees) and
//! Group B arrests. Malformed input never stops a run: every problem becomes
//! a [`DecodeError`] attached to the report it belongs to.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Flat file   │────▶│  Classify   │────▶│  Assemble   │────▶│   Sinks     │
//! │ (auto-enc)  │     │ + decode    │     │ (1 report)  │     │ (in order)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   ▲
//!                            └──── errors ───────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nibrs_flatfile::{ingest_path, CollectingSink, IngestOptions, SinkSet};
//!
//! let mut collect = CollectingSink::new();
//! let mut sinks = SinkSet::new();
//! sinks.register(&mut collect);
//! let summary = ingest_path("incidents.txt", &mut sinks, &IngestOptions::default())?;
//! println!("Decoded {} reports", summary.reports.total());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Run-level error types
//! - [`config`] - Ingest options and policies
//! - [`logs`] - Broadcast run log
//! - [`source`] - Line sources with encoding detection
//! - [`segment`] - Segment classification
//! - [`layout`] - Column tables and field extraction
//! - [`models`] - Decoded report model
//! - [`ledger`] - Decode errors and the pending-error ledger
//! - [`assembler`] - Report assembly state machine
//! - [`sink`] - Report sinks
//! - [`ingest`] - End-to-end ingest run

// Core modules
pub mod config;
pub mod error;
pub mod logs;

// Input
pub mod segment;
pub mod source;

// Decoding
pub mod layout;
pub mod ledger;
pub mod models;

// Assembly and output
pub mod assembler;
pub mod ingest;
pub mod sink;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    IngestError,
    IngestResult,
    SinkError,
    SinkResult,
    SourceError,
    SourceResult,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{HandoffPolicy, IngestOptions, SinkFailurePolicy};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Arrestee,
    Detail,
    GroupAIncident,
    GroupBArrest,
    Offender,
    Offense,
    Property,
    Report,
    ReportHeader,
    SegmentHeader,
    Victim,
    ZeroReport,
};

// =============================================================================
// Re-exports - Decoding
// =============================================================================

pub use layout::{decode_detail, decode_report, Decoded, Field, ReportDecode};
pub use ledger::{DecodeError, ErrorCode, ErrorContext, ErrorKind, ErrorTotals, ReportRef};
pub use segment::{classify, DetailType, ReportType, Segment, SegmentType};

// =============================================================================
// Re-exports - Sources
// =============================================================================

pub use source::{detect_encoding, LineSource, ReaderSource, TextEncoding};

// =============================================================================
// Re-exports - Assembly
// =============================================================================

pub use assembler::{Assembler, AssemblerState, Completion, FinalizedReport};

// =============================================================================
// Re-exports - Sinks
// =============================================================================

pub use sink::{
    from_fn,
    CollectingSink,
    Collected,
    JsonLinesSink,
    ReportCounts,
    ReportSink,
    SinkFailure,
    SinkSet,
    TallySink,
};

// =============================================================================
// Re-exports - Ingest
// =============================================================================

pub use ingest::{ingest, ingest_path, IngestSummary};
