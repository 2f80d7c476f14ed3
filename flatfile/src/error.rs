//! Error types for the flat-file ingest run.
//!
//! Decode problems inside a line (bad lengths, unparseable columns, unknown
//! segment types) are never Rust errors: they are recorded as
//! [`DecodeError`](crate::ledger::DecodeError) values and travel with the
//! report they belong to. The types here cover the conditions that end a run:
//!
//! - [`SourceError`] - the line source failed (I/O, encoding)
//! - [`SinkError`] - a report sink refused a finalized report
//! - [`ConfigError`] - an option could not be read from the environment
//! - [`IngestError`] - top-level run errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

use crate::ledger::ErrorContext;

// =============================================================================
// Line Source Errors
// =============================================================================

/// Errors raised while reading lines.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read from the underlying reader.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The requested encoding is not supported.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors returned by a [`ReportSink`](crate::sink::ReportSink).
#[derive(Debug, Error)]
pub enum SinkError {
    /// Output could not be written.
    #[error("Sink IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report could not be serialized.
    #[error("Sink JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The sink declined the report.
    #[error("Report rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading [`IngestOptions`](crate::config::IngestOptions).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value outside its accepted set.
    #[error("Invalid value '{value}' for {key} (expected one of: {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

// =============================================================================
// Ingest Errors (top-level)
// =============================================================================

/// Top-level errors that abort an ingest run.
///
/// This is the error type returned by [`crate::ingest::ingest`]. Nothing is
/// flushed once one of these is raised: the report under construction is
/// dropped.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The line source failed.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// A sink failed under the fail-fast policy.
    #[error("Sink '{sink}' failed on {report}: {source}")]
    Sink {
        sink: String,
        report: String,
        #[source]
        source: SinkError,
    },

    /// A detail segment arrived with no Group A incident under construction
    /// and the hand-off policy is `Abort`.
    #[error("Segment type '{segment_type}' at {context} has no Group A incident to attach to")]
    HandoffViolation {
        context: ErrorContext,
        segment_type: char,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for line source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for ingest runs.
pub type IngestResult<T> = Result<T, IngestError>;
