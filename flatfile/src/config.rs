//! Ingest run options.
//!
//! Options come from code (builder methods), the CLI, or the environment:
//!
//! | Variable                    | Values                  | Default   |
//! |-----------------------------|-------------------------|-----------|
//! | `NIBRS_HANDOFF_POLICY`      | `record`, `abort`       | `record`  |
//! | `NIBRS_SINK_FAILURE_POLICY` | `isolate`, `fail_fast`  | `isolate` |
//! | `NIBRS_ENCODING`            | `utf-8`, `latin1`, `windows-1252` | detected |

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::source::TextEncoding;

pub const HANDOFF_POLICY_VAR: &str = "NIBRS_HANDOFF_POLICY";
pub const SINK_FAILURE_POLICY_VAR: &str = "NIBRS_SINK_FAILURE_POLICY";
pub const ENCODING_VAR: &str = "NIBRS_ENCODING";

/// What to do with a detail segment that has no Group A incident to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffPolicy {
    /// Record a hand-off error, discard the detail and keep going.
    #[default]
    Record,
    /// Stop the run.
    Abort,
}

impl FromStr for HandoffPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "record" => Ok(HandoffPolicy::Record),
            "abort" => Ok(HandoffPolicy::Abort),
            _ => Err(ConfigError::InvalidValue {
                key: HANDOFF_POLICY_VAR.to_string(),
                value: s.to_string(),
                expected: "record, abort",
            }),
        }
    }
}

/// What to do when a sink fails on a finalized report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkFailurePolicy {
    /// Log, record in the run summary and continue with the other sinks.
    #[default]
    Isolate,
    /// Stop the run.
    FailFast,
}

impl FromStr for SinkFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "isolate" => Ok(SinkFailurePolicy::Isolate),
            "fail_fast" => Ok(SinkFailurePolicy::FailFast),
            _ => Err(ConfigError::InvalidValue {
                key: SINK_FAILURE_POLICY_VAR.to_string(),
                value: s.to_string(),
                expected: "isolate, fail_fast",
            }),
        }
    }
}

/// Options for one ingest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOptions {
    /// Overrides the source's own name in error contexts.
    pub source_name: Option<String>,
    /// Forced input encoding (detected when unset).
    pub encoding: Option<TextEncoding>,
    pub handoff: HandoffPolicy,
    pub sink_failures: SinkFailurePolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            source_name: None,
            encoding: None,
            handoff: HandoffPolicy::Record,
            sink_failures: SinkFailurePolicy::Isolate,
        }
    }
}

impl IngestOptions {
    /// Load options from the environment (and `.env` if present).
    pub fn from_env() -> ConfigResult<Self> {
        // Try loading .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load options through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut options = Self::default();

        if let Some(value) = lookup(HANDOFF_POLICY_VAR) {
            options.handoff = value.parse()?;
        }
        if let Some(value) = lookup(SINK_FAILURE_POLICY_VAR) {
            options.sink_failures = value.parse()?;
        }
        if let Some(value) = lookup(ENCODING_VAR) {
            let encoding = value.parse::<TextEncoding>().map_err(|_| ConfigError::InvalidValue {
                key: ENCODING_VAR.to_string(),
                value: value.clone(),
                expected: "utf-8, latin1, windows-1252",
            })?;
            options.encoding = Some(encoding);
        }

        Ok(options)
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_handoff(mut self, policy: HandoffPolicy) -> Self {
        self.handoff = policy;
        self
    }

    pub fn with_sink_failures(mut self, policy: SinkFailurePolicy) -> Self {
        self.sink_failures = policy;
        self
    }
}
