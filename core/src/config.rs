//! Client configuration.
//!
//! # Design
//! `ClientConfig` is plain serde data so embedders can keep it in whatever
//! config file format they already load. Timeouts stay signed integers on
//! the wire: zero or negative means "use the default", matching the
//! `Client::with_timeouts` contract.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONNECT_TIMEOUT_SECS: i64 = 3;
pub const DEFAULT_READ_TIMEOUT_SECS: i64 = 10;
pub const DEFAULT_WRITE_TIMEOUT_SECS: i64 = 10;

/// How `HeaderedRequest::with_json` treats a structured body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuredBodyMode {
    /// Serialize the value, send it, and mark it `application/json`.
    /// Serialization failures surface from `execute`.
    #[default]
    Serialize,

    /// Inverted behavior kept for parity with existing callers: a value
    /// that serializes is dropped and the request goes out without a body;
    /// a value that fails to serialize goes out as an empty body marked
    /// `application/json`.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub connect_timeout_secs: i64,
    pub read_timeout_secs: i64,
    pub write_timeout_secs: i64,
    pub structured_body: StructuredBodyMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            structured_body: StructuredBodyMode::default(),
        }
    }
}

impl ClientConfig {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: seconds_or(self.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS),
            read: seconds_or(self.read_timeout_secs, DEFAULT_READ_TIMEOUT_SECS),
            write: seconds_or(self.write_timeout_secs, DEFAULT_WRITE_TIMEOUT_SECS),
        }
    }
}

/// Normalized timeouts, always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
    pub write: Duration,
}

impl Timeouts {
    /// Deadline for a whole call, counted once from its start.
    ///
    /// Every response read has to land inside the read budget, so the read
    /// timeout bounds the call. A dial is never cut shorter than its own
    /// connect timeout.
    pub fn call_deadline(&self) -> Duration {
        self.read.max(self.connect)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        ClientConfig::default().timeouts()
    }
}

fn seconds_or(secs: i64, default: i64) -> Duration {
    let secs = if secs > 0 { secs } else { default };
    Duration::from_secs(secs.unsigned_abs())
}
