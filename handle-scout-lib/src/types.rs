//! Core data types for handle availability checking.
//!
//! This module defines the probe results, the per-request report and the
//! configuration knobs of the checker.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Availability verdict for one platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// The profile URL looks free
    Available,

    /// The profile URL looks registered
    Taken,

    /// The response does not tell either way, or the platform is not checkable
    Unknown,

    /// The request itself failed (timeout, DNS, TLS, ...)
    Error,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Available => "available",
            ProbeStatus::Taken => "taken",
            ProbeStatus::Unknown => "unknown",
            ProbeStatus::Error => "error",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of probing one platform for one handle.
///
/// Serializes to the `{platform, url, status, http_status, reason}` shape
/// used in JSON reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResult {
    /// Display name of the platform
    pub platform: String,

    /// Resolved profile URL, `None` when the platform was not probed
    pub url: Option<String>,

    pub status: ProbeStatus,

    /// HTTP status code of the final response, if one was received
    pub http_status: Option<u16>,

    /// Human-readable rationale, or a symbolic error category
    pub reason: String,
}

/// Result of checking one handle across the whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// The handle that was checked
    #[serde(rename = "username")]
    pub handle: String,

    /// When the check finished (UTC)
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,

    /// One entry per catalog platform, in catalog order
    pub results: Vec<ProbeResult>,

    /// Alternate handles worth trying
    pub suggestions: Vec<String>,
}

/// Per-status counts over a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub available: usize,
    pub taken: usize,
    pub unknown: usize,
    pub error: usize,
}

impl StatusSummary {
    pub fn total(&self) -> usize {
        self.available + self.taken + self.unknown + self.error
    }
}

impl CheckReport {
    /// Count results by status.
    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();
        for result in &self.results {
            match result.status {
                ProbeStatus::Available => summary.available += 1,
                ProbeStatus::Taken => summary.taken += 1,
                ProbeStatus::Unknown => summary.unknown += 1,
                ProbeStatus::Error => summary.error += 1,
            }
        }
        summary
    }

    /// Look up the result for a platform by name.
    pub fn result_for(&self, platform: &str) -> Option<&ProbeResult> {
        self.results.iter().find(|r| r.platform == platform)
    }

    /// RFC 3339 timestamp with millisecond precision and a `Z` suffix.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Pretty-printed JSON payload.
    pub fn to_json_pretty(&self) -> Result<String, crate::ScoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn serialize_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Configuration options for a checker.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Timeout for each individual probe
    /// Default: 6 seconds
    pub timeout: Duration,

    /// Default `User-Agent` sent with every probe unless a platform overrides it
    /// Default: "HandleScout/1.0"
    pub user_agent: String,

    /// Maximum number of redirects followed per probe
    /// Default: 10
    pub max_redirects: usize,

    /// Whether to derive suggestions after a check
    /// Default: true
    pub suggestions: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(6),
            user_agent: "HandleScout/1.0".to_string(),
            max_redirects: 10,
            suggestions: true,
        }
    }
}

impl CheckConfig {
    /// Set the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the default `User-Agent`.
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the redirect limit. Capped at 20.
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects.min(20);
        self
    }

    /// Enable or disable suggestion generation.
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggestions = enabled;
        self
    }
}
