//! Status-code interpretation.
//!
//! Turning an HTTP status into a verdict is kept free of I/O so it can be
//! tested against literal codes. Rules are applied in a fixed order and the
//! first match wins, so a (malformed) descriptor that lists a code twice
//! still gets a deterministic answer.

use crate::platform::PlatformDescriptor;
use crate::types::ProbeStatus;

/// Classify an HTTP status code for one platform.
///
/// Every code maps to some status: anything outside the platform's declared
/// sets falls through to `unknown` as an unexpected status.
pub fn classify(platform: &PlatformDescriptor, code: u16) -> (ProbeStatus, String) {
    if platform.available_statuses.contains(&code) {
        return (
            ProbeStatus::Available,
            format!("Profile returns {} => likely available", code),
        );
    }

    if platform.taken_statuses.contains(&code) {
        if platform.ambiguous_on_taken {
            return (
                ProbeStatus::Unknown,
                format!(
                    "Status {} but platform may serve challenges or cached pages",
                    code
                ),
            );
        }
        return (
            ProbeStatus::Taken,
            format!("Profile returns {} => likely taken", code),
        );
    }

    if platform.unknown_statuses.contains(&code) {
        return (
            ProbeStatus::Unknown,
            format!("Status {} => unclear availability", code),
        );
    }

    (ProbeStatus::Unknown, format!("Unexpected status {}", code))
}
