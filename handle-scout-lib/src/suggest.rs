//! Alternate-handle suggestions.
//!
//! When a handle is not clearly free on the platforms that matter most, a
//! fixed set of suffix and prefix variants is proposed instead. Generation is
//! deterministic: the same handle and results always give the same list in
//! the same order.
//!
//! # Examples
//!
//! ```
//! use handle_scout_lib::{generate_suggestions, ProbeResult, ProbeStatus};
//!
//! let results = vec![ProbeResult {
//!     platform: "GitHub".to_string(),
//!     url: None,
//!     status: ProbeStatus::Taken,
//!     http_status: Some(200),
//!     reason: String::new(),
//! }];
//! let suggestions = generate_suggestions("bob", &results);
//! assert_eq!(&suggestions[..3], &["bobhq", "bob_hq", "bob.hq"]);
//! ```

use crate::types::{ProbeResult, ProbeStatus};
use crate::utils::is_valid_handle;
use std::collections::HashSet;

/// Platforms whose verdict decides whether suggestions are needed.
pub const KEY_PLATFORMS: &[&str] = &["GitHub", "Reddit", "TikTok", "X (Twitter)"];

/// Upper bound on the number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 18;

const SUFFIXES: &[&str] = &["hq", "dev", "app", "io", "official", "real"];
const SEPARATORS: &[&str] = &["_", ".", "-"];
const NUMBERS: &[&str] = &["01", "1", "2", "3"];

/// Ordered, de-duplicated candidate list.
#[derive(Debug, Default)]
struct Candidates {
    seen: HashSet<String>,
    values: Vec<String>,
}

impl Candidates {
    /// Keep the candidate if it is new and passes the handle rule.
    fn push(&mut self, value: String) {
        if self.seen.contains(&value) || !is_valid_handle(&value) {
            return;
        }
        self.seen.insert(value.clone());
        self.values.push(value);
    }

    /// `handle + token`, then `handle + sep + token` for every separator.
    fn push_with_separators(&mut self, handle: &str, token: &str) {
        self.push(format!("{}{}", handle, token));
        for sep in SEPARATORS {
            self.push(format!("{}{}{}", handle, sep, token));
        }
    }
}

/// Whether any key platform came back as anything other than available.
///
/// `unknown` and `error` count as not available.
pub fn needs_suggestions(results: &[ProbeResult]) -> bool {
    results
        .iter()
        .any(|r| {
            KEY_PLATFORMS.contains(&r.platform.as_str()) && r.status != ProbeStatus::Available
        })
}

/// Generate alternate handles for `handle` given the probe results.
pub fn generate_suggestions(handle: &str, results: &[ProbeResult]) -> Vec<String> {
    if !needs_suggestions(results) {
        return Vec::new();
    }

    let mut candidates = Candidates::default();

    for suffix in SUFFIXES {
        candidates.push_with_separators(handle, suffix);
    }

    for number in NUMBERS {
        candidates.push_with_separators(handle, number);
    }

    candidates.push(format!("its{}", handle));
    candidates.push(format!("the{}", handle));
    candidates.push(format!("{}_dev", handle));

    let mut values = candidates.values;
    values.truncate(MAX_SUGGESTIONS);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(platform: &str, status: ProbeStatus) -> ProbeResult {
        ProbeResult {
            platform: platform.to_string(),
            url: None,
            status,
            http_status: None,
            reason: String::new(),
        }
    }

    fn all_keys(status: ProbeStatus) -> Vec<ProbeResult> {
        KEY_PLATFORMS.iter().map(|p| result(p, status)).collect()
    }

    #[test]
    fn test_no_suggestions_when_key_platforms_available() {
        let mut results = all_keys(ProbeStatus::Available);
        // Non-key platforms do not matter
        results.push(result("GitLab", ProbeStatus::Taken));
        assert!(generate_suggestions("bob", &results).is_empty());
    }

    #[test]
    fn test_no_suggestions_without_key_platforms() {
        let results = vec![result("GitLab", ProbeStatus::Taken)];
        assert!(generate_suggestions("bob", &results).is_empty());
        assert!(generate_suggestions("bob", &[]).is_empty());
    }

    #[test]
    fn test_unknown_and_error_trigger_suggestions() {
        assert!(!generate_suggestions("bob", &all_keys(ProbeStatus::Unknown)).is_empty());
        assert!(!generate_suggestions("bob", &all_keys(ProbeStatus::Error)).is_empty());

        let mut results = all_keys(ProbeStatus::Available);
        results[3].status = ProbeStatus::Unknown;
        assert!(needs_suggestions(&results));
    }

    #[test]
    fn test_literal_order_for_short_handle() {
        let results = vec![result("GitHub", ProbeStatus::Taken)];
        let suggestions = generate_suggestions("bob", &results);

        assert_eq!(
            suggestions,
            vec![
                "bobhq", "bob_hq", "bob.hq", "bobdev", "bob_dev", "bob.dev", "bobapp",
                "bob_app", "bob.app", "bobio", "bob_io", "bob.io", "bobofficial",
                "bob_official", "bob.official", "bobreal", "bob_real", "bob.real",
            ]
        );
    }

    #[test]
    fn test_hyphenated_candidates_are_dropped() {
        let results = vec![result("Reddit", ProbeStatus::Taken)];
        let suggestions = generate_suggestions("bob", &results);
        assert!(suggestions.iter().all(|s| !s.contains('-')));
    }

    #[test]
    fn test_capped_unique_and_valid() {
        let results = all_keys(ProbeStatus::Taken);
        let long = "x".repeat(30);
        for handle in ["bob", "ab", "a.very_long_handle_name_12", long.as_str()] {
            let suggestions = generate_suggestions(handle, &results);
            assert!(suggestions.len() <= MAX_SUGGESTIONS);
            let unique: HashSet<_> = suggestions.iter().collect();
            assert_eq!(unique.len(), suggestions.len());
            assert!(suggestions.iter().all(|s| is_valid_handle(s)));
        }
    }

    #[test]
    fn test_long_handle_reaches_number_variants() {
        // 24 chars: every "official" variant overflows 30, leaving room for "01"
        let handle = "abcdefghijklmnopqrstuvwx";
        let results = vec![result("TikTok", ProbeStatus::Taken)];
        let suggestions = generate_suggestions(handle, &results);

        assert!(!suggestions.contains(&format!("{}official", handle)));
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(
            &suggestions[15..],
            &[
                format!("{}01", handle),
                format!("{}_01", handle),
                format!("{}.01", handle),
            ]
        );
    }

    #[test]
    fn test_max_length_handle_yields_nothing() {
        let handle = "y".repeat(30);
        let results = vec![result("GitHub", ProbeStatus::Taken)];
        assert!(generate_suggestions(&handle, &results).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let results = all_keys(ProbeStatus::Taken);
        assert_eq!(
            generate_suggestions("carol", &results),
            generate_suggestions("carol", &results)
        );
    }
}
