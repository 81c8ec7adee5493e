//! Main handle checker implementation.
//!
//! This module provides the `HandleChecker` that fans a handle out to every
//! platform in a catalog, waits for all probes and assembles the report.

use crate::error::ScoutError;
use crate::platform::Catalog;
use crate::probe::{build_client, default_headers, probe_platform};
use crate::suggest::generate_suggestions;
use crate::types::{CheckConfig, CheckReport};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Checks one handle against every platform of a catalog.
///
/// # Example
///
/// ```rust,no_run
/// use handle_scout_lib::HandleChecker;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = HandleChecker::new()?;
///     let report = checker.check_handle("octocat").await?;
///
///     for result in &report.results {
///         println!("{}: {}", result.platform, result.status);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HandleChecker {
    /// Configuration settings for this checker instance
    config: CheckConfig,
    /// Platforms probed on every check
    catalog: Arc<Catalog>,
}

impl HandleChecker {
    /// Create a checker over the built-in catalog with default settings.
    ///
    /// Default settings:
    /// - Timeout: 6 seconds per probe
    /// - Redirects: followed, up to 10
    /// - Suggestions: enabled
    pub fn new() -> Result<Self, ScoutError> {
        Self::with_config(CheckConfig::default())
    }

    /// Create a checker over the built-in catalog with custom settings.
    ///
    /// ```rust
    /// use handle_scout_lib::{CheckConfig, HandleChecker};
    /// use std::time::Duration;
    ///
    /// let config = CheckConfig::default().with_timeout(Duration::from_secs(3));
    /// let checker = HandleChecker::with_config(config).unwrap();
    /// assert_eq!(checker.config().timeout, Duration::from_secs(3));
    /// ```
    pub fn with_config(config: CheckConfig) -> Result<Self, ScoutError> {
        let catalog = Catalog::builtin()?.clone();
        Ok(Self::with_catalog(catalog, config))
    }

    /// Create a checker over a custom catalog.
    pub fn with_catalog(catalog: Catalog, config: CheckConfig) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
        }
    }

    /// Check a handle on every platform of the catalog.
    ///
    /// The handle must already satisfy [`crate::validate_handle`]; no
    /// validation happens here.
    ///
    /// All probes run concurrently over one pooled HTTP client that lives for
    /// this call only. The call returns once every probe has resolved, with
    /// results in catalog order whatever order they completed in. A failing
    /// platform shows up as an `error` entry and never affects the others.
    ///
    /// # Errors
    ///
    /// Only fails when the HTTP client for the batch cannot be built.
    pub async fn check_handle(&self, handle: &str) -> Result<CheckReport, ScoutError> {
        let start_time = Instant::now();

        let client = build_client(&self.config)?;
        let defaults = default_headers(&self.config)?;

        // join_all yields outputs in input order, not completion order
        let probes = self
            .catalog
            .iter()
            .map(|platform| probe_platform(platform, handle, &client, &defaults));
        let results = join_all(probes).await;

        let suggestions = if self.config.suggestions {
            generate_suggestions(handle, &results)
        } else {
            Vec::new()
        };

        let report = CheckReport {
            handle: handle.to_string(),
            timestamp: Utc::now(),
            results,
            suggestions,
        };

        let summary = report.summary();
        info!(
            handle,
            platforms = summary.total(),
            available = summary.available,
            taken = summary.taken,
            unknown = summary.unknown,
            errors = summary.error,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "check complete"
        );

        Ok(report)
    }

    /// Get the current configuration for this checker.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Platforms probed by this checker.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformDescriptor;
    use crate::types::ProbeStatus;

    fn offline_catalog() -> Catalog {
        Catalog::from_descriptors(vec![
            PlatformDescriptor::new("GitHub", "https://github.com/{username}")
                .skipped("Offline test"),
            PlatformDescriptor::new("Figma", "https://www.figma.com/@{username}")
                .skipped("Needs JavaScript"),
        ])
        .unwrap()
    }

    #[test]
    fn test_builtin_checker() {
        let checker = HandleChecker::new().unwrap();
        assert!(checker.catalog().get("GitHub").is_some());
        assert!(checker.config().suggestions);
    }

    #[test]
    fn test_skipped_catalog_report() {
        let checker = HandleChecker::with_catalog(offline_catalog(), CheckConfig::default());
        let report = tokio_test::block_on(checker.check_handle("bob")).unwrap();

        assert_eq!(report.handle, "bob");
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].platform, "GitHub");
        assert_eq!(report.results[1].platform, "Figma");
        assert!(report
            .results
            .iter()
            .all(|r| r.status == ProbeStatus::Unknown && r.url.is_none()));
        assert_eq!(report.results[1].reason, "Needs JavaScript");

        // GitHub is a key platform and came back unknown
        assert_eq!(report.suggestions.first().map(String::as_str), Some("bobhq"));
        assert!(report.timestamp_string().ends_with('Z'));
    }

    #[test]
    fn test_suggestions_can_be_disabled() {
        let config = CheckConfig::default().with_suggestions(false);
        let checker = HandleChecker::with_catalog(offline_catalog(), config);
        let report = tokio_test::block_on(checker.check_handle("bob")).unwrap();
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_invalid_user_agent_fails_batch() {
        let config = CheckConfig::default().with_user_agent("bad\r\nagent");
        let checker = HandleChecker::with_catalog(offline_catalog(), config);
        let result = tokio_test::block_on(checker.check_handle("bob"));
        assert!(matches!(result, Err(ScoutError::ConfigError { .. })));
    }
}
