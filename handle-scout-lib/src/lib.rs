//! # Handle Scout Library
//!
//! Best-effort checks of whether a username is free on popular platforms.
//!
//! Each platform is described by a [`PlatformDescriptor`]: a profile URL
//! template plus the HTTP status codes that mean "available", "taken" or
//! "unclear". The checker requests every profile URL concurrently, classifies
//! the responses and proposes alternate handles when the key platforms are
//! not clearly free.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use handle_scout_lib::{validate_handle, HandleChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     validate_handle("octocat")?;
//!
//!     let checker = HandleChecker::new()?;
//!     let report = checker.check_handle("octocat").await?;
//!
//!     for result in &report.results {
//!         println!("{:<14} {}", result.platform, result.status);
//!     }
//!     println!("Try instead: {}", report.suggestions.join(", "));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Data-driven catalog**: platforms come from TOML, built in or loaded from a file
//! - **Concurrent probing**: one pooled client per check, results in catalog order
//! - **Failure isolation**: a broken platform is reported, never fatal
//! - **Suggestions**: deterministic alternates when key platforms look taken

// Re-export main public API types and functions
pub use checker::HandleChecker;
pub use classify::classify;
pub use config::{
    load_env_config, parse_timeout, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use cooldown::{CooldownLimiter, DEFAULT_COOLDOWN};
pub use error::ScoutError;
pub use platform::{Catalog, PlatformDescriptor, DEFAULT_SKIP_REASON, HANDLE_PLACEHOLDER};
pub use probe::{build_client, default_headers, probe_platform, TransportError};
pub use suggest::{generate_suggestions, needs_suggestions, KEY_PLATFORMS, MAX_SUGGESTIONS};
pub use types::{CheckConfig, CheckReport, ProbeResult, ProbeStatus, StatusSummary};
pub use utils::{is_valid_handle, validate_handle, MAX_HANDLE_LEN, MIN_HANDLE_LEN};

// Internal modules - these are not part of the public API
mod checker;
mod classify;
mod config;
mod cooldown;
mod error;
mod platform;
mod probe;
mod suggest;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ScoutError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        builtin_platforms: Catalog::builtin().map(Catalog::len).unwrap_or(0),
    }
}

/// Information about the library build
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    /// Number of platforms in the built-in catalog
    pub builtin_platforms: usize,
}
