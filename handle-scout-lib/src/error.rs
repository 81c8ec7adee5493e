//! Error handling for handle checking operations.
//!
//! Per-platform transport failures never show up here: they are folded into
//! the probe result as an `error` status. This type covers what can fail
//! around a batch instead: bad input at a boundary, a malformed catalog or
//! config file, and an HTTP client that cannot be built.

use std::fmt;

/// Main error type for handle checking operations.
#[derive(Debug, Clone)]
pub enum ScoutError {
    /// Handle rejected by the validity rule
    InvalidHandle { handle: String, reason: String },

    /// Platform catalog failed load-time validation
    InvalidCatalog {
        platform: Option<String>,
        message: String,
    },

    /// Configuration errors (invalid settings, unparseable TOML, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading catalogs or config files
    FileError { path: String, message: String },

    /// The shared HTTP client for a batch could not be constructed
    ClientBuild { message: String },

    /// A caller hit the cooldown window
    RateLimited {
        caller: String,
        retry_after: std::time::Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl ScoutError {
    /// Create a new invalid handle error.
    pub fn invalid_handle<H: Into<String>, R: Into<String>>(handle: H, reason: R) -> Self {
        Self::InvalidHandle {
            handle: handle.into(),
            reason: reason.into(),
        }
    }

    /// Create a catalog error that is not tied to one platform.
    pub fn catalog<M: Into<String>>(message: M) -> Self {
        Self::InvalidCatalog {
            platform: None,
            message: message.into(),
        }
    }

    /// Create a catalog error for a specific platform entry.
    pub fn platform<P: Into<String>, M: Into<String>>(platform: P, message: M) -> Self {
        Self::InvalidCatalog {
            platform: Some(platform.into()),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new client construction error.
    pub fn client_build<M: Into<String>>(message: M) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error is the caller's fault (bad input or too many requests).
    ///
    /// An HTTP boundary maps these to 4xx responses and everything else to 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidHandle { .. } | Self::RateLimited { .. })
    }
}

impl fmt::Display for ScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle { handle, reason } => {
                write!(f, "Invalid handle '{}': {}", handle, reason)
            }
            Self::InvalidCatalog { platform, message } => match platform {
                Some(name) => write!(f, "Invalid catalog entry '{}': {}", name, message),
                None => write!(f, "Invalid catalog: {}", message),
            },
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::ClientBuild { message } => {
                write!(f, "Failed to create HTTP client: {}", message)
            }
            Self::RateLimited {
                caller,
                retry_after,
            } => {
                write!(
                    f,
                    "Rate limited: {} must wait {:?} before the next check",
                    caller, retry_after
                )
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ScoutError {}

impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::client_build(err.to_string())
        } else {
            Self::internal(format!("HTTP error: {}", err))
        }
    }
}

impl From<toml::de::Error> for ScoutError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML: {}", err),
        }
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_display_messages() {
        let err = ScoutError::invalid_handle("a", "must be 2-30 characters");
        assert_eq!(err.to_string(), "Invalid handle 'a': must be 2-30 characters");

        let err = ScoutError::platform("GitHub", "duplicate name");
        assert_eq!(
            err.to_string(),
            "Invalid catalog entry 'GitHub': duplicate name"
        );

        let err = ScoutError::catalog("catalog is empty");
        assert_eq!(err.to_string(), "Invalid catalog: catalog is empty");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(ScoutError::invalid_handle("a", "short").is_client_error());
        assert!(ScoutError::RateLimited {
            caller: "127.0.0.1".to_string(),
            retry_after: Duration::from_millis(400),
        }
        .is_client_error());
        assert!(!ScoutError::client_build("no TLS backend").is_client_error());
        assert!(!ScoutError::config("bad timeout").is_client_error());
    }

    #[test]
    fn test_reqwest_builder_error_maps_to_client_build() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = ScoutError::from(err);
        assert!(matches!(err, ScoutError::ClientBuild { .. }));
        assert!(err.to_string().starts_with("Failed to create HTTP client"));
    }
}
