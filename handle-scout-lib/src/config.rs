//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, discovering
//! them in the usual locations, merging them with precedence rules and
//! reading `HS_*` environment variables.

use crate::error::ScoutError;
use crate::platform::{Catalog, PlatformDescriptor};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Inline platform catalog, replacing the built-in one
    #[serde(
        default,
        rename = "platform",
        skip_serializing_if = "Option::is_none"
    )]
    pub platforms: Option<Vec<PlatformDescriptor>>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// Per-probe timeout (as string, e.g., "6s", "1m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default JSON output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,

    /// Default pretty output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    /// Whether to print suggestions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<bool>,

    /// Path to a catalog file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// User-Agent sent with probes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl FileConfig {
    /// Catalog built from inline `[[platform]]` entries, if any.
    pub fn inline_catalog(&self) -> Result<Option<Catalog>, ScoutError> {
        match &self.platforms {
            Some(platforms) => Catalog::from_descriptors(platforms.clone()).map(Some),
            None => Ok(None),
        }
    }
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Default)]
pub struct ConfigManager;

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, ScoutError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScoutError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ScoutError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        self.validate_config(&config)?;

        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is the lowest precedence, then the home directory, then
    /// the current directory.
    pub fn discover_and_load(&self) -> Result<FileConfig, ScoutError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping config file"),
            }
        }

        if loaded_files.len() > 1 {
            let active = loaded_files.last().map(|p| p.display().to_string());
            debug!(
                files = loaded_files.len(),
                active = active.as_deref().unwrap_or_default(),
                "merged multiple config files"
            );
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./handle-scout.toml", "./.handle-scout.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path in the home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".handle-scout.toml", "handle-scout.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("handle-scout").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations. Values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        // The catalog source (`catalog` path or inline entries) is one setting:
        // a file that names either one replaces both from lower files
        let higher_sets_catalog = higher.platforms.is_some()
            || higher
                .defaults
                .as_ref()
                .is_some_and(|d| d.catalog.is_some());

        let (lower_defaults, lower_platforms) = if higher_sets_catalog {
            let defaults = lower.defaults.map(|d| DefaultsConfig {
                catalog: None,
                ..d
            });
            (defaults, None)
        } else {
            (lower.defaults, lower.platforms)
        };

        FileConfig {
            defaults: match (lower_defaults, higher.defaults) {
                (Some(lower_defaults), Some(higher_defaults)) => Some(DefaultsConfig {
                    timeout: higher_defaults.timeout.or(lower_defaults.timeout),
                    json: higher_defaults.json.or(lower_defaults.json),
                    pretty: higher_defaults.pretty.or(lower_defaults.pretty),
                    suggestions: higher_defaults.suggestions.or(lower_defaults.suggestions),
                    catalog: higher_defaults.catalog.or(lower_defaults.catalog),
                    user_agent: higher_defaults.user_agent.or(lower_defaults.user_agent),
                }),
                (None, Some(higher_defaults)) => Some(higher_defaults),
                (Some(lower_defaults), None) => Some(lower_defaults),
                (None, None) => None,
            },
            // Inline entries are replaced as a whole, never merged entry by entry
            platforms: higher.platforms.or(lower_platforms),
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), ScoutError> {
        if let Some(defaults) = &config.defaults {
            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout(timeout_str).is_none() {
                    return Err(ScoutError::config(format!(
                        "Invalid timeout format '{}'. Use format like '6s', '500ms', '1m'",
                        timeout_str
                    )));
                }
            }

            if let Some(user_agent) = &defaults.user_agent {
                if user_agent.trim().is_empty() {
                    return Err(ScoutError::config("user_agent cannot be empty"));
                }
            }

            if defaults.catalog.is_some() && config.platforms.is_some() {
                return Err(ScoutError::config(
                    "Cannot specify both 'catalog' and inline [[platform]] entries",
                ));
            }
        }

        config.inline_catalog()?;

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// Values come from `HS_*` variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub timeout: Option<String>,
    pub json: Option<bool>,
    pub pretty: Option<bool>,
    pub suggestions: Option<bool>,
    pub catalog: Option<String>,
    pub config: Option<String>,
    pub user_agent: Option<String>,
}

/// Load configuration from `HS_*` environment variables.
///
/// Invalid values are logged and ignored.
pub fn load_env_config() -> EnvConfig {
    EnvConfig::from_lookup(|key| env::var(key).ok())
}

fn parse_bool(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!("Invalid {}='{}', use true/false", key, value);
            None
        }
    }
}

fn non_empty(key: &str, value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        debug!("Using {}={}", key, value);
        Some(value)
    }
}

impl EnvConfig {
    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_config = EnvConfig::default();

        // HS_TIMEOUT - per-probe timeout
        if let Some(timeout_str) = lookup("HS_TIMEOUT") {
            if parse_timeout(&timeout_str).is_some() {
                debug!("Using HS_TIMEOUT={}", timeout_str);
                env_config.timeout = Some(timeout_str);
            } else {
                warn!(
                    "Invalid HS_TIMEOUT='{}', use format like '6s', '500ms', '1m'",
                    timeout_str
                );
            }
        }

        env_config.json = lookup("HS_JSON").and_then(|v| parse_bool("HS_JSON", &v));
        env_config.pretty = lookup("HS_PRETTY").and_then(|v| parse_bool("HS_PRETTY", &v));
        env_config.suggestions =
            lookup("HS_SUGGESTIONS").and_then(|v| parse_bool("HS_SUGGESTIONS", &v));

        env_config.catalog = lookup("HS_CATALOG").and_then(|v| non_empty("HS_CATALOG", v));
        env_config.config = lookup("HS_CONFIG").and_then(|v| non_empty("HS_CONFIG", v));
        env_config.user_agent =
            lookup("HS_USER_AGENT").and_then(|v| non_empty("HS_USER_AGENT", v));

        env_config
    }
}

/// Parse a timeout string like "6s", "500ms", "2m" or bare seconds.
///
/// Zero is rejected.
pub fn parse_timeout(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let duration = if let Some(ms) = timeout_str.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        timeout_str.parse::<u64>().ok().map(Duration::from_secs)
    };

    duration.filter(|d| !d.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("6s"), Some(Duration::from_secs(6)));
        assert_eq!(parse_timeout("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_timeout("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_timeout("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout("0s"), None);
        assert_eq!(parse_timeout("invalid"), None);
        // Minutes that overflow u64 seconds are rejected, not wrapped
        assert_eq!(parse_timeout("307445734561825861m"), None);
        assert_eq!(
            parse_timeout("18446744073709551615"),
            Some(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[defaults]
timeout = "4s"
pretty = true
suggestions = false
"#,
        );

        let config = ConfigManager::new().load_file(temp_file.path()).unwrap();
        let defaults = config.defaults.unwrap();
        assert_eq!(defaults.timeout, Some("4s".to_string()));
        assert_eq!(defaults.pretty, Some(true));
        assert_eq!(defaults.suggestions, Some(false));
        assert!(config.platforms.is_none());
    }

    #[test]
    fn test_load_inline_platforms() {
        let temp_file = write_config(
            r#"
[[platform]]
name = "Example"
url_template = "https://example.com/{username}"
available_statuses = [404]
taken_statuses = [200]
"#,
        );

        let config = ConfigManager::new().load_file(temp_file.path()).unwrap();
        let catalog = config.inline_catalog().unwrap().unwrap();
        assert_eq!(catalog.names(), vec!["Example"]);
    }

    #[test]
    fn test_invalid_inline_platform_rejected() {
        let temp_file = write_config(
            r#"
[[platform]]
name = "Broken"
url_template = "https://example.com/profile"
"#,
        );

        let result = ConfigManager::new().load_file(temp_file.path());
        assert!(matches!(result, Err(ScoutError::InvalidCatalog { .. })));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let temp_file = write_config(
            r#"
[defaults]
timeout = "soon"
"#,
        );

        let result = ConfigManager::new().load_file(temp_file.path());
        assert!(matches!(result, Err(ScoutError::ConfigError { .. })));
    }

    #[test]
    fn test_catalog_and_inline_conflict() {
        let temp_file = write_config(
            r#"
[defaults]
catalog = "platforms.toml"

[[platform]]
name = "Example"
url_template = "https://example.com/{username}"
"#,
        );

        assert!(ConfigManager::new().load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigManager::new().load_file("/no/such/handle-scout.toml");
        assert!(matches!(result, Err(ScoutError::FileError { .. })));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new();

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                timeout: Some("10s".to_string()),
                pretty: Some(false),
                json: Some(true),
                ..Default::default()
            }),
            platforms: Some(vec![PlatformDescriptor::new(
                "Lower",
                "https://lower.example/{username}",
            )]),
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                timeout: Some("3s".to_string()),
                pretty: Some(true),
                ..Default::default()
            }),
            platforms: None,
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();

        assert_eq!(defaults.timeout, Some("3s".to_string())); // Higher wins
        assert_eq!(defaults.pretty, Some(true)); // Higher wins
        assert_eq!(defaults.json, Some(true)); // Lower preserved
        assert_eq!(merged.platforms.unwrap()[0].name, "Lower");
    }

    #[test]
    fn test_higher_catalog_path_replaces_lower_inline_platforms() {
        let manager = ConfigManager::new();

        let home = FileConfig {
            defaults: Some(DefaultsConfig {
                pretty: Some(true),
                ..Default::default()
            }),
            platforms: Some(vec![PlatformDescriptor::new(
                "Home",
                "https://home.example/{username}",
            )]),
        };
        let local = FileConfig {
            defaults: Some(DefaultsConfig {
                catalog: Some("local.toml".to_string()),
                ..Default::default()
            }),
            platforms: None,
        };

        let merged = manager.merge_configs(home, local);
        let defaults = merged.defaults.unwrap();
        assert_eq!(defaults.catalog, Some("local.toml".to_string()));
        assert_eq!(defaults.pretty, Some(true)); // unrelated settings still merge
        assert!(merged.platforms.is_none());
    }

    #[test]
    fn test_higher_inline_platforms_replace_lower_catalog_path() {
        let manager = ConfigManager::new();

        let home = FileConfig {
            defaults: Some(DefaultsConfig {
                catalog: Some("home.toml".to_string()),
                ..Default::default()
            }),
            platforms: None,
        };
        let local = FileConfig {
            defaults: None,
            platforms: Some(vec![PlatformDescriptor::new(
                "Local",
                "https://local.example/{username}",
            )]),
        };

        let merged = manager.merge_configs(home, local);
        assert_eq!(merged.defaults.unwrap().catalog, None);
        assert_eq!(merged.platforms.unwrap()[0].name, "Local");
    }

    #[test]
    fn test_env_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("HS_TIMEOUT", "3s"),
            ("HS_JSON", "yes"),
            ("HS_PRETTY", "maybe"),
            ("HS_SUGGESTIONS", "off"),
            ("HS_CATALOG", "  "),
            ("HS_USER_AGENT", "Scout/2"),
        ]
        .into_iter()
        .collect();

        let env_config = EnvConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(env_config.timeout, Some("3s".to_string()));
        assert_eq!(env_config.json, Some(true));
        assert_eq!(env_config.pretty, None);
        assert_eq!(env_config.suggestions, Some(false));
        assert_eq!(env_config.catalog, None);
        assert_eq!(env_config.config, None);
        assert_eq!(env_config.user_agent, Some("Scout/2".to_string()));
    }

    #[test]
    fn test_env_config_invalid_timeout_ignored() {
        let env_config = EnvConfig::from_lookup(|key| {
            (key == "HS_TIMEOUT").then(|| "forever".to_string())
        });
        assert_eq!(env_config, EnvConfig::default());
    }
}
