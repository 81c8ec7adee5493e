//! Platform descriptors and the catalog that holds them.
//!
//! The catalog is plain configuration data: an ordered list of platforms, each
//! with a profile URL template and the status codes that mean "available",
//! "taken" or "unclear" on that platform. Descriptors are validated when a
//! catalog is built so probing never has to second-guess them.

use crate::error::ScoutError;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

/// Placeholder substituted with the handle in every URL template.
pub const HANDLE_PLACEHOLDER: &str = "{username}";

/// Skip reason used when a non-probeable platform does not give one.
pub const DEFAULT_SKIP_REASON: &str = "Not checkable";

// Built-in catalog parsed once per process
lazy_static::lazy_static! {
    static ref BUILTIN_CATALOG: Result<Catalog, ScoutError> =
        Catalog::from_toml_str(include_str!("platforms.toml"));
}

fn default_method() -> String {
    "GET".to_string()
}

/// How to probe one platform and how to read its answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformDescriptor {
    /// Display name, unique within a catalog
    pub name: String,

    /// Profile URL with one `{username}` placeholder
    pub url_template: String,

    /// HTTP method for the probe
    #[serde(default = "default_method")]
    pub method: String,

    /// Headers merged over the defaults; these win on collision
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub available_statuses: BTreeSet<u16>,

    #[serde(default)]
    pub taken_statuses: BTreeSet<u16>,

    #[serde(default)]
    pub unknown_statuses: BTreeSet<u16>,

    /// Treat a "taken" code as unknown (cached pages, bot challenges)
    #[serde(default)]
    pub ambiguous_on_taken: bool,

    /// Never probe this platform
    #[serde(default)]
    pub skip_check: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl PlatformDescriptor {
    /// Create a GET descriptor with empty status policy.
    pub fn new<N: Into<String>, T: Into<String>>(name: N, url_template: T) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            method: default_method(),
            headers: BTreeMap::new(),
            available_statuses: BTreeSet::new(),
            taken_statuses: BTreeSet::new(),
            unknown_statuses: BTreeSet::new(),
            ambiguous_on_taken: false,
            skip_check: false,
            skip_reason: None,
        }
    }

    pub fn with_method<M: Into<String>>(mut self, method: M) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_available(mut self, codes: &[u16]) -> Self {
        self.available_statuses.extend(codes);
        self
    }

    pub fn with_taken(mut self, codes: &[u16]) -> Self {
        self.taken_statuses.extend(codes);
        self
    }

    pub fn with_unknown(mut self, codes: &[u16]) -> Self {
        self.unknown_statuses.extend(codes);
        self
    }

    pub fn ambiguous_on_taken(mut self, ambiguous: bool) -> Self {
        self.ambiguous_on_taken = ambiguous;
        self
    }

    /// Mark the platform as not probeable.
    pub fn skipped<R: Into<String>>(mut self, reason: R) -> Self {
        self.skip_check = true;
        self.skip_reason = Some(reason.into());
        self
    }

    /// Profile URL for a handle. The handle is inserted literally.
    pub fn profile_url(&self, handle: &str) -> String {
        self.url_template.replace(HANDLE_PLACEHOLDER, handle)
    }

    pub fn skip_reason(&self) -> &str {
        self.skip_reason.as_deref().unwrap_or(DEFAULT_SKIP_REASON)
    }

    /// Parsed HTTP method.
    pub fn http_method(&self) -> Result<Method, ScoutError> {
        Method::from_bytes(self.method.to_ascii_uppercase().as_bytes()).map_err(|_| {
            ScoutError::platform(&self.name, format!("invalid HTTP method '{}'", self.method))
        })
    }

    /// Parsed platform headers.
    pub fn header_pairs(&self) -> Result<Vec<(HeaderName, HeaderValue)>, ScoutError> {
        self.headers
            .iter()
            .map(|(key, value)| {
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    ScoutError::platform(&self.name, format!("invalid header name '{}'", key))
                })?;
                let value = HeaderValue::from_str(value).map_err(|_| {
                    ScoutError::platform(
                        &self.name,
                        format!("invalid value for header '{}'", key),
                    )
                })?;
                Ok((name, value))
            })
            .collect()
    }

    /// Check the descriptor for problems that would make probing ambiguous.
    pub fn validate(&self) -> Result<(), ScoutError> {
        if self.name.trim().is_empty() {
            return Err(ScoutError::catalog("platform name cannot be empty"));
        }

        let placeholders = self.url_template.matches(HANDLE_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(ScoutError::platform(
                &self.name,
                format!(
                    "url_template must contain exactly one {} placeholder, found {}",
                    HANDLE_PLACEHOLDER, placeholders
                ),
            ));
        }

        let sample = Url::parse(&self.profile_url("sample")).map_err(|e| {
            ScoutError::platform(&self.name, format!("url_template is not a valid URL: {}", e))
        })?;
        if sample.scheme() != "http" && sample.scheme() != "https" {
            return Err(ScoutError::platform(
                &self.name,
                format!("unsupported URL scheme '{}'", sample.scheme()),
            ));
        }

        self.http_method()?;
        self.header_pairs()?;

        let sets = [
            ("available_statuses", &self.available_statuses),
            ("taken_statuses", &self.taken_statuses),
            ("unknown_statuses", &self.unknown_statuses),
        ];

        for (label, codes) in &sets {
            if let Some(code) = codes.iter().find(|c| !(100..=599).contains(*c)) {
                return Err(ScoutError::platform(
                    &self.name,
                    format!("{} contains invalid HTTP status {}", label, code),
                ));
            }
        }

        for (i, (left_label, left)) in sets.iter().enumerate() {
            for (right_label, right) in &sets[i + 1..] {
                if let Some(code) = left.intersection(right).next() {
                    return Err(ScoutError::platform(
                        &self.name,
                        format!(
                            "status {} appears in both {} and {}",
                            code, left_label, right_label
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "platform")]
    platforms: Vec<PlatformDescriptor>,
}

/// Ordered, validated collection of platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    platforms: Vec<PlatformDescriptor>,
}

impl Catalog {
    /// Build a catalog, validating every descriptor and name uniqueness.
    pub fn from_descriptors(platforms: Vec<PlatformDescriptor>) -> Result<Self, ScoutError> {
        if platforms.is_empty() {
            return Err(ScoutError::catalog("catalog must contain at least one platform"));
        }

        let mut names = HashSet::new();
        for platform in &platforms {
            platform.validate()?;
            if !names.insert(platform.name.as_str()) {
                return Err(ScoutError::platform(&platform.name, "duplicate platform name"));
            }
        }

        Ok(Self { platforms })
    }

    /// Parse a catalog from TOML made of `[[platform]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self, ScoutError> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| {
            ScoutError::catalog(format!("failed to parse catalog TOML: {}", e))
        })?;
        Self::from_descriptors(file.platforms)
    }

    /// Load a catalog file from disk.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ScoutError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScoutError::file_error(
                path.to_string_lossy(),
                format!("Failed to read catalog file: {}", e),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// The catalog shipped with the library.
    pub fn builtin() -> Result<&'static Catalog, ScoutError> {
        BUILTIN_CATALOG.as_ref().map_err(|e| e.clone())
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlatformDescriptor> {
        self.platforms.iter()
    }

    pub fn get(&self, name: &str) -> Option<&PlatformDescriptor> {
        self.platforms.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.platforms.iter().map(|p| p.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PlatformDescriptor;
    type IntoIter = std::slice::Iter<'a, PlatformDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.platforms.iter()
    }
}
