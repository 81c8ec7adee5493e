//! Probe execution: one HTTP request per platform.
//!
//! A probe never fails. Transport problems are folded into the returned
//! [`ProbeResult`] as an `error` status carrying a symbolic category, so a
//! batch can always be assembled from whatever each platform did.

use crate::classify::classify;
use crate::error::ScoutError;
use crate::platform::PlatformDescriptor;
use crate::types::{CheckConfig, ProbeResult, ProbeStatus};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::fmt;
use tracing::{debug, instrument, warn};

/// `Accept-Language` sent with every probe unless a platform overrides it.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Why a probe did not produce an HTTP status.
///
/// Only the category is reported; the underlying error text varies between
/// runs and can leak resolver or proxy details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportError {
    /// The request did not finish within the probe timeout
    Timeout,
    /// DNS failure, refused connection, TLS handshake failure
    ConnectError,
    /// Redirect limit exceeded or a redirect loop
    TooManyRedirects,
    /// Response could not be decoded
    DecodeError,
    /// Request or response body failed mid-stream
    BodyError,
    /// The request could not be built (bad URL, method or header)
    InvalidRequest,
    /// Any other failure while sending the request
    RequestError,
    /// Failure that fits none of the above
    HttpError,
}

impl TransportError {
    /// Symbolic category used as the probe reason.
    pub fn category(&self) -> &'static str {
        match self {
            TransportError::Timeout => "Timeout",
            TransportError::ConnectError => "ConnectError",
            TransportError::TooManyRedirects => "TooManyRedirects",
            TransportError::DecodeError => "DecodeError",
            TransportError::BodyError => "BodyError",
            TransportError::InvalidRequest => "InvalidRequest",
            TransportError::RequestError => "RequestError",
            TransportError::HttpError => "HttpError",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

impl From<&reqwest::Error> for TransportError {
    fn from(err: &reqwest::Error) -> Self {
        // Timeout first: a connect that times out reports both
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_redirect() {
            TransportError::TooManyRedirects
        } else if err.is_connect() {
            TransportError::ConnectError
        } else if err.is_decode() {
            TransportError::DecodeError
        } else if err.is_body() {
            TransportError::BodyError
        } else if err.is_builder() {
            TransportError::InvalidRequest
        } else if err.is_request() {
            TransportError::RequestError
        } else {
            TransportError::HttpError
        }
    }
}

/// Build the pooled client shared by every probe of one batch.
///
/// Timeout and redirect policy are set once here so all probes get the
/// same treatment.
pub fn build_client(config: &CheckConfig) -> Result<Client, ScoutError> {
    let client = Client::builder()
        .timeout(config.timeout)
        .redirect(Policy::limited(config.max_redirects))
        .build()?;
    Ok(client)
}

/// Headers every probe starts from before platform overrides.
pub fn default_headers(config: &CheckConfig) -> Result<HeaderMap, ScoutError> {
    let mut headers = HeaderMap::new();
    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|_| ScoutError::config(format!("invalid user agent '{}'", config.user_agent)))?;
    headers.insert(USER_AGENT, user_agent);
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
    );
    Ok(headers)
}

/// Defaults overlaid with the platform's own headers (platform wins).
fn merged_headers(
    platform: &PlatformDescriptor,
    defaults: &HeaderMap,
) -> Result<HeaderMap, TransportError> {
    let mut headers = defaults.clone();
    let pairs = platform
        .header_pairs()
        .map_err(|_| TransportError::InvalidRequest)?;
    for (name, value) in pairs {
        headers.insert(name, value);
    }
    Ok(headers)
}

async fn send(
    client: &Client,
    platform: &PlatformDescriptor,
    url: &str,
    defaults: &HeaderMap,
) -> Result<u16, TransportError> {
    let method = platform
        .http_method()
        .map_err(|_| TransportError::InvalidRequest)?;
    let headers = merged_headers(platform, defaults)?;

    let response = client
        .request(method, url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| TransportError::from(&e))?;

    Ok(response.status().as_u16())
}

/// Probe one platform for a handle.
///
/// Skipped platforms return immediately without touching the network.
/// The handle must already be validated by the caller.
#[instrument(level = "debug", skip_all, fields(platform = %platform.name))]
pub async fn probe_platform(
    platform: &PlatformDescriptor,
    handle: &str,
    client: &Client,
    defaults: &HeaderMap,
) -> ProbeResult {
    if platform.skip_check {
        debug!("platform not checkable, skipping");
        return ProbeResult {
            platform: platform.name.clone(),
            url: None,
            status: ProbeStatus::Unknown,
            http_status: None,
            reason: platform.skip_reason().to_string(),
        };
    }

    let url = platform.profile_url(handle);
    debug!(%url, method = %platform.method, "sending probe");

    match send(client, platform, &url, defaults).await {
        Ok(code) => {
            let (status, reason) = classify(platform, code);
            debug!(code, %status, "probe classified");
            ProbeResult {
                platform: platform.name.clone(),
                url: Some(url),
                status,
                http_status: Some(code),
                reason,
            }
        }
        Err(err) => {
            warn!(%url, category = %err, "probe failed");
            ProbeResult {
                platform: platform.name.clone(),
                url: Some(url),
                status: ProbeStatus::Error,
                http_status: None,
                reason: err.category().to_string(),
            }
        }
    }
}
