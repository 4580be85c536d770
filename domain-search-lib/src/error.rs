//! Error handling for domain search operations.
//!
//! Only caller mistakes leave the library as errors. Probe failures
//! (timeouts, connection errors, odd status codes) are absorbed into an
//! inconclusive verdict by the probe layer and never reach the caller.

use std::time::Duration;
use thiserror::Error;

/// Main error type for domain search operations.
#[derive(Debug, Clone, Error)]
pub enum DomainSearchError {
    /// The query could not be normalized to a non-empty domain name.
    #[error("Invalid domain name '{input}': {reason}")]
    InvalidDomainName { input: String, reason: String },

    /// A probe exceeded its deadline.
    #[error("{probe} probe timed out after {duration:?}")]
    ProbeTimeout { probe: String, duration: Duration },

    /// A probe failed at the transport level or returned an unusable body.
    #[error("{probe} probe failed: {message}")]
    ProbeNetwork { probe: String, message: String },

    /// Configuration errors (invalid settings, unparseable TOML, etc.)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File I/O errors when reading configuration
    #[error("File error at '{path}': {message}")]
    File { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainSearchError {
    /// Create a new invalid domain name error.
    pub fn invalid_domain<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::InvalidDomainName {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a new probe timeout error.
    pub fn probe_timeout<P: Into<String>>(probe: P, duration: Duration) -> Self {
        Self::ProbeTimeout {
            probe: probe.into(),
            duration,
        }
    }

    /// Create a new probe network error.
    pub fn probe_network<P: Into<String>, M: Into<String>>(probe: P, message: M) -> Self {
        Self::ProbeNetwork {
            probe: probe.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error came from flaky external dependencies rather than
    /// from the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ProbeTimeout { .. } | Self::ProbeNetwork { .. })
    }
}

impl DomainSearchError {
    /// Classify a failed HTTP exchange made by `client`, whose request
    /// deadline was `deadline`.
    pub fn from_http<C: Into<String>>(client: C, err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            Self::probe_timeout(client, deadline)
        } else if err.is_connect() {
            Self::probe_network(client, format!("connection failed: {}", err))
        } else {
            Self::probe_network(client, err.to_string())
        }
    }
}

impl From<toml::de::Error> for DomainSearchError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}
