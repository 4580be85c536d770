//! RDAP (Registration Data Access Protocol) probe.
//!
//! Only the HTTP status of the aggregator's answer is consumed. Registrant
//! details are often redacted and say nothing about availability, so the
//! body is never read.

use super::{RdapProbe, CLIENT_BACKSTOP};
use crate::error::DomainSearchError;
use crate::types::{AvailabilityVerdict, DEFAULT_RDAP_ENDPOINT, DEFAULT_RDAP_TIMEOUT};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{redirect, StatusCode};
use std::time::Duration;

const RDAP_MEDIA_TYPE: &str = "application/rdap+json";

/// Extensions whose registries answer the aggregator reliably.
pub const RDAP_SUPPORTED_EXTENSIONS: &[&str] = &[
    ".com", ".net", ".org", ".io", ".co", ".me", ".tv", ".cc", ".us", ".africa", ".ng", ".xyz",
    ".online", ".store", ".tech", ".website", ".site", ".space", ".app", ".dev", ".info", ".biz",
    ".mobi",
];

/// Whether RDAP should be tried for this extension.
pub fn is_rdap_supported(extension: &str) -> bool {
    RDAP_SUPPORTED_EXTENSIONS.contains(&extension.to_lowercase().as_str())
}

/// Map an aggregator HTTP status to a verdict.
///
/// 404 means the registry has no record, 200 means it has one. Rate limits,
/// server errors and anything else are inconclusive.
pub fn classify_rdap_status(status: StatusCode) -> AvailabilityVerdict {
    match status {
        StatusCode::NOT_FOUND => AvailabilityVerdict::Available,
        StatusCode::OK => AvailabilityVerdict::Taken,
        _ => AvailabilityVerdict::Inconclusive,
    }
}

/// RDAP client for the aggregation endpoint.
#[derive(Clone)]
pub struct RdapClient {
    http_client: reqwest::Client,
    /// Aggregator base URL, without the `/domain/` suffix
    endpoint: String,
    timeout: Duration,
}

impl RdapClient {
    /// Create a client for the default aggregator and timeout.
    pub fn new() -> Result<Self, DomainSearchError> {
        Self::with_config(DEFAULT_RDAP_ENDPOINT, DEFAULT_RDAP_TIMEOUT)
    }

    /// Create a client for a custom aggregator base URL and timeout.
    pub fn with_config<E: Into<String>>(
        endpoint: E,
        timeout: Duration,
    ) -> Result<Self, DomainSearchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout + CLIENT_BACKSTOP)
            .redirect(redirect::Policy::limited(10))
            .user_agent(concat!("domain-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainSearchError::internal(format!("Failed to create RDAP HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Lookup URL for a domain.
    pub fn lookup_url(&self, domain: &str) -> String {
        format!("{}/domain/{}", self.endpoint, domain)
    }

    async fn fetch_status(&self, url: &str) -> Result<StatusCode, DomainSearchError> {
        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, RDAP_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| DomainSearchError::from_http("RDAP", e, self.timeout + CLIENT_BACKSTOP))?;
        Ok(response.status())
    }
}

#[async_trait]
impl RdapProbe for RdapClient {
    async fn check(&self, domain: &str) -> AvailabilityVerdict {
        let url = self.lookup_url(domain);

        let status = match tokio::time::timeout(self.timeout, self.fetch_status(&url)).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                tracing::debug!(domain, error = %e, "RDAP request failed");
                return AvailabilityVerdict::Inconclusive;
            }
            Err(_) => {
                let e = DomainSearchError::probe_timeout("RDAP", self.timeout);
                tracing::debug!(domain, error = %e, "RDAP request timed out");
                return AvailabilityVerdict::Inconclusive;
            }
        };

        let verdict = classify_rdap_status(status);
        tracing::debug!(domain, status = status.as_u16(), ?verdict, "RDAP answered");
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::test_server;

    #[test]
    fn test_rdap_client_creation() {
        assert!(RdapClient::new().is_ok());
    }

    #[test]
    fn test_lookup_url_trims_trailing_slash() {
        let client = RdapClient::with_config("https://rdap.example/", Duration::from_secs(8)).unwrap();
        assert_eq!(
            client.lookup_url("acme.com"),
            "https://rdap.example/domain/acme.com"
        );
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(
            classify_rdap_status(StatusCode::NOT_FOUND),
            AvailabilityVerdict::Available
        );
        assert_eq!(classify_rdap_status(StatusCode::OK), AvailabilityVerdict::Taken);
        for status in [
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::FORBIDDEN,
            StatusCode::NO_CONTENT,
        ] {
            assert_eq!(classify_rdap_status(status), AvailabilityVerdict::Inconclusive);
        }
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_rdap_supported(".com"));
        assert!(is_rdap_supported(".AFRICA"));
        assert!(is_rdap_supported(".mobi"));
        assert!(!is_rdap_supported(".co.ke"));
        assert!(!is_rdap_supported(".ke"));
        assert!(!is_rdap_supported("com"));
    }

    #[tokio::test]
    async fn test_unreachable_aggregator_is_inconclusive() {
        let client = RdapClient::with_config("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        assert_eq!(client.check("acme.com").await, AvailabilityVerdict::Inconclusive);
    }

    #[tokio::test]
    async fn test_not_found_over_http_is_available() {
        let (base, mut requests) = test_server::respond("404 Not Found", "").await;
        let client = RdapClient::with_config(base, Duration::from_secs(2)).unwrap();

        assert_eq!(client.check("acme.com").await, AvailabilityVerdict::Available);

        let head = requests.recv().await.unwrap();
        assert!(head.starts_with("get /domain/acme.com "), "{}", head);
        assert!(head.contains("accept: application/rdap+json"), "{}", head);
    }

    #[tokio::test]
    async fn test_ok_over_http_is_taken() {
        let (base, _requests) =
            test_server::respond("200 OK", r#"{"objectClassName":"domain","ldhName":"ACME.COM"}"#)
                .await;
        let client = RdapClient::with_config(base, Duration::from_secs(2)).unwrap();
        assert_eq!(client.check("acme.com").await, AvailabilityVerdict::Taken);
    }

    #[tokio::test]
    async fn test_rate_limited_over_http_is_inconclusive() {
        let (base, _requests) = test_server::respond("429 Too Many Requests", "").await;
        let client = RdapClient::with_config(base, Duration::from_secs(2)).unwrap();
        assert_eq!(client.check("acme.com").await, AvailabilityVerdict::Inconclusive);
    }

    #[tokio::test]
    async fn test_silent_aggregator_is_cut_off_at_deadline() {
        let base = test_server::hang().await;
        let timeout = Duration::from_millis(300);
        let client = RdapClient::with_config(base, timeout).unwrap();

        let started = std::time::Instant::now();
        let verdict = client.check("acme.com").await;
        let elapsed = started.elapsed();

        assert_eq!(verdict, AvailabilityVerdict::Inconclusive);
        assert!(elapsed >= timeout, "returned after {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1500), "took {:?}", elapsed);
    }
}
