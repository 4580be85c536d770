//! DNS-over-HTTPS probe using the JSON wire format.
//!
//! Any DoH provider that answers `GET ?name=&type=` with
//! `Accept: application/dns-json` works. Only `Status` and `Answer` are read.

use super::{DnsProbe, CLIENT_BACKSTOP};
use crate::error::DomainSearchError;
use crate::names::is_plausible_hostname;
use crate::types::{
    DnsOutcome, DnsRecordType, DohProvider, Endpoints, DEFAULT_DOH_TIMEOUT,
};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;

const DNS_JSON_MEDIA_TYPE: &str = "application/dns-json";

/// RCODE 0
const NOERROR: u32 = 0;
/// RCODE 3
const NXDOMAIN: u32 = 3;

/// The subset of a DoH JSON answer the probe needs.
#[derive(Debug, Clone, Deserialize)]
pub struct DohResponse {
    #[serde(rename = "Status")]
    pub status: u32,
    #[serde(rename = "Answer", default)]
    pub answer: Option<Vec<serde_json::Value>>,
}

/// Classify a DoH answer.
///
/// NXDOMAIN is an available signal, NOERROR with answers a taken signal.
/// NOERROR without answers, SERVFAIL and everything else are inconclusive.
pub fn classify_doh_response(response: &DohResponse) -> Option<DnsOutcome> {
    match response.status {
        NXDOMAIN => Some(DnsOutcome::NXDOMAIN),
        NOERROR if response.answer.as_ref().is_some_and(|a| !a.is_empty()) => {
            Some(DnsOutcome::RESOLVED)
        }
        _ => None,
    }
}

/// DoH client over two independent providers.
#[derive(Clone)]
pub struct DohClient {
    http_client: reqwest::Client,
    primary: String,
    secondary: String,
    timeout: Duration,
}

impl DohClient {
    /// Create a client for the default providers and timeout.
    pub fn new() -> Result<Self, DomainSearchError> {
        Self::with_config(&Endpoints::default(), DEFAULT_DOH_TIMEOUT)
    }

    /// Create a client for the configured providers.
    pub fn with_config(endpoints: &Endpoints, timeout: Duration) -> Result<Self, DomainSearchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout + CLIENT_BACKSTOP)
            .user_agent(concat!("domain-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainSearchError::internal(format!("Failed to create DoH HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            primary: endpoints.doh_primary.clone(),
            secondary: endpoints.doh_secondary.clone(),
            timeout,
        })
    }

    fn endpoint(&self, provider: DohProvider) -> &str {
        match provider {
            DohProvider::Primary => &self.primary,
            DohProvider::Secondary => &self.secondary,
        }
    }

    async fn fetch(
        &self,
        endpoint: &str,
        domain: &str,
        record_type: DnsRecordType,
    ) -> Result<DohResponse, DomainSearchError> {
        let response = self
            .http_client
            .get(endpoint)
            .query(&[("name", domain), ("type", record_type.as_str())])
            .header(ACCEPT, DNS_JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| DomainSearchError::from_http("DoH", e, self.timeout + CLIENT_BACKSTOP))?;

        if !response.status().is_success() {
            return Err(DomainSearchError::probe_network(
                "DoH",
                format!("HTTP {}", response.status()),
            ));
        }

        response.json::<DohResponse>().await.map_err(|e| {
            DomainSearchError::probe_network("DoH", format!("malformed JSON: {}", e))
        })
    }
}

#[async_trait]
impl DnsProbe for DohClient {
    async fn query_record(
        &self,
        domain: &str,
        record_type: DnsRecordType,
        provider: DohProvider,
    ) -> Option<DnsOutcome> {
        if !is_plausible_hostname(domain) {
            tracing::debug!(domain, "refusing DoH query for implausible hostname");
            return None;
        }

        let endpoint = self.endpoint(provider);
        let response =
            match tokio::time::timeout(self.timeout, self.fetch(endpoint, domain, record_type))
                .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    tracing::debug!(domain, ?provider, record = record_type.as_str(), error = %e, "DoH query failed");
                    return None;
                }
                Err(_) => {
                    tracing::debug!(domain, ?provider, record = record_type.as_str(), timeout = ?self.timeout, "DoH query timed out");
                    return None;
                }
            };

        let outcome = classify_doh_response(&response);
        tracing::debug!(
            domain,
            ?provider,
            record = record_type.as_str(),
            status = response.status,
            ?outcome,
            "DoH answered"
        );
        outcome
    }
}
