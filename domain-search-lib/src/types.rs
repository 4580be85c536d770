//! Core data types for domain search.
//!
//! This module defines the verdicts, probe outcomes, candidates, price quotes
//! and aggregate results used throughout the library, plus the runtime
//! configuration for a searcher.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::DomainSearchError;

/// Extension appended to queries that don't carry one.
pub const DEFAULT_EXTENSION: &str = ".com";

/// Upper bound on candidates per query, to respect probe rate limits.
pub const MAX_CANDIDATES: usize = 15;

/// Default deadline for a single DNS-over-HTTPS query.
pub const DEFAULT_DOH_TIMEOUT: Duration = Duration::from_secs(7);

/// Default deadline for a single RDAP lookup.
pub const DEFAULT_RDAP_TIMEOUT: Duration = Duration::from_secs(8);

pub const DEFAULT_DOH_PRIMARY: &str = "https://cloudflare-dns.com/dns-query";
pub const DEFAULT_DOH_SECONDARY: &str = "https://dns.google/resolve";
pub const DEFAULT_RDAP_ENDPOINT: &str = "https://rdap.org";

/// Alternate extensions offered alongside the exact query.
///
/// Regional Kenyan and African variants come first, then global popular TLDs.
pub const DEFAULT_ALTERNATE_EXTENSIONS: &[&str] = &[
    ".co.ke", ".ke", ".or.ke", ".africa", ".com", ".net", ".org", ".io", ".co", ".app", ".dev",
    ".tech", ".online", ".store", ".xyz", ".info",
];

/// Tri-state outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityVerdict {
    /// The registry or DNS says the name does not exist
    Available,
    /// The registry or DNS says the name exists
    Taken,
    /// No usable signal (timeout, rate limit, server error, ...)
    Inconclusive,
}

impl AvailabilityVerdict {
    /// `Some(true)` for available, `Some(false)` for taken, `None` otherwise.
    pub fn as_available(self) -> Option<bool> {
        match self {
            Self::Available => Some(true),
            Self::Taken => Some(false),
            Self::Inconclusive => None,
        }
    }
}

/// DNS record types the DoH probe knows how to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnsRecordType {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "NS")]
    Ns,
    #[serde(rename = "SOA")]
    Soa,
}

impl DnsRecordType {
    /// Wire name used in the `type=` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ns => "NS",
            Self::Soa => "SOA",
        }
    }
}

/// Which of the two independent DoH providers to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DohProvider {
    Primary,
    Secondary,
}

/// Structured classification of a decisive DoH answer.
///
/// Inconclusive answers are represented by the absence of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsOutcome {
    /// The name does not exist (NXDOMAIN)
    pub nxdomain: bool,
    /// The name resolved with at least one record
    pub has_records: bool,
}

impl DnsOutcome {
    pub const NXDOMAIN: Self = Self {
        nxdomain: true,
        has_records: false,
    };

    pub const RESOLVED: Self = Self {
        nxdomain: false,
        has_records: true,
    };

    /// Map the outcome to a verdict.
    pub fn verdict(self) -> AvailabilityVerdict {
        if self.nxdomain {
            AvailabilityVerdict::Available
        } else if self.has_records {
            AvailabilityVerdict::Taken
        } else {
            AvailabilityVerdict::Inconclusive
        }
    }
}

/// How a final availability answer was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// Registry answered via RDAP
    Rdap,
    /// A DNS escalation step answered
    Dns {
        provider: DohProvider,
        record_type: DnsRecordType,
    },
    /// Every probe was inconclusive; reported as taken
    AssumedTaken,
}

impl fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rdap => write!(f, "RDAP"),
            Self::Dns {
                provider,
                record_type,
            } => {
                let provider = match provider {
                    DohProvider::Primary => "primary",
                    DohProvider::Secondary => "secondary",
                };
                write!(f, "DNS {} ({})", record_type.as_str(), provider)
            }
            Self::AssumedTaken => write!(f, "assumed"),
        }
    }
}

/// Final answer for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub domain: String,
    pub available: bool,
    pub method: ResolutionMethod,
}

/// A single domain + extension pair under evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Lowercase label, `[a-z0-9-]` only
    pub name: String,
    /// Extension with leading dot, possibly multi-label (`.co.ke`)
    pub extension: String,
}

impl Candidate {
    pub fn new<N: Into<String>, E: Into<String>>(name: N, extension: E) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
        }
    }

    pub fn full_domain(&self) -> String {
        format!("{}{}", self.name, self.extension)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.extension)
    }
}

/// Display currencies supported by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Base currency of the price table
    Usd,
    /// Secondary display currency
    #[default]
    Kes,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Kes => "KES",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DomainSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" | "$" => Ok(Self::Usd),
            "kes" | "ksh" | "kshs" => Ok(Self::Kes),
            other => Err(DomainSearchError::config(format!(
                "Unknown currency '{}', expected USD or KES",
                other
            ))),
        }
    }
}

/// Registration and renewal price in the base currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasePrice {
    pub price: f64,
    pub renew_price: f64,
}

/// Prices attached to a candidate for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Registration price in the base currency
    pub price: f64,
    /// Renewal price in the base currency
    pub renew_price: f64,
    pub currency: Currency,
    /// Registration price converted to the secondary currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_secondary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renew_price_secondary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_currency: Option<Currency>,
}

/// A candidate with its availability and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    /// Full domain, e.g. "acme.co.ke"
    pub domain: String,
    #[serde(flatten)]
    pub candidate: Candidate,
    pub available: bool,
    /// Registry premium pricing; not detected, always false
    pub premium: bool,
    pub method: ResolutionMethod,
    pub price: PriceQuote,
}

/// Categorized result of one search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The query as the caller sent it
    pub query: String,
    /// The candidate matching the query itself
    pub exact: Option<CandidateResult>,
    /// Other available, non-premium candidates
    pub suggestions: Vec<CandidateResult>,
    pub premium: Vec<CandidateResult>,
    pub taken: Vec<CandidateResult>,
}

impl SearchResult {
    /// Total number of candidates across all buckets.
    pub fn len(&self) -> usize {
        usize::from(self.exact.is_some())
            + self.suggestions.len()
            + self.premium.len()
            + self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Network endpoints for the two probe families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub doh_primary: String,
    pub doh_secondary: String,
    /// RDAP aggregator base; lookups go to `<base>/domain/<name>`
    pub rdap: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            doh_primary: DEFAULT_DOH_PRIMARY.to_string(),
            doh_secondary: DEFAULT_DOH_SECONDARY.to_string(),
            rdap: DEFAULT_RDAP_ENDPOINT.to_string(),
        }
    }
}

/// Configuration options for a domain searcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of candidate resolutions in flight
    /// Default: 15, Range: 1-100
    pub concurrency: usize,

    /// Maximum candidates per query, exact match included
    /// Default: 15, Range: 1-15
    pub max_candidates: usize,

    /// Extension used when the query has none
    pub default_extension: String,

    /// Extensions offered alongside the exact query, in display priority
    pub alternate_extensions: Vec<String>,

    /// Deadline for each DoH query
    #[serde(skip)]
    pub doh_timeout: Duration,

    /// Deadline for each RDAP lookup
    #[serde(skip)]
    pub rdap_timeout: Duration,

    pub endpoints: Endpoints,

    /// Default display currency when the caller has no preference
    pub currency: Currency,

    /// Price table entries that replace or extend the built-in table
    #[serde(skip)]
    pub price_overrides: HashMap<String, BasePrice>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            concurrency: MAX_CANDIDATES,
            max_candidates: MAX_CANDIDATES,
            default_extension: DEFAULT_EXTENSION.to_string(),
            alternate_extensions: DEFAULT_ALTERNATE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            doh_timeout: DEFAULT_DOH_TIMEOUT,
            rdap_timeout: DEFAULT_RDAP_TIMEOUT,
            endpoints: Endpoints::default(),
            currency: Currency::default(),
            price_overrides: HashMap::new(),
        }
    }
}

impl SearchConfig {
    /// Set the fan-out limit, clamped to 1-100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the candidate cap, clamped to 1-15.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.clamp(1, MAX_CANDIDATES);
        self
    }

    /// Set the extension used for bare-name queries; `"com"` and `".COM"`
    /// both become `".com"`.
    pub fn with_default_extension<E: AsRef<str>>(mut self, extension: E) -> Self {
        self.default_extension = crate::names::normalize_extension(extension.as_ref());
        self
    }

    pub fn with_alternate_extensions(mut self, extensions: Vec<String>) -> Self {
        self.alternate_extensions = extensions;
        self
    }

    pub fn with_doh_timeout(mut self, timeout: Duration) -> Self {
        self.doh_timeout = timeout;
        self
    }

    pub fn with_rdap_timeout(mut self, timeout: Duration) -> Self {
        self.rdap_timeout = timeout;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_price_overrides(mut self, overrides: HashMap<String, BasePrice>) -> Self {
        self.price_overrides = overrides;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_outcome_verdicts() {
        assert_eq!(DnsOutcome::NXDOMAIN.verdict(), AvailabilityVerdict::Available);
        assert_eq!(DnsOutcome::RESOLVED.verdict(), AvailabilityVerdict::Taken);
        let empty = DnsOutcome {
            nxdomain: false,
            has_records: false,
        };
        assert_eq!(empty.verdict(), AvailabilityVerdict::Inconclusive);
    }

    #[test]
    fn test_candidate_full_domain() {
        let candidate = Candidate::new("acme", ".co.ke");
        assert_eq!(candidate.full_domain(), "acme.co.ke");
        assert_eq!(candidate.to_string(), "acme.co.ke");
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("KES".parse::<Currency>().unwrap(), Currency::Kes);
        assert_eq!("KSh".parse::<Currency>().unwrap(), Currency::Kes);
        assert!("eur".parse::<Currency>().is_err());
    }

    #[test]
    fn test_config_clamps() {
        let config = SearchConfig::default()
            .with_concurrency(0)
            .with_max_candidates(40);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.max_candidates, MAX_CANDIDATES);
    }

    #[test]
    fn test_default_extension_is_normalized() {
        assert_eq!(
            SearchConfig::default().with_default_extension("com").default_extension,
            ".com"
        );
        assert_eq!(
            SearchConfig::default().with_default_extension(" .Co.KE ").default_extension,
            ".co.ke"
        );
    }

    #[test]
    fn test_resolution_method_display() {
        let method = ResolutionMethod::Dns {
            provider: DohProvider::Secondary,
            record_type: DnsRecordType::Soa,
        };
        assert_eq!(method.to_string(), "DNS SOA (secondary)");
        assert_eq!(ResolutionMethod::AssumedTaken.to_string(), "assumed");
    }

    #[test]
    fn test_candidate_result_serializes_flat() {
        let result = CandidateResult {
            domain: "acme.com".to_string(),
            candidate: Candidate::new("acme", ".com"),
            available: true,
            premium: false,
            method: ResolutionMethod::Rdap,
            price: PriceQuote {
                price: 12.99,
                renew_price: 14.99,
                currency: Currency::Usd,
                price_secondary: None,
                renew_price_secondary: None,
                secondary_currency: None,
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["name"], "acme");
        assert_eq!(json["extension"], ".com");
        assert_eq!(json["method"]["kind"], "rdap");
        assert!(json["price"].get("price_secondary").is_none());
    }
}
