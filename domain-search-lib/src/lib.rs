//! # Domain Search Library
//!
//! Decides whether candidate domains are registered and prices them for a
//! registrar storefront.
//!
//! Resolution asks the RDAP aggregator first for extensions known to support
//! it, then escalates through DNS-over-HTTPS probes (A, NS, SOA over two
//! providers). If nothing is decisive the domain is reported taken.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_search_lib::DomainSearcher;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let searcher = DomainSearcher::new()?;
//!     let result = searcher.search("mybrand", None).await?;
//!
//!     for entry in result.suggestions {
//!         println!("{} - {} USD", entry.domain, entry.price.price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **RDAP first**: registry truth beats DNS inference for supported TLDs
//! - **DNS escalation**: five ordered DoH probes across two providers
//! - **Conservative default**: unverifiable domains are never "available"
//! - **Concurrent fan-out**: every candidate of a query resolves in parallel
//! - **Display pricing**: static table with USD/KES conversion

// Re-export main public API types and functions
pub use config::{
    apply_env_config, apply_file_config, load_env_config, parse_timeout, ConfigManager,
    EnvConfig, FileConfig,
};
pub use error::DomainSearchError;
pub use names::{
    extract_extension, is_known_extension, is_plausible_hostname, normalize_query, split_domain,
    NormalizedQuery, MULTI_LABEL_EXTENSIONS,
};
pub use pricing::{convert, has_builtin_price, price_for, PriceTable, FALLBACK_PRICE, USD_TO_KES};
pub use protocols::{
    classify_doh_response, classify_rdap_status, is_rdap_supported, DnsProbe, DohClient,
    DohResponse, RdapClient, RdapProbe, RDAP_SUPPORTED_EXTENSIONS,
};
pub use resolver::{AvailabilityResolver, DNS_ESCALATION};
pub use search::{build_candidates, DomainSearcher};
pub use types::{
    AvailabilityVerdict, BasePrice, Candidate, CandidateResult, Currency, DnsOutcome,
    DnsRecordType, DohProvider, Endpoints, PriceQuote, Resolution, ResolutionMethod,
    SearchConfig, SearchResult, DEFAULT_ALTERNATE_EXTENSIONS, DEFAULT_EXTENSION, MAX_CANDIDATES,
};

mod config;
mod error;
mod names;
mod pricing;
mod protocols;
mod resolver;
mod search;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainSearchError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        features: get_enabled_features(),
    }
}

/// Information about the library build and features
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub features: Vec<&'static str>,
}

#[allow(clippy::vec_init_then_push)]
fn get_enabled_features() -> Vec<&'static str> {
    let mut features = Vec::new();

    #[cfg(feature = "rdap")]
    features.push("rdap");

    #[cfg(feature = "doh")]
    features.push("doh");

    features
}
