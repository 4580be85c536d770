//! Batch search: one free-text query in, a categorized result set out.
//!
//! Every candidate is resolved concurrently. Results are matched back to
//! candidates by domain string, so completion order never affects the
//! buckets.

use crate::error::DomainSearchError;
use crate::names::{is_known_extension, is_valid_extension, normalize_extension, normalize_query};
use crate::pricing::PriceTable;
use crate::resolver::AvailabilityResolver;
use crate::types::{
    Candidate, CandidateResult, Currency, Resolution, ResolutionMethod, SearchConfig,
    SearchResult, MAX_CANDIDATES,
};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::time::Instant;

/// Build the candidate list for a query.
///
/// The exact candidate comes first, followed by `alternates` in order.
/// Duplicates and malformed extensions are skipped and the list is capped
/// at `max` (never more than [`MAX_CANDIDATES`]).
pub fn build_candidates(exact: &Candidate, alternates: &[String], max: usize) -> Vec<Candidate> {
    let cap = max.clamp(1, MAX_CANDIDATES);
    let mut candidates = vec![exact.clone()];

    for extension in alternates {
        if candidates.len() >= cap {
            break;
        }
        let extension = normalize_extension(extension);
        if !is_valid_extension(&extension) {
            continue;
        }
        if candidates.iter().any(|c| c.extension == extension) {
            continue;
        }
        candidates.push(Candidate::new(exact.name.clone(), extension));
    }

    candidates
}

/// Caller-facing entry point for domain search.
///
/// # Example
///
/// ```rust,no_run
/// use domain_search_lib::{Currency, DomainSearcher};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let searcher = DomainSearcher::new()?;
///     let result = searcher.search("acme", Some(Currency::Kes)).await?;
///
///     if let Some(exact) = &result.exact {
///         println!("{}: available={}", exact.domain, exact.available);
///     }
///     for suggestion in &result.suggestions {
///         println!("also free: {}", suggestion.domain);
///     }
///     Ok(())
/// }
/// ```
pub struct DomainSearcher {
    config: SearchConfig,
    resolver: AvailabilityResolver,
    prices: PriceTable,
}

impl DomainSearcher {
    /// Create a searcher with default configuration and HTTP probes.
    pub fn new() -> Result<Self, DomainSearchError> {
        Self::with_config(SearchConfig::default())
    }

    /// Create a searcher with HTTP probes for the configured endpoints.
    pub fn with_config(config: SearchConfig) -> Result<Self, DomainSearchError> {
        let resolver = AvailabilityResolver::from_config(&config)?;
        Ok(Self::with_resolver(config, resolver))
    }

    /// Create a searcher around an existing resolver.
    pub fn with_resolver(config: SearchConfig, resolver: AvailabilityResolver) -> Self {
        let prices = PriceTable::with_overrides(config.price_overrides.clone());
        Self {
            config,
            resolver,
            prices,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Whether a query may name `extension` explicitly: built-in extensions
    /// plus the configured default, alternates and price overrides.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        is_known_extension(extension)
            || self.prices.is_priced(extension)
            || normalize_extension(&self.config.default_extension) == extension
            || self
                .config
                .alternate_extensions
                .iter()
                .any(|alternate| normalize_extension(alternate) == extension)
    }

    /// Resolve a single fully qualified domain.
    pub async fn resolve(&self, domain: &str) -> Resolution {
        self.resolver.resolve(domain).await
    }

    /// Search for a free-text query.
    ///
    /// `currency` selects the display currency; `None` uses the configured
    /// default.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDomainName` when the query holds no usable name or
    /// ends in an extension the storefront does not sell.
    /// Probe failures never fail the search; affected candidates are
    /// reported taken.
    pub async fn search(
        &self,
        query: &str,
        currency: Option<Currency>,
    ) -> Result<SearchResult, DomainSearchError> {
        let normalized = normalize_query(query, &self.config.default_extension, |extension| {
            self.accepts_extension(extension)
        })?;
        let candidates = build_candidates(
            &normalized.candidate,
            &self.config.alternate_extensions,
            self.config.max_candidates,
        );
        let currency = currency.unwrap_or(self.config.currency);
        let started = Instant::now();

        let resolver = &self.resolver;
        let mut resolutions: HashMap<String, Resolution> = stream::iter(candidates.iter().map(
            |candidate| {
                let domain = candidate.full_domain();
                async move { resolver.resolve(&domain).await }
            },
        ))
        .buffer_unordered(self.config.concurrency.max(1))
        .map(|resolution| (resolution.domain.clone(), resolution))
        .collect()
        .await;

        let mut result = SearchResult {
            query: query.to_string(),
            exact: None,
            suggestions: Vec::new(),
            premium: Vec::new(),
            taken: Vec::new(),
        };

        for candidate in candidates {
            let domain = candidate.full_domain();
            let (available, method) = match resolutions.remove(&domain) {
                Some(resolution) => (resolution.available, resolution.method),
                None => (false, ResolutionMethod::AssumedTaken),
            };
            let price = self.prices.quote_for(&candidate.extension, currency);
            let is_exact = candidate == normalized.candidate;
            let entry = CandidateResult {
                domain,
                candidate,
                available,
                premium: false,
                method,
                price,
            };

            if is_exact {
                result.exact = Some(entry);
            } else if !entry.available {
                result.taken.push(entry);
            } else if entry.premium {
                result.premium.push(entry);
            } else {
                result.suggestions.push(entry);
            }
        }

        tracing::info!(
            query,
            exact = %normalized.candidate,
            explicit_extension = normalized.explicit_extension,
            candidates = result.len(),
            suggestions = result.suggestions.len(),
            taken = result.taken.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "domain search finished"
        );

        Ok(result)
    }
}
