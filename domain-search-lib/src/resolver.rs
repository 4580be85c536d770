//! Per-domain availability resolution.
//!
//! RDAP is asked first when the extension supports it; a registered domain
//! may have no DNS at all. Otherwise DNS is probed in a fixed order. When
//! nothing is decisive the domain is reported taken.

use crate::error::DomainSearchError;
use crate::names::{extract_extension, is_plausible_hostname};
use crate::protocols::{is_rdap_supported, DnsProbe, DohClient, RdapClient, RdapProbe};
use crate::types::{
    AvailabilityVerdict, DnsRecordType, DohProvider, Resolution, ResolutionMethod, SearchConfig,
};
use std::sync::Arc;

/// DNS probes tried after RDAP, in order. The first decisive answer wins.
pub const DNS_ESCALATION: [(DohProvider, DnsRecordType); 5] = [
    (DohProvider::Primary, DnsRecordType::A),
    // Registered but unhosted domains still delegate nameservers
    (DohProvider::Primary, DnsRecordType::Ns),
    (DohProvider::Secondary, DnsRecordType::A),
    (DohProvider::Secondary, DnsRecordType::Ns),
    (DohProvider::Secondary, DnsRecordType::Soa),
];

/// Orchestrates RDAP and DNS probes for a single domain.
///
/// Holds no mutable state; one resolver can serve any number of concurrent
/// resolutions.
#[derive(Clone)]
pub struct AvailabilityResolver {
    rdap: Arc<dyn RdapProbe>,
    dns: Arc<dyn DnsProbe>,
}

impl AvailabilityResolver {
    /// Build a resolver from explicit probes.
    pub fn new(rdap: Arc<dyn RdapProbe>, dns: Arc<dyn DnsProbe>) -> Self {
        Self { rdap, dns }
    }

    /// Build a resolver with HTTP probes for the configured endpoints.
    pub fn from_config(config: &SearchConfig) -> Result<Self, DomainSearchError> {
        let rdap = RdapClient::with_config(config.endpoints.rdap.clone(), config.rdap_timeout)?;
        let dns = DohClient::with_config(&config.endpoints, config.doh_timeout)?;
        Ok(Self::new(Arc::new(rdap), Arc::new(dns)))
    }

    /// Whether `domain` can be registered. `false` covers both confirmed
    /// and assumed taken.
    pub async fn resolve_availability(&self, domain: &str) -> bool {
        self.resolve(domain).await.available
    }

    /// Resolve `domain` and report which probe decided.
    pub async fn resolve(&self, domain: &str) -> Resolution {
        let domain = domain.trim().to_lowercase();

        if !is_plausible_hostname(&domain) {
            tracing::warn!(domain = %domain, "implausible hostname, assuming taken without lookups");
            return Resolution {
                domain,
                available: false,
                method: ResolutionMethod::AssumedTaken,
            };
        }

        let rdap_applies = extract_extension(&domain)
            .map(|extension| is_rdap_supported(&extension))
            .unwrap_or(false);

        if rdap_applies {
            let verdict = self.rdap.check(&domain).await;
            if let Some(available) = verdict.as_available() {
                return Resolution {
                    domain,
                    available,
                    method: ResolutionMethod::Rdap,
                };
            }
            tracing::debug!(domain = %domain, "RDAP inconclusive, falling back to DNS");
        }

        for (provider, record_type) in DNS_ESCALATION {
            let Some(outcome) = self.dns.query_record(&domain, record_type, provider).await else {
                continue;
            };
            let verdict = outcome.verdict();
            if let Some(available) = verdict.as_available() {
                return Resolution {
                    domain,
                    available,
                    method: ResolutionMethod::Dns {
                        provider,
                        record_type,
                    },
                };
            }
        }

        tracing::warn!(
            domain = %domain,
            rdap_tried = rdap_applies,
            "every availability probe was inconclusive, assuming taken"
        );
        Resolution {
            domain,
            available: false,
            method: ResolutionMethod::AssumedTaken,
        }
    }

    /// Verdict form of [`resolve`](Self::resolve), for callers that only
    /// need the tri-state shape.
    pub async fn verdict(&self, domain: &str) -> AvailabilityVerdict {
        let resolution = self.resolve(domain).await;
        match (resolution.method, resolution.available) {
            (ResolutionMethod::AssumedTaken, _) => AvailabilityVerdict::Inconclusive,
            (_, true) => AvailabilityVerdict::Available,
            (_, false) => AvailabilityVerdict::Taken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DnsOutcome;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedRdap(AvailabilityVerdict);

    #[async_trait]
    impl RdapProbe for FixedRdap {
        async fn check(&self, _domain: &str) -> AvailabilityVerdict {
            self.0
        }
    }

    /// Answers from a script keyed by (provider, record type) and logs every call.
    #[derive(Default)]
    struct ScriptedDns {
        answers: Vec<((DohProvider, DnsRecordType), DnsOutcome)>,
        calls: Mutex<Vec<(DohProvider, DnsRecordType)>>,
    }

    #[async_trait]
    impl DnsProbe for ScriptedDns {
        async fn query_record(
            &self,
            _domain: &str,
            record_type: DnsRecordType,
            provider: DohProvider,
        ) -> Option<DnsOutcome> {
            self.calls.lock().unwrap().push((provider, record_type));
            self.answers
                .iter()
                .find(|(key, _)| *key == (provider, record_type))
                .map(|(_, outcome)| *outcome)
        }
    }

    #[tokio::test]
    async fn test_escalation_walks_every_step_in_order() {
        let dns = Arc::new(ScriptedDns::default());
        let resolver = AvailabilityResolver::new(
            Arc::new(FixedRdap(AvailabilityVerdict::Inconclusive)),
            dns.clone(),
        );

        let resolution = resolver.resolve("acme.co.ke").await;
        assert!(!resolution.available);
        assert_eq!(resolution.method, ResolutionMethod::AssumedTaken);
        assert_eq!(*dns.calls.lock().unwrap(), DNS_ESCALATION.to_vec());
    }

    #[tokio::test]
    async fn test_soa_tie_break_decides() {
        let dns = Arc::new(ScriptedDns {
            answers: vec![(
                (DohProvider::Secondary, DnsRecordType::Soa),
                DnsOutcome::RESOLVED,
            )],
            ..Default::default()
        });
        let resolver = AvailabilityResolver::new(
            Arc::new(FixedRdap(AvailabilityVerdict::Inconclusive)),
            dns,
        );

        let resolution = resolver.resolve("acme.ke").await;
        assert!(!resolution.available);
        assert_eq!(
            resolution.method,
            ResolutionMethod::Dns {
                provider: DohProvider::Secondary,
                record_type: DnsRecordType::Soa,
            }
        );
    }

    #[tokio::test]
    async fn test_domain_is_lowercased() {
        let resolver = AvailabilityResolver::new(
            Arc::new(FixedRdap(AvailabilityVerdict::Available)),
            Arc::new(ScriptedDns::default()),
        );
        let resolution = resolver.resolve(" ACME.COM ").await;
        assert_eq!(resolution.domain, "acme.com");
        assert!(resolution.available);
        assert_eq!(resolution.method, ResolutionMethod::Rdap);
    }

    #[tokio::test]
    async fn test_verdict_reports_assumed_as_inconclusive() {
        let resolver = AvailabilityResolver::new(
            Arc::new(FixedRdap(AvailabilityVerdict::Inconclusive)),
            Arc::new(ScriptedDns::default()),
        );
        assert_eq!(
            resolver.verdict("acme.com").await,
            AvailabilityVerdict::Inconclusive
        );
        assert!(!resolver.resolve_availability("acme.com").await);
    }
}
