// domain-search-lib/tests/common/mod.rs

//! Scripted probes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use domain_search_lib::{
    AvailabilityResolver, AvailabilityVerdict, DnsOutcome, DnsProbe, DnsRecordType, DohProvider,
    RdapProbe,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// RDAP probe answering from a table; unknown domains are inconclusive.
#[derive(Default)]
pub struct MockRdap {
    answers: HashMap<String, AvailabilityVerdict>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockRdap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, domain: &str, verdict: AvailabilityVerdict) -> Self {
        self.answers.insert(domain.to_string(), verdict);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RdapProbe for MockRdap {
    async fn check(&self, domain: &str) -> AvailabilityVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers
            .get(domain)
            .copied()
            .unwrap_or(AvailabilityVerdict::Inconclusive)
    }
}

pub type DnsCall = (String, DohProvider, DnsRecordType);

/// DNS probe answering from a table keyed by (domain, provider, record);
/// every call is recorded in order.
#[derive(Default)]
pub struct MockDns {
    answers: HashMap<DnsCall, DnsOutcome>,
    delay: Option<Duration>,
    calls: Mutex<Vec<DnsCall>>,
}

impl MockDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(
        mut self,
        domain: &str,
        provider: DohProvider,
        record_type: DnsRecordType,
        outcome: DnsOutcome,
    ) -> Self {
        self.answers
            .insert((domain.to_string(), provider, record_type), outcome);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<DnsCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DnsProbe for MockDns {
    async fn query_record(
        &self,
        domain: &str,
        record_type: DnsRecordType,
        provider: DohProvider,
    ) -> Option<DnsOutcome> {
        let key = (domain.to_string(), provider, record_type);
        self.calls.lock().unwrap().push(key.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers.get(&key).copied()
    }
}

/// Wire mocks into a resolver while keeping handles for call assertions.
pub fn resolver_with(
    rdap: MockRdap,
    dns: MockDns,
) -> (AvailabilityResolver, Arc<MockRdap>, Arc<MockDns>) {
    let rdap = Arc::new(rdap);
    let dns = Arc::new(dns);
    let resolver = AvailabilityResolver::new(rdap.clone(), dns.clone());
    (resolver, rdap, dns)
}
