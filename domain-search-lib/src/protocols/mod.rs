//! Probe implementations for domain availability.
//!
//! Each probe family sits behind an object-safe async trait so the resolver
//! can be driven by real HTTP clients or by test doubles. Probes never
//! return errors: anything short of a decisive answer is inconclusive.

use crate::types::{AvailabilityVerdict, DnsOutcome, DnsRecordType, DohProvider};
use async_trait::async_trait;
use std::time::Duration;

/// DNS-over-HTTPS JSON probe
pub mod doh;

/// RDAP aggregator probe
pub mod rdap;

pub use doh::{classify_doh_response, DohClient, DohResponse};
/// Slack added to a lookup deadline for the underlying `reqwest` timeout.
pub(crate) const CLIENT_BACKSTOP: Duration = Duration::from_secs(2);

pub use rdap::{classify_rdap_status, is_rdap_supported, RdapClient, RDAP_SUPPORTED_EXTENSIONS};

/// Registry-level lookup.
#[async_trait]
pub trait RdapProbe: Send + Sync {
    /// Ask the registry whether `domain` is registered.
    async fn check(&self, domain: &str) -> AvailabilityVerdict;
}

/// Typed DNS lookup against one of two providers.
#[async_trait]
pub trait DnsProbe: Send + Sync {
    /// Query one record type; `None` means inconclusive.
    async fn query_record(
        &self,
        domain: &str,
        record_type: DnsRecordType,
        provider: DohProvider,
    ) -> Option<DnsOutcome>;
}

/// One-shot HTTP/1.1 responders on an ephemeral local port.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        (listener, base)
    }

    /// Answer every request with `status` and `body`. Each request head is
    /// forwarded, lowercased, to the returned receiver.
    pub(crate) async fn respond(
        status: &'static str,
        body: &'static str,
    ) -> (String, mpsc::UnboundedReceiver<String>) {
        let (listener, base) = bind().await;
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let head = read_head(&mut stream).await;
                    let _ = tx.send(head.to_lowercase());
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        (base, rx)
    }

    /// Accept connections and never answer them.
    pub(crate) async fn hang() -> String {
        let (listener, base) = bind().await;
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        base
    }

    async fn read_head(stream: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    head.extend_from_slice(&chunk[..n]);
                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
            }
        }
        String::from_utf8_lossy(&head).into_owned()
    }
}
