//! Domain name normalization and extension matching.
//!
//! Extensions are matched multi-label first: `foo.co.ke` has extension
//! `.co.ke`, not `.ke`. Splitting at the first dot is wrong for these and
//! for anything with a subdomain, so every split in the crate goes through
//! [`extract_extension`].

use crate::error::DomainSearchError;
use crate::pricing::has_builtin_price;
use crate::protocols::is_rdap_supported;
use crate::types::{Candidate, DEFAULT_ALTERNATE_EXTENSIONS};
use regex::Regex;

/// Second-level registrations sold as if they were TLDs.
pub const MULTI_LABEL_EXTENSIONS: &[&str] = &[
    ".co.ke", ".ac.ke", ".or.ke", ".ne.ke", ".go.ke", ".me.ke", ".sc.ke", ".info.ke", ".mobi.ke",
    ".co.uk", ".org.uk", ".com.ng", ".co.za",
];

lazy_static::lazy_static! {
    static ref INVALID_NAME_CHARS: Regex =
        Regex::new(r"[^a-z0-9-]").expect("name filter pattern is valid");
    static ref SCHEME_PREFIX: Regex =
        Regex::new(r"^[a-z][a-z0-9+.-]*://").expect("scheme pattern is valid");
}

/// A query reduced to one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub candidate: Candidate,
    /// Whether the extension came from the query rather than the default
    pub explicit_extension: bool,
}

/// Whether `extension` is one of the known two-label extensions.
pub fn is_multi_label_extension(extension: &str) -> bool {
    MULTI_LABEL_EXTENSIONS.contains(&extension)
}

/// Whether the storefront knows how to sell `extension`.
///
/// Covers the two-label extensions, RDAP-backed TLDs, priced extensions and
/// the default alternates. Callers with configured extensions widen this
/// through the predicate passed to [`normalize_query`].
pub fn is_known_extension(extension: &str) -> bool {
    is_multi_label_extension(extension)
        || is_rdap_supported(extension)
        || has_builtin_price(extension)
        || DEFAULT_ALTERNATE_EXTENSIONS.contains(&extension)
}

/// Extract the extension of a domain, multi-label aware.
///
/// Returns `None` when the input has no dot or no label in front of the
/// extension.
///
/// ```rust
/// use domain_search_lib::extract_extension;
///
/// assert_eq!(extract_extension("foo.co.ke").as_deref(), Some(".co.ke"));
/// assert_eq!(extract_extension("shop.foo.com").as_deref(), Some(".com"));
/// ```
pub fn extract_extension(domain: &str) -> Option<String> {
    split_domain(domain).map(|(_, extension)| extension)
}

/// Split a domain into the part in front of the extension and the extension.
pub fn split_domain(domain: &str) -> Option<(String, String)> {
    let domain = domain.trim().trim_end_matches('.').to_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return None;
    }

    if labels.len() >= 3 {
        let two_label = format!(".{}.{}", labels[labels.len() - 2], labels[labels.len() - 1]);
        if is_multi_label_extension(&two_label) {
            let head = labels[..labels.len() - 2].join(".");
            return Some((head, two_label));
        }
    }

    let head = labels[..labels.len() - 1].join(".");
    let extension = format!(".{}", labels[labels.len() - 1]);
    Some((head, extension))
}

/// Normalize a free-text storefront query into a single candidate.
///
/// - lowercases and trims
/// - drops a URL scheme, path, `www.` prefix and trailing dot
/// - detects a trailing extension, else uses `default_extension`
/// - keeps only `[a-z0-9-]` in the name, without edge hyphens
///
/// A trailing extension is only taken from the query when `is_known`
/// accepts it, so a typo such as `mybrand.con` is never searched.
///
/// # Errors
///
/// Returns `InvalidDomainName` when nothing usable is left of the name or
/// the query ends in an extension `is_known` rejects.
pub fn normalize_query(
    query: &str,
    default_extension: &str,
    is_known: impl Fn(&str) -> bool,
) -> Result<NormalizedQuery, DomainSearchError> {
    let lowered = query.trim().to_lowercase();
    let without_scheme = SCHEME_PREFIX.replace(&lowered, "");
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);

    let (raw_name, extension, explicit_extension) = match split_domain(host) {
        Some((head, extension)) if is_valid_extension(&extension) => {
            if !is_known(&extension) {
                return Err(DomainSearchError::invalid_domain(
                    query,
                    format!("unsupported extension '{}'", extension),
                ));
            }
            // Subdomains are not registrable; keep the label next to the extension.
            let label = head.rsplit('.').next().unwrap_or_default().to_string();
            (label, extension, true)
        }
        _ => (host.to_string(), default_extension.to_lowercase(), false),
    };

    let name = INVALID_NAME_CHARS.replace_all(&raw_name, "");
    let name = name.trim_matches('-');

    if name.is_empty() {
        return Err(DomainSearchError::invalid_domain(
            query,
            "query contains no letters or digits",
        ));
    }
    if name.len() > 63 {
        return Err(DomainSearchError::invalid_domain(
            query,
            "name is longer than 63 characters",
        ));
    }

    Ok(NormalizedQuery {
        candidate: Candidate::new(name, extension),
        explicit_extension,
    })
}

/// Validate an extension such as `.com` or `.co.ke`.
pub fn is_valid_extension(extension: &str) -> bool {
    let Some(body) = extension.strip_prefix('.') else {
        return false;
    };
    !body.is_empty()
        && body.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && body.chars().any(|c| c.is_ascii_alphabetic())
}

/// Normalize a configured extension: lowercase, leading dot.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().to_lowercase();
    if trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{}", trimmed)
    }
}

/// Whether a domain is syntactically plausible enough to put on the wire.
pub fn is_plausible_hostname(domain: &str) -> bool {
    if domain.len() < 3 || domain.len() > 253 {
        return false;
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    for part in parts {
        if part.is_empty() || part.len() > 63 {
            return false;
        }

        if part.starts_with('-') || part.ends_with('-') {
            return false;
        }

        if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }
    }

    true
}
