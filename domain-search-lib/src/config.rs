//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DS_*`
//! environment variables, and folding both into a [`SearchConfig`].
//!
//! Precedence (highest first): explicit overrides from the caller, `DS_*`
//! environment, local file, global file, XDG file, built-in defaults.

use crate::error::DomainSearchError;
use crate::names::{is_valid_extension, normalize_extension};
use crate::types::{BasePrice, Currency, SearchConfig, MAX_CANDIDATES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// DoH and RDAP endpoint overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<EndpointsConfig>,

    /// Candidate generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSection>,

    /// Extension → price overrides, in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<HashMap<String, BasePrice>>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Display currency ("usd" or "kes")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_extension: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_candidates: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// DoH timeout (as string, e.g., "7s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// RDAP timeout (as string, e.g., "8s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap_timeout: Option<String>,
}

/// `[endpoints]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EndpointsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doh_primary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doh_secondary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap: Option<String>,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchSection {
    /// Extensions offered next to the exact query, in display priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_extensions: Option<Vec<String>>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log which files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainSearchError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainSearchError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainSearchError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainSearchError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        // Lowest precedence first; later files override earlier ones
        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                }
            }
        }

        if self.verbose {
            for path in &loaded_files {
                tracing::info!(path = %path.display(), "loaded config file");
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./domain-search.toml", "./.domain-search.toml"]
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".domain-search.toml", "domain-search.toml"]
            .into_iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-search").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.currency.is_some() {
                        lower_defaults.currency = higher_defaults.currency;
                    }
                    if higher_defaults.default_extension.is_some() {
                        lower_defaults.default_extension = higher_defaults.default_extension;
                    }
                    if higher_defaults.max_candidates.is_some() {
                        lower_defaults.max_candidates = higher_defaults.max_candidates;
                    }
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.rdap_timeout.is_some() {
                        lower_defaults.rdap_timeout = higher_defaults.rdap_timeout;
                    }
                    Some(lower_defaults)
                }
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            endpoints: match (lower.endpoints, higher.endpoints) {
                (Some(mut lower_endpoints), Some(higher_endpoints)) => {
                    if higher_endpoints.doh_primary.is_some() {
                        lower_endpoints.doh_primary = higher_endpoints.doh_primary;
                    }
                    if higher_endpoints.doh_secondary.is_some() {
                        lower_endpoints.doh_secondary = higher_endpoints.doh_secondary;
                    }
                    if higher_endpoints.rdap.is_some() {
                        lower_endpoints.rdap = higher_endpoints.rdap;
                    }
                    Some(lower_endpoints)
                }
                (lower_endpoints, higher_endpoints) => higher_endpoints.or(lower_endpoints),
            },
            search: higher.search.or(lower.search),
            pricing: match (lower.pricing, higher.pricing) {
                (Some(mut lower_prices), Some(higher_prices)) => {
                    lower_prices.extend(higher_prices);
                    Some(lower_prices)
                }
                (lower_prices, higher_prices) => higher_prices.or(lower_prices),
            },
        }
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainSearchError> {
        if let Some(defaults) = &config.defaults {
            if let Some(currency) = &defaults.currency {
                currency.parse::<Currency>()?;
            }

            if let Some(extension) = &defaults.default_extension {
                validate_extension(extension)?;
            }

            if let Some(max) = defaults.max_candidates {
                if max == 0 || max > MAX_CANDIDATES {
                    return Err(DomainSearchError::config(format!(
                        "max_candidates must be between 1 and {}",
                        MAX_CANDIDATES
                    )));
                }
            }

            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(DomainSearchError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            for timeout in [&defaults.timeout, &defaults.rdap_timeout].into_iter().flatten() {
                parse_timeout(timeout)?;
            }
        }

        if let Some(endpoints) = &config.endpoints {
            for url in [
                &endpoints.doh_primary,
                &endpoints.doh_secondary,
                &endpoints.rdap,
            ]
            .into_iter()
            .flatten()
            {
                validate_endpoint(url)?;
            }
        }

        if let Some(search) = &config.search {
            if let Some(extensions) = &search.alternate_extensions {
                for extension in extensions {
                    validate_extension(extension)?;
                }
            }
        }

        if let Some(prices) = &config.pricing {
            for (extension, price) in prices {
                validate_extension(extension)?;
                if !(price.price >= 0.0 && price.renew_price >= 0.0) {
                    return Err(DomainSearchError::config(format!(
                        "Price for '{}' must be a non-negative number",
                        extension
                    )));
                }
            }
        }

        Ok(())
    }
}

fn validate_extension(extension: &str) -> Result<(), DomainSearchError> {
    if extension.trim().starts_with('.') && is_valid_extension(&normalize_extension(extension)) {
        Ok(())
    } else {
        Err(DomainSearchError::config(format!(
            "Invalid extension '{}'. Use a leading dot, like '.com' or '.co.ke'",
            extension
        )))
    }
}

fn validate_endpoint(url: &str) -> Result<(), DomainSearchError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(DomainSearchError::config(format!(
            "Endpoint '{}' must be an http(s) URL",
            url
        )))
    }
}

/// Parse a timeout string like "7s", "1m" or "8".
///
/// Accepts 1 second up to 60 seconds.
pub fn parse_timeout(timeout_str: &str) -> Result<Duration, DomainSearchError> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let seconds = if let Some(s) = timeout_str.strip_suffix('s') {
        s.parse::<u64>().ok()
    } else if let Some(m) = timeout_str.strip_suffix('m') {
        m.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    };

    match seconds {
        Some(secs @ 1..=60) => Ok(Duration::from_secs(secs)),
        _ => Err(DomainSearchError::config(format!(
            "Invalid timeout '{}'. Use 1-60 seconds, like '7s' or '1m'",
            timeout_str
        ))),
    }
}

/// Environment variable configuration.
///
/// Values set via `DS_*` variables. Invalid values are logged and ignored.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub currency: Option<Currency>,
    pub default_extension: Option<String>,
    pub max_candidates: Option<usize>,
    pub concurrency: Option<usize>,
    pub timeout: Option<Duration>,
    pub rdap_timeout: Option<Duration>,
    pub doh_primary: Option<String>,
    pub doh_secondary: Option<String>,
    pub rdap_endpoint: Option<String>,
    pub config: Option<String>,
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T, E: std::fmt::Display>(
    name: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Option<T> {
    let raw = env_value(name)?;
    match parse(&raw) {
        Ok(value) => {
            tracing::debug!(variable = name, value = %raw, "using environment override");
            Some(value)
        }
        Err(e) => {
            tracing::warn!(variable = name, value = %raw, error = %e, "ignoring invalid environment value");
            None
        }
    }
}

fn parse_bounded(raw: &str, max: usize) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(format!("must be 1-{}", max)),
    }
}

/// Load configuration from `DS_*` environment variables.
pub fn load_env_config() -> EnvConfig {
    EnvConfig {
        currency: env_parsed("DS_CURRENCY", str::parse::<Currency>),
        default_extension: env_parsed("DS_DEFAULT_EXTENSION", |raw| {
            validate_extension(raw).map(|_| normalize_extension(raw))
        }),
        max_candidates: env_parsed("DS_MAX_CANDIDATES", |raw| parse_bounded(raw, MAX_CANDIDATES)),
        concurrency: env_parsed("DS_CONCURRENCY", |raw| parse_bounded(raw, 100)),
        timeout: env_parsed("DS_TIMEOUT", parse_timeout),
        rdap_timeout: env_parsed("DS_RDAP_TIMEOUT", parse_timeout),
        doh_primary: env_parsed("DS_DOH_PRIMARY", |raw| {
            validate_endpoint(raw).map(|_| raw.to_string())
        }),
        doh_secondary: env_parsed("DS_DOH_SECONDARY", |raw| {
            validate_endpoint(raw).map(|_| raw.to_string())
        }),
        rdap_endpoint: env_parsed("DS_RDAP_ENDPOINT", |raw| {
            validate_endpoint(raw).map(|_| raw.to_string())
        }),
        config: env_value("DS_CONFIG"),
    }
}

/// Fold a validated file configuration into a search configuration.
pub fn apply_file_config(
    mut config: SearchConfig,
    file_config: FileConfig,
) -> Result<SearchConfig, DomainSearchError> {
    if let Some(defaults) = file_config.defaults {
        if let Some(currency) = defaults.currency {
            config.currency = currency.parse()?;
        }
        if let Some(extension) = defaults.default_extension {
            config.default_extension = normalize_extension(&extension);
        }
        if let Some(max) = defaults.max_candidates {
            config = config.with_max_candidates(max);
        }
        if let Some(concurrency) = defaults.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(timeout) = defaults.timeout {
            config.doh_timeout = parse_timeout(&timeout)?;
        }
        if let Some(timeout) = defaults.rdap_timeout {
            config.rdap_timeout = parse_timeout(&timeout)?;
        }
    }

    if let Some(endpoints) = file_config.endpoints {
        if let Some(url) = endpoints.doh_primary {
            config.endpoints.doh_primary = url;
        }
        if let Some(url) = endpoints.doh_secondary {
            config.endpoints.doh_secondary = url;
        }
        if let Some(url) = endpoints.rdap {
            config.endpoints.rdap = url;
        }
    }

    if let Some(extensions) = file_config.search.and_then(|s| s.alternate_extensions) {
        config.alternate_extensions = extensions.iter().map(|e| normalize_extension(e)).collect();
    }

    if let Some(prices) = file_config.pricing {
        config.price_overrides.extend(prices);
    }

    Ok(config)
}

/// Fold environment overrides into a search configuration.
pub fn apply_env_config(mut config: SearchConfig, env_config: &EnvConfig) -> SearchConfig {
    if let Some(currency) = env_config.currency {
        config.currency = currency;
    }
    if let Some(extension) = &env_config.default_extension {
        config.default_extension = extension.clone();
    }
    if let Some(max) = env_config.max_candidates {
        config = config.with_max_candidates(max);
    }
    if let Some(concurrency) = env_config.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(timeout) = env_config.timeout {
        config.doh_timeout = timeout;
    }
    if let Some(timeout) = env_config.rdap_timeout {
        config.rdap_timeout = timeout;
    }
    if let Some(url) = &env_config.doh_primary {
        config.endpoints.doh_primary = url.clone();
    }
    if let Some(url) = &env_config.doh_secondary {
        config.endpoints.doh_secondary = url.clone();
    }
    if let Some(url) = &env_config.rdap_endpoint {
        config.endpoints.rdap = url.clone();
    }
    config
}
