//! Domain Search CLI Application
//!
//! Command-line front end for domain-search-lib: one query in, exact match,
//! suggestions and taken alternatives out.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_search_lib::{
    apply_env_config, apply_file_config, load_env_config, parse_timeout, ConfigManager, Currency,
    DomainSearcher, SearchConfig, SearchResult,
};
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-search
#[derive(Parser, Debug)]
#[command(name = "domain-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search domain availability using RDAP with DNS-over-HTTPS fallback")]
#[command(
    long_about = "Search domain availability using RDAP with DNS-over-HTTPS fallback.\n\nA query like 'mybrand' or 'mybrand.co.ke' is expanded into an exact match plus alternative extensions, all resolved concurrently. Domains that cannot be verified are reported as taken."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Search query (a brand name or a full domain)
    #[arg(value_name = "QUERY", help_heading = "Search")]
    pub query: String,

    /// Display currency for prices (usd or kes)
    #[arg(long = "currency", value_name = "CODE", help_heading = "Search")]
    pub currency: Option<String>,

    /// Maximum number of candidates to resolve (1-15)
    #[arg(long = "max-candidates", value_name = "N", help_heading = "Search")]
    pub max_candidates: Option<usize>,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Enable grouped, structured output with section headers
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Max concurrent probes (1-100)
    #[arg(short = 'c', long = "concurrency", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Per-probe timeout, like "7s" or "1m"
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show probe-level debug logs and resolution methods
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args);

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run_search(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber.
///
/// `-d` and `-v` win over `RUST_LOG`; without them `RUST_LOG` applies and
/// falls back to warnings only.
fn init_logging(args: &Args) {
    let filter = match log_level(args) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn log_level(args: &Args) -> Option<&'static str> {
    if args.debug {
        Some("debug")
    } else if args.verbose {
        Some("info")
    } else {
        None
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.query.trim().is_empty() {
        return Err("A search query is required".to_string());
    }

    if args.json && args.pretty {
        return Err("Cannot combine --json with --pretty".to_string());
    }

    if let Some(concurrency) = args.concurrency {
        if !(1..=100).contains(&concurrency) {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(max) = args.max_candidates {
        if !(1..=domain_search_lib::MAX_CANDIDATES).contains(&max) {
            return Err(format!(
                "Max candidates must be between 1 and {}",
                domain_search_lib::MAX_CANDIDATES
            ));
        }
    }

    Ok(())
}

async fn run_search(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    let currency = config.currency;

    tracing::info!(
        query = %args.query,
        concurrency = config.concurrency,
        max_candidates = config.max_candidates,
        currency = currency.code(),
        "starting domain search"
    );

    let searcher = DomainSearcher::with_config(config)?;

    let spinner = if args.pretty {
        Some(ui::Spinner::start(format!("Searching for '{}'...", args.query)))
    } else {
        None
    };

    let start_time = Instant::now();
    let outcome = searcher.search(&args.query, Some(currency)).await;
    let duration = start_time.elapsed();

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }

    let result = outcome?;
    display_results(&result, &args, duration)
}

/// Build search configuration with proper precedence.
///
/// Configuration precedence (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (DS_*)
/// 3. Local config file (./domain-search.toml)
/// 4. Global config file (~/.domain-search.toml)
/// 5. XDG config file (~/.config/domain-search/config.toml)
/// 6. Built-in defaults
fn build_config(args: &Args) -> Result<SearchConfig, Box<dyn std::error::Error>> {
    let mut config = SearchConfig::default();
    let env_config = load_env_config();
    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: Load config files
    let explicit_path = args.config.clone().or_else(|| env_config.config.clone());
    if let Some(path) = explicit_path {
        tracing::info!(path = %path, "using explicit config file");

        let file_config = config_manager
            .load_file(&path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?;

        config = apply_file_config(config, file_config)?;
    } else {
        match config_manager.discover_and_load() {
            Ok(file_config) => {
                config = apply_file_config(config, file_config)?;
            }
            Err(e) => {
                tracing::debug!(error = %e, "config discovery failed, using defaults");
            }
        }
    }

    // Step 2: Apply environment variables (DS_*)
    config = apply_env_config(config, &env_config);

    // Step 3: Apply CLI arguments (highest precedence)
    apply_cli_args_to_config(config, args)
}

/// Apply CLI arguments to config (highest precedence).
fn apply_cli_args_to_config(
    mut config: SearchConfig,
    args: &Args,
) -> Result<SearchConfig, Box<dyn std::error::Error>> {
    if let Some(currency) = &args.currency {
        config.currency = currency.parse::<Currency>()?;
    }

    if let Some(max) = args.max_candidates {
        config = config.with_max_candidates(max);
    }

    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }

    if let Some(timeout) = &args.timeout {
        let timeout = parse_timeout(timeout)?;
        config.doh_timeout = timeout;
        config.rdap_timeout = timeout;
    }

    Ok(config)
}

fn display_results(
    result: &SearchResult,
    args: &Args,
    duration: std::time::Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        display_json_results(result)?;
    } else if args.pretty {
        ui::print_header(result, duration);
        ui::print_grouped_results(result, args.debug);
        ui::print_summary(result, duration);
    } else {
        for entry in result
            .exact
            .iter()
            .chain(&result.suggestions)
            .chain(&result.premium)
            .chain(&result.taken)
        {
            ui::print_result(entry, args.debug);
        }
    }

    Ok(())
}

/// Display results in JSON format
fn display_json_results(result: &SearchResult) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{}", json);
    Ok(())
}
