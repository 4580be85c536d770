//! Display logic for domain-search CLI.
//!
//! Handles the default flat listing and the `--pretty` grouped layout,
//! plus the spinner shown while candidates resolve. Uses only the `console`
//! crate.

use console::{pad_str, style, Alignment, Term};
use domain_search_lib::{CandidateResult, PriceQuote, SearchResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DOMAIN_WIDTH: usize = 30;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message.
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a pretty run.
pub fn print_header(result: &SearchResult, duration: Duration) {
    let total = result.len();
    println!(
        "{} {} {}",
        style("domain-search").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "· '{}' across {} domain{} in {:.1}s",
            result.query,
            total,
            if total == 1 { "" } else { "s" },
            duration.as_secs_f64()
        ))
        .dim(),
    );
    println!();
}

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print one candidate in the default flat listing.
pub fn print_result(entry: &CandidateResult, debug: bool) {
    let padded_domain = pad_str(&entry.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));

    let status = if !entry.available {
        style("TAKEN").red().bold()
    } else if entry.premium {
        style("PREMIUM").magenta().bold()
    } else {
        style("AVAILABLE").green().bold()
    };

    let price = if entry.available {
        format!("  {}", style(format_price(&entry.price)).dim())
    } else {
        String::new()
    };

    println!("  {}  {}{}", style(&padded_domain).white(), status, price);

    if debug {
        print_method(entry, "    ");
    }
}

// ── Grouped output ───────────────────────────────────────────────────────────

/// Print results grouped by section: exact match, suggestions, premium, taken.
/// Empty sections are omitted entirely.
pub fn print_grouped_results(result: &SearchResult, debug: bool) {
    if let Some(exact) = &result.exact {
        let label = if exact.available {
            style("── Exact match: available ".to_string()).green().bold()
        } else {
            style("── Exact match: taken ".to_string()).red().bold()
        };
        println!("  {} {}", label, style("─".repeat(30)).dim());
        print_grouped_line(exact, debug);
        println!();
    }

    if !result.suggestions.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Suggestions ({}) ", result.suggestions.len()))
                .green()
                .bold(),
            style("─".repeat(36)).green().dim(),
        );
        for entry in &result.suggestions {
            print_grouped_line(entry, debug);
        }
        println!();
    }

    if !result.premium.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Premium ({}) ", result.premium.len()))
                .magenta()
                .bold(),
            style("─".repeat(40)).magenta().dim(),
        );
        for entry in &result.premium {
            print_grouped_line(entry, debug);
        }
        println!();
    }

    if !result.taken.is_empty() {
        println!(
            "  {} {}",
            style(format!("── Taken ({}) ", result.taken.len())).red().bold(),
            style("─".repeat(42)).red().dim(),
        );
        for entry in &result.taken {
            print_grouped_line(entry, debug);
        }
        println!();
    }
}

/// Print a single line inside a grouped section.
fn print_grouped_line(entry: &CandidateResult, debug: bool) {
    let padded = pad_str(&entry.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));

    if entry.available {
        println!(
            "    {}  {}",
            style(&padded).white(),
            style(format_price(&entry.price)).dim()
        );
    } else {
        println!("    {}", style(&padded).white());
    }

    if debug {
        print_method(entry, "      ");
    }
}

fn print_method(entry: &CandidateResult, indent: &str) {
    println!(
        "{}{} Decided via {}",
        indent,
        style("└─").dim(),
        entry.method,
    );
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(result: &SearchResult, duration: Duration) {
    let total = result.len();
    let available = result.suggestions.len()
        + result.premium.len()
        + usize::from(result.exact.as_ref().is_some_and(|e| e.available));
    let taken = total - available;

    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", available)).green(),
        style("|").dim(),
        style(format!("{} taken", taken)).red(),
    );
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Format a quote as "12.99 USD/yr, renews 14.99", preferring the display
/// currency when one was computed.
pub fn format_price(quote: &PriceQuote) -> String {
    match (
        quote.price_secondary,
        quote.renew_price_secondary,
        quote.secondary_currency,
    ) {
        (Some(price), Some(renew), Some(currency)) => format!(
            "{} {}/yr, renews {} ({} USD)",
            format_amount(price),
            currency,
            format_amount(renew),
            format_amount(quote.price)
        ),
        _ => format!(
            "{} {}/yr, renews {}",
            format_amount(quote.price),
            quote.currency,
            format_amount(quote.renew_price)
        ),
    }
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
