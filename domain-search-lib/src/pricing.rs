//! Static price table and display currency conversion.
//!
//! Prices are listed in USD. The KES figures are a presentation convenience
//! computed from a fixed rate and must never be used to compute a charge.

use crate::types::{BasePrice, Currency, PriceQuote};
use std::collections::HashMap;

/// Fixed USD → KES rate used for display.
pub const USD_TO_KES: f64 = 129.0;

/// Price used for extensions missing from the table.
pub const FALLBACK_PRICE: BasePrice = BasePrice {
    price: 15.99,
    renew_price: 17.99,
};

lazy_static::lazy_static! {
    static ref BUILTIN_PRICES: HashMap<&'static str, BasePrice> = HashMap::from([
        // Regional
        (".co.ke", BasePrice { price: 9.99, renew_price: 9.99 }),
        (".ke", BasePrice { price: 24.99, renew_price: 24.99 }),
        (".or.ke", BasePrice { price: 9.99, renew_price: 9.99 }),
        (".ac.ke", BasePrice { price: 9.99, renew_price: 9.99 }),
        (".ne.ke", BasePrice { price: 9.99, renew_price: 9.99 }),
        (".me.ke", BasePrice { price: 9.99, renew_price: 9.99 }),
        (".africa", BasePrice { price: 18.99, renew_price: 18.99 }),
        (".ng", BasePrice { price: 49.99, renew_price: 49.99 }),
        // Classic gTLDs
        (".com", BasePrice { price: 12.99, renew_price: 14.99 }),
        (".net", BasePrice { price: 13.99, renew_price: 15.99 }),
        (".org", BasePrice { price: 11.99, renew_price: 13.99 }),
        (".info", BasePrice { price: 4.99, renew_price: 19.99 }),
        (".biz", BasePrice { price: 14.99, renew_price: 18.99 }),
        (".mobi", BasePrice { price: 19.99, renew_price: 24.99 }),
        (".us", BasePrice { price: 8.99, renew_price: 10.99 }),
        // Startup favourites
        (".io", BasePrice { price: 39.99, renew_price: 49.99 }),
        (".co", BasePrice { price: 24.99, renew_price: 29.99 }),
        (".app", BasePrice { price: 14.99, renew_price: 16.99 }),
        (".dev", BasePrice { price: 12.99, renew_price: 14.99 }),
        (".tech", BasePrice { price: 6.99, renew_price: 49.99 }),
        (".me", BasePrice { price: 9.99, renew_price: 19.99 }),
        (".tv", BasePrice { price: 29.99, renew_price: 34.99 }),
        (".cc", BasePrice { price: 11.99, renew_price: 13.99 }),
        // New gTLDs with cheap first years
        (".xyz", BasePrice { price: 2.99, renew_price: 13.99 }),
        (".online", BasePrice { price: 3.99, renew_price: 34.99 }),
        (".store", BasePrice { price: 4.99, renew_price: 54.99 }),
        (".site", BasePrice { price: 2.99, renew_price: 29.99 }),
        (".website", BasePrice { price: 2.99, renew_price: 24.99 }),
        (".space", BasePrice { price: 2.99, renew_price: 24.99 }),
    ]);
}

/// Look up the built-in base price for an extension.
///
/// Unknown extensions get [`FALLBACK_PRICE`]; a missing price is never an
/// error.
pub fn price_for(extension: &str) -> BasePrice {
    let extension = extension.trim().to_lowercase();
    BUILTIN_PRICES
        .get(extension.as_str())
        .copied()
        .unwrap_or(FALLBACK_PRICE)
}

/// Whether the built-in table lists `extension`.
pub fn has_builtin_price(extension: &str) -> bool {
    BUILTIN_PRICES.contains_key(extension.trim().to_lowercase().as_str())
}

/// Convert a display amount between currencies.
///
/// KES results round to whole shillings, USD results to cents.
pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
    let converted = match (from, to) {
        (Currency::Usd, Currency::Kes) => amount * USD_TO_KES,
        (Currency::Kes, Currency::Usd) => amount / USD_TO_KES,
        _ => amount,
    };
    round_for(converted, to)
}

fn round_for(amount: f64, currency: Currency) -> f64 {
    match currency {
        Currency::Kes => amount.round(),
        Currency::Usd => (amount * 100.0).round() / 100.0,
    }
}

/// Price table with optional configured overrides on top of the built-ins.
///
/// Immutable after construction; shared read-only by concurrent resolutions.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    overrides: HashMap<String, BasePrice>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table whose entries replace or extend the built-in prices.
    pub fn with_overrides(overrides: HashMap<String, BasePrice>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(ext, price)| (crate::names::normalize_extension(&ext), price))
            .collect();
        Self { overrides }
    }

    /// Whether the extension has an explicit price, built in or configured.
    pub fn is_priced(&self, extension: &str) -> bool {
        let key = extension.trim().to_lowercase();
        self.overrides.contains_key(&key) || has_builtin_price(&key)
    }

    pub fn price_for(&self, extension: &str) -> BasePrice {
        let key = extension.trim().to_lowercase();
        match self.overrides.get(&key) {
            Some(price) => *price,
            None => price_for(&key),
        }
    }

    /// Build the display quote for an extension.
    ///
    /// Secondary (KES) fields are filled when the display currency is KES.
    pub fn quote_for(&self, extension: &str, display: Currency) -> PriceQuote {
        let base = self.price_for(extension);
        let mut quote = PriceQuote {
            price: round_for(base.price, Currency::Usd),
            renew_price: round_for(base.renew_price, Currency::Usd),
            currency: Currency::Usd,
            price_secondary: None,
            renew_price_secondary: None,
            secondary_currency: None,
        };

        if display == Currency::Kes {
            quote.price_secondary = Some(convert(base.price, Currency::Usd, Currency::Kes));
            quote.renew_price_secondary =
                Some(convert(base.renew_price, Currency::Usd, Currency::Kes));
            quote.secondary_currency = Some(Currency::Kes);
        }

        quote
    }
}
