use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flat snapshot of latest prices, keyed by ticker.
pub type QuoteMap = HashMap<String, Decimal>;

/// Latest known price for one ticker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub ticker: String,
    pub price: Decimal,
}

/// Builds a [`QuoteMap`] from a list of quotes.
///
/// Tickers are uppercased. Non-positive prices are dropped so the ticker is
/// reported as unquoted instead of being valued at a bogus price; on
/// duplicates the last quote wins.
pub fn quotes_to_map(quotes: impl IntoIterator<Item = Quote>) -> QuoteMap {
    let mut map = QuoteMap::new();
    for quote in quotes {
        if quote.price <= Decimal::ZERO {
            warn!(
                "Ignoring non-positive quote {} for {}",
                quote.price, quote.ticker
            );
            continue;
        }
        map.insert(quote.ticker.trim().to_uppercase(), quote.price);
    }
    map
}
