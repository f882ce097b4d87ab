use crate::errors::Result;
use crate::quotes::QuoteMap;

/// Supplies the latest known price per ticker.
///
/// Tickers the provider knows nothing about are simply absent from the
/// returned map; that is not an error.
pub trait QuoteProviderTrait: Send + Sync {
    fn latest_quotes(&self, tickers: &[String]) -> Result<QuoteMap>;
}
