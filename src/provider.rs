//! Provider abstraction for fetching market listings from external APIs

use crate::{
    error::ProviderError,
    types::{Currency, MarketEntry},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// A provider returns the first page of market entries, ordered by
/// descending market capitalization, quoted in the requested currency.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the market listing quoted in `currency`
    ///
    /// Any transport failure, non-success status or undecodable body is
    /// returned as an error; the caller decides how to surface it.
    async fn fetch_markets(&self, currency: Currency) -> Result<Vec<MarketEntry>, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
