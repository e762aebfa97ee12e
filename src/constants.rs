//! Constants for the coin tracker
//!
//! All configuration for the tracker is centralized here. The upstream
//! query is fixed; the only runtime override is the API base URL
//! (see [`API_URL_ENV_VAR`]).

use crate::types::Currency;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for the markets listing
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Environment variable that overrides [`COINGECKO_API_URL`]
pub const API_URL_ENV_VAR: &str = "COIN_TRACKER_API_URL";

/// Sort order requested from the markets endpoint
pub const MARKETS_ORDER: &str = "market_cap_desc";

/// Number of entries requested per fetch
pub const MARKETS_PER_PAGE: u32 = 50;

/// Page requested (only the first page is ever loaded)
pub const MARKETS_PAGE: u32 = 1;

/// Whether 7-day sparkline data is requested
pub const MARKETS_SPARKLINE: bool = true;

/// Percentage-change windows requested alongside each entry
pub const MARKETS_PRICE_CHANGE_WINDOWS: &str = "24h,7d";

/// HTTP request timeout when fetching markets (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-tracker/0.1.0";

/// Currency selected when the tracker is created
pub const DEFAULT_CURRENCY: Currency = Currency::Usd;

/// Maximum number of entries in the Top Gainers view
pub const TOP_GAINERS_LIMIT: usize = 6;

/// Skeleton cards shown on the All tab while loading
pub const SKELETON_CARDS_ALL: usize = 6;

/// Skeleton cards shown on the Top Gainers tab while loading
pub const SKELETON_CARDS_TOP_GAINERS: usize = 3;

/// Minimum fraction digits when formatting currency values
pub const MIN_FRACTION_DIGITS: usize = 2;

/// Maximum fraction digits when formatting currency values
pub const MAX_FRACTION_DIGITS: usize = 6;

/// User-facing message for any failed fetch
pub const FETCH_ERROR_MESSAGE: &str =
    "Failed to load cryptocurrency data. Please try again later.";

/// Number of fetch samples kept for latency percentiles
pub const METRICS_MAX_SAMPLES: usize = 100;

/// Capacity of the tracker event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
