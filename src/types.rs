//! Types for the coin tracker

use crate::error::TrackerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Supported display currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Pound Sterling
    Gbp,
    /// Japanese Yen
    Jpy,
    /// Nigerian Naira
    Ngn,
}

impl Currency {
    /// Get the lowercase code sent as `vs_currency`
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Jpy => "jpy",
            Currency::Ngn => "ngn",
        }
    }

    /// Get the label shown in the currency selector
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Ngn => "NGN",
        }
    }

    /// Get the prefix used by the en-US currency format
    ///
    /// en-US has no symbol for the naira, so the ISO code is printed
    /// followed by a space.
    pub fn prefix(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Ngn => "NGN\u{a0}",
        }
    }

    /// Get all supported currencies, in selector order
    pub fn all() -> &'static [Currency] {
        &[
            Currency::Usd,
            Currency::Eur,
            Currency::Gbp,
            Currency::Jpy,
            Currency::Ngn,
        ]
    }
}

impl Default for Currency {
    fn default() -> Self {
        crate::constants::DEFAULT_CURRENCY
    }
}

impl FromStr for Currency {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Currency::all()
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| TrackerError::unsupported_currency(code))
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Treats an upstream `null` as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Seven-day price series attached to a market entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Vec<f64>,
}

/// One cryptocurrency's market snapshot as returned by the markets endpoint
///
/// Entries are never patched: every successful fetch replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    /// Upstream identifier (e.g. `bitcoin`)
    pub id: String,

    /// Display name
    pub name: String,

    /// Ticker symbol, lowercase as delivered upstream
    pub symbol: String,

    /// Icon URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,

    /// Price in the requested currency
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_price: f64,

    /// Market capitalization in the requested currency
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_cap: f64,

    /// Rank by market capitalization
    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// 24h price change percentage
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    /// 7d price change percentage
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,

    /// 7d sparkline
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
}

impl MarketEntry {
    /// Create an entry with the fields the views depend on
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        current_price: f64,
        price_change_percentage_24h: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: String::new(),
            current_price,
            market_cap: 0.0,
            market_cap_rank: None,
            price_change_percentage_24h,
            price_change_percentage_7d_in_currency: None,
            sparkline_in_7d: None,
        }
    }

    /// Sets the market cap and rank
    pub fn with_market_cap(mut self, market_cap: f64, rank: u32) -> Self {
        self.market_cap = market_cap;
        self.market_cap_rank = Some(rank);
        self
    }

    /// 24h change, with a missing value read as zero
    pub fn change_24h(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    /// True if the 24h change is strictly positive
    pub fn is_gainer(&self) -> bool {
        self.change_24h() > 0.0
    }

    /// Case-insensitive substring match against name or symbol
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}

/// Display-mode tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Every displayed entry, upstream order
    #[default]
    All,
    /// Positive 24h movers, sorted descending, capped
    TopGainers,
}

impl ViewMode {
    /// Tab title
    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::All => "All Cryptocurrencies",
            ViewMode::TopGainers => "Top Gainers",
        }
    }

    /// Number of placeholder cards while loading
    pub fn skeleton_count(&self) -> usize {
        match self {
            ViewMode::All => crate::constants::SKELETON_CARDS_ALL,
            ViewMode::TopGainers => crate::constants::SKELETON_CARDS_TOP_GAINERS,
        }
    }
}

/// Tracker events emitted on every resolved fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerEvent {
    /// A fetch response replaced the dataset
    DataUpdated {
        id: Uuid,
        currency: Currency,
        generation: u64,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// The latest fetch failed
    FetchFailed {
        id: Uuid,
        currency: Currency,
        generation: u64,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A response arrived after a newer request was issued and was dropped
    StaleResponseDiscarded {
        id: Uuid,
        currency: Currency,
        generation: u64,
        timestamp: DateTime<Utc>,
    },
}

impl TrackerEvent {
    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            TrackerEvent::DataUpdated { id, .. } => *id,
            TrackerEvent::FetchFailed { id, .. } => *id,
            TrackerEvent::StaleResponseDiscarded { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            TrackerEvent::DataUpdated { .. } => "DATA_UPDATED",
            TrackerEvent::FetchFailed { .. } => "FETCH_FAILED",
            TrackerEvent::StaleResponseDiscarded { .. } => "STALE_RESPONSE_DISCARDED",
        }
    }
}

impl std::fmt::Display for TrackerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerEvent::DataUpdated {
                currency, count, ..
            } => write!(f, "Loaded {} entries in {}", count, currency),
            TrackerEvent::FetchFailed {
                currency,
                error_message,
                ..
            } => write!(f, "Fetch failed for {}: {}", currency, error_message),
            TrackerEvent::StaleResponseDiscarded {
                currency,
                generation,
                ..
            } => write!(
                f,
                "Discarded stale {} response (request #{})",
                currency, generation
            ),
        }
    }
}

/// Overall health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Data loaded and no error
    Healthy,
    /// Still loading, or an error is shown over older data
    Degraded,
    /// No data and an error
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional status message
    pub message: Option<String>,
    /// Component-specific details
    pub details: std::collections::HashMap<String, serde_json::Value>,
    /// Last checked timestamp
    pub last_checked: DateTime<Utc>,
}
