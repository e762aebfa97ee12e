//! # Coin Tracker
//!
//! Fetches the top cryptocurrency markets from CoinGecko and maintains a
//! searchable view of them, with a Top Gainers selection and currency-aware
//! formatting.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_tracker::{card::render_dashboard, CoinTracker, Currency, ViewMode};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = CoinTracker::new()?;
//!
//! // Initial load; a failure leaves an error message in the view state
//! if let Err(e) = tracker.mount().await {
//!     eprintln!("{}", e);
//! }
//!
//! tracker.set_currency(Currency::Gbp).await.ok();
//! tracker.set_search_term("coin").await;
//!
//! let state = tracker.snapshot().await;
//! println!("{}", render_dashboard(&state, ViewMode::All, 120));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! CoinTracker (mount / refresh / set_currency / set_search_term)
//!     ↓
//! MarketDataProvider (CoinGecko /coins/markets)
//!     ↓
//! ViewState (dataset → filter_entries → displayed → top_gainers)
//!     ↓
//! card::render_dashboard / your own UI
//! ```

pub mod card;
pub mod constants;
pub mod error;
pub mod filter;
pub mod format;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod state;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use error::{ProviderError, TrackerError};
pub use metrics::FetchMetrics;
pub use state::{FetchOutcome, FetchTicket, ViewState};
pub use tracker::CoinTracker;
pub use types::{
    ComponentHealth, Currency, HealthStatus, MarketEntry, Sparkline, TrackerEvent, ViewMode,
};
