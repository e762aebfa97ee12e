//! Coin tracker service
//!
//! Owns the [`ViewState`] and drives fetches against a market data provider.

use crate::{
    constants::{API_URL_ENV_VAR, COINGECKO_API_URL, EVENT_CHANNEL_CAPACITY, FETCH_ERROR_MESSAGE},
    error::{ProviderError, TrackerError},
    metrics::{FetchMetrics, MetricsCollector},
    provider::MarketDataProvider,
    providers::CoinGeckoProvider,
    state::{FetchOutcome, FetchTicket, ViewState},
    types::{ComponentHealth, Currency, HealthStatus, TrackerEvent},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use uuid::Uuid;

/// Coin tracker
///
/// Fetches the market listing on mount, on currency change and on refresh,
/// and keeps the search-filtered view of it.
///
/// The state lock is never held across the network request, so searching
/// stays responsive while a fetch is outstanding. Overlapping fetches are
/// resolved by request generation: only the most recently issued one is
/// applied.
///
/// # Example
/// ```no_run
/// use coin_tracker::{CoinTracker, Currency, ViewMode};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tracker = CoinTracker::new()?;
/// tracker.mount().await?;
/// tracker.set_search_term("bit").await;
/// tracker.set_currency(Currency::Eur).await?;
///
/// let state = tracker.snapshot().await;
/// for entry in state.entries_for(ViewMode::TopGainers) {
///     println!("{}: {:?}", entry.name, entry.price_change_percentage_24h);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CoinTracker {
    state: RwLock<ViewState>,
    provider: Arc<dyn MarketDataProvider>,
    metrics: MetricsCollector,
    events: broadcast::Sender<TrackerEvent>,
}

impl CoinTracker {
    /// Creates a tracker backed by CoinGecko
    ///
    /// The base URL can be overridden with the `COIN_TRACKER_API_URL`
    /// environment variable.
    pub fn new() -> Result<Self, ProviderError> {
        let base_url =
            std::env::var(API_URL_ENV_VAR).unwrap_or_else(|_| COINGECKO_API_URL.to_string());
        let provider = CoinGeckoProvider::with_base_url(base_url)?;
        Ok(Self::with_provider(Arc::new(provider)))
    }

    /// Creates a tracker with a custom provider
    pub fn with_provider(provider: Arc<dyn MarketDataProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let metrics = MetricsCollector::new(provider.provider_name());

        Self {
            state: RwLock::new(ViewState::default()),
            provider,
            metrics,
            events,
        }
    }

    /// Initial fetch when the view is shown
    pub async fn mount(&self) -> Result<FetchOutcome, TrackerError> {
        self.fetch().await
    }

    /// Fetches again for the selected currency
    pub async fn refresh(&self) -> Result<FetchOutcome, TrackerError> {
        self.fetch().await
    }

    /// Selects a currency and fetches if the selection changed
    ///
    /// Returns `Ok(None)` when `currency` was already selected.
    pub async fn set_currency(
        &self,
        currency: Currency,
    ) -> Result<Option<FetchOutcome>, TrackerError> {
        let ticket = {
            let mut state = self.state.write().await;
            if !state.set_currency(currency) {
                return Ok(None);
            }
            state.begin_fetch()
        };
        self.run_fetch(ticket).await.map(Some)
    }

    /// Updates the search term
    pub async fn set_search_term(&self, term: &str) {
        self.state.write().await.set_search_term(term);
    }

    /// Copy of the current view state
    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Subscribes to fetch events
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events.subscribe()
    }

    /// Returns the name of the current provider
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Gets fetch metrics including latency percentiles and success rate
    pub async fn get_fetch_metrics(&self) -> FetchMetrics {
        self.metrics.snapshot().await
    }

    /// Starts a background task that refreshes every `interval`
    pub fn start_auto_refresh(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let tracker = Arc::clone(self);

        tokio::spawn(async move {
            tracing::info!(
                interval_secs = interval.as_secs(),
                "Starting coin tracker auto-refresh task"
            );

            loop {
                sleep(interval).await;
                if let Err(e) = tracker.refresh().await {
                    tracing::warn!(error = %e, "Auto-refresh failed");
                }
            }
        })
    }

    async fn fetch(&self) -> Result<FetchOutcome, TrackerError> {
        let ticket = self.state.write().await.begin_fetch();
        self.run_fetch(ticket).await
    }

    async fn run_fetch(&self, ticket: FetchTicket) -> Result<FetchOutcome, TrackerError> {
        let start = Instant::now();

        let result = self.provider.fetch_markets(ticket.currency).await;
        let latency = start.elapsed();
        self.metrics.record_fetch(latency, result.is_ok()).await;

        match result {
            Ok(entries) => {
                let count = entries.len();
                let outcome = self
                    .state
                    .write()
                    .await
                    .apply_success(ticket, entries, Utc::now());

                match outcome {
                    FetchOutcome::Applied => {
                        tracing::debug!(
                            currency = ticket.currency.code(),
                            generation = ticket.generation,
                            count,
                            latency_ms = latency.as_millis() as u64,
                            provider = self.provider.provider_name(),
                            "Market data updated"
                        );
                        self.emit(TrackerEvent::DataUpdated {
                            id: Uuid::new_v4(),
                            currency: ticket.currency,
                            generation: ticket.generation,
                            count,
                            timestamp: Utc::now(),
                        });
                    }
                    FetchOutcome::Discarded => self.discarded(ticket),
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(
                    currency = ticket.currency.code(),
                    generation = ticket.generation,
                    error = %e,
                    "Failed to fetch market data"
                );

                let outcome = self
                    .state
                    .write()
                    .await
                    .apply_failure(ticket, FETCH_ERROR_MESSAGE);

                match outcome {
                    FetchOutcome::Applied => {
                        self.emit(TrackerEvent::FetchFailed {
                            id: Uuid::new_v4(),
                            currency: ticket.currency,
                            generation: ticket.generation,
                            error_message: e.to_string(),
                            timestamp: Utc::now(),
                        });
                        Err(TrackerError::fetch_failed(FETCH_ERROR_MESSAGE))
                    }
                    FetchOutcome::Discarded => {
                        self.discarded(ticket);
                        Ok(outcome)
                    }
                }
            }
        }
    }

    fn discarded(&self, ticket: FetchTicket) {
        tracing::debug!(
            currency = ticket.currency.code(),
            generation = ticket.generation,
            "Discarding response superseded by a newer request"
        );
        self.emit(TrackerEvent::StaleResponseDiscarded {
            id: Uuid::new_v4(),
            currency: ticket.currency,
            generation: ticket.generation,
            timestamp: Utc::now(),
        });
    }

    fn emit(&self, event: TrackerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Perform a health check on the tracker
    ///
    /// # Returns
    /// ComponentHealth indicating whether data is loaded and current
    pub async fn health_check(&self) -> ComponentHealth {
        let state = self.snapshot().await;
        let mut details = std::collections::HashMap::new();

        details.insert(
            "entries".to_string(),
            serde_json::json!(state.dataset().len()),
        );
        details.insert(
            "currency".to_string(),
            serde_json::json!(state.currency().code()),
        );
        details.insert(
            "provider_name".to_string(),
            serde_json::json!(self.provider_name()),
        );
        details.insert(
            "last_updated".to_string(),
            serde_json::json!(state.last_updated().map(|t| t.to_rfc3339())),
        );

        let has_data = !state.dataset().is_empty();
        let status = match (has_data, state.error(), state.is_loading()) {
            (false, Some(_), _) => HealthStatus::Unhealthy,
            (true, None, false) => HealthStatus::Healthy,
            _ => HealthStatus::Degraded,
        };

        let message = match status {
            HealthStatus::Healthy => "Coin tracker is operational with fresh data".to_string(),
            HealthStatus::Degraded => match state.error() {
                Some(error) => format!("Showing previously loaded data: {}", error),
                None => "Coin tracker is loading".to_string(),
            },
            HealthStatus::Unhealthy => "Coin tracker has no market data".to_string(),
        };

        ComponentHealth {
            name: "coin_tracker".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: Utc::now(),
        }
    }
}
