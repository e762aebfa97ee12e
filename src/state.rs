//! View state and its transitions
//!
//! `ViewState` is owned by a single controller ([`crate::CoinTracker`]) and only
//! changes through the transition methods below. The displayed sequence is
//! recomputed from `(dataset, search_term)` whenever either changes.
//!
//! Every fetch is tagged with a generation number when it starts. A response
//! is applied only if its generation is the latest one issued, so a slow reply
//! for a previously selected currency can never overwrite a newer one.

use crate::{
    filter::{filter_entries, top_gainers},
    types::{Currency, MarketEntry, ViewMode},
};
use chrono::{DateTime, Utc};

/// Identifies one fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    /// Monotonic request number
    pub generation: u64,
    /// Currency the request was issued for
    pub currency: Currency,
}

/// Result of applying a fetch response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response belonged to the latest request and was applied
    Applied,
    /// A newer request was issued meanwhile; the response was dropped
    Discarded,
}

/// Process-local state of the tracker view
#[derive(Debug, Clone)]
pub struct ViewState {
    dataset: Vec<MarketEntry>,
    displayed: Vec<MarketEntry>,
    search_term: String,
    loading: bool,
    currency: Currency,
    last_updated: Option<DateTime<Utc>>,
    error: Option<String>,
    generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl ViewState {
    /// State at mount: loading, no data, no error
    pub fn new(currency: Currency) -> Self {
        Self {
            dataset: Vec::new(),
            displayed: Vec::new(),
            search_term: String::new(),
            loading: true,
            currency,
            last_updated: None,
            error: None,
            generation: 0,
        }
    }

    /// Starts a fetch for the selected currency
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            generation: self.generation,
            currency: self.currency,
        }
    }

    /// Replaces the dataset with a successful response
    pub fn apply_success(
        &mut self,
        ticket: FetchTicket,
        entries: Vec<MarketEntry>,
        fetched_at: DateTime<Utc>,
    ) -> FetchOutcome {
        if !self.is_latest(ticket) {
            return FetchOutcome::Discarded;
        }

        self.dataset = entries;
        self.recompute();
        self.last_updated = Some(fetched_at);
        self.loading = false;
        FetchOutcome::Applied
    }

    /// Records a failed fetch, keeping the previous dataset visible
    pub fn apply_failure(
        &mut self,
        ticket: FetchTicket,
        message: impl Into<String>,
    ) -> FetchOutcome {
        if !self.is_latest(ticket) {
            return FetchOutcome::Discarded;
        }

        self.error = Some(message.into());
        self.loading = false;
        FetchOutcome::Applied
    }

    /// Updates the search term and re-derives the displayed sequence
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.recompute();
    }

    /// Selects a currency; returns true if the selection changed
    ///
    /// A change invalidates every fetch already in flight, even before the
    /// fetch for the new currency is started.
    pub fn set_currency(&mut self, currency: Currency) -> bool {
        if self.currency == currency {
            return false;
        }
        self.currency = currency;
        self.generation += 1;
        true
    }

    fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.currency == self.currency
    }

    fn recompute(&mut self) {
        self.displayed = filter_entries(&self.dataset, &self.search_term);
    }

    /// Full dataset, upstream order
    pub fn dataset(&self) -> &[MarketEntry] {
        &self.dataset
    }

    /// Dataset after search filtering
    pub fn displayed(&self) -> &[MarketEntry] {
        &self.displayed
    }

    /// Top Gainers of the displayed sequence, recomputed on every call
    pub fn top_gainers(&self) -> Vec<MarketEntry> {
        top_gainers(&self.displayed)
    }

    /// Entries shown for a tab
    pub fn entries_for(&self, mode: ViewMode) -> Vec<MarketEntry> {
        match mode {
            ViewMode::All => self.displayed.clone(),
            ViewMode::TopGainers => self.top_gainers(),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current request generation; bumped by every fetch and currency change
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
