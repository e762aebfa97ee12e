//! Search filtering and Top Gainers selection
//!
//! Both functions are pure and cheap at the page size the tracker loads, so
//! callers recompute them whenever an input changes instead of caching.

use crate::constants::TOP_GAINERS_LIMIT;
use crate::types::MarketEntry;
use std::cmp::Ordering;

/// Derives the displayed sequence from the full dataset and a search term
///
/// An empty term returns the dataset unchanged. Otherwise every entry whose
/// name or symbol contains the term (case-insensitive) is kept, in dataset
/// order.
pub fn filter_entries(entries: &[MarketEntry], search_term: &str) -> Vec<MarketEntry> {
    if search_term.is_empty() {
        return entries.to_vec();
    }

    let needle = search_term.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.matches(&needle))
        .cloned()
        .collect()
}

/// Selects the Top Gainers from an already-filtered sequence
///
/// Keeps strictly positive 24h movers, sorted by change descending (ties keep
/// their input order), truncated to [`TOP_GAINERS_LIMIT`].
pub fn top_gainers(entries: &[MarketEntry]) -> Vec<MarketEntry> {
    let mut gainers: Vec<MarketEntry> = entries
        .iter()
        .filter(|entry| entry.is_gainer())
        .cloned()
        .collect();

    gainers.sort_by(|a, b| {
        b.change_24h()
            .partial_cmp(&a.change_24h())
            .unwrap_or(Ordering::Equal)
    });
    gainers.truncate(TOP_GAINERS_LIMIT);
    gainers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Vec<MarketEntry> {
        vec![
            MarketEntry::new("bitcoin", "Bitcoin", "btc", 45000.5, Some(5.2)),
            MarketEntry::new("ethereum", "Ether", "eth", 2400.0, Some(-1.1)),
            MarketEntry::new("dogecoin", "Dogecoin", "doge", 0.08, Some(12.0)),
        ]
    }

    fn ids(entries: &[MarketEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_empty_search_returns_dataset() {
        let data = dataset();
        assert_eq!(filter_entries(&data, ""), data);
    }

    #[test]
    fn test_search_matches_symbol() {
        let filtered = filter_entries(&dataset(), "bt");
        assert_eq!(ids(&filtered), vec!["bitcoin"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_order_preserving() {
        let filtered = filter_entries(&dataset(), "COIN");
        assert_eq!(ids(&filtered), vec!["bitcoin", "dogecoin"]);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        assert!(filter_entries(&dataset(), "solana").is_empty());
    }

    #[test]
    fn test_top_gainers_scenario() {
        let gainers = top_gainers(&dataset());
        assert_eq!(ids(&gainers), vec!["dogecoin", "bitcoin"]);
    }

    #[test]
    fn test_top_gainers_caps_at_limit() {
        let data: Vec<MarketEntry> = (0..10)
            .map(|i| {
                MarketEntry::new(
                    format!("coin-{i}"),
                    format!("Coin {i}"),
                    format!("c{i}"),
                    1.0,
                    Some(i as f64 + 1.0),
                )
            })
            .collect();
        let gainers = top_gainers(&data);
        assert_eq!(gainers.len(), TOP_GAINERS_LIMIT);
        assert_eq!(gainers[0].id, "coin-9");
        assert_eq!(gainers[5].id, "coin-4");
    }

    #[test]
    fn test_top_gainers_excludes_zero_and_missing_change() {
        let data = vec![
            MarketEntry::new("flat", "Flat", "flt", 1.0, Some(0.0)),
            MarketEntry::new("unknown", "Unknown", "unk", 1.0, None),
            MarketEntry::new("up", "Up", "up", 1.0, Some(0.01)),
        ];
        assert_eq!(ids(&top_gainers(&data)), vec!["up"]);
    }

    #[test]
    fn test_top_gainers_ties_keep_input_order() {
        let data = vec![
            MarketEntry::new("a", "A", "a", 1.0, Some(3.0)),
            MarketEntry::new("b", "B", "b", 1.0, Some(3.0)),
            MarketEntry::new("c", "C", "c", 1.0, Some(4.0)),
        ];
        assert_eq!(ids(&top_gainers(&data)), vec!["c", "a", "b"]);
    }
}
