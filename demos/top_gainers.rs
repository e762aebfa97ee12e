//! Prints the current Top Gainers once
//!
//! Usage:
//!   cargo run --example top_gainers -- [currency]

use coin_tracker::{
    card::{render_grid, CardView},
    CoinTracker, Currency, ViewMode,
};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let currency: Currency = match std::env::args().nth(1) {
        Some(code) => code.parse()?,
        None => Currency::default(),
    };

    let tracker = CoinTracker::new()?;
    println!(
        "Fetching top {} markets in {} (provider: {})...",
        coin_tracker::constants::MARKETS_PER_PAGE,
        currency,
        tracker.provider_name()
    );

    let start = Instant::now();
    // Selecting a non-default currency triggers the fetch itself
    let result = match tracker.set_currency(currency).await {
        Ok(Some(outcome)) => Ok(outcome),
        Ok(None) => tracker.mount().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        eprintln!("{}", e);
        return Ok(());
    }
    let elapsed = start.elapsed();

    let state = tracker.snapshot().await;
    let cards: Vec<Vec<String>> = state
        .entries_for(ViewMode::TopGainers)
        .iter()
        .map(|entry| CardView::from_entry(entry, state.currency()).render_lines())
        .collect();

    println!();
    print!("{}", render_grid(&cards, 3));
    println!();

    let metrics = tracker.get_fetch_metrics().await;
    println!(
        "{} of {} entries gaining | fetched in {:?} | success rate {:.0}%",
        cards.len(),
        state.dataset().len(),
        elapsed,
        metrics.success_rate * 100.0
    );

    Ok(())
}
