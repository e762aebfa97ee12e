//! Interactive terminal dashboard
//!
//! Usage:
//!   cargo run --example dashboard
//!
//! Commands (one per line):
//!   s <term>   search by name or symbol (`s` alone clears)
//!   c <code>   switch currency (usd, eur, gbp, jpy, ngn)
//!   t          toggle between All and Top Gainers
//!   r          refresh
//!   q          quit
//!
//! Set `COIN_TRACKER_REFRESH_SECS` to refresh periodically and `COLUMNS` to
//! change the grid width.

use coin_tracker::{card::render_dashboard, CoinTracker, Currency, ViewMode};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

enum Command {
    Continue,
    Quit,
}

/// Clear terminal and move cursor to top-left
fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

async fn draw(tracker: &CoinTracker, mode: ViewMode, width: usize) -> io::Result<()> {
    let state = tracker.snapshot().await;
    clear_screen();
    println!("{}", render_dashboard(&state, mode, width));
    println!("s <term> search | c <code> currency | t tab | r refresh | q quit");
    print!("> ");
    io::stdout().flush()
}

/// Runs a fetch without blocking the input loop
fn spawn_fetch(tracker: &Arc<CoinTracker>, currency: Option<Currency>) {
    let tracker = tracker.clone();
    tokio::spawn(async move {
        let result = match currency {
            Some(currency) => tracker.set_currency(currency).await.map(|_| ()),
            None => tracker.refresh().await.map(|_| ()),
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "Fetch failed");
        }
    });
}

async fn handle(tracker: &Arc<CoinTracker>, line: &str, mode: &mut ViewMode) -> Command {
    let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
    match cmd {
        "q" | "quit" => return Command::Quit,
        "r" | "refresh" => spawn_fetch(tracker, None),
        "t" | "tab" => {
            *mode = match mode {
                ViewMode::All => ViewMode::TopGainers,
                ViewMode::TopGainers => ViewMode::All,
            }
        }
        "s" | "search" => tracker.set_search_term(arg.trim()).await,
        "c" | "currency" => match arg.parse::<Currency>() {
            Ok(currency) => spawn_fetch(tracker, Some(currency)),
            Err(e) => tracing::warn!(error = %e, "Ignoring currency"),
        },
        "" => {}
        other => tracing::warn!(command = other, "Unknown command"),
    }
    Command::Continue
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let width = std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(120);

    let tracker = Arc::new(CoinTracker::new()?);
    let mut events = tracker.subscribe();
    let mut mode = ViewMode::All;

    {
        let tracker = tracker.clone();
        tokio::spawn(async move {
            if let Err(e) = tracker.mount().await {
                tracing::debug!(error = %e, "Initial fetch failed");
            }
        });
    }

    if let Some(secs) = std::env::var("COIN_TRACKER_REFRESH_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    {
        let _refresh = tracker.start_auto_refresh(Duration::from_secs(secs));
    }

    draw(&tracker, mode, width).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Command::Quit = handle(&tracker, line.trim(), &mut mode).await {
                    break;
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => tracing::debug!(event = %event, "Tracker event"),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Dropped tracker events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
        draw(&tracker, mode, width).await?;
    }

    Ok(())
}
