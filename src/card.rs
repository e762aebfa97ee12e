//! Card display mapping and text rendering
//!
//! Maps market entries to card views and renders them, together with the
//! rest of the dashboard, as a fixed-width text grid.

use crate::{
    format::{format_currency, format_percent_change},
    state::ViewState,
    types::{Currency, MarketEntry, ViewMode},
};
use chrono::Local;

/// Inner width of a rendered card, in characters
pub const CARD_WIDTH: usize = 34;

/// Gap between cards in a grid row
const CARD_GAP: &str = "  ";

/// Width of the 7d sparkline on a card
const SPARKLINE_WIDTH: usize = 20;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Direction of the 24h move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
}

impl PriceDirection {
    /// Zero counts as up
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            PriceDirection::Up
        } else {
            PriceDirection::Down
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            PriceDirection::Up => "▲",
            PriceDirection::Down => "▼",
        }
    }
}

/// Everything a card displays, already formatted
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: String,
    pub name: String,
    /// Upper-cased ticker symbol
    pub symbol: String,
    pub image: String,
    /// `Rank #N`, or `Unranked` when upstream has no rank
    pub rank_badge: String,
    pub price: String,
    /// Absolute 24h change with two decimals
    pub change: String,
    pub direction: PriceDirection,
    /// Arrow and absolute 7d change, when upstream sent one
    pub change_7d: Option<String>,
    /// 7d price series drawn with block characters
    pub sparkline: String,
    /// `Market Cap: ...`
    pub market_cap: String,
}

impl CardView {
    /// Builds the card for an entry in the selected currency
    pub fn from_entry(entry: &MarketEntry, currency: Currency) -> Self {
        let change = entry.change_24h();
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            symbol: entry.symbol.to_uppercase(),
            image: entry.image.clone(),
            rank_badge: entry
                .market_cap_rank
                .map(|rank| format!("Rank #{}", rank))
                .unwrap_or_else(|| "Unranked".to_string()),
            price: format_currency(entry.current_price, currency),
            change: format_percent_change(change),
            direction: PriceDirection::from_change(change),
            change_7d: entry.price_change_percentage_7d_in_currency.map(|change| {
                format!(
                    "{} {}",
                    PriceDirection::from_change(change).arrow(),
                    format_percent_change(change)
                )
            }),
            sparkline: entry
                .sparkline_in_7d
                .as_ref()
                .map(|s| sparkline(&s.price, SPARKLINE_WIDTH))
                .unwrap_or_default(),
            market_cap: format!(
                "Market Cap: {}",
                format_currency(entry.market_cap, currency)
            ),
        }
    }

    /// Renders the card as boxed lines, each `CARD_WIDTH + 4` chars wide
    ///
    /// Only the title may be shortened. Numbers that do not fit wrap onto
    /// further lines, so a card can be taller than a skeleton.
    pub fn render_lines(&self) -> Vec<String> {
        let title = format!("{} ({})", self.name, self.symbol);
        let change = format!("{} {}", self.direction.arrow(), self.change);
        let change_7d = self.change_7d.as_deref().unwrap_or("n/a");

        let mut lines = vec![
            border('┌', '┐'),
            boxed(&split_row(&title, &self.rank_badge)),
        ];
        if self.price.chars().count() + change.chars().count() < CARD_WIDTH {
            lines.push(boxed(&split_row(&self.price, &change)));
        } else {
            lines.extend(wrap(&self.price, CARD_WIDTH).iter().map(|l| boxed(l)));
            lines.push(boxed(&split_row("24h", &change)));
        }
        lines.push(boxed(&split_row(
            &format!("7d {}", self.sparkline),
            change_7d,
        )));
        lines.extend(wrap(&self.market_cap, CARD_WIDTH).iter().map(|l| boxed(l)));
        lines.push(border('└', '┘'));
        lines
    }
}

/// Placeholder card shown while loading
pub fn skeleton_lines() -> Vec<String> {
    let shade = |width: usize| "░".repeat(width);
    vec![
        border('┌', '┐'),
        boxed(&split_row(&shade(16), &shade(8))),
        boxed(&shade(CARD_WIDTH)),
        boxed(&shade(CARD_WIDTH)),
        boxed(&shade(CARD_WIDTH * 3 / 4)),
        border('└', '┘'),
    ]
}

/// Draws `prices` as a block-character sparkline at most `width` wide
pub fn sparkline(prices: &[f64], width: usize) -> String {
    let points: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
    if points.is_empty() || width == 0 {
        return String::new();
    }

    let sampled: Vec<f64> = if points.len() <= width {
        points
    } else {
        (0..width).map(|i| points[i * points.len() / width]).collect()
    };

    let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let top = (SPARK_LEVELS.len() - 1) as f64;

    sampled
        .iter()
        .map(|p| {
            if max > min {
                SPARK_LEVELS[((p - min) / (max - min) * top).round() as usize]
            } else {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            }
        })
        .collect()
}

/// Number of grid columns for a terminal width
pub fn grid_columns(terminal_width: usize) -> usize {
    if terminal_width < 80 {
        1
    } else if terminal_width < 120 {
        2
    } else {
        3
    }
}

/// Lays out cards row by row, `columns` cards per row
pub fn render_grid(cards: &[Vec<String>], columns: usize) -> String {
    let columns = columns.max(1);
    let mut out = String::new();
    let blank = " ".repeat(CARD_WIDTH + 4);
    for row in cards.chunks(columns) {
        let height = row.iter().map(Vec::len).max().unwrap_or(0);
        for line in 0..height {
            let joined = row
                .iter()
                .map(|card| card.get(line).map(String::as_str).unwrap_or(blank.as_str()))
                .collect::<Vec<_>>()
                .join(CARD_GAP);
            out.push_str(joined.trim_end());
            out.push('\n');
        }
    }
    out
}

/// Renders the full dashboard for a tab
pub fn render_dashboard(state: &ViewState, mode: ViewMode, terminal_width: usize) -> String {
    let mut out = String::from("Cryptocurrency Price Tracker\n\n");

    if let Some(error) = state.error() {
        out.push_str(&format!("[!] {}\n\n", error));
    }

    out.push_str(&format!(
        "Search: [{}]  Currency: {}  ({})\n",
        state.search_term(),
        state.currency().label(),
        Currency::all()
            .iter()
            .map(Currency::label)
            .collect::<Vec<_>>()
            .join("/")
    ));

    let updated = state
        .last_updated()
        .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    out.push_str(&format!("Last updated: {}\n\n", updated));

    let tab = |m: ViewMode| {
        if m == mode {
            format!("[{}]", m.title())
        } else {
            format!(" {} ", m.title())
        }
    };
    out.push_str(&format!(
        "{}  {}\n\n",
        tab(ViewMode::All),
        tab(ViewMode::TopGainers)
    ));

    let cards: Vec<Vec<String>> = if state.is_loading() {
        (0..mode.skeleton_count()).map(|_| skeleton_lines()).collect()
    } else {
        state
            .entries_for(mode)
            .iter()
            .map(|entry| CardView::from_entry(entry, state.currency()).render_lines())
            .collect()
    };

    if cards.is_empty() {
        out.push_str("No cryptocurrencies found.\n");
    } else {
        out.push_str(&render_grid(&cards, grid_columns(terminal_width)));
    }

    out
}

fn border(left: char, right: char) -> String {
    format!("{}{}{}", left, "─".repeat(CARD_WIDTH + 2), right)
}

fn boxed(content: &str) -> String {
    format!("│ {} │", fit(content, CARD_WIDTH))
}

/// Left and right aligned text on one row
fn split_row(left: &str, right: &str) -> String {
    let right_len = right.chars().count();
    let left_width = CARD_WIDTH.saturating_sub(right_len + 1);
    format!("{} {}", fit(left, left_width), right)
}

/// Breaks text at spaces into lines of at most `width` characters
///
/// A word longer than `width` is split, never cut short.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let current_len = current.chars().count();
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        current.push_str(word);
        while current.chars().count() > width {
            let head: String = current.chars().take(width).collect();
            current = current.chars().skip(width).collect();
            lines.push(head);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Pads or truncates to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sparkline;
    use chrono::Utc;

    fn bitcoin() -> MarketEntry {
        MarketEntry::new("bitcoin", "Bitcoin", "btc", 45000.5, Some(5.2))
            .with_market_cap(880_000_000_000.0, 1)
    }

    #[test]
    fn test_card_view_from_entry() {
        let card = CardView::from_entry(&bitcoin(), Currency::Usd);
        assert_eq!(card.symbol, "BTC");
        assert_eq!(card.rank_badge, "Rank #1");
        assert_eq!(card.price, "$45,000.50");
        assert_eq!(card.change, "5.20%");
        assert_eq!(card.direction, PriceDirection::Up);
        assert_eq!(card.market_cap, "Market Cap: $880,000,000,000.00");
    }

    #[test]
    fn test_negative_change_points_down() {
        let entry = MarketEntry::new("ethereum", "Ether", "eth", 2400.0, Some(-1.1));
        let card = CardView::from_entry(&entry, Currency::Eur);
        assert_eq!(card.direction, PriceDirection::Down);
        assert_eq!(card.change, "1.10%");
        assert_eq!(card.price, "€2,400.00");
        assert_eq!(card.rank_badge, "Unranked");
    }

    #[test]
    fn test_rendered_lines_have_equal_width() {
        let mut entry = bitcoin();
        entry.name = "A Very Long Cryptocurrency Name That Overflows".to_string();
        for lines in [
            CardView::from_entry(&entry, Currency::Usd).render_lines(),
            skeleton_lines(),
        ] {
            for line in &lines {
                assert_eq!(line.chars().count(), CARD_WIDTH + 4, "{line}");
            }
        }
    }

    #[test]
    fn test_large_market_cap_is_never_cut() {
        let entry = bitcoin().with_market_cap(1.95e14, 1);
        for currency in [Currency::Jpy, Currency::Ngn] {
            let card = CardView::from_entry(&entry, currency);
            let value = format_currency(1.95e14, currency);
            let rendered = card.render_lines().join("\n");
            assert!(!rendered.contains('…'), "{rendered}");
            assert!(rendered.contains(&value), "{rendered}");
            for line in card.render_lines() {
                assert_eq!(line.chars().count(), CARD_WIDTH + 4, "{line}");
            }
        }
    }

    #[test]
    fn test_oversized_number_wraps_without_loss() {
        let entry = bitcoin().with_market_cap(1.0e40, 1);
        let card = CardView::from_entry(&entry, Currency::Ngn);
        let lines = card.render_lines();
        for line in &lines {
            assert_eq!(line.chars().count(), CARD_WIDTH + 4, "{line}");
        }

        let squash = |s: &str| s.split_whitespace().collect::<String>();
        let body: String = lines
            .iter()
            .map(|l| l.trim_start_matches('│').trim_end_matches('│'))
            .collect();
        assert!(squash(&body).contains(&squash(&card.market_cap)), "{body}");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("Market Cap: $1.00", 34), vec!["Market Cap: $1.00"]);
        assert_eq!(wrap("Market Cap: $1.00", 11), vec!["Market Cap:", "$1.00"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 3), vec![""]);
    }

    #[test]
    fn test_seven_day_change_and_sparkline() {
        let mut entry = bitcoin();
        entry.price_change_percentage_7d_in_currency = Some(-0.4);
        entry.sparkline_in_7d = Some(Sparkline {
            price: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        });
        let card = CardView::from_entry(&entry, Currency::Usd);
        assert_eq!(card.change_7d.as_deref(), Some("▼ 0.40%"));
        assert_eq!(card.sparkline, "▁▂▃▄▅▆▇█");
        assert!(card.render_lines()[3].contains("7d ▁▂▃▄▅▆▇█"));

        let plain = CardView::from_entry(&bitcoin(), Currency::Usd);
        assert_eq!(plain.change_7d, None);
        assert!(plain.render_lines()[3].contains("n/a"));
    }

    #[test]
    fn test_sparkline_downsamples_and_handles_flat_series() {
        let prices: Vec<f64> = (0..168).map(f64::from).collect();
        assert_eq!(sparkline(&prices, 20).chars().count(), 20);
        assert_eq!(sparkline(&[3.0, 3.0, 3.0], 20), "▅▅▅");
        assert_eq!(sparkline(&[], 20), "");
    }

    #[test]
    fn test_grid_pads_shorter_cards() {
        let tall = CardView::from_entry(&bitcoin().with_market_cap(1.0e40, 1), Currency::Ngn)
            .render_lines();
        let short_len = skeleton_lines().len();
        assert!(tall.len() > short_len);

        let grid = render_grid(&[skeleton_lines(), tall.clone(), skeleton_lines()], 3);
        let rows: Vec<&str> = grid.lines().collect();
        assert_eq!(rows.len(), tall.len());
        // The tall card keeps its column below the first card's bottom border
        let below = rows[short_len];
        assert!(below.starts_with(&" ".repeat(CARD_WIDTH + 4)));
        assert!(below.contains('│'));
    }

    #[test]
    fn test_grid_columns_breakpoints() {
        assert_eq!(grid_columns(60), 1);
        assert_eq!(grid_columns(100), 2);
        assert_eq!(grid_columns(160), 3);
    }

    #[test]
    fn test_render_grid_rows() {
        let cards: Vec<Vec<String>> = (0..5).map(|_| skeleton_lines()).collect();
        let grid = render_grid(&cards, 2);
        // 3 rows of 6 lines each
        assert_eq!(grid.lines().count(), 18);
    }

    #[test]
    fn test_dashboard_loading_shows_skeletons() {
        let state = ViewState::default();
        let all = render_dashboard(&state, ViewMode::All, 60);
        let gainers = render_dashboard(&state, ViewMode::TopGainers, 60);
        assert_eq!(all.matches('┌').count(), 6);
        assert_eq!(gainers.matches('┌').count(), 3);
        assert!(all.contains("[All Cryptocurrencies]"));
        assert!(gainers.contains("[Top Gainers]"));
        assert!(all.contains("Last updated: --:--:--"));
    }

    #[test]
    fn test_dashboard_shows_error_banner_over_data() {
        let mut state = ViewState::default();
        let ticket = state.begin_fetch();
        state.apply_success(ticket, vec![bitcoin()], Utc::now());
        let ticket = state.begin_fetch();
        state.apply_failure(ticket, "Failed to load");

        let out = render_dashboard(&state, ViewMode::All, 120);
        assert!(out.contains("[!] Failed to load"));
        assert!(out.contains("Bitcoin (BTC)"));
        assert!(!out.contains("--:--:--"));
    }

    #[test]
    fn test_dashboard_empty_search_result() {
        let mut state = ViewState::default();
        let ticket = state.begin_fetch();
        state.apply_success(ticket, vec![bitcoin()], Utc::now());
        state.set_search_term("zzz");
        let out = render_dashboard(&state, ViewMode::All, 120);
        assert!(out.contains("Search: [zzz]"));
        assert!(out.contains("No cryptocurrencies found."));
    }
}
