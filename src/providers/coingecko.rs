//! CoinGecko markets provider implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_MARKETS_ENDPOINT, MARKETS_ORDER, MARKETS_PAGE,
        MARKETS_PER_PAGE, MARKETS_PRICE_CHANGE_WINDOWS, MARKETS_SPARKLINE, REQUEST_TIMEOUT_SECS,
        USER_AGENT,
    },
    error::ProviderError,
    provider::MarketDataProvider,
    types::{Currency, MarketEntry},
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// CoinGecko markets provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider against a different base URL (mirror or test server)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Builds the markets listing URL for a currency
    fn build_url(&self, currency: Currency) -> String {
        format!(
            "{}{}?vs_currency={}&order={}&per_page={}&page={}&sparkline={}&price_change_percentage={}",
            self.base_url,
            COINGECKO_MARKETS_ENDPOINT,
            currency.code(),
            MARKETS_ORDER,
            MARKETS_PER_PAGE,
            MARKETS_PAGE,
            MARKETS_SPARKLINE,
            MARKETS_PRICE_CHANGE_WINDOWS
        )
    }

    /// Parses the markets listing body
    fn parse_response(response_text: &str) -> Result<Vec<MarketEntry>, ProviderError> {
        serde_json::from_str(response_text).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Failed to parse CoinGecko markets response: {}",
                e
            ))
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(&self, currency: Currency) -> Result<Vec<MarketEntry>, ProviderError> {
        let url = self.build_url(currency);
        tracing::debug!(url = %url, "Fetching markets from CoinGecko");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::api(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let response_text = response.text().await.map_err(ProviderError::NetworkError)?;
        let entries = Self::parse_response(&response_text)?;

        tracing::debug!(
            count = entries.len(),
            currency = currency.code(),
            "Fetched markets from CoinGecko"
        );

        Ok(entries)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://coin-images.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 45000.5,
            "market_cap": 880000000000,
            "market_cap_rank": 1,
            "fully_diluted_valuation": 945000000000,
            "price_change_percentage_24h": 5.2,
            "price_change_percentage_7d_in_currency": -0.4,
            "sparkline_in_7d": {"price": [44000.0, 44500.25, 45000.5]},
            "last_updated": "2024-03-01T12:00:00.000Z"
        },
        {
            "id": "ethereum",
            "symbol": "eth",
            "name": "Ethereum",
            "image": "https://coin-images.coingecko.com/coins/images/279/large/ethereum.png",
            "current_price": 2400.1,
            "market_cap": 290000000000,
            "market_cap_rank": 2,
            "price_change_percentage_24h": -1.1
        }
    ]"#;

    #[test]
    fn test_build_url_uses_fixed_query() {
        let provider = CoinGeckoProvider::new().unwrap();
        assert_eq!(
            provider.build_url(Currency::Eur),
            "https://api.coingecko.com/api/v3/coins/markets?vs_currency=eur&order=market_cap_desc&per_page=50&page=1&sparkline=true&price_change_percentage=24h,7d"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider = CoinGeckoProvider::with_base_url("http://127.0.0.1:9000/api/").unwrap();
        assert!(provider
            .build_url(Currency::Usd)
            .starts_with("http://127.0.0.1:9000/api/coins/markets?vs_currency=usd&"));
    }

    #[test]
    fn test_parse_response_keeps_upstream_order() {
        let entries = CoinGeckoProvider::parse_response(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "bitcoin");
        assert_eq!(entries[0].market_cap_rank, Some(1));
        assert_eq!(entries[0].price_change_percentage_24h, Some(5.2));
        assert_eq!(entries[0].price_change_percentage_7d_in_currency, Some(-0.4));
        assert_eq!(
            entries[0].sparkline_in_7d.as_ref().map(|s| s.price.len()),
            Some(3)
        );
        assert_eq!(entries[1].symbol, "eth");
        assert_eq!(entries[1].sparkline_in_7d, None);
    }

    #[test]
    fn test_parse_response_rejects_error_object() {
        let body = r#"{"status": {"error_code": 429, "error_message": "rate limited"}}"#;
        let err = CoinGeckoProvider::parse_response(body).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    /// Serves one canned HTTP response on a local port and returns its base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_markets_decodes_ok_response() {
        let base_url = serve_once("200 OK", SAMPLE).await;
        let provider = CoinGeckoProvider::with_base_url(base_url).unwrap();

        let entries = provider.fetch_markets(Currency::Usd).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "bitcoin");
        assert_eq!(entries[1].id, "ethereum");
    }

    #[tokio::test]
    async fn test_fetch_markets_maps_server_error_to_api_error() {
        let base_url = serve_once("500 Internal Server Error", "upstream exploded").await;
        let provider = CoinGeckoProvider::with_base_url(base_url).unwrap();

        let err = provider.fetch_markets(Currency::Eur).await.unwrap_err();
        match err {
            ProviderError::ApiError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_markets_rejects_malformed_body() {
        let base_url = serve_once("200 OK", r#"{"oops":"#).await;
        let provider = CoinGeckoProvider::with_base_url(base_url).unwrap();

        let err = provider.fetch_markets(Currency::Jpy).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_markets_reports_unreachable_host_as_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = CoinGeckoProvider::with_base_url(format!("http://{}", addr)).unwrap();
        let err = provider.fetch_markets(Currency::Usd).await.unwrap_err();
        assert!(matches!(err, ProviderError::NetworkError(_)));
    }
}
