//! Configuration module for the capture agent

use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Trading symbol to capture (e.g., "btcusdt")
    pub symbol: String,

    /// WebSocket endpoint for the exchange depth stream
    pub ws_endpoint: String,

    /// Number of bid/ask price levels retained per output row
    pub price_levels: usize,

    /// Fixed delay between reconnect attempts, in seconds
    pub reconnect_delay_secs: u64,

    /// When set, capture timestamps are epoch milliseconds; otherwise a
    /// formatted local datetime string
    pub use_exchange_timestamp: bool,

    /// Inter-message gap above which a major gap is reported, in seconds
    pub gap_threshold_secs: f64,

    /// Expected inter-message interval; gaps above twice this are minor
    pub normal_message_interval_secs: f64,

    /// Sanity ceiling for accepted prices
    pub price_ceiling: Decimal,

    /// Directory the dataset files are written into
    pub output_dir: String,

    /// Verify the peer's TLS certificate when connecting
    pub verify_tls_certs: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            symbol: env::var("SYMBOL")
                .unwrap_or_else(|_| "btcusdt".to_string())
                .trim()
                .to_lowercase(),
            ws_endpoint: env::var("WS_ENDPOINT")
                .unwrap_or_else(|_| "wss://stream.binance.com:9443/ws".to_string()),
            price_levels: env::var("PRICE_LEVELS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            reconnect_delay_secs: env::var("RECONNECT_DELAY_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            use_exchange_timestamp: env::var("USE_EXCHANGE_TIMESTAMP")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            gap_threshold_secs: env::var("GAP_THRESHOLD_SECS")
                .unwrap_or_else(|_| "5.0".to_string())
                .parse()
                .unwrap_or(5.0),
            normal_message_interval_secs: env::var("NORMAL_MESSAGE_INTERVAL_SECS")
                .unwrap_or_else(|_| "1.0".to_string())
                .parse()
                .unwrap_or(1.0),
            price_ceiling: env::var("PRICE_CEILING")
                .ok()
                .and_then(|v| Decimal::from_str(&v).ok())
                .unwrap_or_else(|| Decimal::from(1_000_000)),
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()),
            verify_tls_certs: env::var("VERIFY_TLS_CERTS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }

    /// Full stream URL for the configured symbol
    pub fn stream_url(&self) -> String {
        format!("{}/{}@depth", self.ws_endpoint, self.symbol)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbol: "btcusdt".to_string(),
            ws_endpoint: "wss://stream.binance.com:9443/ws".to_string(),
            price_levels: 10,
            reconnect_delay_secs: 5,
            use_exchange_timestamp: true,
            gap_threshold_secs: 5.0,
            normal_message_interval_secs: 1.0,
            price_ceiling: Decimal::from(1_000_000),
            output_dir: ".".to_string(),
            verify_tls_certs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.price_levels, 10);
        assert_eq!(config.reconnect_delay_secs, 5);
        assert_eq!(config.gap_threshold_secs, 5.0);
        assert_eq!(config.price_ceiling, Decimal::from(1_000_000));
    }

    #[test]
    fn test_stream_url() {
        let config = Config::default();
        assert_eq!(
            config.stream_url(),
            "wss://stream.binance.com:9443/ws/btcusdt@depth"
        );
    }
}
