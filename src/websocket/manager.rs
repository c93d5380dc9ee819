//! Connection manager
//!
//! Drives the stream session lifecycle: connect, dispatch each message
//! through the capture pipeline, tear down on close or error, and reconnect
//! after a fixed delay, forever.

use chrono::{Local, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

use super::{Received, WebSocketClient};
use crate::book::BookLeveler;
use crate::config::Config;
use crate::error::Result;
use crate::gap::GapDetector;
use crate::parser::DepthUpdate;
use crate::recorder::OutputRow;
use crate::session::SharedSession;

/// How much of a malformed payload is logged
const LOGGED_PAYLOAD_CHARS: usize = 200;

/// Runs the capture loop against one stream endpoint
pub struct ConnectionManager {
    config: Arc<Config>,
    session: SharedSession,
    client: WebSocketClient,
    leveler: BookLeveler,
    gaps: GapDetector,
    attempt: u64,
}

impl ConnectionManager {
    pub fn new(config: Arc<Config>, session: SharedSession) -> Self {
        let client = WebSocketClient::new(config.stream_url(), config.verify_tls_certs);
        let leveler = BookLeveler::from_config(&config);
        let gaps = GapDetector::new(
            config.gap_threshold_secs,
            config.normal_message_interval_secs,
        );

        Self {
            config,
            session,
            client,
            leveler,
            gaps,
            attempt: 0,
        }
    }

    /// Run until the process is terminated externally
    ///
    /// Every connection end, clean or not, leads to dataset teardown and a
    /// fixed-delay reconnect. There is no retry cap and no backoff.
    pub async fn run(&mut self) -> Result<()> {
        let delay = Duration::from_secs(self.config.reconnect_delay_secs);

        loop {
            self.attempt += 1;
            info!(attempt = self.attempt, "Starting WebSocket connection");

            match self.connect_and_process().await {
                Ok(()) => info!(attempt = self.attempt, "Connection closed by peer"),
                Err(e) => error!(attempt = self.attempt, error = %e, "Connection failed"),
            }

            self.client.close().await;
            self.session.lock().await.close_dataset();

            info!(
                delay_secs = delay.as_secs(),
                "Reconnecting after delay"
            );
            sleep(delay).await;
        }
    }

    /// Process messages until the session ends; `Ok` means a clean close
    async fn connect_and_process(&mut self) -> Result<()> {
        self.client.connect().await?;
        self.session.lock().await.open_dataset(&self.config)?;

        loop {
            match self.client.recv().await? {
                Received::Text(text) => self.handle_message(&text).await,
                Received::Control => continue,
                Received::Closed(_) => return Ok(()),
            }
        }
    }

    /// Process one text frame; data-level failures never end the session
    async fn handle_message(&mut self, raw: &str) {
        self.gaps.observe(Utc::now());

        let mut session = self.session.lock().await;
        let count = session.count_message();

        let update = match DepthUpdate::parse(raw) {
            Ok(update) => update,
            Err(e) => {
                error!(error = %e, "Error processing message");
                error!(
                    payload = truncate(raw, LOGGED_PAYLOAD_CHARS),
                    "Offending message content"
                );
                return;
            }
        };

        let Some(snapshot) = self.leveler.level(&update) else {
            return;
        };

        let timestamp = capture_timestamp(&self.config);
        let exchange_timestamp = update
            .event_time
            .map(|t| t.to_string())
            .unwrap_or_else(|| capture_timestamp(&self.config));

        let metrics = snapshot.metrics.clone();
        let row = OutputRow::new(
            timestamp,
            exchange_timestamp,
            snapshot,
            self.leveler.depth(),
            count,
        );

        if let Err(e) = session.write_row(&row) {
            error!(error = %e, "Failed to append row to dataset");
            return;
        }

        if count % 100 == 0 {
            info!(
                messages = count,
                bid_ask_ratio = %metrics.bid_ask_ratio.round_dp(2),
                spread = %metrics.spread,
                mid_price = %metrics.mid_price,
                "Processed messages"
            );
        }
    }
}

/// Local capture timestamp in the configured format
fn capture_timestamp(config: &Config) -> String {
    if config.use_exchange_timestamp {
        Utc::now().timestamp_millis().to_string()
    } else {
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }
}

/// Truncate on a character boundary
fn truncate(raw: &str, max_chars: usize) -> &str {
    match raw.char_indices().nth(max_chars) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_payload_untouched() {
        assert_eq!(truncate("short", 200), "short");
    }

    #[test]
    fn test_truncate_long_payload() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long, 200).len(), 200);
    }

    #[test]
    fn test_truncate_on_char_boundaries() {
        let s = "äöü".repeat(100);
        let cut = truncate(&s, 200);
        assert_eq!(cut.chars().count(), 200);
    }

    #[test]
    fn test_capture_timestamp_formats() {
        let epoch_cfg = Config::default();
        let ts = capture_timestamp(&epoch_cfg);
        assert!(ts.parse::<u64>().is_ok());

        let formatted_cfg = Config {
            use_exchange_timestamp: false,
            ..Config::default()
        };
        let ts = capture_timestamp(&formatted_cfg);
        assert!(ts.contains('-') && ts.contains(':') && ts.contains('.'));
    }
}
