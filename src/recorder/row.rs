//! Output row schema

use crate::book::BookSnapshot;

/// One flattened dataset record, built once per accepted update
///
/// Missing levels are padded with `0,0` up to the configured depth; padding
/// is cosmetic and never feeds the summary metrics.
#[derive(Debug, Clone)]
pub struct OutputRow {
    timestamp: String,
    exchange_timestamp: String,
    snapshot: BookSnapshot,
    depth: usize,
    message_count: u64,
}

impl OutputRow {
    pub fn new(
        timestamp: String,
        exchange_timestamp: String,
        snapshot: BookSnapshot,
        depth: usize,
        message_count: u64,
    ) -> Self {
        Self {
            timestamp,
            exchange_timestamp,
            snapshot,
            depth,
            message_count,
        }
    }

    /// Header column names for the given depth
    pub fn header(depth: usize) -> Vec<String> {
        let mut columns = vec!["timestamp".to_string(), "exchange_timestamp".to_string()];
        for i in 1..=depth {
            columns.push(format!("bid_price_{i}"));
            columns.push(format!("bid_size_{i}"));
        }
        for i in 1..=depth {
            columns.push(format!("ask_price_{i}"));
            columns.push(format!("ask_size_{i}"));
        }
        columns.extend(
            [
                "total_bid_size",
                "total_ask_size",
                "bid_ask_ratio",
                "spread",
                "mid_price",
                "message_count",
            ]
            .map(String::from),
        );
        columns
    }

    /// Rendered field values, in header order
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(2 + self.depth * 4 + 6);
        fields.push(self.timestamp.clone());
        fields.push(self.exchange_timestamp.clone());

        for i in 0..self.depth {
            match self.snapshot.bids.get(i) {
                Some(level) => {
                    fields.push(level.price.to_string());
                    fields.push(level.size.to_string());
                }
                None => {
                    fields.push("0".to_string());
                    fields.push("0".to_string());
                }
            }
        }

        for i in 0..self.depth {
            match self.snapshot.asks.get(i) {
                Some(level) => {
                    fields.push(level.price.to_string());
                    fields.push(level.size.to_string());
                }
                None => {
                    fields.push("0".to_string());
                    fields.push("0".to_string());
                }
            }
        }

        let metrics = &self.snapshot.metrics;
        fields.push(metrics.total_bid_size.to_string());
        fields.push(metrics.total_ask_size.to_string());
        fields.push(metrics.bid_ask_ratio.to_string());
        fields.push(metrics.spread.to_string());
        fields.push(metrics.mid_price.to_string());
        fields.push(self.message_count.to_string());

        fields
    }
}
