//! Leveling of raw depth updates

use rust_decimal::Decimal;
use tracing::warn;

use super::{BookMetrics, BookSnapshot, Level, Side};
use crate::config::Config;
use crate::parser::{DepthUpdate, RawLevel};
use crate::validator;

/// Transforms raw bid/ask update arrays into a [`BookSnapshot`]
#[derive(Debug, Clone)]
pub struct BookLeveler {
    depth: usize,
    price_ceiling: Decimal,
}

impl BookLeveler {
    pub fn new(depth: usize, price_ceiling: Decimal) -> Self {
        Self {
            depth,
            price_ceiling,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.price_levels, config.price_ceiling)
    }

    /// Number of levels retained per side
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Level one depth update, or `None` when either filtered side is empty
    ///
    /// Invalid pairs are logged and dropped; zero-size pairs are removals
    /// and are dropped silently. One-sided books are never emitted.
    pub fn level(&self, update: &DepthUpdate) -> Option<BookSnapshot> {
        let mut bids = self.filter_side(&update.bids, Side::Bid);
        let mut asks = self.filter_side(&update.asks, Side::Ask);

        if bids.is_empty() || asks.is_empty() {
            return None;
        }

        // Feed guarantees unique prices per side per update, so the sort
        // key is the price alone.
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));

        bids.truncate(self.depth);
        asks.truncate(self.depth);

        let metrics = self.metrics(&bids, &asks);

        Some(BookSnapshot { bids, asks, metrics })
    }

    fn filter_side(&self, raw: &[RawLevel], side: Side) -> Vec<Level> {
        let mut levels = Vec::with_capacity(raw.len());

        for pair in raw {
            match validator::validate(&pair.price, &pair.size, self.price_ceiling) {
                Ok((_, size)) if size == Decimal::ZERO => {}
                Ok((price, size)) => levels.push(Level { price, size }),
                Err(reason) => {
                    warn!(side = side.as_str(), %reason, "Invalid level data");
                }
            }
        }

        levels
    }

    /// Metrics over the retained levels; both sides must be non-empty
    fn metrics(&self, bids: &[Level], asks: &[Level]) -> BookMetrics {
        let total_bid_size: Decimal = bids.iter().map(|l| l.size).sum();
        let total_ask_size: Decimal = asks.iter().map(|l| l.size).sum();

        let bid_ask_ratio = if total_ask_size > Decimal::ZERO {
            total_bid_size / total_ask_size
        } else {
            Decimal::ZERO
        };

        let best_bid = bids[0].price;
        let best_ask = asks[0].price;

        BookMetrics {
            total_bid_size,
            total_ask_size,
            bid_ask_ratio,
            spread: best_ask - best_bid,
            mid_price: (best_bid + best_ask) / Decimal::from(2),
        }
    }
}
