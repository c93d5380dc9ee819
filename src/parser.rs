//! Parser module for exchange depth messages
//!
//! Deserializes incremental depth updates. Level prices and sizes are kept
//! as the raw feed strings so numeric rejection happens per pair in the
//! validator, not per message here.

use serde::{Deserialize, Deserializer};

/// One raw `[price, size]` pair exactly as received from the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLevel {
    pub price: String,
    pub size: String,
}

/// Incremental depth update message
#[derive(Debug, Clone, Deserialize)]
pub struct DepthUpdate {
    /// Exchange event time in epoch milliseconds, when the feed provides it
    #[serde(rename = "E", default)]
    pub event_time: Option<u64>,

    /// Bid updates
    #[serde(rename = "b", deserialize_with = "deserialize_raw_levels")]
    pub bids: Vec<RawLevel>,

    /// Ask updates
    #[serde(rename = "a", deserialize_with = "deserialize_raw_levels")]
    pub asks: Vec<RawLevel>,
}

impl DepthUpdate {
    /// Parse a raw WebSocket text frame
    ///
    /// A message missing the `b` or `a` arrays, or containing a level pair
    /// of the wrong arity, is malformed as a whole.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Custom deserializer for arrays of `[price, size]` string pairs
fn deserialize_raw_levels<'de, D>(deserializer: D) -> Result<Vec<RawLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<String>> = Deserialize::deserialize(deserializer)?;
    raw.into_iter()
        .map(|mut pair| {
            if pair.len() != 2 {
                return Err(serde::de::Error::custom("Invalid price level format"));
            }
            let size = pair.pop().unwrap_or_default();
            let price = pair.pop().unwrap_or_default();
            Ok(RawLevel { price, size })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_depth_update() {
        let raw = r#"{
            "e": "depthUpdate",
            "E": 1672531200000,
            "s": "BTCUSDT",
            "U": 100,
            "u": 105,
            "b": [["50000.00", "1.5"], ["49999.00", "2.0"]],
            "a": [["50001.00", "1.0"], ["50002.00", "0.5"]]
        }"#;

        let update = DepthUpdate::parse(raw).unwrap();
        assert_eq!(update.event_time, Some(1672531200000));
        assert_eq!(update.bids.len(), 2);
        assert_eq!(update.asks.len(), 2);
        assert_eq!(update.bids[0].price, "50000.00");
        assert_eq!(update.bids[0].size, "1.5");
    }

    #[test]
    fn test_parse_without_event_time() {
        let raw = r#"{"b": [["100.0", "2"]], "a": [["101.0", "3"]]}"#;

        let update = DepthUpdate::parse(raw).unwrap();
        assert_eq!(update.event_time, None);
        assert_eq!(update.bids.len(), 1);
        assert_eq!(update.asks.len(), 1);
    }

    #[test]
    fn test_parse_missing_side_is_error() {
        let raw = r#"{"b": [["100.0", "2"]]}"#;
        assert!(DepthUpdate::parse(raw).is_err());
    }

    #[test]
    fn test_parse_bad_pair_arity_is_error() {
        let raw = r#"{"b": [["100.0"]], "a": [["101.0", "3"]]}"#;
        assert!(DepthUpdate::parse(raw).is_err());
    }

    #[test]
    fn test_parse_malformed_json_is_error() {
        assert!(DepthUpdate::parse("not json at all").is_err());
    }
}
