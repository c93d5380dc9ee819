//! Inter-message gap detection
//!
//! Heartbeat-style monitor over message arrival times. Advisory only: it
//! logs and classifies, it never blocks or drops anything. State lives for
//! the whole process so a reconnect gap is reported like any other.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Classification of the delay since the previous message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapSignal {
    None,
    Minor,
    Major,
}

/// Tracks the arrival time of the most recent message
#[derive(Debug)]
pub struct GapDetector {
    last_arrival: Option<DateTime<Utc>>,
    major_threshold_secs: f64,
    minor_threshold_secs: f64,
}

impl GapDetector {
    /// Create a detector with the major threshold and the expected normal
    /// message interval; delays above twice the normal interval are minor.
    pub fn new(major_threshold_secs: f64, normal_interval_secs: f64) -> Self {
        Self {
            last_arrival: None,
            major_threshold_secs,
            minor_threshold_secs: normal_interval_secs * 2.0,
        }
    }

    /// Record one message arrival and classify the gap since the previous one
    ///
    /// The first observation ever returns `GapSignal::None`. The internal
    /// clock is updated on every call, whatever the classification.
    pub fn observe(&mut self, now: DateTime<Utc>) -> GapSignal {
        let signal = match self.last_arrival {
            None => GapSignal::None,
            Some(previous) => {
                let gap_secs = (now - previous).num_milliseconds() as f64 / 1000.0;

                if gap_secs > self.major_threshold_secs {
                    warn!(
                        gap_secs,
                        from = %previous,
                        to = %now,
                        "Data gap detected between messages"
                    );
                    GapSignal::Major
                } else if gap_secs > self.minor_threshold_secs {
                    info!(gap_secs, "Minor delay detected between messages");
                    GapSignal::Minor
                } else {
                    GapSignal::None
                }
            }
        };

        self.last_arrival = Some(now);
        signal
    }

    /// Arrival time of the most recently observed message
    pub fn last_arrival(&self) -> Option<DateTime<Utc>> {
        self.last_arrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, millis: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, millis * 1_000_000).unwrap()
    }

    #[test]
    fn test_first_observation_is_none() {
        let mut detector = GapDetector::new(5.0, 1.0);
        assert_eq!(detector.observe(at(0, 0)), GapSignal::None);
        assert_eq!(detector.last_arrival(), Some(at(0, 0)));
    }

    #[test]
    fn test_gap_below_minor_threshold() {
        let mut detector = GapDetector::new(5.0, 1.0);
        detector.observe(at(0, 0));
        assert_eq!(detector.observe(at(1, 500)), GapSignal::None);
    }

    #[test]
    fn test_minor_gap() {
        let mut detector = GapDetector::new(5.0, 1.0);
        detector.observe(at(0, 0));
        assert_eq!(detector.observe(at(2, 500)), GapSignal::Minor);
    }

    #[test]
    fn test_major_gap() {
        let mut detector = GapDetector::new(5.0, 1.0);
        detector.observe(at(0, 0));
        assert_eq!(detector.observe(at(6, 0)), GapSignal::Major);
    }

    #[test]
    fn test_clock_updates_on_every_call() {
        let mut detector = GapDetector::new(5.0, 1.0);
        detector.observe(at(0, 0));
        detector.observe(at(10, 0));
        assert_eq!(detector.last_arrival(), Some(at(10, 0)));

        // The next gap is measured from the major-gap arrival, not before it
        assert_eq!(detector.observe(at(11, 0)), GapSignal::None);
    }
}
