//! MarketEvent — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV market update for one symbol.
///
/// Events are immutable once produced by a feed. Total ordering is by
/// `timestamp`, with ties broken by `seq` — the arrival number assigned
/// at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub timestamp: DateTime<Utc>,
    /// Arrival sequence number, assigned by the feed at ingestion.
    pub seq: u64,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl MarketEvent {
    /// Basic OHLCV sanity check: high >= low, range contains open and close,
    /// strictly positive prices, non-negative volume.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> MarketEvent {
        MarketEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            seq: 0,
            symbol: "SPY".into(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn event_is_sane() {
        assert!(sample_event().is_sane());
    }

    #[test]
    fn event_detects_inverted_range() {
        let mut event = sample_event();
        event.high = 97.0; // below low
        assert!(!event.is_sane());
    }

    #[test]
    fn event_detects_negative_volume() {
        let mut event = sample_event();
        event.volume = -1.0;
        assert!(!event.is_sane());
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = sample_event();
        let json = serde_json::to_string(&event).unwrap();
        let deser: MarketEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }
}
