//! Seeded synthetic OHLCV data — deterministic fixtures for tests and benches.

use crate::domain::MarketEvent;
use chrono::{Duration, TimeZone, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Generate `n` daily bars following a bounded random walk.
///
/// Fully determined by `seed`: the same seed always yields the same record
/// sequence, bit for bit.
pub fn random_walk(symbol: &str, n: usize, seed: u64) -> Vec<MarketEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let mut close: f64 = 100.0;
    let mut events = Vec::with_capacity(n);

    for i in 0..n {
        let open = close;
        close *= 1.0 + rng.gen_range(-0.02..0.02);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.005));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.005));
        let volume = rng.gen_range(50_000.0..150_000.0);

        events.push(MarketEvent {
            timestamp: base + Duration::days(i as i64),
            seq: 0,
            symbol: symbol.to_string(),
            open,
            high,
            low,
            close,
            volume,
        });
    }
    events
}
