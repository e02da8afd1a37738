//! Run fingerprints — content hashes for determinism verification.
//!
//! Two runs of the same (feed, strategy, config) must produce identical
//! snapshot series, bit for bit. Hashing the raw bit patterns of every
//! numeric field makes that checkable with a single string comparison,
//! stable across builds and platforms.

use crate::domain::PortfolioSnapshot;

/// BLAKE3 hash over the canonical byte encoding of a snapshot series.
///
/// Positions are folded in sorted symbol order so the hash is independent
/// of map iteration order.
pub fn snapshot_fingerprint(snapshots: &[PortfolioSnapshot]) -> String {
    let mut hasher = blake3::Hasher::new();
    for snap in snapshots {
        hasher.update(&snap.timestamp.timestamp_micros().to_le_bytes());
        hasher.update(&snap.seq.to_le_bytes());
        hasher.update(&snap.cash.to_bits().to_le_bytes());
        hasher.update(&snap.total_equity.to_bits().to_le_bytes());
        hasher.update(&snap.realized_pnl.to_bits().to_le_bytes());

        let mut symbols: Vec<&String> = snap.positions.keys().collect();
        symbols.sort();
        for symbol in symbols {
            let pos = &snap.positions[symbol];
            hasher.update(symbol.as_bytes());
            hasher.update(&pos.quantity.to_bits().to_le_bytes());
            hasher.update(&pos.avg_cost.to_bits().to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Canonical hash of any serializable config, for run identity.
pub fn config_fingerprint<T: serde::Serialize>(config: &T) -> String {
    let json = serde_json::to_string(config).unwrap_or_default();
    blake3::hash(json.as_bytes()).to_hex().to_string()
}
