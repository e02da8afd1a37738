//! Portfolio snapshots — the append-only output time series of a run.

use super::position::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Portfolio state recorded at the end of one event step.
///
/// Snapshots are appended, never mutated, and ordered by timestamp. The
/// accounting identity `cash + sum(qty * last_price) == total_equity` holds
/// for every snapshot. The series is the sole artifact handed to external
/// reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub timestamp: DateTime<Utc>,
    /// Sequence number of the event that closed this step.
    pub seq: u64,
    pub cash: f64,
    /// Open (non-flat) positions by symbol.
    pub positions: HashMap<String, Position>,
    pub total_equity: f64,
    /// Cumulative realized PnL since the start of the run.
    pub realized_pnl: f64,
}
