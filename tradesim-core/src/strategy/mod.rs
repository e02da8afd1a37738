//! Strategy contract — the only boundary between user code and the engine.
//!
//! A strategy sees each market event plus a read-only portfolio view and
//! answers with zero or more order intents. It may hold private state across
//! calls (moving-average buffers, flags) but never references into
//! engine-owned mutable structures — the view borrows are released before
//! any mutation happens. Given an identical event sequence and view history,
//! a strategy must emit identical intents; the engine relies on this for
//! repeatable runs.

pub mod buy_and_hold;
pub mod ma_crossover;

pub use buy_and_hold::BuyAndHold;
pub use ma_crossover::MaCrossover;

use crate::domain::{MarketEvent, OrderIntent, PortfolioSnapshot, Position};
use std::collections::HashMap;
use thiserror::Error;

/// A fault raised by a strategy during its decision. Fatal to the current
/// run only; other runs in a batch are unaffected.
#[derive(Debug, Clone, Error)]
#[error("strategy fault: {0}")]
pub struct StrategyError(pub String);

/// Read-only projection of ledger state handed to the strategy each step.
///
/// No ledger internals cross this boundary; the strategy cannot mutate
/// portfolio state or observe anything the engine has not yet committed.
#[derive(Debug)]
pub struct PortfolioView<'a> {
    pub cash: f64,
    pub realized_pnl: f64,
    pub positions: &'a HashMap<String, Position>,
    /// The snapshot recorded at the end of the previous step, if any.
    pub last_snapshot: Option<&'a PortfolioSnapshot>,
}

impl PortfolioView<'_> {
    /// Open (non-flat) position for a symbol.
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol).filter(|p| !p.is_flat())
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }
}

/// The decision capability. One method, no other engine access.
pub trait Strategy {
    fn on_event(
        &mut self,
        event: &MarketEvent,
        view: &PortfolioView<'_>,
    ) -> Result<Vec<OrderIntent>, StrategyError>;
}

/// Strategy that never trades. Baseline for tests and benches.
#[derive(Debug, Default)]
pub struct NullStrategy;

impl Strategy for NullStrategy {
    fn on_event(
        &mut self,
        _event: &MarketEvent,
        _view: &PortfolioView<'_>,
    ) -> Result<Vec<OrderIntent>, StrategyError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn null_strategy_emits_nothing() {
        let event = MarketEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            seq: 0,
            symbol: "SPY".into(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.0,
            volume: 1_000.0,
        };
        let positions = HashMap::new();
        let view = PortfolioView {
            cash: 10_000.0,
            realized_pnl: 0.0,
            positions: &positions,
            last_snapshot: None,
        };
        let intents = NullStrategy.on_event(&event, &view).unwrap();
        assert!(intents.is_empty());
    }

    #[test]
    fn view_filters_flat_positions() {
        let mut positions = HashMap::new();
        positions.insert("SPY".to_string(), Position::flat("SPY"));
        let view = PortfolioView {
            cash: 10_000.0,
            realized_pnl: 0.0,
            positions: &positions,
            last_snapshot: None,
        };
        assert!(!view.has_position("SPY"));
    }
}
