//! Portfolio ledger — owns cash and positions, applies fills atomically.
//!
//! The accounting identity `equity == cash + sum(position market values)`
//! holds after every mutation. A fill either updates quantity, cost basis,
//! and cash together, or is rejected in full — the ledger is never left
//! partially applied.

use crate::domain::position::QTY_EPSILON;
use crate::domain::{Fill, MarketEvent, PortfolioSnapshot, Position};
use crate::strategy::PortfolioView;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

/// Tolerance on the no-margin cash floor, absorbing float rounding.
const CASH_EPSILON: f64 = 1e-9;

/// Errors from applying a fill.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// The fill would drive cash negative under a no-margin configuration.
    /// The fill is discarded; nothing was applied.
    #[error("insufficient funds: fill requires {required:.2} but only {available:.2} available")]
    InsufficientFunds { required: f64, available: f64 },
}

/// Cash, positions, and realized PnL for one run.
#[derive(Debug, Clone)]
pub struct Ledger {
    cash: f64,
    initial_cash: f64,
    margin_allowed: bool,
    positions: HashMap<String, Position>,
    /// Last marked price per symbol. Fills do not mark: execution prices
    /// carry slippage and would misvalue the rest of the position.
    last_prices: HashMap<String, f64>,
    realized_pnl: f64,
    total_fees: f64,
}

impl Ledger {
    pub fn new(initial_cash: f64, margin_allowed: bool) -> Self {
        Self {
            cash: initial_cash,
            initial_cash,
            margin_allowed,
            positions: HashMap::new(),
            last_prices: HashMap::new(),
            realized_pnl: 0.0,
            total_fees: 0.0,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn total_fees(&self) -> f64 {
        self.total_fees
    }

    pub fn positions(&self) -> &HashMap<String, Position> {
        &self.positions
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol).filter(|p| !p.is_flat())
    }

    /// Revalue a symbol at the event's close without trading.
    pub fn mark_to_market(&mut self, event: &MarketEvent) {
        self.mark_price(&event.symbol, event.close);
    }

    pub fn mark_price(&mut self, symbol: &str, price: f64) {
        self.last_prices.insert(symbol.to_string(), price);
    }

    /// Read-only projection handed to the strategy each step.
    pub fn view<'a>(&'a self, last_snapshot: Option<&'a PortfolioSnapshot>) -> PortfolioView<'a> {
        PortfolioView {
            cash: self.cash,
            realized_pnl: self.realized_pnl,
            positions: &self.positions,
            last_snapshot,
        }
    }

    /// Total equity = cash + sum of position values at last known prices.
    /// A position with no marked price yet is valued at its cost basis.
    pub fn equity(&self) -> f64 {
        let position_value: f64 = self
            .positions
            .values()
            .map(|pos| {
                let price = self
                    .last_prices
                    .get(&pos.symbol)
                    .copied()
                    .unwrap_or(pos.avg_cost);
                pos.market_value(price)
            })
            .sum();
        self.cash + position_value
    }

    /// Apply a fill atomically.
    ///
    /// Validation happens before any mutation: under no-margin, a fill whose
    /// cash effect would take the balance below zero is rejected whole.
    ///
    /// Cost basis on a same-direction increase is the weighted average
    /// `(old_qty * old_basis + fill_qty * fill_price) / (old_qty + fill_qty)`.
    /// Reducing or reversing fills realize
    /// `closed_qty * (fill_price - basis) * sign(old_qty)`; after a full
    /// reversal through zero the basis resets to the fill price.
    pub fn apply(&mut self, fill: &Fill) -> Result<(), LedgerError> {
        let delta = fill.cash_delta();
        if !self.margin_allowed && self.cash + delta < -CASH_EPSILON {
            return Err(LedgerError::InsufficientFunds {
                required: -delta,
                available: self.cash,
            });
        }

        let pos = self
            .positions
            .entry(fill.symbol.clone())
            .or_insert_with(|| Position::flat(&fill.symbol));

        let signed = fill.side.sign() * fill.quantity;
        let old_qty = pos.quantity;
        let new_qty = old_qty + signed;

        if old_qty.abs() < QTY_EPSILON {
            // Opening from flat.
            pos.avg_cost = fill.price;
        } else if old_qty.signum() == signed.signum() {
            // Same-direction increase: weighted-average basis.
            pos.avg_cost = (old_qty.abs() * pos.avg_cost + fill.quantity * fill.price)
                / (old_qty.abs() + fill.quantity);
        } else {
            // Reducing or reversing: realize PnL on the closed quantity.
            let closed = fill.quantity.min(old_qty.abs());
            self.realized_pnl += closed * (fill.price - pos.avg_cost) * old_qty.signum();
            if old_qty * new_qty < 0.0 {
                // Reversal through zero: basis resets to the fill price.
                pos.avg_cost = fill.price;
            } else if new_qty.abs() < QTY_EPSILON {
                pos.avg_cost = 0.0;
            }
        }

        pos.quantity = if new_qty.abs() < QTY_EPSILON { 0.0 } else { new_qty };
        self.cash += delta;
        self.total_fees += fill.fees;
        Ok(())
    }

    /// Record the current state as an immutable snapshot.
    pub fn snapshot(&self, timestamp: DateTime<Utc>, seq: u64) -> PortfolioSnapshot {
        let positions: HashMap<String, Position> = self
            .positions
            .iter()
            .filter(|(_, pos)| !pos.is_flat())
            .map(|(sym, pos)| (sym.clone(), pos.clone()))
            .collect();
        let total_equity = self.equity();

        #[cfg(debug_assertions)]
        {
            let position_value: f64 = positions
                .values()
                .map(|pos| {
                    let price = self
                        .last_prices
                        .get(&pos.symbol)
                        .copied()
                        .unwrap_or(pos.avg_cost);
                    pos.market_value(price)
                })
                .sum();
            assert!(
                (total_equity - (self.cash + position_value)).abs() < 1e-6,
                "equity accounting violated: equity={total_equity}, cash={} + positions={position_value}",
                self.cash
            );
        }

        PortfolioSnapshot {
            timestamp,
            seq,
            cash: self.cash,
            positions,
            total_equity,
            realized_pnl: self.realized_pnl,
        }
    }
}
