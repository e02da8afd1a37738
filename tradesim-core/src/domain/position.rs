use serde::{Deserialize, Serialize};

/// Quantities below this magnitude are treated as flat.
pub const QTY_EPSILON: f64 = 1e-9;

/// Open position in a single symbol.
///
/// Quantity is signed: positive for long, negative for short. It may cross
/// zero (long to short and back); the cost basis resets to the fill price
/// after a full reversal. Only the ledger mutates positions, by applying
/// fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub avg_cost: f64,
}

impl Position {
    pub fn flat(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: 0.0,
            avg_cost: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.abs() < QTY_EPSILON
    }

    pub fn is_long(&self) -> bool {
        self.quantity > QTY_EPSILON
    }

    pub fn is_short(&self) -> bool {
        self.quantity < -QTY_EPSILON
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity * (current_price - self.avg_cost)
    }
}
