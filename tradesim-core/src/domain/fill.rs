use super::ids::IntentId;
use super::order::OrderSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Executed result of an order intent, possibly partial.
///
/// Immutable; produced by the simulator and consumed exactly once by the
/// ledger. `0 < quantity <= requested` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub intent_id: IntentId,
    pub symbol: String,
    pub side: OrderSide,
    pub price: f64,
    pub quantity: f64,
    /// The quantity originally requested by the intent.
    pub requested: f64,
    /// Always non-negative, always reduces proceeds.
    pub fees: f64,
    /// Timestamp of the event that triggered the fill.
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }

    /// Signed cash effect: buys debit `notional + fees`, sells credit
    /// `notional - fees`.
    pub fn cash_delta(&self) -> f64 {
        match self.side {
            OrderSide::Buy => -(self.notional() + self.fees),
            OrderSide::Sell => self.notional() - self.fees,
        }
    }
}
