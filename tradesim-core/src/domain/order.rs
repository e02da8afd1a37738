//! Order intents — the strategy's output, consumed by the execution simulator.

use super::ids::IntentId;
use serde::{Deserialize, Serialize};

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Sign convention for position arithmetic: buys add, sells subtract.
    pub fn sign(self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }
}

/// What kind of order and its price parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Fill at the current event's close price plus slippage.
    Market,
    /// Rest until an event's range crosses the limit price; fills at the
    /// limit price exactly, never better.
    Limit { limit_price: f64 },
}

/// A strategy's request to trade, consumed exactly once by the simulator.
///
/// The `id` is assigned by the engine when the intent is routed; strategy
/// constructors leave it at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub id: IntentId,
    pub symbol: String,
    pub side: OrderSide,
    /// Requested quantity, always positive.
    pub quantity: f64,
    pub kind: OrderKind,
    /// Strategy-assigned tag, carried through for diagnostics.
    pub tag: Option<String>,
}

impl OrderIntent {
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: f64) -> Self {
        Self {
            id: IntentId(0),
            symbol: symbol.into(),
            side,
            quantity,
            kind: OrderKind::Market,
            tag: None,
        }
    }

    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: f64,
        limit_price: f64,
    ) -> Self {
        Self {
            id: IntentId(0),
            symbol: symbol.into(),
            side,
            quantity,
            kind: OrderKind::Limit { limit_price },
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}
