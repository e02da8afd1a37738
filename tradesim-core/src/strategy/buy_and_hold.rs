//! Buy-and-hold — enter once on the first event, then do nothing.

use super::{PortfolioView, Strategy, StrategyError};
use crate::domain::{MarketEvent, OrderIntent, OrderSide};

/// Buys a cash fraction of its symbol on the first event and holds.
#[derive(Debug)]
pub struct BuyAndHold {
    symbol: String,
    /// Fraction of available cash to deploy (0.0 to 1.0].
    allocation: f64,
    entered: bool,
}

impl BuyAndHold {
    pub fn new(symbol: impl Into<String>, allocation: f64) -> Self {
        Self {
            symbol: symbol.into(),
            allocation,
            entered: false,
        }
    }
}

impl Strategy for BuyAndHold {
    fn on_event(
        &mut self,
        event: &MarketEvent,
        view: &PortfolioView<'_>,
    ) -> Result<Vec<OrderIntent>, StrategyError> {
        if self.entered || event.symbol != self.symbol || event.close <= 0.0 {
            return Ok(Vec::new());
        }
        self.entered = true;

        let quantity = (view.cash * self.allocation / event.close).floor();
        if quantity < 1.0 {
            return Ok(Vec::new());
        }
        Ok(vec![
            OrderIntent::market(&self.symbol, OrderSide::Buy, quantity).with_tag("entry")
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn event(close: f64) -> MarketEvent {
        MarketEvent {
            timestamp: chrono::Utc::now(),
            seq: 0,
            symbol: "SPY".into(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn buys_once_then_holds() {
        let mut strat = BuyAndHold::new("SPY", 1.0);
        let positions = HashMap::new();
        let view = PortfolioView {
            cash: 10_000.0,
            realized_pnl: 0.0,
            positions: &positions,
            last_snapshot: None,
        };
        let intents = strat.on_event(&event(100.0), &view).unwrap();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].quantity, 100.0);
        // Second event: already entered.
        let intents = strat.on_event(&event(101.0), &view).unwrap();
        assert!(intents.is_empty());
    }

    #[test]
    fn ignores_other_symbols() {
        let mut strat = BuyAndHold::new("SPY", 1.0);
        let positions = HashMap::new();
        let view = PortfolioView {
            cash: 10_000.0,
            realized_pnl: 0.0,
            positions: &positions,
            last_snapshot: None,
        };
        let mut ev = event(100.0);
        ev.symbol = "QQQ".into();
        assert!(strat.on_event(&ev, &view).unwrap().is_empty());
    }
}
