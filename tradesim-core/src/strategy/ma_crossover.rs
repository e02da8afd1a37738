//! Moving-average crossover — short MA crossing the long MA.
//!
//! Demonstrates strategy-owned state across calls: the close-price buffer
//! lives inside the strategy, never in the engine.

use super::{PortfolioView, Strategy, StrategyError};
use crate::domain::{MarketEvent, OrderIntent, OrderSide};
use std::collections::VecDeque;

/// Long entry when the short MA crosses above the long MA, exit on the
/// cross back down. Long-only.
#[derive(Debug)]
pub struct MaCrossover {
    symbol: String,
    short_period: usize,
    long_period: usize,
    /// Fraction of available cash to deploy per entry.
    allocation: f64,
    closes: VecDeque<f64>,
    prev_diff: Option<f64>,
}

impl MaCrossover {
    /// `short_period` must be strictly less than `long_period`.
    pub fn new(
        symbol: impl Into<String>,
        short_period: usize,
        long_period: usize,
        allocation: f64,
    ) -> Self {
        debug_assert!(short_period > 0 && short_period < long_period);
        Self {
            symbol: symbol.into(),
            short_period,
            long_period,
            allocation,
            closes: VecDeque::with_capacity(long_period + 1),
            prev_diff: None,
        }
    }

    fn mean_of_last(&self, n: usize) -> f64 {
        self.closes.iter().rev().take(n).sum::<f64>() / n as f64
    }
}

impl Strategy for MaCrossover {
    fn on_event(
        &mut self,
        event: &MarketEvent,
        view: &PortfolioView<'_>,
    ) -> Result<Vec<OrderIntent>, StrategyError> {
        if event.symbol != self.symbol {
            return Ok(Vec::new());
        }

        self.closes.push_back(event.close);
        if self.closes.len() > self.long_period {
            self.closes.pop_front();
        }
        if self.closes.len() < self.long_period {
            return Ok(Vec::new());
        }

        let diff = self.mean_of_last(self.short_period) - self.mean_of_last(self.long_period);
        let prev = self.prev_diff.replace(diff);

        let mut intents = Vec::new();
        match prev {
            Some(prev) if prev <= 0.0 && diff > 0.0 => {
                if !view.has_position(&self.symbol) && event.close > 0.0 {
                    let quantity = (view.cash * self.allocation / event.close).floor();
                    if quantity >= 1.0 {
                        intents.push(
                            OrderIntent::market(&self.symbol, OrderSide::Buy, quantity)
                                .with_tag("ma-entry"),
                        );
                    }
                }
            }
            Some(prev) if prev >= 0.0 && diff < 0.0 => {
                if let Some(pos) = view.position(&self.symbol) {
                    if pos.is_long() {
                        intents.push(
                            OrderIntent::market(&self.symbol, OrderSide::Sell, pos.quantity)
                                .with_tag("ma-exit"),
                        );
                    }
                }
            }
            _ => {}
        }
        Ok(intents)
    }
}
