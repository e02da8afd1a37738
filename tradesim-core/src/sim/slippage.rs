//! Slippage models — execution price deviation from the reference price.
//!
//! Slippage is directional: buyers pay more, sellers receive less. Limit
//! fills are exempt (they execute at the limit price, never better), so
//! slippage applies only to market executions.

use crate::domain::OrderSide;
use serde::{Deserialize, Serialize};

/// Configurable slippage model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlippageModel {
    /// Fixed cost in basis points of the reference price.
    Fixed { bps: f64 },
    /// Impact scales with the fill's share of the event volume:
    /// `bps = impact_bps * (quantity / volume)`.
    VolumeProportional { impact_bps: f64 },
}

impl SlippageModel {
    pub fn none() -> Self {
        SlippageModel::Fixed { bps: 0.0 }
    }

    /// Adverse-direction execution price for a market fill.
    pub fn apply(&self, reference: f64, side: OrderSide, quantity: f64, volume: f64) -> f64 {
        let fraction = match *self {
            SlippageModel::Fixed { bps } => bps / 10_000.0,
            SlippageModel::VolumeProportional { impact_bps } => {
                let participation = if volume > 0.0 { quantity / volume } else { 1.0 };
                (impact_bps / 10_000.0) * participation
            }
        };
        match side {
            OrderSide::Buy => reference * (1.0 + fraction),
            OrderSide::Sell => reference * (1.0 - fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_slippage_returns_reference() {
        let model = SlippageModel::none();
        assert_eq!(model.apply(100.0, OrderSide::Buy, 50.0, 1_000.0), 100.0);
        assert_eq!(model.apply(100.0, OrderSide::Sell, 50.0, 1_000.0), 100.0);
    }

    #[test]
    fn fixed_bps_is_directional() {
        let model = SlippageModel::Fixed { bps: 10.0 };
        let buy = model.apply(100.0, OrderSide::Buy, 50.0, 1_000.0);
        let sell = model.apply(100.0, OrderSide::Sell, 50.0, 1_000.0);
        assert!((buy - 100.10).abs() < 1e-10);
        assert!((sell - 99.90).abs() < 1e-10);
    }

    #[test]
    fn volume_proportional_scales_with_participation() {
        let model = SlippageModel::VolumeProportional { impact_bps: 100.0 };
        // 10% participation -> 10 bps effective
        let price = model.apply(100.0, OrderSide::Buy, 100.0, 1_000.0);
        assert!((price - 100.10).abs() < 1e-10);
        // 1% participation -> 1 bps effective
        let small = model.apply(100.0, OrderSide::Buy, 10.0, 1_000.0);
        assert!((small - 100.01).abs() < 1e-10);
    }

    #[test]
    fn zero_volume_charges_full_impact() {
        let model = SlippageModel::VolumeProportional { impact_bps: 50.0 };
        let price = model.apply(100.0, OrderSide::Buy, 10.0, 0.0);
        assert!((price - 100.50).abs() < 1e-10);
    }
}
