//! Fee models — per-fill transaction costs.

use serde::{Deserialize, Serialize};

/// Configurable fee schedule, applied per fill.
///
/// Fees are always non-negative and always reduce proceeds: buys pay
/// `notional + fees`, sells receive `notional - fees`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeeModel {
    /// Fixed amount per fill.
    Flat { amount: f64 },
    /// Fixed amount per share/unit filled.
    PerShare { amount: f64 },
    /// Fraction of the fill notional (0.001 = 10 bps).
    Percentage { rate: f64 },
}

impl FeeModel {
    pub fn none() -> Self {
        FeeModel::Flat { amount: 0.0 }
    }

    pub fn compute(&self, fill_price: f64, quantity: f64) -> f64 {
        let fee = match *self {
            FeeModel::Flat { amount } => amount,
            FeeModel::PerShare { amount } => amount * quantity,
            FeeModel::Percentage { rate } => rate * fill_price * quantity,
        };
        fee.max(0.0)
    }
}
