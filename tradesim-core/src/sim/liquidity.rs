//! Liquidity cap — participation limit against event volume.

use serde::{Deserialize, Serialize};

/// Caps a fill to a fraction of the triggering event's volume.
///
/// What happens to the unfilled remainder is decided by the simulator's
/// fill policy (fill-or-kill vs carry-forward), not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityCap {
    /// Maximum participation rate, fraction of event volume (0.0 to 1.0).
    pub max_participation: f64,
}

impl LiquidityCap {
    pub fn new(max_participation: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&max_participation),
            "participation rate must be 0.0 to 1.0"
        );
        Self { max_participation }
    }

    /// Split a desired quantity into `(fillable, remainder)`.
    pub fn constrain(&self, desired: f64, event_volume: f64) -> (f64, f64) {
        let max_qty = event_volume * self.max_participation;
        if desired <= max_qty {
            (desired, 0.0)
        } else {
            (max_qty, desired - max_qty)
        }
    }
}
