//! Step diagnostics — reportable, non-fatal outcomes attached to a run.
//!
//! A rejected fill or an unfillable order never crashes the simulation; it is
//! recorded here and the loop continues. Callers inspect the diagnostic list
//! alongside the snapshot series.

use crate::domain::MarketEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What went wrong (recoverably) during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The simulator could not fill any quantity.
    InsufficientLiquidity,
    /// The ledger rejected a fill that would drive cash negative.
    InsufficientFunds,
    /// A partial fill's remainder was dropped under fill-or-kill.
    UnfilledRemainder,
    /// A resting order expired under the configured time-in-force.
    OrderExpired,
    /// The feed dropped an out-of-order record in lenient mode.
    OutOfOrderEvent,
}

/// One recorded diagnostic, tied to the event step that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn at_event(event: &MarketEvent, kind: DiagnosticKind, message: String) -> Self {
        Self {
            seq: event.seq,
            timestamp: event.timestamp,
            kind,
            message,
        }
    }
}
