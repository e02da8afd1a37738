//! Engine configuration, lifecycle states, and run result types.

use crate::diagnostics::Diagnostic;
use crate::domain::{Fill, PortfolioSnapshot};
use crate::feed::FeedError;
use crate::sim::{ExecutionConfig, FillPolicy};
use crate::strategy::StrategyError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_cash: f64,
    /// When false, a fill that would drive cash negative is rejected.
    pub margin_allowed: bool,
    pub execution: ExecutionConfig,
}

impl EngineConfig {
    /// No margin, frictionless execution. The fill policy has no default
    /// and must be chosen by the caller.
    pub fn new(initial_cash: f64, fill_policy: FillPolicy) -> Self {
        Self {
            initial_cash,
            margin_allowed: false,
            execution: ExecutionConfig::new(fill_policy),
        }
    }

    pub fn with_execution(initial_cash: f64, execution: ExecutionConfig) -> Self {
        Self {
            initial_cash,
            margin_allowed: false,
            execution,
        }
    }

    pub fn with_margin(mut self, margin_allowed: bool) -> Self {
        self.margin_allowed = margin_allowed;
        self
    }
}

/// Engine lifecycle. `Idle` until the first step; terminal states are
/// `Completed` (stream exhausted) and `Aborted` (fatal error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Fatal cause that ended a run early. Snapshots recorded before the abort
/// are preserved for partial analysis.
#[derive(Debug, Clone, Error)]
pub enum EngineAbort {
    #[error("feed failure: {0}")]
    DataGap(#[from] FeedError),
    #[error(transparent)]
    StrategyFault(#[from] StrategyError),
}

/// Terminal tag of a run. Callers must be able to distinguish a complete
/// snapshot series from a partial one.
#[derive(Debug, Clone)]
pub enum RunStatus {
    Completed,
    Aborted(EngineAbort),
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

/// Everything a finished (or aborted) run produced.
#[derive(Debug)]
pub struct RunResult {
    /// One snapshot per processed event, ordered by timestamp.
    pub snapshots: Vec<PortfolioSnapshot>,
    /// All fills applied to the ledger, in application order.
    pub fills: Vec<Fill>,
    /// Non-fatal outcomes recorded along the way.
    pub diagnostics: Vec<Diagnostic>,
    pub status: RunStatus,
    pub event_count: usize,
    pub final_equity: f64,
}
