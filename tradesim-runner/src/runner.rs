//! Single-run orchestration: config to strategy to engine to summary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradesim_core::domain::MarketEvent;
use tradesim_core::engine::{run_backtest, EngineConfig, RunResult};
use tradesim_core::feed::ReplayFeed;
use tradesim_core::fingerprint::snapshot_fingerprint;
use tradesim_core::strategy::{BuyAndHold, MaCrossover, NullStrategy, Strategy};

use crate::config::{ConfigError, RunConfig, RunId};

/// Schema version for persisted run artifacts.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// A finished run plus the identity needed to reproduce or deduplicate it.
#[derive(Debug)]
pub struct BacktestSummary {
    pub run_id: RunId,
    pub config: RunConfig,
    /// Content hash of the snapshot series; equal hashes mean bit-for-bit
    /// identical runs.
    pub fingerprint: String,
    pub result: RunResult,
}

impl BacktestSummary {
    pub fn manifest(&self) -> RunManifest {
        RunManifest {
            schema_version: SCHEMA_VERSION,
            run_id: self.run_id.clone(),
            fingerprint: self.fingerprint.clone(),
            completed: self.result.status.is_completed(),
            event_count: self.result.event_count,
            fill_count: self.result.fills.len(),
            final_equity: self.result.final_equity,
            diagnostics: self
                .result
                .diagnostics
                .iter()
                .map(|d| d.message.clone())
                .collect(),
        }
    }
}

/// Serializable header of a run, written alongside the CSV artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub run_id: RunId,
    pub fingerprint: String,
    pub completed: bool,
    pub event_count: usize,
    pub fill_count: usize,
    pub final_equity: f64,
    pub diagnostics: Vec<String>,
}

/// Build the configured strategy, validating its parameters first.
pub fn build_strategy(config: &RunConfig) -> Result<Box<dyn Strategy>, RunError> {
    config.validate()?;
    Ok(match &config.strategy {
        crate::config::StrategyConfig::BuyAndHold { allocation } => {
            Box::new(BuyAndHold::new(&config.symbol, *allocation))
        }
        crate::config::StrategyConfig::MaCrossover {
            short_period,
            long_period,
            allocation,
        } => Box::new(MaCrossover::new(
            &config.symbol,
            *short_period,
            *long_period,
            *allocation,
        )),
        crate::config::StrategyConfig::Null => Box::new(NullStrategy),
    })
}

/// Run a backtest over a pre-loaded event stream.
///
/// The stream is owned because the replay feed assigns sequence numbers at
/// ingestion; callers running sweeps clone the shared series per run.
pub fn execute_run(
    config: &RunConfig,
    events: Vec<MarketEvent>,
) -> Result<BacktestSummary, RunError> {
    let mut strategy = build_strategy(config)?;
    let mut feed = ReplayFeed::new(events, config.ordering);

    let engine_config = EngineConfig::with_execution(config.initial_cash, config.execution.clone())
        .with_margin(config.margin_allowed);
    let result = run_backtest(engine_config, &mut feed, strategy.as_mut());

    Ok(BacktestSummary {
        run_id: config.run_id(),
        config: config.clone(),
        fingerprint: snapshot_fingerprint(&result.snapshots),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyConfig;
    use tradesim_core::feed::{synthetic, OrderingPolicy};
    use tradesim_core::sim::{ExecutionConfig, FillPolicy};

    fn config(strategy: StrategyConfig) -> RunConfig {
        RunConfig {
            symbol: "SPY".into(),
            initial_cash: 100_000.0,
            margin_allowed: false,
            ordering: OrderingPolicy::Strict,
            strategy,
            execution: ExecutionConfig::new(FillPolicy::FillOrKill),
        }
    }

    #[test]
    fn buy_and_hold_run_completes() {
        let events = synthetic::random_walk("SPY", 100, 11);
        let summary =
            execute_run(&config(StrategyConfig::BuyAndHold { allocation: 0.5 }), events).unwrap();
        assert!(summary.result.status.is_completed());
        assert_eq!(summary.result.event_count, 100);
        assert_eq!(summary.result.fills.len(), 1);
    }

    #[test]
    fn invalid_strategy_params_fail_before_running() {
        let events = synthetic::random_walk("SPY", 10, 11);
        let bad = config(StrategyConfig::MaCrossover {
            short_period: 50,
            long_period: 10,
            allocation: 0.9,
        });
        assert!(matches!(
            execute_run(&bad, events),
            Err(RunError::Config(ConfigError::InvalidParams(_)))
        ));
    }

    #[test]
    fn manifest_reflects_run() {
        let events = synthetic::random_walk("SPY", 50, 3);
        let summary = execute_run(&config(StrategyConfig::Null), events).unwrap();
        let manifest = summary.manifest();
        assert_eq!(manifest.schema_version, SCHEMA_VERSION);
        assert!(manifest.completed);
        assert_eq!(manifest.event_count, 50);
        assert_eq!(manifest.fill_count, 0);
        assert_eq!(manifest.final_equity, 100_000.0);
    }
}
