//! Parameter sweeps — grid generation and parallel execution.
//!
//! Each run owns its feed, engine, and ledger, so a sweep is embarrassingly
//! parallel: runs are farmed out with rayon and results are returned in grid
//! order regardless of completion order.

use anyhow::{Context, Result};
use rayon::prelude::*;

use tradesim_core::domain::MarketEvent;

use crate::config::{RunConfig, StrategyConfig};
use crate::runner::{execute_run, BacktestSummary};

/// Grid of MA crossover parameters to sweep over.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub short_periods: Vec<usize>,
    pub long_periods: Vec<usize>,
    pub allocations: Vec<f64>,
}

impl ParamGrid {
    pub fn ma_crossover_default() -> Self {
        Self {
            short_periods: vec![10, 20, 30],
            long_periods: vec![50, 100, 200],
            allocations: vec![0.9],
        }
    }

    /// Upper bound on grid size; invalid (short >= long) pairs are skipped
    /// at generation time.
    pub fn size(&self) -> usize {
        self.short_periods.len() * self.long_periods.len() * self.allocations.len()
    }

    /// All valid configurations, varying only the strategy parameters of
    /// `base`.
    pub fn generate_configs(&self, base: &RunConfig) -> Vec<RunConfig> {
        let mut configs = Vec::new();
        for &short in &self.short_periods {
            for &long in &self.long_periods {
                if short >= long {
                    continue;
                }
                for &allocation in &self.allocations {
                    let mut config = base.clone();
                    config.strategy = StrategyConfig::MaCrossover {
                        short_period: short,
                        long_period: long,
                        allocation,
                    };
                    configs.push(config);
                }
            }
        }
        configs
    }
}

/// Execute every config against the same event series, in parallel.
///
/// Results come back in config order. Any config or run failure fails the
/// whole batch; partial sweeps are not useful for comparison.
pub fn run_batch(configs: &[RunConfig], events: &[MarketEvent]) -> Result<Vec<BacktestSummary>> {
    configs
        .par_iter()
        .map(|config| {
            execute_run(config, events.to_vec())
                .with_context(|| format!("run {} failed", config.run_id()))
        })
        .collect()
}

/// Generate the grid from `base` and run it.
pub fn run_grid(
    grid: &ParamGrid,
    base: &RunConfig,
    events: &[MarketEvent],
) -> Result<Vec<BacktestSummary>> {
    run_batch(&grid.generate_configs(base), events)
}
