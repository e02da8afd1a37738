//! Serializable backtest run configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradesim_core::feed::OrderingPolicy;
use tradesim_core::sim::ExecutionConfig;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid parameter: {0}")]
    InvalidParams(String),
}

/// Serializable configuration for a single backtest run.
///
/// Captures everything needed to reproduce the run except the event stream
/// itself: the symbol, capital, ordering policy, strategy parameters, and
/// execution model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub symbol: String,
    pub initial_cash: f64,
    #[serde(default)]
    pub margin_allowed: bool,
    pub ordering: OrderingPolicy,
    pub strategy: StrategyConfig,
    pub execution: ExecutionConfig,
}

impl RunConfig {
    /// Deterministic content hash of this configuration.
    ///
    /// Two identical configs share a RunId, so results can be cached or
    /// deduplicated by ID.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parameter sanity checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_cash > 0.0) {
            return Err(ConfigError::InvalidParams(format!(
                "initial_cash must be positive, got {}",
                self.initial_cash
            )));
        }
        self.strategy.validate()
    }
}

/// Strategy selection and parameters (serializable enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyConfig {
    /// Deploy a cash fraction into the symbol on the first event, then hold.
    BuyAndHold { allocation: f64 },

    /// Short MA crossing the long MA, long-only.
    MaCrossover {
        short_period: usize,
        long_period: usize,
        allocation: f64,
    },

    /// Emits no intents; useful for feed and accounting checks.
    Null,
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            StrategyConfig::BuyAndHold { allocation } => validate_allocation(*allocation),
            StrategyConfig::MaCrossover {
                short_period,
                long_period,
                allocation,
            } => {
                if *short_period == 0 || short_period >= long_period {
                    return Err(ConfigError::InvalidParams(format!(
                        "ma_crossover requires 0 < short_period < long_period, \
                         got {short_period}/{long_period}"
                    )));
                }
                validate_allocation(*allocation)
            }
            StrategyConfig::Null => Ok(()),
        }
    }
}

fn validate_allocation(allocation: f64) -> Result<(), ConfigError> {
    if allocation > 0.0 && allocation <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParams(format!(
            "allocation must be in (0, 1], got {allocation}"
        )))
    }
}
