//! TradeSim Runner — orchestration on top of the core engine.
//!
//! The core crate runs one backtest; this crate handles everything around
//! it: serializable run configurations with content-addressed IDs, strategy
//! construction with parameter validation, parallel parameter sweeps, and
//! artifact export (CSV and JSON).

pub mod batch;
pub mod config;
pub mod export;
pub mod runner;
