//! TradeSim Core — discrete-event backtesting and execution simulation.
//!
//! This crate contains the heart of the simulation engine:
//! - Domain types (market events, order intents, fills, positions, snapshots)
//! - Time-ordered market feeds with strict/lenient ordering policies
//! - The strategy contract and a read-only portfolio view
//! - Execution simulation with slippage, fee, and liquidity models
//! - The portfolio ledger with exact accounting invariants
//! - The single-threaded event loop and its run lifecycle
//! - Snapshot-series fingerprints for determinism verification
//!
//! A single run is strictly sequential; parallelism is applied only across
//! independent runs, each owning its feed, ledger, and simulator.

pub mod diagnostics;
pub mod domain;
pub mod engine;
pub mod feed;
pub mod fingerprint;
pub mod ledger;
pub mod sim;
pub mod strategy;
