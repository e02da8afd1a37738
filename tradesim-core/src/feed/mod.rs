//! Market event feeds — lazy, finite, time-ordered event sources.
//!
//! The core consumes an abstract feed, not a file format. Provider-specific
//! ingestion adapters live outside this crate and hand the feed an ordered
//! record sequence.

pub mod replay;
pub mod synthetic;

pub use replay::{OrderingPolicy, ReplayFeed};

use crate::domain::MarketEvent;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors a feed can surface to the engine.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// The underlying source reported time moving backward.
    #[error("data gap: timestamp regression from {prev} to {current} (arrival {arrival})")]
    DataGap {
        prev: DateTime<Utc>,
        current: DateTime<Utc>,
        /// Arrival index of the offending record within the source.
        arrival: u64,
    },
    #[error("feed source error: {0}")]
    Source(String),
}

/// A strictly time-ordered, finite event source.
///
/// `next_event` returns `Ok(None)` at end-of-stream. A feed is not
/// restartable: replaying requires constructing a fresh feed bound to the
/// same source.
pub trait MarketFeed {
    fn next_event(&mut self) -> Result<Option<MarketEvent>, FeedError>;

    /// Take any warnings recorded since the last call (lenient-mode drops).
    fn drain_warnings(&mut self) -> Vec<String> {
        Vec::new()
    }
}
