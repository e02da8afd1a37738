//! Replay feed — serves a pre-loaded record sequence with ordering checks.

use super::{FeedError, MarketFeed};
use crate::domain::MarketEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the feed reacts to a timestamp regression in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingPolicy {
    /// A regression is a hard error; the run aborts.
    Strict,
    /// Out-of-order records are dropped and a warning is recorded.
    Lenient,
}

/// Feed over an in-memory record vector.
///
/// Assigns arrival sequence numbers at ingestion and enforces timestamp
/// monotonicity: equal timestamps are legal (ordered by arrival), a strict
/// regression is handled per the configured [`OrderingPolicy`]. The cursor
/// only advances — a consumed feed cannot be rewound.
pub struct ReplayFeed {
    records: Vec<MarketEvent>,
    cursor: usize,
    next_seq: u64,
    last_timestamp: Option<DateTime<Utc>>,
    policy: OrderingPolicy,
    warnings: Vec<String>,
}

impl ReplayFeed {
    /// Any `seq` values on the input records are overwritten at ingestion.
    pub fn new(records: Vec<MarketEvent>, policy: OrderingPolicy) -> Self {
        Self {
            records,
            cursor: 0,
            next_seq: 0,
            last_timestamp: None,
            policy,
            warnings: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.records.len() - self.cursor
    }
}

impl MarketFeed for ReplayFeed {
    fn next_event(&mut self) -> Result<Option<MarketEvent>, FeedError> {
        while self.cursor < self.records.len() {
            let mut event = self.records[self.cursor].clone();
            let arrival = self.cursor as u64;
            self.cursor += 1;

            if let Some(last) = self.last_timestamp {
                if event.timestamp < last {
                    match self.policy {
                        OrderingPolicy::Strict => {
                            return Err(FeedError::DataGap {
                                prev: last,
                                current: event.timestamp,
                                arrival,
                            });
                        }
                        OrderingPolicy::Lenient => {
                            self.warnings.push(format!(
                                "dropped out-of-order record for {} at arrival {arrival}: \
                                 {} precedes {}",
                                event.symbol, event.timestamp, last
                            ));
                            continue;
                        }
                    }
                }
            }

            event.seq = self.next_seq;
            self.next_seq += 1;
            self.last_timestamp = Some(event.timestamp);
            return Ok(Some(event));
        }
        Ok(None)
    }

    fn drain_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
