//! Backtest engine — the event loop driving feed, strategy, simulator, and
//! ledger.
//!
//! Per step: pull the next event (exhausted stream completes the run),
//! mark-to-market, evaluate resting orders, hand the strategy a fresh
//! read-only view, route its intents in emission order, apply fills in fill
//! order, append a snapshot. Non-fatal outcomes become diagnostics and the
//! loop continues; a feed failure or strategy fault aborts the run while
//! preserving every snapshot recorded so far.
//!
//! The loop is single-threaded and strictly sequential: determinism depends
//! on event ordering and on the strategy observing a consistent view each
//! step. Parallelism belongs across independent runs, never inside one.

pub mod state;

pub use state::{EngineAbort, EngineConfig, EngineState, RunResult, RunStatus};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::domain::{IdGen, MarketEvent, PortfolioSnapshot};
use crate::feed::MarketFeed;
use crate::ledger::{Ledger, LedgerError};
use crate::sim::{ExecutionSim, SubmitOutcome};
use crate::strategy::Strategy;

/// Outcome of one engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// An event was processed; the run can continue.
    Advanced,
    /// The run reached a terminal state (completed or aborted).
    Finished,
}

/// One backtest run's engine. Owns the ledger, simulator, and recorded
/// series; the feed and strategy are borrowed per step so the caller keeps
/// control of the loop (cancellation is simply not calling `step` again —
/// an in-flight step always completes).
pub struct Engine {
    config: EngineConfig,
    ledger: Ledger,
    sim: ExecutionSim,
    id_gen: IdGen,
    snapshots: Vec<PortfolioSnapshot>,
    fills: Vec<crate::domain::Fill>,
    diagnostics: Vec<Diagnostic>,
    state: EngineState,
    abort: Option<EngineAbort>,
    event_count: usize,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let ledger = Ledger::new(config.initial_cash, config.margin_allowed);
        let sim = ExecutionSim::new(config.execution.clone());
        Self {
            config,
            ledger,
            sim,
            id_gen: IdGen::default(),
            snapshots: Vec::new(),
            fills: Vec::new(),
            diagnostics: Vec::new(),
            state: EngineState::Idle,
            abort: None,
            event_count: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn snapshots(&self) -> &[PortfolioSnapshot] {
        &self.snapshots
    }

    /// Process the next event from the feed.
    pub fn step(&mut self, feed: &mut dyn MarketFeed, strategy: &mut dyn Strategy) -> StepStatus {
        if matches!(self.state, EngineState::Completed | EngineState::Aborted) {
            return StepStatus::Finished;
        }
        self.state = EngineState::Running;

        let event = match feed.next_event() {
            Ok(Some(event)) => event,
            Ok(None) => {
                // A trailing lenient-mode drop leaves its warning behind;
                // attach it to the last recorded step.
                self.drain_feed_warnings(feed);
                self.state = EngineState::Completed;
                return StepStatus::Finished;
            }
            Err(err) => {
                self.abort = Some(EngineAbort::DataGap(err));
                self.state = EngineState::Aborted;
                return StepStatus::Finished;
            }
        };

        // Lenient-mode drops recorded by the feed become step diagnostics.
        for warning in feed.drain_warnings() {
            self.diagnostics.push(Diagnostic::at_event(
                &event,
                DiagnosticKind::OutOfOrderEvent,
                warning,
            ));
        }

        self.ledger.mark_to_market(&event);

        let pending = self.sim.evaluate_pending(&event);
        self.absorb(pending, &event);

        let intents = {
            let view = self.ledger.view(self.snapshots.last());
            match strategy.on_event(&event, &view) {
                Ok(intents) => intents,
                Err(fault) => {
                    self.abort = Some(EngineAbort::StrategyFault(fault));
                    self.state = EngineState::Aborted;
                    return StepStatus::Finished;
                }
            }
        };

        for mut intent in intents {
            debug_assert!(intent.quantity > 0.0, "intent quantity must be positive");
            if intent.quantity <= 0.0 {
                continue;
            }
            intent.id = self.id_gen.next_intent_id();
            let outcome = self.sim.submit(intent, &event);
            self.absorb(outcome, &event);
        }

        self.snapshots.push(self.ledger.snapshot(event.timestamp, event.seq));
        self.event_count += 1;
        StepStatus::Advanced
    }

    /// Drive the loop to a terminal state and return the result.
    pub fn run(mut self, feed: &mut dyn MarketFeed, strategy: &mut dyn Strategy) -> RunResult {
        while self.step(feed, strategy) == StepStatus::Advanced {}
        self.into_result()
    }

    /// Consume the engine into its result. Called before the stream is
    /// exhausted (caller-initiated cancellation) this yields the partial
    /// series recorded so far.
    pub fn into_result(self) -> RunResult {
        let final_equity = self
            .snapshots
            .last()
            .map(|s| s.total_equity)
            .unwrap_or(self.config.initial_cash);
        let status = match self.abort {
            Some(abort) => RunStatus::Aborted(abort),
            None => RunStatus::Completed,
        };
        RunResult {
            snapshots: self.snapshots,
            fills: self.fills,
            diagnostics: self.diagnostics,
            status,
            event_count: self.event_count,
            final_equity,
        }
    }

    /// Record feed warnings that arrived without a next event, tied to the
    /// last completed step.
    fn drain_feed_warnings(&mut self, feed: &mut dyn MarketFeed) {
        for warning in feed.drain_warnings() {
            let (seq, timestamp) = match self.snapshots.last() {
                Some(snap) => (snap.seq, snap.timestamp),
                None => (0, chrono::DateTime::UNIX_EPOCH),
            };
            self.diagnostics.push(Diagnostic {
                seq,
                timestamp,
                kind: DiagnosticKind::OutOfOrderEvent,
                message: warning,
            });
        }
    }

    /// Apply fills to the ledger, converting rejections into diagnostics.
    /// A rejected fill is discarded whole; the simulation continues.
    fn absorb(&mut self, outcome: SubmitOutcome, event: &MarketEvent) {
        for fill in outcome.fills {
            match self.ledger.apply(&fill) {
                Ok(()) => self.fills.push(fill),
                Err(err @ LedgerError::InsufficientFunds { .. }) => {
                    self.diagnostics.push(Diagnostic::at_event(
                        event,
                        DiagnosticKind::InsufficientFunds,
                        err.to_string(),
                    ));
                }
            }
        }
        self.diagnostics.extend(outcome.diagnostics);
    }
}

/// Convenience entry point: fresh engine, full run.
pub fn run_backtest(
    config: EngineConfig,
    feed: &mut dyn MarketFeed,
    strategy: &mut dyn Strategy,
) -> RunResult {
    Engine::new(config).run(feed, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{OrderingPolicy, ReplayFeed};
    use crate::sim::FillPolicy;
    use crate::strategy::NullStrategy;
    use chrono::{Duration, TimeZone, Utc};

    fn events(closes: &[f64]) -> Vec<MarketEvent> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| MarketEvent {
                timestamp: base + Duration::days(i as i64),
                seq: 0,
                symbol: "SPY".into(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10_000.0,
            })
            .collect()
    }

    #[test]
    fn flat_run_keeps_equity_constant() {
        let mut feed = ReplayFeed::new(events(&[100.0, 101.0, 102.0]), OrderingPolicy::Strict);
        let result = run_backtest(
            EngineConfig::new(50_000.0, FillPolicy::FillOrKill),
            &mut feed,
            &mut NullStrategy,
        );
        assert!(result.status.is_completed());
        assert_eq!(result.event_count, 3);
        assert_eq!(result.snapshots.len(), 3);
        for snap in &result.snapshots {
            assert_eq!(snap.total_equity, 50_000.0);
            assert_eq!(snap.cash, 50_000.0);
        }
    }

    #[test]
    fn engine_states_progress() {
        let mut feed = ReplayFeed::new(events(&[100.0]), OrderingPolicy::Strict);
        let mut strategy = NullStrategy;
        let mut engine = Engine::new(EngineConfig::new(1_000.0, FillPolicy::FillOrKill));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.step(&mut feed, &mut strategy), StepStatus::Advanced);
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.step(&mut feed, &mut strategy), StepStatus::Finished);
        assert_eq!(engine.state(), EngineState::Completed);
        // Terminal state is sticky.
        assert_eq!(engine.step(&mut feed, &mut strategy), StepStatus::Finished);
    }

    #[test]
    fn cancellation_yields_partial_series() {
        let mut feed = ReplayFeed::new(events(&[100.0, 101.0, 102.0]), OrderingPolicy::Strict);
        let mut strategy = NullStrategy;
        let mut engine = Engine::new(EngineConfig::new(1_000.0, FillPolicy::FillOrKill));
        engine.step(&mut feed, &mut strategy);
        engine.step(&mut feed, &mut strategy);
        // Caller stops here; the two completed steps are preserved.
        let result = engine.into_result();
        assert_eq!(result.snapshots.len(), 2);
        assert!(result.status.is_completed());
    }

    #[test]
    fn snapshot_seq_matches_event_order() {
        let mut feed = ReplayFeed::new(events(&[100.0, 101.0]), OrderingPolicy::Strict);
        let result = run_backtest(
            EngineConfig::new(1_000.0, FillPolicy::FillOrKill),
            &mut feed,
            &mut NullStrategy,
        );
        let seqs: Vec<u64> = result.snapshots.iter().map(|s| s.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
    }
}
