//! Execution simulator — turns order intents into fills against synthetic
//! liquidity.
//!
//! Market intents fill immediately at the triggering event's close plus
//! slippage, capped by the participation limit. Limit intents rest in an
//! insertion-ordered arena and are evaluated against each subsequent event's
//! range until filled, expired, or cancelled. An unfillable intent is a
//! reportable outcome (empty fill set plus a diagnostic), never a crash.

pub mod fees;
pub mod liquidity;
pub mod slippage;

pub use fees::FeeModel;
pub use liquidity::LiquidityCap;
pub use slippage::SlippageModel;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::domain::{Fill, IntentId, MarketEvent, OrderIntent, OrderKind, OrderSide};
use serde::{Deserialize, Serialize};

/// What happens to quantity the liquidity cap leaves unfilled.
///
/// This is a required configuration choice — there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Drop the remainder immediately.
    FillOrKill,
    /// Queue the remainder against subsequent events.
    CarryForward,
}

/// How long a resting order remains eligible before expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Eligible for the next `n` events of its symbol, then expired.
    Bars(u32),
    /// Rests until filled or cancelled.
    None,
}

/// Execution simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub fill_policy: FillPolicy,
    pub slippage: SlippageModel,
    pub fees: FeeModel,
    pub liquidity: Option<LiquidityCap>,
    pub time_in_force: TimeInForce,
}

impl ExecutionConfig {
    /// Frictionless baseline: no slippage, no fees, no liquidity cap.
    /// The fill policy must still be chosen explicitly.
    pub fn new(fill_policy: FillPolicy) -> Self {
        Self {
            fill_policy,
            slippage: SlippageModel::none(),
            fees: FeeModel::none(),
            liquidity: None,
            time_in_force: TimeInForce::None,
        }
    }

    pub fn with_slippage(mut self, slippage: SlippageModel) -> Self {
        self.slippage = slippage;
        self
    }

    pub fn with_fees(mut self, fees: FeeModel) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_liquidity(mut self, cap: LiquidityCap) -> Self {
        self.liquidity = Some(cap);
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }
}

/// Fills and diagnostics produced by one simulator call.
#[derive(Debug, Default)]
pub struct SubmitOutcome {
    pub fills: Vec<Fill>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A resting order: a limit waiting for its price, or a carried market
/// remainder waiting for volume.
#[derive(Debug, Clone)]
struct PendingOrder {
    intent: OrderIntent,
    remaining: f64,
    /// Events of this symbol seen since submission (time-in-force counter).
    events_seen: u32,
}

/// The execution simulator. Owns the pending-order arena; all portfolio
/// state lives in the ledger.
pub struct ExecutionSim {
    config: ExecutionConfig,
    /// Insertion-ordered arena; scan order is deterministic by submission.
    pending: Vec<PendingOrder>,
}

impl ExecutionSim {
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// IDs of all resting orders, in submission order.
    pub fn open_intents(&self) -> Vec<IntentId> {
        self.pending.iter().map(|p| p.intent.id).collect()
    }

    /// Remove a resting order. Returns false if the ID is not resting.
    pub fn cancel(&mut self, id: IntentId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.intent.id != id);
        self.pending.len() != before
    }

    /// Submit an intent against the current event.
    ///
    /// Market intents fill immediately; limit intents rest and are only
    /// evaluated from the next event onward.
    pub fn submit(&mut self, intent: OrderIntent, event: &MarketEvent) -> SubmitOutcome {
        let mut out = SubmitOutcome::default();
        match intent.kind {
            OrderKind::Market => {
                let remaining = intent.quantity;
                self.execute_market(intent, remaining, event, &mut out);
            }
            OrderKind::Limit { .. } => {
                self.pending.push(PendingOrder {
                    remaining: intent.quantity,
                    intent,
                    events_seen: 0,
                });
            }
        }
        out
    }

    /// Evaluate all resting orders against a new event, in submission order.
    pub fn evaluate_pending(&mut self, event: &MarketEvent) -> SubmitOutcome {
        let mut out = SubmitOutcome::default();
        let mut keep = Vec::with_capacity(self.pending.len());

        for mut pending in std::mem::take(&mut self.pending) {
            if pending.intent.symbol != event.symbol {
                keep.push(pending);
                continue;
            }

            if let TimeInForce::Bars(n) = self.config.time_in_force {
                if pending.events_seen >= n {
                    out.diagnostics.push(Diagnostic::at_event(
                        event,
                        DiagnosticKind::OrderExpired,
                        format!(
                            "intent {} expired after {} events with {} unfilled",
                            pending.intent.id, pending.events_seen, pending.remaining
                        ),
                    ));
                    continue;
                }
            }
            pending.events_seen += 1;

            match pending.intent.kind {
                OrderKind::Market => {
                    // Carried remainder: fills at this event's close.
                    if let Some(rest) = self.fill_carried(pending, event, &mut out) {
                        keep.push(rest);
                    }
                }
                OrderKind::Limit { limit_price } => {
                    if let Some(rest) = self.fill_limit(pending, limit_price, event, &mut out) {
                        keep.push(rest);
                    }
                }
            }
        }

        self.pending = keep;
        out
    }

    /// Immediate market execution. Remainder handling follows the fill policy.
    fn execute_market(
        &mut self,
        intent: OrderIntent,
        remaining: f64,
        event: &MarketEvent,
        out: &mut SubmitOutcome,
    ) {
        let (qty, leftover) = self.constrain(remaining, event.volume);
        if qty <= 0.0 {
            out.diagnostics.push(Diagnostic::at_event(
                event,
                DiagnosticKind::InsufficientLiquidity,
                format!(
                    "no fillable liquidity for intent {} ({} {:?} {})",
                    intent.id, intent.symbol, intent.side, remaining
                ),
            ));
            if self.config.fill_policy == FillPolicy::CarryForward {
                self.pending.push(PendingOrder {
                    intent,
                    remaining,
                    events_seen: 0,
                });
            }
            return;
        }

        let price = self
            .config
            .slippage
            .apply(event.close, intent.side, qty, event.volume);
        out.fills.push(self.make_fill(&intent, price, qty, event));

        if leftover > 0.0 {
            match self.config.fill_policy {
                FillPolicy::CarryForward => self.pending.push(PendingOrder {
                    intent,
                    remaining: leftover,
                    events_seen: 0,
                }),
                FillPolicy::FillOrKill => out.diagnostics.push(Diagnostic::at_event(
                    event,
                    DiagnosticKind::UnfilledRemainder,
                    format!(
                        "dropped remainder {leftover} of intent {} under fill-or-kill",
                        intent.id
                    ),
                )),
            }
        }
    }

    /// One evaluation of a carried market remainder. Returns the order if it
    /// should keep resting.
    fn fill_carried(
        &self,
        mut pending: PendingOrder,
        event: &MarketEvent,
        out: &mut SubmitOutcome,
    ) -> Option<PendingOrder> {
        let (qty, leftover) = self.constrain(pending.remaining, event.volume);
        if qty <= 0.0 {
            out.diagnostics.push(Diagnostic::at_event(
                event,
                DiagnosticKind::InsufficientLiquidity,
                format!("carried intent {} found no liquidity", pending.intent.id),
            ));
            return Some(pending);
        }
        let price =
            self.config
                .slippage
                .apply(event.close, pending.intent.side, qty, event.volume);
        out.fills
            .push(self.make_fill(&pending.intent, price, qty, event));
        if leftover > 0.0 {
            pending.remaining = leftover;
            Some(pending)
        } else {
            None
        }
    }

    /// One evaluation of a resting limit order. Conservative execution: the
    /// fill price is exactly the limit price, never better, and slippage does
    /// not apply. Returns the order if it should keep resting.
    fn fill_limit(
        &self,
        mut pending: PendingOrder,
        limit_price: f64,
        event: &MarketEvent,
        out: &mut SubmitOutcome,
    ) -> Option<PendingOrder> {
        let crosses = match pending.intent.side {
            OrderSide::Buy => event.low <= limit_price,
            OrderSide::Sell => event.high >= limit_price,
        };
        if !crosses {
            return Some(pending);
        }

        let (qty, leftover) = self.constrain(pending.remaining, event.volume);
        if qty <= 0.0 {
            out.diagnostics.push(Diagnostic::at_event(
                event,
                DiagnosticKind::InsufficientLiquidity,
                format!("limit intent {} crossed but found no liquidity", pending.intent.id),
            ));
            return match self.config.fill_policy {
                FillPolicy::CarryForward => Some(pending),
                FillPolicy::FillOrKill => None,
            };
        }

        out.fills
            .push(self.make_fill(&pending.intent, limit_price, qty, event));

        if leftover > 0.0 {
            match self.config.fill_policy {
                FillPolicy::CarryForward => {
                    pending.remaining = leftover;
                    Some(pending)
                }
                FillPolicy::FillOrKill => {
                    out.diagnostics.push(Diagnostic::at_event(
                        event,
                        DiagnosticKind::UnfilledRemainder,
                        format!(
                            "dropped remainder {leftover} of limit intent {} under fill-or-kill",
                            pending.intent.id
                        ),
                    ));
                    None
                }
            }
        } else {
            None
        }
    }

    fn make_fill(&self, intent: &OrderIntent, price: f64, qty: f64, event: &MarketEvent) -> Fill {
        Fill {
            intent_id: intent.id,
            symbol: intent.symbol.clone(),
            side: intent.side,
            price,
            quantity: qty,
            requested: intent.quantity,
            fees: self.config.fees.compute(price, qty),
            timestamp: event.timestamp,
        }
    }

    fn constrain(&self, desired: f64, volume: f64) -> (f64, f64) {
        match &self.config.liquidity {
            Some(cap) => cap.constrain(desired, volume),
            None => (desired, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(day: u32, close: f64, high: f64, low: f64, volume: f64) -> MarketEvent {
        MarketEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            seq: day as u64,
            symbol: "SPY".into(),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    fn sim(config: ExecutionConfig) -> ExecutionSim {
        ExecutionSim::new(config)
    }

    #[test]
    fn market_intent_fills_at_close() {
        let mut sim = sim(ExecutionConfig::new(FillPolicy::FillOrKill));
        let ev = event(2, 100.0, 101.0, 99.0, 10_000.0);
        let intent = OrderIntent::market("SPY", OrderSide::Buy, 10.0);
        let out = sim.submit(intent, &ev);
        assert_eq!(out.fills.len(), 1);
        assert_eq!(out.fills[0].price, 100.0);
        assert_eq!(out.fills[0].quantity, 10.0);
        assert_eq!(out.fills[0].timestamp, ev.timestamp);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn limit_intent_does_not_fill_on_submission() {
        let mut sim = sim(ExecutionConfig::new(FillPolicy::FillOrKill));
        let ev = event(2, 100.0, 106.0, 99.0, 10_000.0);
        // Sell limit at 105: even though this event's high crosses it, the
        // order only becomes eligible from the next event.
        let out = sim.submit(OrderIntent::limit("SPY", OrderSide::Sell, 5.0, 105.0), &ev);
        assert!(out.fills.is_empty());
        assert_eq!(sim.open_intents().len(), 1);
    }

    #[test]
    fn limit_sell_fills_at_exactly_the_limit() {
        let mut sim = sim(ExecutionConfig::new(FillPolicy::FillOrKill));
        sim.submit(
            OrderIntent::limit("SPY", OrderSide::Sell, 5.0, 105.0),
            &event(2, 100.0, 101.0, 99.0, 10_000.0),
        );
        let out = sim.evaluate_pending(&event(3, 104.0, 106.0, 102.0, 10_000.0));
        assert_eq!(out.fills.len(), 1);
        assert_eq!(out.fills[0].price, 105.0); // not 106
        assert!(sim.open_intents().is_empty());
    }

    #[test]
    fn limit_buy_waits_for_its_price() {
        let mut sim = sim(ExecutionConfig::new(FillPolicy::FillOrKill));
        sim.submit(
            OrderIntent::limit("SPY", OrderSide::Buy, 5.0, 95.0),
            &event(2, 100.0, 101.0, 99.0, 10_000.0),
        );
        // Low never reaches 95.
        let out = sim.evaluate_pending(&event(3, 100.0, 102.0, 96.0, 10_000.0));
        assert!(out.fills.is_empty());
        assert_eq!(sim.open_intents().len(), 1);
        // Now it does.
        let out = sim.evaluate_pending(&event(4, 96.0, 100.0, 94.0, 10_000.0));
        assert_eq!(out.fills.len(), 1);
        assert_eq!(out.fills[0].price, 95.0);
    }

    #[test]
    fn fill_or_kill_drops_capped_remainder() {
        let config = ExecutionConfig::new(FillPolicy::FillOrKill)
            .with_liquidity(LiquidityCap::new(0.10));
        let mut sim = sim(config);
        // Cap = 10% of 1000 = 100 shares; request 250.
        let out = sim.submit(
            OrderIntent::market("SPY", OrderSide::Buy, 250.0),
            &event(2, 100.0, 101.0, 99.0, 1_000.0),
        );
        assert_eq!(out.fills.len(), 1);
        assert_eq!(out.fills[0].quantity, 100.0);
        assert_eq!(out.fills[0].requested, 250.0);
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnfilledRemainder));
        assert!(sim.open_intents().is_empty());
    }

    #[test]
    fn carry_forward_queues_capped_remainder() {
        let config = ExecutionConfig::new(FillPolicy::CarryForward)
            .with_liquidity(LiquidityCap::new(0.10));
        let mut sim = sim(config);
        let out = sim.submit(
            OrderIntent::market("SPY", OrderSide::Buy, 250.0),
            &event(2, 100.0, 101.0, 99.0, 1_000.0),
        );
        assert_eq!(out.fills[0].quantity, 100.0);
        assert_eq!(sim.open_intents().len(), 1);

        // Next event has enough volume for the rest.
        let out = sim.evaluate_pending(&event(3, 102.0, 103.0, 101.0, 10_000.0));
        assert_eq!(out.fills.len(), 1);
        assert_eq!(out.fills[0].quantity, 150.0);
        assert_eq!(out.fills[0].price, 102.0); // next event's close
        assert!(sim.open_intents().is_empty());
    }

    #[test]
    fn zero_liquidity_is_reported_not_fatal() {
        let config = ExecutionConfig::new(FillPolicy::FillOrKill)
            .with_liquidity(LiquidityCap::new(0.10));
        let mut sim = sim(config);
        let out = sim.submit(
            OrderIntent::market("SPY", OrderSide::Buy, 10.0),
            &event(2, 100.0, 101.0, 99.0, 0.0),
        );
        assert!(out.fills.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::InsufficientLiquidity);
    }

    #[test]
    fn time_in_force_expires_resting_orders() {
        let config = ExecutionConfig::new(FillPolicy::FillOrKill)
            .with_time_in_force(TimeInForce::Bars(1));
        let mut sim = sim(config);
        sim.submit(
            OrderIntent::limit("SPY", OrderSide::Buy, 5.0, 90.0),
            &event(2, 100.0, 101.0, 99.0, 10_000.0),
        );
        // First event after submission: eligible but does not cross.
        let out = sim.evaluate_pending(&event(3, 100.0, 101.0, 99.0, 10_000.0));
        assert!(out.fills.is_empty());
        assert!(out.diagnostics.is_empty());
        // Second event: expired before evaluation.
        let out = sim.evaluate_pending(&event(4, 89.0, 91.0, 88.0, 10_000.0));
        assert!(out.fills.is_empty());
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::OrderExpired);
        assert!(sim.open_intents().is_empty());
    }

    #[test]
    fn cancel_removes_resting_order() {
        let mut sim = sim(ExecutionConfig::new(FillPolicy::FillOrKill));
        let mut intent = OrderIntent::limit("SPY", OrderSide::Buy, 5.0, 90.0);
        intent.id = IntentId(7);
        sim.submit(intent, &event(2, 100.0, 101.0, 99.0, 10_000.0));
        assert!(sim.cancel(IntentId(7)));
        assert!(!sim.cancel(IntentId(7)));
        let out = sim.evaluate_pending(&event(3, 89.0, 91.0, 88.0, 10_000.0));
        assert!(out.fills.is_empty());
    }

    #[test]
    fn pending_orders_ignore_other_symbols() {
        let mut sim = sim(ExecutionConfig::new(FillPolicy::FillOrKill));
        sim.submit(
            OrderIntent::limit("SPY", OrderSide::Buy, 5.0, 95.0),
            &event(2, 100.0, 101.0, 99.0, 10_000.0),
        );
        let mut other = event(3, 90.0, 92.0, 88.0, 10_000.0);
        other.symbol = "QQQ".into();
        let out = sim.evaluate_pending(&other);
        assert!(out.fills.is_empty());
        assert_eq!(sim.open_intents().len(), 1);
    }

    #[test]
    fn fees_are_attached_to_fills() {
        let config = ExecutionConfig::new(FillPolicy::FillOrKill)
            .with_fees(FeeModel::PerShare { amount: 0.01 });
        let mut sim = sim(config);
        let out = sim.submit(
            OrderIntent::market("SPY", OrderSide::Sell, 100.0),
            &event(2, 100.0, 101.0, 99.0, 10_000.0),
        );
        assert!((out.fills[0].fees - 1.0).abs() < 1e-10);
    }
}
