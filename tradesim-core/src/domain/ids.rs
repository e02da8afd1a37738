use serde::{Deserialize, Serialize};
use std::fmt;

/// Order intent ID, unique within a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId(pub u64);

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic ID allocator, owned per run — no process-wide state.
#[derive(Debug, Default)]
pub struct IdGen {
    next_intent: u64,
}

impl IdGen {
    pub fn next_intent_id(&mut self) -> IntentId {
        self.next_intent += 1;
        IntentId(self.next_intent)
    }
}
