//! Domain types for TradeSim.

pub mod event;
pub mod fill;
pub mod ids;
pub mod order;
pub mod position;
pub mod snapshot;

pub use event::MarketEvent;
pub use fill::Fill;
pub use ids::{IdGen, IntentId};
pub use order::{OrderIntent, OrderKind, OrderSide};
pub use position::Position;
pub use snapshot::PortfolioSnapshot;

/// Symbol type alias
pub type Symbol = String;
