//! # Adapters Layer (Hexagonal Architecture)
//!
//! Reference implementations of the outbound ports.

mod asset_ledger;
mod clock;
mod event_bus;

pub use asset_ledger::InMemoryAssetLedger;
pub use clock::{ManualClock, SystemClock};
pub use event_bus::{BroadcastEventPublisher, DEFAULT_EVENT_CAPACITY};
