//! # HTLC Escrow Engine
//!
//! Hash-timelock escrow for fungible assets held on an external ledger.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A holder locks an amount behind a SHA-256 hash lock and a deadline:
//! - whoever presents the preimage before the deadline claims the funds
//! - once the deadline passes, the holder alone can take them back
//! - escrow ids are a pure function of the lock parameters, so a paired
//!   instance on another ledger derives the same id
//!
//! ## Lifecycle
//!
//! ```text
//!            claim (now < deadline, hash(secret) == hash_lock)
//!   Locked ───────────────────────────────────────────────▶ Claimed
//!      │
//!      └──────────────────────────────────────────────────▶ Refunded
//!            refund (now >= deadline, caller == holder)
//! ```
//!
//! Both terminal states are final and mutually exclusive.
//!
//! ## Module Structure
//!
//! ```text
//! htlc-escrow/
//! ├── domain/          # EscrowRecord, EscrowState, errors, invariants
//! ├── algorithms/      # Hash locks, escrow id derivation
//! ├── ports/           # EscrowApi, AssetLedger, Clock, EscrowEventPublisher
//! ├── adapters/        # In-memory ledger, clocks, broadcast event bus
//! ├── service.rs       # EscrowService
//! ├── events.rs        # EscrowEvent
//! ├── config.rs        # EscrowConfig, LoggingConfig
//! └── telemetry.rs     # tracing-subscriber setup
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;
pub mod telemetry;

// Re-exports
pub use adapters::{BroadcastEventPublisher, InMemoryAssetLedger, ManualClock, SystemClock};
pub use algorithms::{create_hash_lock, derive_escrow_id, generate_random_secret, verify_secret};
pub use config::{ConfigError, EscrowConfig, LoggingConfig};
pub use domain::{
    Address, Amount, EscrowError, EscrowId, EscrowRecord, EscrowResult, EscrowState,
    ExternalRecordParams, Hash, LedgerError, LockParams, RecordOrigin, ReplicationPolicy, Secret,
    SecureSecret, Timestamp,
};
pub use events::EscrowEvent;
pub use ports::{AssetLedger, Clock, EscrowAdminApi, EscrowApi, EscrowEventPublisher};
pub use service::EscrowService;
pub use telemetry::{init_logging, TelemetryError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
