//! # HTLC Escrow Test Suite
//!
//! Unified test crate exercising the engine through its public API only.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs     # Engine wiring shared by the suites
//!     ├── lifecycle.rs    # Lock / claim / refund end to end
//!     ├── replication.rs  # Paired instances, authorities, replay policy
//!     └── concurrency.rs  # Per-id serialization under contention
//!
//! tests/benches/
//! └── escrow_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p htlc-tests
//! cargo test -p htlc-tests integration::concurrency::
//! cargo bench -p htlc-tests
//! ```

#![allow(dead_code)]

pub mod integration;
