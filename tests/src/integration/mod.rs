//! # Integration Tests
//!
//! End-to-end flows across the engine, its reference adapters and the event bus.

pub mod fixtures;

mod concurrency;
