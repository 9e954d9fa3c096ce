//! # Algorithms Module
//!
//! Pure functions used by the escrow engine: hash-lock handling and
//! deterministic identity derivation.

pub mod identity;
pub mod secret;

pub use identity::{derive_escrow_id, encode_identity, IDENTITY_ENCODING_LEN};
pub use secret::{create_hash_lock, generate_random_secret, verify_secret};
