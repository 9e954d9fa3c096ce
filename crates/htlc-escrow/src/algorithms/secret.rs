//! # Secret Generation and Verification
//!
//! Hash-lock operations. SHA-256 only.

use crate::domain::{Hash, Secret, SecureSecret};
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Generate a cryptographically secure random secret.
///
/// Callers lock with `secret.hash_lock()` and keep the secret until claim.
pub fn generate_random_secret() -> SecureSecret {
    let mut secret = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret);
    SecureSecret::new(secret)
}

/// Create a hashlock from a secret using SHA-256.
pub fn create_hash_lock(secret: &Secret) -> Hash {
    Sha256::digest(secret).into()
}

/// Verify that a secret opens a hashlock (constant-time compare).
pub fn verify_secret(secret: &Secret, hash_lock: &Hash) -> bool {
    let computed = create_hash_lock(secret);
    computed.as_slice().ct_eq(hash_lock.as_slice()).into()
}
