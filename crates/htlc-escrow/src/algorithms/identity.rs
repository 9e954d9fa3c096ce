//! # Escrow Identity Derivation
//!
//! An escrow id is SHA-256 over a fixed big-endian encoding of
//! `(holder, destination, asset_ref, amount, hash_lock, deadline)`.
//! A paired escrow instance must use the same encoding to agree on ids,
//! so neither the field order nor the widths may change.

use crate::domain::{EscrowId, LockParams};
use sha2::{Digest, Sha256};

/// Length of the identity preimage: 20 + 20 + 20 + 16 + 32 + 8.
pub const IDENTITY_ENCODING_LEN: usize = 116;

/// Encode the identity tuple.
pub fn encode_identity(params: &LockParams) -> [u8; IDENTITY_ENCODING_LEN] {
    let mut out = [0u8; IDENTITY_ENCODING_LEN];
    out[0..20].copy_from_slice(&params.holder);
    out[20..40].copy_from_slice(&params.destination);
    out[40..60].copy_from_slice(&params.asset_ref);
    out[60..76].copy_from_slice(&params.amount.to_be_bytes());
    out[76..108].copy_from_slice(&params.hash_lock);
    out[108..116].copy_from_slice(&params.deadline.to_be_bytes());
    out
}

/// Derive the escrow id for a lock request.
pub fn derive_escrow_id(params: &LockParams) -> EscrowId {
    EscrowId(Sha256::digest(encode_identity(params)).into())
}
