//! # Domain Invariants
//!
//! Guard conditions evaluated by the escrow engine before any state change.

use super::entities::EscrowRecord;
use super::errors::{EscrowError, EscrowResult};
use super::value_objects::{Amount, Hash, Secret, Timestamp};
use crate::algorithms::secret::verify_secret;

/// Invariant: a lock moves a positive quantity.
pub fn invariant_positive_amount(amount: Amount) -> EscrowResult<()> {
    if amount == 0 {
        return Err(EscrowError::InvalidAmount);
    }
    Ok(())
}

/// Invariant: the holder pre-authorized at least `amount`.
pub fn invariant_sufficient_authorization(allowance: Amount, amount: Amount) -> EscrowResult<()> {
    if allowance < amount {
        return Err(EscrowError::InsufficientAuthorization { allowance, amount });
    }
    Ok(())
}

/// Invariant: deadline strictly later than now at creation.
pub fn invariant_deadline_in_future(deadline: Timestamp, now: Timestamp) -> EscrowResult<()> {
    if deadline <= now {
        return Err(EscrowError::DeadlineInPast { deadline, now });
    }
    Ok(())
}

/// Invariant: SHA-256(secret) == hash lock.
pub fn invariant_secret_matches(secret: &Secret, hash_lock: &Hash) -> EscrowResult<()> {
    if !verify_secret(secret, hash_lock) {
        return Err(EscrowError::HashMismatch);
    }
    Ok(())
}

/// Invariant: claim strictly before the deadline.
pub fn invariant_claim_window_open(record: &EscrowRecord, now: Timestamp) -> EscrowResult<()> {
    if record.is_expired(now) {
        return Err(EscrowError::DeadlineExpired {
            deadline: record.deadline,
            now,
        });
    }
    Ok(())
}

/// Invariant: refund at or after the deadline.
pub fn invariant_refund_window_open(record: &EscrowRecord, now: Timestamp) -> EscrowResult<()> {
    if !record.is_expired(now) {
        return Err(EscrowError::DeadlineNotReached {
            deadline: record.deadline,
            now,
        });
    }
    Ok(())
}

/// Record-level consistency, checked in debug builds after every commit.
///
/// `claimed && refunded` and "secret iff claimed" are structural in
/// `EscrowState`, so only the amount remains to check.
pub fn invariant_record_consistent(record: &EscrowRecord) -> bool {
    record.amount > 0 && !(record.claimed() && record.refunded())
}
