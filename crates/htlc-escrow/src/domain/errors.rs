//! # Domain Errors
//!
//! Every failure the escrow engine can surface to a caller. All of them are
//! local validation failures; none are retried internally.

use super::value_objects::{Address, Amount, EscrowId, Timestamp};
use thiserror::Error;

/// Escrow engine errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EscrowError {
    /// Lock amount was zero.
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    /// Holder has not authorized the engine to move enough of the asset.
    #[error("Insufficient authorization: allowance {allowance} < amount {amount}")]
    InsufficientAuthorization {
        /// Allowance reported by the ledger
        allowance: Amount,
        /// Amount requested
        amount: Amount,
    },

    /// Lock deadline is not strictly in the future.
    #[error("Deadline in past: deadline={deadline}, now={now}")]
    DeadlineInPast {
        /// Requested deadline
        deadline: Timestamp,
        /// Clock reading
        now: Timestamp,
    },

    /// An escrow with the derived id already exists.
    #[error("Duplicate escrow: {0}")]
    DuplicateEscrow(EscrowId),

    /// The asset ledger rejected a query or movement.
    #[error("Asset transfer failed: {reason}")]
    AssetTransferFailed {
        /// Ledger-supplied reason
        reason: String,
    },

    /// Authority is not on the allow-list (or was revoked).
    #[error("Unknown authority: 0x{}", hex::encode(.0))]
    UnknownAuthority(Address),

    /// No escrow record with this id.
    #[error("Unknown escrow: {0}")]
    UnknownEscrow(EscrowId),

    /// SHA-256(secret) != hash lock.
    #[error("Hash mismatch: presented secret does not open the hash lock")]
    HashMismatch,

    /// Escrow already claimed.
    #[error("Escrow already claimed")]
    AlreadyClaimed,

    /// Claim attempted at or after the deadline.
    #[error("Deadline expired: deadline={deadline}, now={now}")]
    DeadlineExpired {
        /// Escrow deadline
        deadline: Timestamp,
        /// Clock reading
        now: Timestamp,
    },

    /// Refund requested by someone other than the holder.
    #[error("Caller is not the escrow holder")]
    NotHolder,

    /// Escrow already refunded.
    #[error("Escrow already refunded")]
    AlreadyRefunded,

    /// Refund attempted before the deadline.
    #[error("Deadline not reached: deadline={deadline}, now={now}")]
    DeadlineNotReached {
        /// Escrow deadline
        deadline: Timestamp,
        /// Clock reading
        now: Timestamp,
    },
}

/// Result type for escrow operations.
pub type EscrowResult<T> = Result<T, EscrowError>;

/// Errors reported by an asset ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Source balance too low.
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Current balance
        have: Amount,
        /// Requested amount
        need: Amount,
    },

    /// Spender allowance too low.
    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance {
        /// Current allowance
        have: Amount,
        /// Requested amount
        need: Amount,
    },

    /// Ledger refused the operation.
    #[error("Ledger rejected operation: {0}")]
    Rejected(String),
}

impl From<LedgerError> for EscrowError {
    fn from(err: LedgerError) -> Self {
        EscrowError::AssetTransferFailed {
            reason: err.to_string(),
        }
    }
}
