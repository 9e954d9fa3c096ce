//! # Domain Entities
//!
//! The escrow record and the parameter sets that create one.

use super::errors::{EscrowError, EscrowResult};
use super::value_objects::{
    hex_address, hex_bytes32, Address, Amount, EscrowId, EscrowState, Hash, RecordOrigin, Secret,
    Timestamp,
};
use serde::{Deserialize, Serialize};

/// Parameters for `lock`.
///
/// Field order matches the identity encoding in `derive_escrow_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockParams {
    /// Party funding the escrow.
    #[serde(with = "hex_address")]
    pub holder: Address,
    /// Lock/burn sink or receiving counterparty.
    #[serde(with = "hex_address")]
    pub destination: Address,
    /// Asset ledger instance holding the asset.
    #[serde(with = "hex_address")]
    pub asset_ref: Address,
    /// Quantity to lock.
    pub amount: Amount,
    /// SHA-256 of the secret.
    #[serde(with = "hex_bytes32")]
    pub hash_lock: Hash,
    /// Claim is allowed strictly before this time, refund at or after it.
    pub deadline: Timestamp,
}

/// Parameters for `register_external_record`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRecordParams {
    /// Id assigned by the counterpart escrow.
    pub id: EscrowId,
    /// Receiving party.
    #[serde(with = "hex_address")]
    pub destination: Address,
    /// SHA-256 of the secret.
    #[serde(with = "hex_bytes32")]
    pub hash_lock: Hash,
    /// Claim deadline.
    pub deadline: Timestamp,
    /// Asset ledger instance.
    #[serde(with = "hex_address")]
    pub asset_ref: Address,
    /// Quantity.
    pub amount: Amount,
}

/// Persisted state for one transfer attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Deterministic identifier.
    pub id: EscrowId,
    /// Funding party; the only one allowed to refund.
    #[serde(with = "hex_address")]
    pub holder: Address,
    /// Party entitled to the funds once claimed.
    #[serde(with = "hex_address")]
    pub destination: Address,
    /// Asset ledger instance.
    #[serde(with = "hex_address")]
    pub asset_ref: Address,
    /// Fixed at creation.
    pub amount: Amount,
    /// Committed digest.
    #[serde(with = "hex_bytes32")]
    pub hash_lock: Hash,
    /// Absolute deadline.
    pub deadline: Timestamp,
    /// Lifecycle state.
    pub state: EscrowState,
    /// Local lock or external replication.
    pub origin: RecordOrigin,
}

impl EscrowRecord {
    /// Record created by a local `lock`.
    pub fn locked(id: EscrowId, params: LockParams) -> Self {
        Self {
            id,
            holder: params.holder,
            destination: params.destination,
            asset_ref: params.asset_ref,
            amount: params.amount,
            hash_lock: params.hash_lock,
            deadline: params.deadline,
            state: EscrowState::Locked,
            origin: RecordOrigin::Local,
        }
    }

    /// Record admitted from a counterpart escrow. The authority stands in as holder.
    pub fn external(authority: Address, params: ExternalRecordParams) -> Self {
        Self {
            id: params.id,
            holder: authority,
            destination: params.destination,
            asset_ref: params.asset_ref,
            amount: params.amount,
            hash_lock: params.hash_lock,
            deadline: params.deadline,
            state: EscrowState::Locked,
            origin: RecordOrigin::External { authority },
        }
    }

    /// Whether `claim` has succeeded.
    pub fn claimed(&self) -> bool {
        matches!(self.state, EscrowState::Claimed { .. })
    }

    /// Whether `refund` has succeeded.
    pub fn refunded(&self) -> bool {
        matches!(self.state, EscrowState::Refunded)
    }

    /// The preimage revealed by a successful claim.
    pub fn revealed_secret(&self) -> Option<&Secret> {
        match &self.state {
            EscrowState::Claimed { secret } => Some(secret),
            _ => None,
        }
    }

    /// Claim is permitted strictly before the deadline.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.deadline
    }

    /// Same commitment, ignoring lifecycle state.
    pub fn same_terms(&self, other: &EscrowRecord) -> bool {
        self.id == other.id
            && self.holder == other.holder
            && self.destination == other.destination
            && self.asset_ref == other.asset_ref
            && self.amount == other.amount
            && self.hash_lock == other.hash_lock
            && self.deadline == other.deadline
    }

    /// Fail with `AlreadyClaimed` or `AlreadyRefunded` once the record is terminal.
    pub fn ensure_open(&self) -> EscrowResult<()> {
        if self.state.is_terminal() {
            return Err(self.terminal_error());
        }
        Ok(())
    }

    /// Mark claimed with the revealed secret.
    pub fn mark_claimed(&mut self, secret: Secret) -> EscrowResult<()> {
        self.transition(EscrowState::Claimed { secret })
    }

    /// Mark refunded.
    pub fn mark_refunded(&mut self) -> EscrowResult<()> {
        self.transition(EscrowState::Refunded)
    }

    fn transition(&mut self, next: EscrowState) -> EscrowResult<()> {
        if !self.state.can_transition_to(&next) {
            return Err(self.terminal_error());
        }
        self.state = next;
        Ok(())
    }

    fn terminal_error(&self) -> EscrowError {
        match self.state {
            EscrowState::Claimed { .. } => EscrowError::AlreadyClaimed,
            _ => EscrowError::AlreadyRefunded,
        }
    }
}
