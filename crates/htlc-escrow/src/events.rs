//! # Escrow Events
//!
//! Audit trail emitted after each committed state change. External indexers
//! discover new escrows through `Locked` and revealed secrets through `Claimed`.

use crate::domain::value_objects::{hex_address, hex_bytes32};
use crate::domain::{Address, Amount, EscrowId, EscrowRecord, Hash, Secret, Timestamp};
use serde::{Deserialize, Serialize};

/// Events published by the escrow engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowEvent {
    /// A new escrow was locked.
    Locked {
        /// Escrow id
        id: EscrowId,
        /// Funding party
        #[serde(with = "hex_address")]
        holder: Address,
        /// Lock/burn destination
        #[serde(with = "hex_address")]
        destination: Address,
        /// Asset ledger instance
        #[serde(with = "hex_address")]
        asset_ref: Address,
        /// Locked quantity
        amount: Amount,
        /// Committed digest
        #[serde(with = "hex_bytes32")]
        hash_lock: Hash,
        /// Claim deadline
        deadline: Timestamp,
    },

    /// The secret was revealed and funds released.
    Claimed {
        /// Escrow id
        id: EscrowId,
        /// Revealed preimage
        #[serde(with = "hex_bytes32")]
        secret: Secret,
    },

    /// Funds were returned to the holder.
    Refunded {
        /// Escrow id
        id: EscrowId,
    },

    /// A counterpart record was admitted.
    ExternalRecordRegistered {
        /// Escrow id
        id: EscrowId,
        /// Vouching authority
        #[serde(with = "hex_address")]
        authority: Address,
    },

    /// An authority was enabled.
    AuthorityRegistered {
        /// Authority reference
        #[serde(with = "hex_address")]
        authority: Address,
    },

    /// An authority was disabled.
    AuthorityRevoked {
        /// Authority reference
        #[serde(with = "hex_address")]
        authority: Address,
    },
}

impl EscrowEvent {
    /// `Locked` event carrying the full creation parameters of a record.
    pub fn locked(record: &EscrowRecord) -> Self {
        Self::Locked {
            id: record.id,
            holder: record.holder,
            destination: record.destination,
            asset_ref: record.asset_ref,
            amount: record.amount,
            hash_lock: record.hash_lock,
            deadline: record.deadline,
        }
    }

    /// Escrow the event refers to, if any.
    pub fn escrow_id(&self) -> Option<EscrowId> {
        match self {
            Self::Locked { id, .. }
            | Self::Claimed { id, .. }
            | Self::Refunded { id }
            | Self::ExternalRecordRegistered { id, .. } => Some(*id),
            Self::AuthorityRegistered { .. } | Self::AuthorityRevoked { .. } => None,
        }
    }

    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Locked { .. } => "locked",
            Self::Claimed { .. } => "claimed",
            Self::Refunded { .. } => "refunded",
            Self::ExternalRecordRegistered { .. } => "external_record_registered",
            Self::AuthorityRegistered { .. } => "authority_registered",
            Self::AuthorityRevoked { .. } => "authority_revoked",
        }
    }
}
