//! # Domain Value Objects
//!
//! Immutable value types shared by the escrow engine and its ports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account identity on the asset ledger (20-byte).
pub type Address = [u8; 20];

/// Hash type (32-byte SHA-256).
pub type Hash = [u8; 32];

/// Secret preimage type (32-byte).
pub type Secret = [u8; 32];

/// Asset quantity in the smallest unit.
pub type Amount = u128;

/// Unix timestamp in seconds. Deadlines and clock readings share this unit.
pub type Timestamp = u64;

/// Deterministic 256-bit escrow identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EscrowId(pub Hash);

impl EscrowId {
    /// First bytes as hex, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for EscrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for EscrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EscrowId({}..)", self.short())
    }
}

impl FromStr for EscrowId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut id = [0u8; 32];
        hex::decode_to_slice(s, &mut id)?;
        Ok(Self(id))
    }
}

impl Serialize for EscrowId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EscrowId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Escrow lifecycle.
///
/// `Locked -> Claimed` or `Locked -> Refunded`; both are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscrowState {
    /// Funds locked, awaiting claim or refund.
    Locked,
    /// Secret revealed, funds released to the claimant.
    Claimed {
        /// The revealed preimage.
        #[serde(with = "hex_bytes32")]
        secret: Secret,
    },
    /// Deadline passed unclaimed, funds returned to the holder.
    Refunded,
}

impl EscrowState {
    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Locked)
    }

    /// Check if a transition is valid.
    pub fn can_transition_to(&self, next: &EscrowState) -> bool {
        matches!(
            (self, next),
            (Self::Locked, Self::Claimed { .. }) | (Self::Locked, Self::Refunded)
        )
    }
}

/// Where a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// Created by a local `lock`.
    Local,
    /// Admitted through `register_external_record`.
    External {
        /// Counterpart-escrow reference that vouched for the record.
        #[serde(with = "hex_address")]
        authority: Address,
    },
}

/// What to do when an external record arrives for an id that already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicationPolicy {
    /// Identical parameters are a no-op; differing parameters are rejected.
    #[default]
    RejectConflicting,
    /// Unconditionally replace the stored record.
    Overwrite,
}

impl FromStr for ReplicationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" | "reject_conflicting" => Ok(Self::RejectConflicting),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(format!("unknown replication policy: {other}")),
        }
    }
}

pub(crate) mod hex_bytes32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let mut out = [0u8; 32];
        hex::decode_to_slice(&s, &mut out).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}

pub(crate) mod hex_address {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 20], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 20], D::Error> {
        let s = String::deserialize(d)?;
        let mut out = [0u8; 20];
        hex::decode_to_slice(&s, &mut out).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}
