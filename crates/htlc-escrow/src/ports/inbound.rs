//! # Inbound Ports
//!
//! What the escrow engine can do.

use crate::domain::{
    Address, Amount, EscrowId, EscrowRecord, EscrowResult, ExternalRecordParams, LockParams,
    Secret,
};
use async_trait::async_trait;

/// Escrow API - inbound port.
#[async_trait]
pub trait EscrowApi: Send + Sync {
    /// Lock `params.amount` from the holder and create a record.
    async fn lock(&self, params: LockParams) -> EscrowResult<EscrowId>;

    /// Reveal the secret and pay `amount` to `recipient`.
    ///
    /// `amount` and `recipient` are caller-supplied and must match the record;
    /// prefer [`EscrowApi::claim_to_destination`].
    async fn claim(
        &self,
        id: EscrowId,
        secret: Secret,
        amount: Amount,
        recipient: Address,
    ) -> EscrowResult<()>;

    /// Reveal the secret and pay `record.amount` to `record.destination`.
    async fn claim_to_destination(&self, id: EscrowId, secret: Secret) -> EscrowResult<()>;

    /// Return the funds to the holder after the deadline.
    async fn refund(&self, caller: Address, id: EscrowId) -> EscrowResult<()>;

    /// Admit a record vouched for by a counterpart escrow.
    async fn register_external_record(
        &self,
        authority: Address,
        params: ExternalRecordParams,
    ) -> EscrowResult<()>;

    /// Look up a record. Unknown ids are `None`, never an error.
    fn get(&self, id: &EscrowId) -> Option<EscrowRecord>;
}

/// Administrative surface for the authority allow-list.
pub trait EscrowAdminApi: Send + Sync {
    /// Enable an authority for `register_external_record`.
    fn register_authority(&self, authority: Address);

    /// Disable an authority. Returns false if it was never registered.
    fn revoke_authority(&self, authority: Address) -> bool;

    /// Whether the authority is registered and enabled.
    fn is_authority(&self, authority: &Address) -> bool;
}
