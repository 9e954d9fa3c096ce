//! # Outbound Ports
//!
//! Collaborators the escrow engine calls into: the asset ledger, the clock
//! and the event sink.

use crate::domain::{Address, Amount, LedgerError, Timestamp};
use crate::events::EscrowEvent;
use async_trait::async_trait;

/// Fungible-asset ledger - outbound port.
///
/// The engine never touches balances directly; every movement goes through here.
#[async_trait]
pub trait AssetLedger: Send + Sync {
    /// Amount `owner` has authorized `spender` to move.
    async fn allowance(
        &self,
        asset: Address,
        owner: Address,
        spender: Address,
    ) -> Result<Amount, LedgerError>;

    /// Move `amount` from `from` to `to`, atomically.
    ///
    /// When `from` is not the ledger's configured spender the movement
    /// consumes `from`'s allowance to that spender.
    async fn transfer(
        &self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// Time source - outbound port.
pub trait Clock: Send + Sync {
    /// Current time, in the same unit as escrow deadlines.
    fn now(&self) -> Timestamp;
}

/// Event sink - outbound port.
pub trait EscrowEventPublisher: Send + Sync {
    /// Publish an event. Returns the number of receivers reached.
    fn publish(&self, event: EscrowEvent) -> usize;
}
