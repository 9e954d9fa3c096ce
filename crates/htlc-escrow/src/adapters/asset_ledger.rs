//! Asset Ledger Adapter
//!
//! Implements `AssetLedger` as an in-memory fungible-token ledger with
//! ERC-20 style balances and allowances.

use crate::domain::{Address, Amount, LedgerError};
use crate::ports::outbound::AssetLedger;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

#[derive(Default)]
struct LedgerState {
    /// (asset, owner) -> balance
    balances: HashMap<(Address, Address), Amount>,
    /// (asset, owner, spender) -> allowance
    allowances: HashMap<(Address, Address, Address), Amount>,
}

/// In-memory ledger.
///
/// `spender` is the account the escrow engine acts as. Transfers out of any
/// other account consume that account's allowance to `spender`.
pub struct InMemoryAssetLedger {
    spender: Address,
    state: Mutex<LedgerState>,
    reject_transfers: AtomicBool,
}

impl InMemoryAssetLedger {
    /// Create an empty ledger whose engine account is `spender`.
    pub fn new(spender: Address) -> Self {
        Self {
            spender,
            state: Mutex::new(LedgerState::default()),
            reject_transfers: AtomicBool::new(false),
        }
    }

    /// Credit `amount` to `owner`.
    pub fn mint(&self, asset: Address, owner: Address, amount: Amount) {
        let mut state = self.state.lock();
        let balance = state.balances.entry((asset, owner)).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Set `owner`'s allowance to `spender`.
    pub fn approve(&self, asset: Address, owner: Address, spender: Address, amount: Amount) {
        self.state
            .lock()
            .allowances
            .insert((asset, owner, spender), amount);
    }

    /// Current balance.
    pub fn balance_of(&self, asset: Address, owner: Address) -> Amount {
        self.state
            .lock()
            .balances
            .get(&(asset, owner))
            .copied()
            .unwrap_or(0)
    }

    /// Make every subsequent transfer fail (failure injection).
    pub fn set_reject_transfers(&self, reject: bool) {
        self.reject_transfers.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetLedger for InMemoryAssetLedger {
    async fn allowance(
        &self,
        asset: Address,
        owner: Address,
        spender: Address,
    ) -> Result<Amount, LedgerError> {
        Ok(self
            .state
            .lock()
            .allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(0))
    }

    async fn transfer(
        &self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if self.reject_transfers.load(Ordering::SeqCst) {
            return Err(LedgerError::Rejected("transfers disabled".to_string()));
        }

        let mut state = self.state.lock();

        let have = state.balances.get(&(asset, from)).copied().unwrap_or(0);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }

        let allowance_key = (asset, from, self.spender);
        if from != self.spender {
            let allowed = state.allowances.get(&allowance_key).copied().unwrap_or(0);
            if allowed < amount {
                return Err(LedgerError::InsufficientAllowance {
                    have: allowed,
                    need: amount,
                });
            }
        }

        let to_balance = state.balances.get(&(asset, to)).copied().unwrap_or(0);
        if from != to && to_balance.checked_add(amount).is_none() {
            return Err(LedgerError::Rejected("balance overflow".to_string()));
        }

        // All checks passed; apply.
        if from != self.spender {
            if let Some(allowed) = state.allowances.get_mut(&allowance_key) {
                *allowed -= amount;
            }
        }
        if from != to {
            *state.balances.entry((asset, from)).or_insert(0) -= amount;
            *state.balances.entry((asset, to)).or_insert(0) += amount;
        }

        debug!(
            asset = %hex::encode(asset),
            from = %hex::encode(from),
            to = %hex::encode(to),
            amount,
            "Ledger transfer"
        );
        Ok(())
    }
}
