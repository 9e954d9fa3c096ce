//! Escrow Service - Core business logic
//!
//! `EscrowService` owns the record store and the authority allow-list and
//! drives every fund movement through the `AssetLedger` port.
//!
//! Each state-changing operation holds a per-id async guard for its whole
//! read-check-transfer-write sequence, so operations on one id never
//! interleave while operations on different ids run in parallel. The
//! store itself sits behind a synchronous lock that is never held across
//! an `.await`.

use crate::algorithms::derive_escrow_id;
use crate::config::EscrowConfig;
use crate::domain::{
    invariant_claim_window_open, invariant_deadline_in_future, invariant_positive_amount,
    invariant_record_consistent, invariant_refund_window_open, invariant_secret_matches,
    invariant_sufficient_authorization, Address, Amount, EscrowError, EscrowId, EscrowRecord,
    EscrowResult, ExternalRecordParams, LockParams, ReplicationPolicy, Secret,
};
use crate::events::EscrowEvent;
use crate::ports::inbound::{EscrowAdminApi, EscrowApi};
use crate::ports::outbound::{AssetLedger, Clock, EscrowEventPublisher};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
use tracing::{debug, info, warn};

type IdGuard = Arc<AsyncMutex<()>>;
type IdGuards = Mutex<HashMap<EscrowId, IdGuard>>;

/// Holds an id's guard slot; the registry entry is pruned on drop, including
/// when the operation future is cancelled.
struct IdLease<'a> {
    guards: &'a IdGuards,
    id: EscrowId,
    slot: IdGuard,
}

impl<'a> IdLease<'a> {
    fn acquire(guards: &'a IdGuards, id: EscrowId) -> Self {
        let slot = guards.lock().entry(id).or_default().clone();
        Self { guards, id, slot }
    }

    async fn exclusive(&self) -> AsyncMutexGuard<'_, ()> {
        self.slot.lock().await
    }
}

impl Drop for IdLease<'_> {
    fn drop(&mut self) {
        let mut guards = self.guards.lock();
        // The registry and this lease are the only owners left.
        if guards
            .get(&self.id)
            .is_some_and(|g| Arc::strong_count(g) == 2)
        {
            guards.remove(&self.id);
        }
    }
}

/// Escrow engine.
pub struct EscrowService<L, C, P>
where
    L: AssetLedger,
    C: Clock,
    P: EscrowEventPublisher,
{
    config: EscrowConfig,
    ledger: Arc<L>,
    clock: Arc<C>,
    publisher: Arc<P>,
    records: RwLock<HashMap<EscrowId, EscrowRecord>>,
    id_guards: IdGuards,
    /// Authority reference -> enabled flag
    authorities: RwLock<HashMap<Address, bool>>,
}

impl<L, C, P> EscrowService<L, C, P>
where
    L: AssetLedger,
    C: Clock,
    P: EscrowEventPublisher,
{
    /// Create a new escrow service.
    pub fn new(config: EscrowConfig, ledger: Arc<L>, clock: Arc<C>, publisher: Arc<P>) -> Self {
        info!(
            engine_account = %hex::encode(config.engine_account),
            replication_policy = ?config.replication_policy,
            "Escrow service created"
        );
        Self {
            config,
            ledger,
            clock,
            publisher,
            records: RwLock::new(HashMap::new()),
            id_guards: Mutex::new(HashMap::new()),
            authorities: RwLock::new(HashMap::new()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// Every record, ordered by id.
    pub fn records(&self) -> Vec<EscrowRecord> {
        let mut records: Vec<EscrowRecord> = self.records.read().values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Number of records held.
    pub fn record_count(&self) -> usize {
        self.records.read().len()
    }

    fn lease(&self, id: EscrowId) -> IdLease<'_> {
        IdLease::acquire(&self.id_guards, id)
    }

    fn commit(&self, record: EscrowRecord) {
        debug_assert!(invariant_record_consistent(&record));
        self.records.write().insert(record.id, record);
    }

    async fn lock_exclusive(&self, id: EscrowId, params: LockParams) -> EscrowResult<EscrowId> {
        let now = self.clock.now();

        invariant_positive_amount(params.amount)?;
        let allowance = self
            .ledger
            .allowance(params.asset_ref, params.holder, self.config.engine_account)
            .await?;
        invariant_sufficient_authorization(allowance, params.amount)?;
        invariant_deadline_in_future(params.deadline, now)?;
        if self.records.read().contains_key(&id) {
            return Err(EscrowError::DuplicateEscrow(id));
        }
        debug!(id = %id, allowance, now, "Lock guards passed");

        let (amount, deadline) = (params.amount, params.deadline);

        self.ledger
            .transfer(
                params.asset_ref,
                params.holder,
                params.destination,
                params.amount,
            )
            .await?;

        let record = EscrowRecord::locked(id, params);
        let event = EscrowEvent::locked(&record);
        self.commit(record);

        info!(id = %id, amount, deadline, "Escrow locked");
        self.publisher.publish(event);
        Ok(id)
    }

    async fn claim_exclusive(
        &self,
        id: EscrowId,
        secret: Secret,
        amount: Amount,
        recipient: Address,
    ) -> EscrowResult<()> {
        let now = self.clock.now();

        let record = self
            .records
            .read()
            .get(&id)
            .cloned()
            .ok_or(EscrowError::UnknownEscrow(id))?;
        invariant_secret_matches(&secret, &record.hash_lock)?;
        record.ensure_open()?;
        invariant_claim_window_open(&record, now)?;

        if amount != record.amount || recipient != record.destination {
            warn!(
                id = %id,
                amount,
                record_amount = record.amount,
                recipient = %hex::encode(recipient),
                destination = %hex::encode(record.destination),
                "Claim values differ from the record"
            );
        }

        self.ledger
            .transfer(record.asset_ref, self.config.engine_account, recipient, amount)
            .await?;

        let mut updated = record;
        updated.mark_claimed(secret)?;
        self.commit(updated);

        info!(id = %id, amount, recipient = %hex::encode(recipient), "Escrow claimed");
        self.publisher.publish(EscrowEvent::Claimed { id, secret });
        Ok(())
    }

    async fn refund_exclusive(&self, caller: Address, id: EscrowId) -> EscrowResult<()> {
        let now = self.clock.now();

        let record = self
            .records
            .read()
            .get(&id)
            .cloned()
            .ok_or(EscrowError::UnknownEscrow(id))?;
        if caller != record.holder {
            return Err(EscrowError::NotHolder);
        }
        record.ensure_open()?;
        invariant_refund_window_open(&record, now)?;

        self.ledger
            .transfer(
                record.asset_ref,
                self.config.engine_account,
                record.holder,
                record.amount,
            )
            .await?;

        let mut updated = record;
        updated.mark_refunded()?;
        let amount = updated.amount;
        self.commit(updated);

        info!(id = %id, amount, "Escrow refunded");
        self.publisher.publish(EscrowEvent::Refunded { id });
        Ok(())
    }

    fn register_external_exclusive(
        &self,
        authority: Address,
        params: ExternalRecordParams,
    ) -> EscrowResult<()> {
        invariant_positive_amount(params.amount)?;
        if !self.is_authority(&authority) {
            return Err(EscrowError::UnknownAuthority(authority));
        }

        let id = params.id;
        let record = EscrowRecord::external(authority, params);

        let existing = self.records.read().get(&id).cloned();
        if let Some(existing) = existing {
            match self.config.replication_policy {
                ReplicationPolicy::RejectConflicting if existing.same_terms(&record) => {
                    debug!(id = %id, "External record replayed, keeping existing state");
                    return Ok(());
                }
                ReplicationPolicy::RejectConflicting => {
                    return Err(EscrowError::DuplicateEscrow(id));
                }
                ReplicationPolicy::Overwrite => {
                    warn!(id = %id, previous = ?existing.state, "Overwriting existing record");
                }
            }
        }

        self.commit(record);

        info!(id = %id, authority = %hex::encode(authority), "External record registered");
        self.publisher
            .publish(EscrowEvent::ExternalRecordRegistered { id, authority });
        Ok(())
    }
}

fn log_rejection(operation: &'static str, id: &EscrowId, err: &EscrowError) {
    match err {
        EscrowError::HashMismatch | EscrowError::AssetTransferFailed { .. } => {
            warn!(operation, id = %id, error = %err, "Escrow operation rejected");
        }
        _ => debug!(operation, id = %id, error = %err, "Escrow operation rejected"),
    }
}

#[async_trait]
impl<L, C, P> EscrowApi for EscrowService<L, C, P>
where
    L: AssetLedger,
    C: Clock,
    P: EscrowEventPublisher,
{
    async fn lock(&self, params: LockParams) -> EscrowResult<EscrowId> {
        let id = derive_escrow_id(&params);
        let lease = self.lease(id);
        let result = {
            let _exclusive = lease.exclusive().await;
            self.lock_exclusive(id, params).await
        };
        drop(lease);

        if let Err(e) = &result {
            log_rejection("lock", &id, e);
        }
        result
    }

    async fn claim(
        &self,
        id: EscrowId,
        secret: Secret,
        amount: Amount,
        recipient: Address,
    ) -> EscrowResult<()> {
        let lease = self.lease(id);
        let result = {
            let _exclusive = lease.exclusive().await;
            self.claim_exclusive(id, secret, amount, recipient).await
        };
        drop(lease);

        if let Err(e) = &result {
            log_rejection("claim", &id, e);
        }
        result
    }

    async fn claim_to_destination(&self, id: EscrowId, secret: Secret) -> EscrowResult<()> {
        let lease = self.lease(id);
        let result = {
            let _exclusive = lease.exclusive().await;
            // Terms are read under the guard so they cannot change before the claim.
            let terms = self
                .records
                .read()
                .get(&id)
                .map(|r| (r.amount, r.destination));
            match terms {
                Some((amount, destination)) => {
                    self.claim_exclusive(id, secret, amount, destination).await
                }
                None => Err(EscrowError::UnknownEscrow(id)),
            }
        };
        drop(lease);

        if let Err(e) = &result {
            log_rejection("claim_to_destination", &id, e);
        }
        result
    }

    async fn refund(&self, caller: Address, id: EscrowId) -> EscrowResult<()> {
        let lease = self.lease(id);
        let result = {
            let _exclusive = lease.exclusive().await;
            self.refund_exclusive(caller, id).await
        };
        drop(lease);

        if let Err(e) = &result {
            log_rejection("refund", &id, e);
        }
        result
    }

    async fn register_external_record(
        &self,
        authority: Address,
        params: ExternalRecordParams,
    ) -> EscrowResult<()> {
        let id = params.id;
        let lease = self.lease(id);
        let result = {
            let _exclusive = lease.exclusive().await;
            self.register_external_exclusive(authority, params)
        };
        drop(lease);

        if let Err(e) = &result {
            log_rejection("register_external_record", &id, e);
        }
        result
    }

    fn get(&self, id: &EscrowId) -> Option<EscrowRecord> {
        self.records.read().get(id).cloned()
    }
}

impl<L, C, P> EscrowAdminApi for EscrowService<L, C, P>
where
    L: AssetLedger,
    C: Clock,
    P: EscrowEventPublisher,
{
    fn register_authority(&self, authority: Address) {
        self.authorities.write().insert(authority, true);
        info!(authority = %hex::encode(authority), "Authority registered");
        self.publisher
            .publish(EscrowEvent::AuthorityRegistered { authority });
    }

    fn revoke_authority(&self, authority: Address) -> bool {
        let known = match self.authorities.write().get_mut(&authority) {
            Some(enabled) => {
                *enabled = false;
                true
            }
            None => false,
        };
        if known {
            info!(authority = %hex::encode(authority), "Authority revoked");
            self.publisher
                .publish(EscrowEvent::AuthorityRevoked { authority });
        }
        known
    }

    fn is_authority(&self, authority: &Address) -> bool {
        self.authorities
            .read()
            .get(authority)
            .copied()
            .unwrap_or(false)
    }
}
