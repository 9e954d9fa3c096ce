//! Shared wiring for the integration suites.
//!
//! An [`Engine`] is one escrow instance on its own in-memory ledger, with a
//! manual clock and a broadcast event bus. Accounts are funded so that the
//! holder can lock up to [`HOLDER_FUNDS`] and the engine account can pay out
//! up to [`ENGINE_RESERVE`].

use htlc_escrow::{
    create_hash_lock, Address, Amount, BroadcastEventPublisher, EscrowConfig, EscrowService,
    InMemoryAssetLedger, LockParams, ManualClock, ReplicationPolicy, Secret, Timestamp,
};
use std::sync::Arc;

pub const ENGINE_ACCOUNT: Address = [0xEE; 20];
pub const HOLDER: Address = [0xA1; 20];
pub const DESTINATION: Address = [0xB2; 20];
pub const ASSET: Address = [0xC3; 20];
pub const AUTHORITY: Address = [0xD4; 20];

pub const HOLDER_FUNDS: Amount = 1_000;
pub const ENGINE_RESERVE: Amount = 1_000_000;
pub const T0: Timestamp = 1_700_000_000;

pub type TestService = EscrowService<InMemoryAssetLedger, ManualClock, BroadcastEventPublisher>;

/// One escrow instance and its collaborators.
pub struct Engine {
    pub service: Arc<TestService>,
    pub ledger: Arc<InMemoryAssetLedger>,
    pub clock: Arc<ManualClock>,
    pub events: Arc<BroadcastEventPublisher>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_policy(ReplicationPolicy::default())
    }

    pub fn with_policy(policy: ReplicationPolicy) -> Self {
        let ledger = Arc::new(InMemoryAssetLedger::new(ENGINE_ACCOUNT));
        ledger.mint(ASSET, HOLDER, HOLDER_FUNDS);
        ledger.mint(ASSET, ENGINE_ACCOUNT, ENGINE_RESERVE);

        let clock = Arc::new(ManualClock::new(T0));
        let config = EscrowConfig::default()
            .with_engine_account(ENGINE_ACCOUNT)
            .with_replication_policy(policy);
        let events = Arc::new(BroadcastEventPublisher::from_config(&config));

        let service = Arc::new(EscrowService::new(
            config,
            Arc::clone(&ledger),
            Arc::clone(&clock),
            Arc::clone(&events),
        ));

        Self {
            service,
            ledger,
            clock,
            events,
        }
    }

    /// Authorize the engine to move `amount` of the holder's funds.
    pub fn authorize(&self, amount: Amount) {
        self.ledger
            .approve(ASSET, HOLDER, ENGINE_ACCOUNT, amount);
    }

    pub fn balance(&self, owner: Address) -> Amount {
        self.ledger.balance_of(ASSET, owner)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock parameters for `secret`, expiring `ttl` seconds after [`T0`].
pub fn lock_params(secret: &Secret, amount: Amount, ttl: u64) -> LockParams {
    LockParams {
        holder: HOLDER,
        destination: DESTINATION,
        asset_ref: ASSET,
        amount,
        hash_lock: create_hash_lock(secret),
        deadline: T0 + ttl,
    }
}

/// Fresh random 32-byte secret.
pub fn random_secret() -> Secret {
    htlc_escrow::generate_random_secret().expose()
}
