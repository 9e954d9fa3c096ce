//! # Concurrency
//!
//! Operations on one escrow id are serialized; operations on different ids
//! never wait on each other. Run on the multi-threaded runtime so tasks
//! genuinely race.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use async_trait::async_trait;
    use htlc_escrow::{
        Address, Amount, AssetLedger, BroadcastEventPublisher, EscrowApi, EscrowConfig,
        EscrowError, EscrowService, InMemoryAssetLedger, LedgerError, ManualClock,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    const CONTENDERS: usize = 32;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_exactly_one_wins() {
        let engine = Engine::new();
        engine.authorize(5);
        let secret = random_secret();
        let id = engine
            .service
            .lock(lock_params(&secret, 5, 3600))
            .await
            .unwrap();
        let before = engine.balance(DESTINATION);

        let handles: Vec<_> = (0..CONTENDERS)
            .map(|_| {
                let service = Arc::clone(&engine.service);
                tokio::spawn(async move { service.claim(id, secret, 5, DESTINATION).await })
            })
            .collect();

        let results: Vec<_> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| *r == Err(EscrowError::AlreadyClaimed)));
        assert_eq!(engine.balance(DESTINATION), before + 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_identical_locks_one_record() {
        let engine = Engine::new();
        engine.authorize(HOLDER_FUNDS);
        let params = lock_params(&random_secret(), 5, 3600);

        let handles: Vec<_> = (0..CONTENDERS)
            .map(|_| {
                let service = Arc::clone(&engine.service);
                let params = params.clone();
                tokio::spawn(async move { service.lock(params).await })
            })
            .collect();

        let results: Vec<_> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(EscrowError::DuplicateEscrow(_)))));
        assert_eq!(engine.balance(HOLDER), HOLDER_FUNDS - 5);
        assert_eq!(engine.service.records().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_ids_all_succeed() {
        let engine = Engine::new();
        engine.authorize(HOLDER_FUNDS);

        let handles: Vec<_> = (0..CONTENDERS)
            .map(|_| {
                let service = Arc::clone(&engine.service);
                tokio::spawn(async move {
                    let secret = random_secret();
                    let id = service.lock(lock_params(&secret, 1, 3600)).await?;
                    service.claim_to_destination(id, secret).await
                })
            })
            .collect();

        for handle in futures::future::join_all(handles).await {
            assert!(handle.unwrap().is_ok());
        }
        let records = engine.service.records();
        assert_eq!(records.len(), CONTENDERS);
        assert!(records.iter().all(|r| r.claimed()));
    }

    /// Ledger whose transfers into one account park until released.
    struct GatedLedger {
        inner: InMemoryAssetLedger,
        gated: Address,
        release: Notify,
        entered: Notify,
    }

    #[async_trait]
    impl AssetLedger for GatedLedger {
        async fn allowance(
            &self,
            asset: Address,
            owner: Address,
            spender: Address,
        ) -> Result<Amount, LedgerError> {
            self.inner.allowance(asset, owner, spender).await
        }

        async fn transfer(
            &self,
            asset: Address,
            from: Address,
            to: Address,
            amount: Amount,
        ) -> Result<(), LedgerError> {
            if to == self.gated {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.transfer(asset, from, to, amount).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_slow_escrow_does_not_block_unrelated_id() {
        let gated: Address = [0x66; 20];
        let inner = InMemoryAssetLedger::new(ENGINE_ACCOUNT);
        inner.mint(ASSET, HOLDER, HOLDER_FUNDS);
        inner.approve(ASSET, HOLDER, ENGINE_ACCOUNT, HOLDER_FUNDS);
        let ledger = Arc::new(GatedLedger {
            inner,
            gated,
            release: Notify::new(),
            entered: Notify::new(),
        });
        let service = Arc::new(EscrowService::new(
            EscrowConfig::default().with_engine_account(ENGINE_ACCOUNT),
            Arc::clone(&ledger),
            Arc::new(ManualClock::new(T0)),
            Arc::new(BroadcastEventPublisher::default()),
        ));

        let mut slow_params = lock_params(&random_secret(), 5, 3600);
        slow_params.destination = gated;
        let slow = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.lock(slow_params).await })
        };
        ledger.entered.notified().await;

        // The slow lock is parked inside the ledger holding its id guard.
        let fast = timeout(
            Duration::from_secs(5),
            service.lock(lock_params(&random_secret(), 5, 3600)),
        )
        .await
        .expect("unrelated lock must not wait");
        assert!(fast.is_ok());
        assert!(!slow.is_finished());

        ledger.release.notify_one();
        assert!(slow.await.unwrap().is_ok());
        assert_eq!(service.records().len(), 2);
    }
}
