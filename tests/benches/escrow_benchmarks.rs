//! # HTLC Escrow Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | Identity | `derive_escrow_id` | < 5μs |
//! | Hash lock | `verify_secret` | < 5μs |
//! | Engine | lock + claim round | < 100μs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use htlc_escrow::{
    create_hash_lock, derive_escrow_id, verify_secret, BroadcastEventPublisher, EscrowApi,
    EscrowConfig, EscrowService, InMemoryAssetLedger, LockParams, ManualClock,
};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

const ENGINE: [u8; 20] = [0xEE; 20];
const HOLDER: [u8; 20] = [0x01; 20];
const ASSET: [u8; 20] = [0x03; 20];

fn random_params(rng: &mut impl Rng) -> (LockParams, [u8; 32]) {
    let secret: [u8; 32] = rng.gen();
    let params = LockParams {
        holder: HOLDER,
        destination: rng.gen(),
        asset_ref: ASSET,
        amount: rng.gen_range(1..1_000),
        hash_lock: create_hash_lock(&secret),
        deadline: 2_000,
    };
    (params, secret)
}

// ============================================================================
// Pure functions
// ============================================================================

fn bench_identity_and_hash_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("htlc-primitives");
    let mut rng = rand::thread_rng();
    let (params, secret) = random_params(&mut rng);

    group.bench_function("derive_escrow_id", |b| {
        b.iter(|| black_box(derive_escrow_id(black_box(&params))))
    });

    group.bench_function("verify_secret", |b| {
        b.iter(|| black_box(verify_secret(black_box(&secret), &params.hash_lock)))
    });

    group.finish();
}

// ============================================================================
// Engine round trips
// ============================================================================

fn bench_lock_claim(c: &mut Criterion) {
    let mut group = c.benchmark_group("htlc-engine");
    group.measurement_time(Duration::from_secs(10));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    for batch in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("lock_claim", batch), &batch, |b, &batch| {
            let mut rng = rand::thread_rng();
            b.iter(|| {
                let ledger = Arc::new(InMemoryAssetLedger::new(ENGINE));
                ledger.mint(ASSET, HOLDER, u64::MAX as u128);
                ledger.approve(ASSET, HOLDER, ENGINE, u64::MAX as u128);
                ledger.mint(ASSET, ENGINE, u64::MAX as u128);
                let service = EscrowService::new(
                    EscrowConfig::default().with_engine_account(ENGINE),
                    ledger,
                    Arc::new(ManualClock::new(1_000)),
                    Arc::new(BroadcastEventPublisher::default()),
                );

                let requests: Vec<_> = (0..batch).map(|_| random_params(&mut rng)).collect();
                runtime.block_on(async {
                    for (params, secret) in requests {
                        let id = service.lock(params).await.expect("lock");
                        service
                            .claim_to_destination(id, secret)
                            .await
                            .expect("claim");
                    }
                });
                black_box(service.record_count())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_identity_and_hash_lock, bench_lock_claim);
criterion_main!(benches);
