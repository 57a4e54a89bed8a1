use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gold_ledger::models::{Account, AccountBalance, Location};
use gold_ledger::services::TransferEngine;
use gold_ledger::store::{BalanceStore, InMemoryHistory};
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

fn seeded_engine(rt: &Runtime) -> (Arc<BalanceStore>, Arc<TransferEngine>) {
    let store = Arc::new(BalanceStore::new(Duration::from_millis(1000)));
    rt.block_on(async {
        for id in 1..=2 {
            store
                .insert_account(
                    Account::branch(id, 1, Location::new("Mumbai", "Maharashtra", "India")),
                    Decimal::from(1_000_000_000),
                )
                .await
                .expect("seed failed");
        }
    });
    let engine = Arc::new(TransferEngine::new(
        Arc::clone(&store),
        Arc::new(InMemoryHistory::new()),
    ));
    (store, engine)
}

fn benchmark_transfer(c: &mut Criterion) {
    let rt = Runtime::new().expect("failed to build runtime");
    let mut group = c.benchmark_group("transfer");
    group.measurement_time(Duration::from_secs(10));

    let (_store, engine) = seeded_engine(&rt);
    group.bench_function("round_trip_pair", |b| {
        b.to_async(&rt).iter(|| {
            let engine = Arc::clone(&engine);
            async move {
                engine
                    .transfer(black_box(1), black_box(2), Decimal::ONE)
                    .await
                    .expect("transfer failed");
                engine
                    .transfer(black_box(2), black_box(1), Decimal::ONE)
                    .await
                    .expect("transfer failed");
            }
        });
    });

    group.finish();
}

fn benchmark_balance_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance");

    group.bench_function("create_with_quantity", |b| {
        b.iter(|| {
            let balance =
                AccountBalance::with_quantity(black_box(1), black_box(Decimal::from(10_000)));
            black_box(balance)
        });
    });

    group.bench_function("debit_credit_cycle", |b| {
        b.iter(|| {
            let mut balance = AccountBalance::with_quantity(1, Decimal::from(10_000));
            balance.debit(black_box(Decimal::from(250))).expect("debit failed");
            balance.credit(black_box(Decimal::from(250))).expect("credit failed");
            black_box(balance)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_transfer, benchmark_balance_operations);
criterion_main!(benches);
