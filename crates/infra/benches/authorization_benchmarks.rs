use std::hint::black_box;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use authorizer_accounts::Transaction;
use authorizer_core::AccountId;
use authorizer_infra::{
    AccountService, AuthorizationService, InMemoryAccountStore, InitializeAccount,
};

/// Build an account and replay `history` accepted transactions into it.
fn seeded(history: usize) -> AuthorizationService<Arc<InMemoryAccountStore>> {
    let store = Arc::new(InMemoryAccountStore::new());
    let id = AccountId::default_account();
    let start = Utc.with_ymd_and_hms(2019, 2, 13, 0, 0, 0).unwrap();

    AccountService::new(store.clone(), id)
        .init_account(&InitializeAccount {
            active_card: true,
            max_limit: i64::MAX / 2,
            requested_at: start,
        })
        .unwrap();

    let authorizer = AuthorizationService::new(store, id);
    for i in 0..history {
        // Spread out so neither the frequency rule nor the duplicate check trips.
        let time = start + Duration::minutes(3 * i as i64);
        authorizer
            .authorize(&Transaction::new(format!("merchant-{i}"), 1, time))
            .unwrap();
    }
    authorizer
}

fn authorize_refused(c: &mut Criterion) {
    let mut group = c.benchmark_group("authorize_refused");

    for history in [0usize, 100, 1_000] {
        let authorizer = seeded(history);
        // Far beyond the limit: refused, so repeated runs do not change state.
        let t = Transaction::new(
            "bench",
            i64::MAX,
            Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        );

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(history), &t, |b, t| {
            b.iter(|| black_box(authorizer.authorize(black_box(t)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, authorize_refused);
criterion_main!(benches);
