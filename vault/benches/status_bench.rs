// Status benchmarks for the time-locked vault.
//
// Covers countdown formatting across magnitudes, status snapshots of a
// funded vault, and the full snapshot path of the app store.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use timelock_vault::ada::Lovelace;
use timelock_vault::app::VaultApp;
use timelock_vault::clock::ManualClock;
use timelock_vault::config::LatencyProfile;
use timelock_vault::latency::NoLatency;
use timelock_vault::session::{MemorySessionStore, SessionContext};
use timelock_vault::vault::{format_remaining, TimeLockedVault, UnlockDelay};

const T0: u64 = 1_700_000_000_000;

fn bench_format_remaining(c: &mut Criterion) {
    let mut group = c.benchmark_group("countdown/format_remaining");

    for (label, ms) in [
        ("zero", 0u64),
        ("seconds", 42_000),
        ("hours", 3_661_000),
        ("days", 90 * 86_400_000 + 1_000),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &ms, |b, &ms| {
            b.iter(|| format_remaining(ms));
        });
    }

    group.finish();
}

fn bench_vault_status(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let clock = Arc::new(ManualClock::new(T0));
    let mut vault = TimeLockedVault::new(
        clock.clone(),
        Arc::new(NoLatency),
        LatencyProfile::instant(),
    );
    vault.generate_address();
    vault.configure_unlock_delay(UnlockDelay::new(1, 2, 3, 4, 5));
    rt.block_on(vault.deposit(Lovelace::from_ada(50), "addr1bench"));

    c.bench_function("vault/status", |b| {
        b.iter(|| vault.status());
    });
}

fn bench_app_snapshot(c: &mut Criterion) {
    let clock = Arc::new(ManualClock::new(T0));
    let app = VaultApp::new(
        SessionContext::open(Arc::new(MemorySessionStore::new())),
        clock.clone(),
        Arc::new(NoLatency),
        LatencyProfile::instant(),
    );

    c.bench_function("app/snapshot", |b| {
        b.iter(|| {
            clock.advance(1_000);
            app.snapshot()
        });
    });
}

criterion_group!(
    benches,
    bench_format_remaining,
    bench_vault_status,
    bench_app_snapshot,
);
criterion_main!(benches);
