//! # Chaincode Kit Benchmarks
//!
//! | Area | Measured |
//! |------|----------|
//! | Keys | composite encoding and decoding |
//! | State | insert with unique index, point read, prefix listing |
//! | Router | full dispatch of a query and an invocation |

use cc_01_state_mapping::{Key, State};
use cc_02_router::RouterConfig;
use cc_tests::paper::{self, CommercialPaper, PaperState};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::MockStub;

fn paper(issuer: &str, number: usize) -> CommercialPaper {
    CommercialPaper {
        issuer: issuer.to_string(),
        number: number.to_string(),
        owner: issuer.to_string(),
        face_value: 1_000,
        external_id: format!("{issuer}-{number}"),
        state: PaperState::Issued,
        issued_at: None,
    }
}

// ============================================================================
// KEYS
// ============================================================================

fn bench_composite_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("keys");
    let key = Key::from(["CommercialPaper", "MagnetoCorp", "00001"]);
    let encoded = key.to_composite();

    group.bench_function("to_composite", |b| b.iter(|| black_box(&key).to_composite()));
    group.bench_function("from_composite", |b| {
        b.iter(|| Key::from_composite(black_box(&encoded)).is_ok())
    });
    group.finish();
}

// ============================================================================
// STATE
// ============================================================================

fn bench_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("state");
    let registry = match paper::entity_registry() {
        Ok(registry) => registry,
        Err(err) => panic!("paper registry: {err}"),
    };

    group.bench_function("insert_with_index", |b| {
        b.iter_batched(
            MockStub::new,
            |stub| {
                let state = State::new(&stub, &registry);
                black_box(state.insert(&paper("M", 1)).is_ok())
            },
            criterion::BatchSize::SmallInput,
        )
    });

    let stub = MockStub::new();
    let state = State::new(&stub, &registry);
    for number in 0..1_000 {
        let issuer = if number % 2 == 0 { "M" } else { "D" };
        let _ = state.insert(&paper(issuer, number));
    }

    group.bench_function("get", |b| {
        b.iter(|| state.get::<CommercialPaper>(black_box(["M", "500"])).is_ok())
    });
    group.bench_function("get_by_unique_key", |b| {
        b.iter(|| {
            state
                .get_by_unique_key::<CommercialPaper>(paper::EXTERNAL_ID, black_box("D-501"))
                .is_ok()
        })
    });

    group.throughput(Throughput::Elements(500));
    group.bench_with_input(BenchmarkId::new("list_with", "M"), &"M", |b, issuer| {
        b.iter(|| state.list_with::<CommercialPaper>(*issuer).map(|l| l.items.len()))
    });
    group.finish();
}

// ============================================================================
// ROUTER
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("router");
    let router = match paper::router(RouterConfig::default()) {
        Ok(router) => router,
        Err(err) => panic!("paper router: {err}"),
    };

    let stub = MockStub::new();
    stub.begin_str("paper.issue", &["M", "1", "100", "X-1"]);
    let _ = router.handle(&stub);

    group.bench_function("query_get", |b| {
        b.iter(|| {
            stub.begin_str("paper.get", &["M", "1"]);
            black_box(router.handle(&stub))
        })
    });
    group.bench_function("invoke_buy_unknown_owner", |b| {
        b.iter(|| {
            stub.begin_str("paper.buy", &["M", "1", "nobody", "D"]);
            black_box(router.handle(&stub))
        })
    });
    group.bench_function("method_not_found", |b| {
        b.iter(|| {
            stub.begin_str("paper.bogus", &[]);
            black_box(router.handle(&stub))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_composite_keys, bench_state, bench_dispatch);
criterion_main!(benches);
