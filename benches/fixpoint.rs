//! Benchmarks for parsing and fixpoint model checking.
//!
//! Models are random but deterministic (seeded `ChaCha8Rng`), so runs are comparable.
//!
//! Run with:
//! ```bash
//! cargo bench --bench fixpoint
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ctl_rs::{parse, tokenize, Formula, Model, ModelChecker, State};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const PROPERTIES: [&str; 4] = ["p", "q", "r", "s"];

/// Generate a deterministic random model with `states` states and about `degree` successors each.
fn random_model(seed: u64, states: usize, degree: usize) -> Model<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..states)
        .map(|i| {
            let mut state = State::new(i).with_initial(i == 0);
            for p in PROPERTIES {
                if rng.random_bool(0.5) {
                    state = state.with_property(p);
                }
            }
            for _ in 0..degree {
                state = state.with_transition(rng.random_range(0..states));
            }
            state
        })
        .collect()
}

fn formulas() -> Vec<(&'static str, Formula)> {
    [
        "AG (p -> AF q)",
        "EG (p | q)",
        "E(p U (q & EX r))",
        "A(p W !s) & EF AG r",
        "AG EF (p & q & r & s)",
    ]
    .into_iter()
    .filter_map(|text| parse(text).ok().map(|f| (text, f)))
    .collect()
}

// ============================================================================
// Benchmark: Parsing
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    // A long right-nested implication chain with temporal operators sprinkled in.
    let long = (0..200)
        .map(|i| if i % 3 == 0 { format!("AF x{}", i) } else { format!("x{}", i) })
        .collect::<Vec<_>>()
        .join(" -> ");

    for (name, input) in [("small", "A(a U b) & E(c W !d) -> AG EF e".to_string()), ("long", long)] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", name), &input, |b, input| {
            b.iter(|| tokenize(input).map(|tokens| tokens.len()));
        });
        group.bench_with_input(BenchmarkId::new("parse", name), &input, |b, input| {
            b.iter(|| parse(input).map(|f| f.depth()));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Checking
// ============================================================================

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");
    let formulas = formulas();

    for states in [100, 1000, 10000] {
        let model = random_model(42, states, 3);

        group.throughput(Throughput::Elements(states as u64));
        for (text, formula) in formulas.iter() {
            group.bench_with_input(BenchmarkId::new(*text, states), &model, |b, model| {
                b.iter(|| ModelChecker::new(model).sat(formula).map(|set| set.len()));
            });
        }
    }

    group.finish();
}

// ============================================================================
// Benchmark: Fixpoint depth
// ============================================================================

/// A ring where only one state lacks `p`, so `EG p` removes one state per iteration.
fn ring(states: usize) -> Model<usize> {
    (0..states)
        .map(|i| {
            let state = State::new(i).with_transition((i + 1) % states);
            if i == 0 {
                state
            } else {
                state.with_property("p")
            }
        })
        .collect()
}

fn bench_fixpoint_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixpoint");
    let eg = Formula::atom("p").eg();
    let ef = Formula::True.eu(Formula::atom("p").not());

    for states in [64, 256, 1024] {
        let model = ring(states);
        group.bench_with_input(BenchmarkId::new("EG ring", states), &model, |b, model| {
            b.iter(|| ModelChecker::new(model).sat(&eg).map(|set| set.len()));
        });
        group.bench_with_input(BenchmarkId::new("EU ring", states), &model, |b, model| {
            b.iter(|| ModelChecker::new(model).sat(&ef).map(|set| set.len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_check, bench_fixpoint_depth);
criterion_main!(benches);
