//! Benchmarks for derivability checking and the proof-graph algorithms.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use provable::derivability::{
    DerivabilityChecker, DerivabilityCheckerWithBlocking, InferenceDerivabilityChecker,
};
use provable::graph::{essential_conclusions, prune};
use provable::inference::BaseInference;
use provable::proof::BaseProof;

type Inf = BaseInference<u32>;

const CONCLUSIONS: u32 = 2_000;

/// Layered random proof: conclusion `c` draws premises from below `c`, with
/// a few backward edges to create cycles. Conclusion 0 is the goal.
fn random_proof(seed: u64) -> BaseProof<Inf> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut inferences = Vec::new();
    for c in 0..CONCLUSIONS / 10 {
        inferences.push(Inf::new("Asserted", CONCLUSIONS - 1 - c, vec![]));
    }
    for c in 0..CONCLUSIONS {
        for _ in 0..rng.gen_range(1..=3) {
            let premises = (0..rng.gen_range(1..=3))
                .map(|_| {
                    if rng.gen_bool(0.05) {
                        rng.gen_range(0..CONCLUSIONS)
                    } else {
                        rng.gen_range(c..CONCLUSIONS)
                    }
                })
                .collect();
            inferences.push(Inf::new("r", c, premises));
        }
    }
    inferences.into_iter().collect()
}

fn bench_is_derivable(c: &mut Criterion) {
    let proof = random_proof(0);

    c.bench_function("is_derivable_2k", |bench| {
        bench.iter(|| {
            let mut checker = InferenceDerivabilityChecker::new(&proof);
            black_box(checker.is_derivable(&0))
        })
    });
}

fn bench_block_unblock(c: &mut Criterion) {
    let proof = random_proof(1);
    let mut checker = InferenceDerivabilityChecker::new(&proof);
    checker.is_derivable(&0);

    c.bench_function("block_unblock_2k", |bench| {
        bench.iter(|| {
            checker.block(&1);
            let blocked = checker.is_derivable(&0);
            checker.unblock(&1);
            black_box((blocked, checker.is_derivable(&0)))
        })
    });
}

fn bench_essential(c: &mut Criterion) {
    let proof = random_proof(2);

    c.bench_function("essential_2k", |bench| {
        bench.iter(|| black_box(essential_conclusions(&proof, &0)))
    });
}

fn bench_prune(c: &mut Criterion) {
    let proof = random_proof(3);

    c.bench_function("prune_2k", |bench| {
        bench.iter(|| black_box(prune(&proof, &0).len()))
    });
}

criterion_group!(
    benches,
    bench_is_derivable,
    bench_block_unblock,
    bench_essential,
    bench_prune
);
criterion_main!(benches);
