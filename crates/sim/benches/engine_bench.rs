use germinal_sim::evolution::{MotifModel, Response};
use germinal_sim::simulation::{BranchingProcess, BranchingProcessBuilder, CapacityMethod};
use germinal_sim::tree::{LineageState, Tree};
use germinal_sim::Sequence;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::str::FromStr;
use std::sync::Arc;

fn discrete_process(capacity: usize, method: CapacityMethod) -> BranchingProcess {
    let space = vec![-1.0, 0.0, 1.0, 2.0];
    let matrix = vec![
        vec![0.0, 0.6, 0.3, 0.1],
        vec![0.5, 0.0, 0.4, 0.1],
        vec![0.2, 0.5, 0.0, 0.3],
        vec![0.1, 0.3, 0.6, 0.0],
    ];
    BranchingProcessBuilder::new()
        .birth(Response::sigmoid(1.5, -0.1, 2.5, 0.6))
        .death(Response::constant(1.0))
        .mutation(Response::constant(1.0))
        .discrete_mutator(space, matrix)
        .horizon(15.0)
        .capacity(capacity, method)
        .min_survivors(0)
        .build()
        .unwrap()
}

fn bench_evolve_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve_capacity");
    group.sample_size(20);

    for &capacity in &[100usize, 1000] {
        group.throughput(Throughput::Elements(capacity as u64));
        for method in [CapacityMethod::Birth, CapacityMethod::Hard] {
            let process = discrete_process(capacity, method);
            group.bench_with_input(
                BenchmarkId::new(method.as_str(), capacity),
                &process,
                |b, process| {
                    let mut seed = 0;
                    b.iter(|| {
                        seed += 1;
                        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                        let tree = process.evolve(Tree::new(LineageState::discrete(0.0)), &mut rng);
                        black_box(tree.map(|t| t.len()).unwrap_or(0))
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_sample_and_prune(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_and_prune");
    let process = discrete_process(1000, CapacityMethod::Birth);
    let tree = (0..)
        .find_map(|seed| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            process
                .evolve(Tree::new(LineageState::discrete(0.0)), &mut rng)
                .ok()
        })
        .unwrap();

    group.throughput(Throughput::Elements(tree.len() as u64));
    group.bench_function("p_0.1", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
                tree.sample_survivors(0.1, &mut rng).unwrap();
                tree.prune();
                black_box(tree)
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_sequence_context_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_context_rate");
    let model = Arc::new(MotifModel::uniform(0.01, Some(336)).unwrap());
    let response = Response::sequence_context(model, 1.0);
    let sequence = Sequence::from_str(&"GAGGTGCAGCTTCAG".repeat(44)).unwrap();
    let state = LineageState::with_sequence(0.0, sequence);

    group.bench_function("total_mutability", |b| {
        b.iter(|| black_box(response.rate(black_box(&state), 0.0)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_evolve_capacity,
    bench_sample_and_prune,
    bench_sequence_context_rate
);
criterion_main!(benches);
