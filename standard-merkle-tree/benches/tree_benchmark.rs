#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use standard_merkle_tree::{Keccak256, MultiProof, StandardMerkleTree, process_multi_proof};

fn values(count: u32) -> Vec<[u8; 4]> {
    (0..count).map(|i| i.to_le_bytes()).collect()
}

fn build(count: u32) -> StandardMerkleTree {
    StandardMerkleTree::of(&values(count)).expect("build")
}

fn bench(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("tree build");
        for input in [1_000u32, 10_000, 100_000].iter() {
            group.bench_with_input(BenchmarkId::new("leaves", input), input, |b, &size| {
                b.iter(|| build(size));
            });
        }
    }

    c.bench_function("tree get proof", |b| {
        let tree = build(100_000);
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 7919) % tree.len();
            tree.get_proof(i).expect("proof")
        });
    });

    c.bench_function("tree get multiproof", |b| {
        let tree = build(100_000);
        let indices: Vec<usize> = (0..tree.len()).step_by(997).collect();
        b.iter(|| tree.get_multi_proof(&indices).expect("multiproof"));
    });

    c.bench_function("tree verify multiproof", |b| {
        let tree = build(100_000);
        let indices: Vec<usize> = (0..tree.len()).step_by(997).collect();
        let proof: MultiProof = tree.get_multi_proof(&indices).expect("multiproof").multiproof;
        b.iter(|| process_multi_proof::<Keccak256>(&proof).expect("verify"));
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench
);
criterion_main!(benches);
