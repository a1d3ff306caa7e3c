use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stonehaven_wfc::{templates, AdjacencyRules, CollapseConfig, Solver};

fn bench_collapse(c: &mut Criterion) {
    let rules = match AdjacencyRules::compile(&templates::grass_water_derived()) {
        Ok(rules) => rules,
        Err(e) => panic!("template failed to compile: {e}"),
    };
    let solver = Solver::new(&rules, CollapseConfig::default());

    let mut group = c.benchmark_group("collapse");
    for size in [16usize, 32, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = fastrand::Rng::with_seed(1);
            b.iter(|| black_box(solver.solve(size, size, &mut rng, None)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_collapse);
criterion_main!(benches);
