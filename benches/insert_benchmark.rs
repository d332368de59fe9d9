use criterion::measurement::WallTime;
use criterion::*;

use cdt_mesh::Point2;

use crate::benchmark_utilities::*;

pub fn insert_benchmark(c: &mut Criterion) {
    fn single_insert_benchmark<I: Iterator<Item = Point2>>(
        group: &mut BenchmarkGroup<WallTime>,
        name: &'static str,
        distribution: fn() -> I,
        sizes: &[usize],
    ) {
        for size in sizes {
            group.throughput(Throughput::Elements(*size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                let data = distribution().take(*size).collect::<Vec<_>>();
                b.iter(|| mesh_with_vertices(data.iter().copied()));
            });
        }
    }

    let mut group = c.benchmark_group("insert benchmark");
    let sizes = &[200, 800, 2000, 5000, 10_000];

    single_insert_benchmark(
        &mut group,
        "uniform insertion",
        || uniform_distribution(*SEED),
        sizes,
    );

    single_insert_benchmark(
        &mut group,
        "local insertion",
        || random_walk_distribution(1.0, *SEED),
        sizes,
    );

    group.finish();
}
