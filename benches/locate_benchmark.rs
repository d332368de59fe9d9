use std::time::Duration;

use criterion::Criterion;

use crate::benchmark_utilities::*;

pub fn locate_benchmark(c: &mut Criterion) {
    const NUM_ELEMENTS: usize = 20_000;

    let mut group = c.benchmark_group("locate benchmark (uniform)");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(4));

    for size in [1000, NUM_ELEMENTS] {
        let mesh = mesh_with_vertices(uniform_distribution(*SEED2).take(size));
        let mut queries = uniform_distribution(*SEED);

        group.bench_function(format!("locate ({} vertices)", size), |b| {
            b.iter_with_setup(
                || queries.next().unwrap(),
                |point| mesh.locate_position(point),
            )
        });
    }

    group.finish();
}
