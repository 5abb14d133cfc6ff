use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kmeans_stability::{generate, run_experiment, ExperimentConfig, FastKMeans, InitStrategy, KMeansConfig};
use std::time::Duration;

fn benchmark_generate_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_grid");
    group.sample_size(20);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_samples_per_center = 100;
    let grid_sizes = [3, 6, 10];

    for grid_size in grid_sizes.iter() {
        group.throughput(Throughput::Elements(
            (n_samples_per_center * grid_size * grid_size) as u64,
        ));
        group.bench_with_input(
            BenchmarkId::from_parameter(grid_size),
            grid_size,
            |b, &grid_size| {
                b.iter(|| generate(black_box(0), n_samples_per_center, grid_size));
            },
        );
    }
    group.finish();
}

fn benchmark_fit_by_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_grid_by_init");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let data = generate(0, 100, 3);

    for init in InitStrategy::ALL {
        for n_init in [1usize, 10] {
            let id = BenchmarkId::new(init.as_str(), n_init);
            group.bench_with_input(id, &n_init, |b, &n_init| {
                let config = KMeansConfig::new(9)
                    .with_init(init)
                    .with_n_init(n_init)
                    .with_seed(42);

                b.iter(|| {
                    let mut kmeans = FastKMeans::with_config(config.clone());
                    kmeans.train(black_box(&data.points.view())).unwrap();
                    kmeans
                });
            });
        }
    }
    group.finish();
}

fn benchmark_default_experiment(c: &mut Criterion) {
    let mut group = c.benchmark_group("experiment");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(5));

    let config = ExperimentConfig::default();

    for init in InitStrategy::ALL {
        group.bench_function(init.as_str(), |b| {
            b.iter(|| run_experiment(init, black_box(&config)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_generate_grid,
    benchmark_fit_by_init,
    benchmark_default_experiment,
);

criterion_main!(benches);
