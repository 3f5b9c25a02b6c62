use criterion::*;
use std::hint::black_box;

mod common;
use common::*;

fn iterate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    group.bench_function("for_each_write_wealth_50k", |b| {
        b.iter_batched(
            || {
                let mut world = make_world();
                populate(&mut world, AGENTS_MED);
                world
            },
            |mut world| {
                world
                    .for_each_write(|_, wealth: &mut Wealth| {
                        wealth.value *= 1.0001;
                    })
                    .unwrap();
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("for_each_read_productivity_50k", |b| {
        b.iter_batched(
            || {
                let mut world = make_world();
                populate(&mut world, AGENTS_MED);
                world
            },
            |world| {
                let mut total = 0.0f32;
                world
                    .for_each_read(|_, productivity: &Productivity| {
                        total += productivity.rate;
                    })
                    .unwrap();
                black_box(total);
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("for_each_read_write_prod_to_wealth_50k", |b| {
        b.iter_batched(
            || {
                let mut world = make_world();
                populate(&mut world, AGENTS_MED);
                world
            },
            |mut world| {
                world
                    .for_each_read_write(|_, productivity: &Productivity, wealth: &mut Wealth| {
                        wealth.value += productivity.rate;
                    })
                    .unwrap();
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, iterate_benchmark);
criterion_main!(benches);
