use criterion::*;
use std::hint::black_box;

mod common;
use common::*;

fn spawn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn");

    group.bench_function("spawn_two_components_1k", |b| {
        b.iter_batched(
            make_world,
            |mut world| {
                let entities = populate(&mut world, AGENTS_SMALL);
                black_box(entities);
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("spawn_then_destroy_1k", |b| {
        b.iter_batched(
            make_world,
            |mut world| {
                let entities = populate(&mut world, AGENTS_SMALL);
                for entity in entities {
                    world.destroy_entity(entity).unwrap();
                }
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("toggle_component_1k", |b| {
        b.iter_batched(
            || {
                let mut world = make_world();
                let entities = populate(&mut world, AGENTS_SMALL);
                (world, entities)
            },
            |(mut world, entities)| {
                for &entity in &entities {
                    world.add_component(entity, Tagged { group: 1 }).unwrap();
                    world.remove_component::<Tagged>(entity).unwrap();
                }
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, spawn_benchmark);
criterion_main!(benches);
