// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use switchyard_bind::{BindApi, BindOptions, ValueChecking};
use switchyard_bind_view::BoundBind;

fn options(values: u32, checking: ValueChecking) -> BindOptions<u32> {
    let values: Vec<u32> = (0..values).collect();
    BindOptions::new(0, values).with_checking(checking)
}

fn bench_set_value_checking(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind/set_value");

    // Strict checking scans the value set on every write; permissive writes
    // are value-set-size independent.
    for values in [4u32, 64, 1_024] {
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(
            BenchmarkId::new("permissive", values),
            &values,
            |b, &values| {
                let api = BindApi::new(options(values, ValueChecking::Permissive));
                let mut next = 0;
                b.iter(|| {
                    next = (next + 1) % values;
                    api.set_value(black_box(next)).unwrap();
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("strict", values), &values, |b, &values| {
            let api = BindApi::new(options(values, ValueChecking::Strict));
            let mut next = 0;
            b.iter(|| {
                next = (next + 1) % values;
                api.set_value(black_box(next)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_element_rerender(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_view/element_rerender");

    // Every element re-renders on every write; cost is linear in the number
    // of live elements.
    for elements in [2u32, 16, 128] {
        group.throughput(Throughput::Elements(elements as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(elements),
            &elements,
            |b, &elements| {
                let bound = BoundBind::new(options(elements, ValueChecking::Permissive));
                let bindings: Vec<_> = (0..elements)
                    .map(|value| bound.element(value, |element| element.is_active))
                    .collect();

                let mut next = 0;
                b.iter(|| {
                    next = (next + 1) % elements;
                    bound.set_value(black_box(next)).unwrap();
                });

                drop(bindings);
            },
        );
    }

    group.finish();
}

fn bench_mount_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_view/mount_cycle");

    // Models a host mounting and unmounting a whole selection per frame.
    group.bench_function("bound_bind", |b| {
        b.iter_batched(
            || options(8, ValueChecking::Permissive),
            |options| {
                let bound = BoundBind::new(options);
                let binding = bound.element(3, |element| element.is_active);
                black_box(binding.output());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set_value_checking,
    bench_element_rerender,
    bench_mount_cycle
);
criterion_main!(benches);
