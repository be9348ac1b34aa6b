// Copyright 2025 the Switchyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use std::cell::Cell;
use std::rc::Rc;
use switchyard_store::{Store, Subscription};

fn bench_set_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("store/set_fan_out");

    // Each `set` clones the state once per live listener; cost should be
    // linear in listener count for a cheap-to-clone state.
    for listeners in [1usize, 8, 64, 512] {
        group.throughput(Throughput::Elements(listeners as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(listeners),
            &listeners,
            |b, &listeners| {
                let store = Store::new(0u64);
                let hits = Rc::new(Cell::new(0u64));
                let subscriptions: Vec<Subscription> = (0..listeners)
                    .map(|_| {
                        let hits = Rc::clone(&hits);
                        store.subscribe(move |state| hits.set(hits.get().wrapping_add(*state)))
                    })
                    .collect();

                let mut next = 0u64;
                b.iter(|| {
                    next = next.wrapping_add(1);
                    store.set(black_box(next));
                });

                drop(subscriptions);
            },
        );
    }

    group.finish();
}

fn bench_subscribe_unsubscribe_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("store/subscription_churn");

    for resident in [0usize, 64, 512] {
        group.bench_with_input(
            BenchmarkId::from_parameter(resident),
            &resident,
            |b, &resident| {
                let store = Store::new(0u32);
                let _resident: Vec<Subscription> =
                    (0..resident).map(|_| store.subscribe(|_| {})).collect();

                b.iter_batched(
                    || (),
                    |()| {
                        let subscription = store.subscribe(|state| {
                            black_box(*state);
                        });
                        subscription.unsubscribe();
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_selected_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("store/subscribe_selected");

    // The equality gate makes unchanged projections skip the listener; both
    // paths still pay for the selector and the comparison.
    group.bench_function("projection_unchanged", |b| {
        let store = Store::new((0u64, 0u64));
        let _subscription = store.subscribe_selected(
            |state| state.1,
            |selected| {
                black_box(*selected);
            },
        );

        let mut next = 0u64;
        b.iter(|| {
            next = next.wrapping_add(1);
            store.set((black_box(next), 0));
        });
    });

    group.bench_function("projection_changed", |b| {
        let store = Store::new((0u64, 0u64));
        let _subscription = store.subscribe_selected(
            |state| state.1,
            |selected| {
                black_box(*selected);
            },
        );

        let mut next = 0u64;
        b.iter(|| {
            next = next.wrapping_add(1);
            store.set((0, black_box(next)));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set_fan_out,
    bench_subscribe_unsubscribe_churn,
    bench_selected_gate
);
criterion_main!(benches);
