//! Benchmarks for model → presentation synchronization.
//!
//! Run with: cargo bench -p synclist --bench sync_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use synclist::{ObservableVec, SyncedCollection, ViewModel};

#[derive(Default)]
struct Row {
    id: u32,
    label: String,
}

impl ViewModel for Row {
    type Model = u32;

    fn model(&self) -> &u32 {
        &self.id
    }

    fn set_model(&mut self, model: u32) {
        self.id = model;
    }
}

fn build(len: u32, recycle: bool) -> (ObservableVec<u32>, SyncedCollection<Row>) {
    let model = ObservableVec::from_vec((0..len).collect());
    let synced = SyncedCollection::<Row>::builder()
        .model(model.clone())
        .recycle_view_models(recycle)
        .on_item_initialized(|row: &mut Row| row.label = format!("row {}", row.id))
        .build();
    (model, synced)
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync/append");
    for &len in &[100u32, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| {
                let (model, synced) = build(0, true);
                for id in 0..len {
                    model.push(id).unwrap();
                }
                black_box(synced.len())
            });
        });
    }
    group.finish();
}

fn bench_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync/move_to_end");
    for recycle in [true, false] {
        let name = if recycle { "recycle" } else { "rebuild" };
        group.bench_function(name, |b| {
            let (model, synced) = build(500, recycle);
            b.iter(|| {
                let id = model.remove(0).unwrap();
                model.push(id).unwrap();
                black_box(synced.len())
            });
        });
    }
    group.finish();
}

fn bench_rebind(c: &mut Criterion) {
    c.bench_function("sync/rebind_1000", |b| {
        let (_, synced) = build(1_000, true);
        b.iter(|| {
            let next = ObservableVec::from_vec((0..1_000).rev().collect());
            synced.set_model(next).unwrap();
            black_box(synced.len())
        });
    });
}

criterion_group!(benches, bench_append, bench_move, bench_rebind);
criterion_main!(benches);
