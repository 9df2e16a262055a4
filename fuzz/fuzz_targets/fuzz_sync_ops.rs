#![no_main]

//! Structured fuzzing of `SyncedCollection`.
//!
//! Drives arbitrary mutation sequences against both sides and checks the
//! alignment invariants after every step. Moves are excluded because they
//! are intentionally not synchronized.

use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use synclist::{ObservableVec, SyncedCollection, ViewModel};

#[derive(Default)]
struct Item(u8);

impl ViewModel for Item {
    type Model = u8;

    fn model(&self) -> &u8 {
        &self.0
    }

    fn set_model(&mut self, model: u8) {
        self.0 = model;
    }
}

#[derive(Arbitrary, Debug)]
enum Op {
    ModelInsert(u8, u8),
    ModelRemove(u8),
    ModelRemoveRange(u8, u8),
    ModelReplace(u8, u8),
    ModelReset(Vec<u8>),
    ItemsInsert(u8, u8),
    ItemsRemove(u8),
    ItemsReplace(u8, u8),
    ItemsClear,
    Rebind(Vec<u8>),
}

#[derive(Arbitrary, Debug)]
struct Input {
    recycle: bool,
    initial: Vec<u8>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut model = ObservableVec::from_vec(input.initial);
    let synced = SyncedCollection::<Item>::builder()
        .model(model.clone())
        .recycle_view_models(input.recycle)
        .build();
    let items = synced.items();

    for op in input.ops.into_iter().take(256) {
        let len = items.len();
        let at = |i: u8| usize::from(i) % len.max(1);
        let result = match op {
            Op::ModelInsert(i, v) => model.insert(usize::from(i) % (len + 1), v),
            Op::ModelRemove(i) if len > 0 => model.remove(at(i)).map(drop),
            Op::ModelRemoveRange(i, n) if len > 0 => {
                let start = at(i);
                let count = usize::from(n).min(len - start);
                model.remove_range(start, count).map(drop)
            }
            Op::ModelReplace(i, v) if len > 0 => model.replace(at(i), v).map(drop),
            Op::ModelReset(values) => model.reset(values),
            Op::ItemsInsert(i, v) => items.insert(usize::from(i) % (len + 1), Rc::new(Item(v))),
            Op::ItemsRemove(i) if len > 0 => items.remove(at(i)).map(drop),
            Op::ItemsReplace(i, v) if len > 0 => items.replace(at(i), Rc::new(Item(v))).map(drop),
            Op::ItemsClear => items.clear(),
            Op::Rebind(values) => {
                model = ObservableVec::from_vec(values);
                synced.set_model(model.clone())
            }
            _ => Ok(()),
        };

        assert!(result.is_ok(), "in-range operation failed: {result:?}");
        assert!(!synced.is_syncing());
        if let Err(err) = synced.check_alignment() {
            panic!("sequences diverged: {err}");
        }
    }
});
