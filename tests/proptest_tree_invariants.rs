//! Property-based invariant tests for collections and live children.
//!
//! 1. Collection membership follows a plain `Vec` model under add/remove/clear
//! 2. Replaying the notification deltas reproduces the membership
//! 3. Mutations that change nothing notify nobody
//! 4. A constructed container's native children mirror its component children
//! 5. A node never appears among its own children
//! 6. Parent links agree with membership
//! 7. Re-adding a member is rejected and changes nothing

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use spark_tree::primitives::{text, vbox};
use spark_tree::{ChangeKind, Component, Error, Handle, Lifecycle, ReactiveCollection};

// ── Helpers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    AddAll(Vec<u8>),
    Remove(u8),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..6).prop_map(Op::Add),
        2 => proptest::collection::vec(0u8..6, 0..4).prop_map(Op::AddAll),
        3 => (0u8..6).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

type Log = Rc<RefCell<Vec<(ChangeKind, Vec<u8>)>>>;

fn recording(collection: &ReactiveCollection<u8>) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = log.clone();
    collection.subscribe(move |kind, delta| {
        log_clone.borrow_mut().push((kind, delta.to_vec()));
        Ok(())
    });
    log
}

fn replay(log: &[(ChangeKind, Vec<u8>)]) -> Vec<u8> {
    let mut items = Vec::new();
    for (kind, delta) in log {
        match kind {
            ChangeKind::Add => items.extend(delta.iter().copied()),
            ChangeKind::Remove => {
                for removed in delta {
                    if let Some(index) = items.iter().position(|i| i == removed) {
                        items.remove(index);
                    }
                }
            }
            ChangeKind::None => {}
        }
    }
    items
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Collection model
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn collection_follows_vec_model(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let collection = ReactiveCollection::new();
        let log = recording(&collection);
        let mut model: Vec<u8> = Vec::new();

        for op in ops {
            let before = log.borrow().len();
            let changed = match op {
                Op::Add(x) => {
                    collection.add(x).unwrap();
                    model.push(x);
                    true
                }
                Op::AddAll(xs) => {
                    collection.add_all(xs.clone()).unwrap();
                    model.extend(&xs);
                    !xs.is_empty()
                }
                Op::Remove(x) => {
                    let removed = collection.remove(&x).unwrap();
                    let expected = model.iter().position(|i| *i == x);
                    prop_assert_eq!(removed, expected.is_some());
                    if let Some(index) = expected {
                        model.remove(index);
                    }
                    removed
                }
                Op::Clear => {
                    let had_items = !model.is_empty();
                    collection.clear().unwrap();
                    model.clear();
                    had_items
                }
            };
            let after = log.borrow().len();
            prop_assert_eq!(after - before, usize::from(changed));
            prop_assert_eq!(collection.snapshot(), model.clone());
        }

        prop_assert_eq!(replay(&log.borrow()), collection.snapshot());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-6. Live children
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn native_children_mirror_components(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let pool: Vec<Component> = (0..6).map(|i| text(format!("t{i}"))).collect();
        let parent = vbox([]);
        let native = parent.construct().unwrap().unwrap();

        for op in ops {
            match op {
                Op::Add(i) => {
                    let child = &pool[usize::from(i)];
                    if child.parent().is_none() {
                        parent.add(child.clone()).unwrap();
                    } else {
                        let err = parent.add(child.clone()).unwrap_err();
                        prop_assert!(matches!(err, Error::IllegalState(_)));
                    }
                }
                Op::AddAll(indices) => {
                    let mut free: Vec<Component> = Vec::new();
                    for i in indices {
                        let child = &pool[usize::from(i)];
                        if child.parent().is_none() && !free.contains(child) {
                            free.push(child.clone());
                        }
                    }
                    parent.add_all(free).unwrap();
                }
                Op::Remove(i) => {
                    parent.remove(&pool[usize::from(i)]).unwrap();
                }
                Op::Clear => {
                    parent.children().clear().unwrap();
                }
            }

            // Self-insertion is filtered out silently.
            parent.children().add(parent.clone()).unwrap();
            prop_assert!(!parent.children().contains(&parent));

            let expected: Vec<Handle> = parent
                .children()
                .snapshot()
                .iter()
                .filter_map(Component::handle)
                .collect();
            prop_assert_eq!(native.children(), expected);

            for child in &pool {
                let member = parent.children().contains(child);
                prop_assert_eq!(child.parent().as_ref() == Some(&parent), member);
                prop_assert_eq!(child.is_constructed(), member);
            }
        }
    }
}
