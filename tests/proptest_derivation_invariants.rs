//! Property-based invariant tests for derived stores.
//!
//! For arbitrary input lists and change sequences:
//!
//! 1. Initial state equals the combine result over the initial values.
//! 2. After each change the state equals the combine result over the
//!    replaced snapshot, the prior snapshot, and the prior state.
//! 3. Listeners see exactly `(new, prev)` for every change, in order.
//! 4. After destroy no input change alters the state.
//! 5. `set_state` always fails.

use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;
use tincan_derive::{derive, Snapshot, Store};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Order-sensitive, history-sensitive combine used as the reference model.
fn fold(values: &[i64], prev: Option<&[i64]>, prev_state: Option<&i64>) -> i64 {
    let weighted: i64 = values
        .iter()
        .enumerate()
        .map(|(i, v)| v.wrapping_mul(i as i64 + 1))
        .fold(0, i64::wrapping_add);
    let prev_sum: i64 = prev.map_or(0, |p| p.iter().fold(0, |acc, v| acc.wrapping_add(*v)));
    weighted
        .wrapping_add(prev_sum)
        .wrapping_add(prev_state.copied().unwrap_or(0) % 7)
}

fn combine(values: &Snapshot<i64>, prev: Option<&Snapshot<i64>>, prev_state: Option<&i64>) -> i64 {
    fold(values, prev.map(|p| p.as_slice()), prev_state)
}

fn scenario() -> impl Strategy<Value = (Vec<i64>, Vec<(usize, i64)>)> {
    prop::collection::vec(-1000i64..1000, 1..6).prop_flat_map(|initial| {
        let len = initial.len();
        let changes = prop::collection::vec((0..len, -1000i64..1000), 0..24);
        (Just(initial), changes)
    })
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn initial_state_is_combine_of_initial_values(initial in prop::collection::vec(any::<i64>(), 0..8)) {
        let stores: Vec<Store<i64>> = initial.iter().copied().map(Store::new).collect();
        let derived = derive(&stores, combine);
        prop_assert_eq!(derived.get_state(), fold(&initial, None, None));
        let snapshot = derived.snapshot();
        prop_assert_eq!(snapshot.as_slice(), initial.as_slice());
    }

    #[test]
    fn every_change_follows_the_model((initial, changes) in scenario()) {
        let stores: Vec<Store<i64>> = initial.iter().copied().map(Store::new).collect();
        let derived = derive(&stores, combine);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = derived.subscribe(move |new, prev| seen_clone.lock().push((*new, *prev)));

        let mut values = initial.clone();
        let mut state = fold(&values, None, None);
        let mut expected = Vec::new();

        for (index, value) in changes {
            let before = values.clone();
            values[index] = value;
            let next = fold(&values, Some(before.as_slice()), Some(&state));
            expected.push((next, state));
            state = next;

            stores[index].set_state(value);
            prop_assert_eq!(derived.get_state(), state);
            let snapshot = derived.snapshot();
            prop_assert_eq!(snapshot.as_slice(), values.as_slice());
            prop_assert_eq!(derived.prev_snapshot().map(|s| s.to_vec()), Some(before));
        }

        prop_assert_eq!(&*seen.lock(), &expected);
    }

    #[test]
    fn destroy_freezes_state((initial, changes) in scenario()) {
        let stores: Vec<Store<i64>> = initial.iter().copied().map(Store::new).collect();
        let derived = derive(&stores, combine);
        let frozen = derived.get_state();

        derived.destroy();
        for (index, value) in changes {
            stores[index].set_state(value);
            prop_assert_eq!(derived.get_state(), frozen);
        }
        prop_assert!(stores.iter().all(|s| s.listener_count() == 0));
    }

    #[test]
    fn set_state_never_succeeds(initial in -100i64..100, attempt in any::<i64>(), destroy in any::<bool>()) {
        let store = Store::new(initial);
        let derived = derive(&[&store], combine);
        if destroy {
            derived.destroy();
        }
        prop_assert!(derived.set_state(attempt).is_err());
        prop_assert_eq!(derived.get_state(), fold(&[initial], None, None));
    }
}
