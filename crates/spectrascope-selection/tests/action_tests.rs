//! Selection resolver and store integration tests

use std::collections::BTreeSet;

use proptest::prelude::*;
use rstest::rstest;
use spectrascope_selection::{
    compute_area_selection_action, compute_selection_action, ActionExecutor, AreaHit, Modifiers,
    PointHit, SelectMode, SelectionAction, SelectionModifiers, SelectionStore,
};

const N: usize = 64;

fn index_set() -> impl Strategy<Value = BTreeSet<usize>> {
    prop::collection::btree_set(0..N, 0..N)
}

fn modifiers() -> impl Strategy<Value = SelectionModifiers> {
    (any::<bool>(), any::<bool>()).prop_map(|(shift, ctrl)| SelectionModifiers { shift, ctrl })
}

proptest! {
    #[test]
    fn test_area_action_never_clears(
        current in index_set(),
        hit in prop::collection::vec(0..N, 0..N),
        mods in modifiers(),
    ) {
        let action = compute_area_selection_action(&AreaHit::new(hit), &current, mods);
        prop_assert_ne!(action, SelectionAction::Clear);
    }

    #[test]
    fn test_area_action_matching_selection_never_clears(
        current in index_set(),
        mods in modifiers(),
    ) {
        let hit = AreaHit::new(current.iter().copied().collect());
        let action = compute_area_selection_action(&hit, &current, mods);
        prop_assert_ne!(action, SelectionAction::Clear);
    }

    #[test]
    fn test_plain_click_clear_or_replace(current in index_set(), index in 0..N) {
        let action =
            compute_selection_action(PointHit { index }, &current, SelectionModifiers::NONE);
        if current.len() == 1 && current.contains(&index) {
            prop_assert_eq!(action, SelectionAction::Clear);
        } else {
            prop_assert_eq!(action, SelectionAction::Replace(vec![index]));
        }
    }

    #[test]
    fn test_double_toggle_is_identity(
        initial in index_set(),
        toggled in prop::collection::vec(0..N * 2, 0..N),
    ) {
        let mut store = SelectionStore::new(N);
        store.select(initial.iter().copied(), SelectMode::Replace);
        store.toggle(toggled.iter().copied());
        store.toggle(toggled.iter().copied());
        prop_assert_eq!(&**store.selected(), &initial);
    }

    #[test]
    fn test_store_never_holds_out_of_range(indices in prop::collection::vec(0..N * 3, 0..N)) {
        let mut store = SelectionStore::new(N);
        store.select(indices.iter().copied(), SelectMode::Add);
        store.toggle(indices.iter().copied().rev());
        store.pin(indices.iter().copied());
        prop_assert!(store.selected().iter().all(|&i| i < N));
        prop_assert!(store.pinned().iter().all(|&i| i < N));
    }

    #[test]
    fn test_repeated_shift_area_is_stable(
        initial in index_set(),
        hit in prop::collection::vec(0..N, 1..N),
    ) {
        let mut store = SelectionStore::new(N);
        store.select(initial.iter().copied(), SelectMode::Replace);
        let area = AreaHit::new(hit);

        ActionExecutor::new(&mut store).handle_area(&area, SelectionModifiers::SHIFT);
        let after_first = store.selected().clone();
        ActionExecutor::new(&mut store).handle_area(&area, SelectionModifiers::SHIFT);
        prop_assert_eq!(store.selected(), &after_first);
    }
}

#[rstest]
#[case::none(Modifiers::new(), SelectionAction::Replace(vec![7]))]
#[case::shift(Modifiers::new().with_shift(), SelectionAction::Add(vec![7]))]
#[case::ctrl(Modifiers::new().with_ctrl(), SelectionAction::Toggle(vec![7]))]
#[case::meta(Modifiers::new().with_meta(), SelectionAction::Toggle(vec![7]))]
#[case::shift_ctrl(Modifiers::new().with_shift().with_ctrl(), SelectionAction::Add(vec![7]))]
#[case::alt(Modifiers::new().with_alt(), SelectionAction::Replace(vec![7]))]
fn test_click_modifier_table(#[case] modifiers: Modifiers, #[case] expected: SelectionAction) {
    let current = BTreeSet::from([1, 2]);
    assert_eq!(
        compute_selection_action(PointHit { index: 7 }, &current, modifiers.selection()),
        expected
    );
}

#[rstest]
#[case::none(SelectionModifiers::NONE, &[4, 5])]
#[case::shift(SelectionModifiers::SHIFT, &[1, 2, 4, 5])]
#[case::ctrl(SelectionModifiers::CTRL, &[1, 2, 5])]
fn test_area_modifier_table(#[case] modifiers: SelectionModifiers, #[case] expected: &[usize]) {
    let mut store = SelectionStore::new(10);
    store.select([1, 2, 4], SelectMode::Replace);
    ActionExecutor::new(&mut store).handle_area(&AreaHit::new(vec![4, 5]), modifiers);
    assert_eq!(store.selected().iter().copied().collect::<Vec<_>>(), expected);
}

#[test]
fn test_shift_drag_twice_over_selected_region() {
    let mut store = SelectionStore::new(10);
    store.select([2, 3, 4], SelectMode::Replace);
    let region = AreaHit::new(vec![2, 3, 4]);

    for _ in 0..2 {
        ActionExecutor::new(&mut store).handle_area(&region, SelectionModifiers::SHIFT);
        assert_eq!(**store.selected(), BTreeSet::from([2, 3, 4]));
    }
}

#[rstest]
#[case::none(SelectionModifiers::NONE)]
#[case::shift(SelectionModifiers::SHIFT)]
#[case::ctrl(SelectionModifiers::CTRL)]
fn test_stale_area_hit_keeps_selection(#[case] modifiers: SelectionModifiers) {
    let mut store = SelectionStore::new(10);
    store.select([1, 2], SelectMode::Replace);
    let revision = store.revision();

    ActionExecutor::new(&mut store).handle_area(&AreaHit::new(vec![50, 60]), modifiers);
    assert_eq!(**store.selected(), BTreeSet::from([1, 2]));
    assert_eq!(store.revision(), revision);
}

#[test]
fn test_partly_stale_area_hit_keeps_in_range_indices() {
    let mut store = SelectionStore::new(10);
    store.select([1, 2], SelectMode::Replace);
    ActionExecutor::new(&mut store)
        .handle_area(&AreaHit::new(vec![3, 60]), SelectionModifiers::NONE);
    assert_eq!(**store.selected(), BTreeSet::from([3]));
}
