use crate::*;

use alloc::collections::BTreeMap;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use foldlist::{EmptyAnchorPolicy, ReconcileOptions, ShadowList, Slot};

use ExpansionState::{Collapsed, Expanded};

fn anchor(id: u64, before: usize, after: usize, target: ExpansionState) -> Anchor {
    Anchor::new(id, before, after, target, CollapsedSpan::new(1, 2))
}

/// A controller whose expanded collection of `count` items is installed.
fn populated(count: usize) -> Controller {
    let mut c: Controller = Controller::default();
    c.begin_transition(Expanded).unwrap();
    c.set_anchors(Vec::new(), &mut ()).unwrap();
    let mut ops = Vec::new();
    c.notify_after_data_set(count, &mut ops).unwrap();
    assert_eq!(ops, vec![Op::InsertRange { start: 0, count }]);
    c
}

fn discard() -> Vec<Op> {
    Vec::new()
}

fn displayed(count: usize) -> Vec<ItemAnim> {
    vec![ItemAnim::default(); count]
}

#[test]
fn collapse_cycle_binds_animates_and_resyncs() {
    let mut c = populated(6);
    let mut shown = displayed(6);

    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(40, 4, 1, Collapsed)], &mut shown)
        .unwrap();
    // The item on screen is the expanded one, so it carries the detail.
    assert_eq!(shown[4].expansion_state, Some(Expanded));
    assert_eq!(shown[4].detail, Some(CollapsedSpan::new(1, 2)));
    assert_eq!(shown[0], ItemAnim::default());
    assert_eq!(c.state().anchor_phase(&40), AnchorPhase::Pending);

    let mut ops = Vec::new();
    let n = c.notify_after_data_set(3, &mut ops).unwrap();
    assert_eq!(n, ops.len());
    assert_eq!(
        ops,
        foldlist::reconcile(6, 3, &[anchor(40, 4, 1, Collapsed)]).unwrap()
    );
    let mut shadow = ShadowList::new(6);
    shadow.apply_all(&ops).unwrap();
    assert_eq!(shadow.origin_at(1), Some(Slot::Previous(4)));
    assert_eq!(c.item_count(), 3);
    assert_eq!(c.state().phase(), TransitionPhase::Idle);

    let mut bound = displayed(3);
    for (position, item) in bound.iter_mut().enumerate() {
        c.bind_item(item, position);
    }
    assert_eq!(bound[1].expansion_state, Some(Collapsed));
    assert_eq!(bound[1].detail, Some(CollapsedSpan::new(1, 2)));
    assert_eq!(bound[0].expansion_state, None);
    assert_eq!(c.state().anchor_phase(&40), AnchorPhase::Bound);
    assert_eq!(c.item_id(1).unwrap(), 40);
    assert_eq!(c.item_id(0).unwrap(), COLLAPSED_ID_OFFSET);

    let pending = c
        .on_animation_end(&40, &mut bound[1], AnimationEnd::finished())
        .unwrap()
        .unwrap();
    assert_eq!(pending, PendingResync { id: 40, index: 1 });
    assert!(!bound[1].is_custom_animated());
    assert_eq!(c.state().anchor_phase(&40), AnchorPhase::Completing);
    // Identity changes only once the resync is applied.
    assert_eq!(c.item_id(1).unwrap(), 40);

    let mut resync = Vec::new();
    let cleared = c.apply_resync(pending, &mut resync).unwrap();
    assert_eq!(cleared.id, 40);
    assert_eq!(resync, vec![Op::Change { index: 1 }]);
    assert_eq!(c.state().anchor_phase(&40), AnchorPhase::Cleared);
    assert_eq!(c.state().anchor_count(), 0);
    assert_eq!(c.item_id(1).unwrap(), COLLAPSED_ID_OFFSET + 1);

    assert!(c.is_suppressed(1));
    assert!(c.take_suppression(1));
    assert!(!c.take_suppression(1));
}

#[test]
fn expand_pre_binding_carries_no_detail() {
    let mut c = populated(4);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(Vec::new(), &mut ()).unwrap();
    c.notify_after_data_set(2, &mut discard()).unwrap();

    let mut shown = displayed(2);
    c.begin_transition(Expanded).unwrap();
    c.set_anchors(vec![anchor(7, 0, 2, Expanded)], &mut shown)
        .unwrap();
    assert_eq!(shown[0].expansion_state, Some(Collapsed));
    assert_eq!(shown[0].detail, None);

    let mut ops = Vec::new();
    c.notify_after_data_set(5, &mut ops).unwrap();
    let mut shadow = ShadowList::new(2);
    shadow.apply_all(&ops).unwrap();
    assert_eq!(shadow.len(), 5);
    assert_eq!(shadow.origin_at(2), Some(Slot::Previous(0)));

    let mut item = ItemAnim::default();
    assert!(c.bind_item(&mut item, 2));
    assert_eq!(item.expansion_state, Some(Expanded));
    assert_eq!(item.detail, Some(CollapsedSpan::new(1, 2)));
    assert_eq!(c.item_id(2).unwrap(), 7);
    assert_eq!(c.item_id(3).unwrap(), 3);
}

#[test]
fn mixed_expansion_state_is_rejected() {
    let mut c = populated(3);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(
        vec![anchor(1, 0, 0, Collapsed), anchor(2, 1, 1, Expanded)],
        &mut (),
    )
    .unwrap();
    let mut ops = Vec::new();
    assert_eq!(
        c.notify_after_data_set(2, &mut ops).unwrap_err(),
        Error::MixedExpansionState {
            expected: Collapsed,
            found: Expanded,
            index_before: 1,
            index_after: 1,
        }
    );
    assert!(ops.is_empty());
    assert_eq!(c.item_count(), 3);
}

#[test]
fn validate_requires_an_expansion_state() {
    let mut s: TransitionState = TransitionState::default();
    assert_eq!(s.validate().unwrap_err(), Error::ExpansionStateUnset);
    assert_eq!(s.item_id(0).unwrap_err(), Error::ExpansionStateUnset);
}

#[test]
fn set_anchors_before_begin_is_out_of_order() {
    let mut s: TransitionState = TransitionState::default();
    assert_eq!(
        s.set_anchors(Vec::new(), &mut ()).unwrap_err(),
        Error::OutOfOrder {
            step: "set_anchors",
            phase: TransitionPhase::Idle,
        }
    );
}

#[test]
fn duplicate_targets_leave_everything_untouched() {
    let mut s: TransitionState = TransitionState::default();
    let mut shown = displayed(4);
    s.begin_transition(Collapsed, 4).unwrap();
    let err = s
        .set_anchors(
            vec![anchor(1, 0, 2, Collapsed), anchor(2, 3, 2, Collapsed)],
            &mut shown,
        )
        .unwrap_err();
    assert_eq!(err, Error::DuplicateIndexAfter(2));
    assert_eq!(s.anchor_count(), 0);
    assert!(shown.iter().all(|item| !item.is_custom_animated()));
    assert_eq!(s.phase(), TransitionPhase::Begun);
}

#[test]
fn plan_cannot_be_reentered_before_apply() {
    let mut s: TransitionState = TransitionState::default();
    s.begin_transition(Expanded, 4).unwrap();
    s.set_anchors(vec![anchor(9, 1, 2, Expanded)], &mut ())
        .unwrap();
    assert_eq!(
        s.plan(4).unwrap_err(),
        Error::OutOfOrder {
            step: "plan",
            phase: TransitionPhase::AnchorsSet,
        }
    );
    s.validate().unwrap();
    assert!(!s.plan(4).unwrap().is_empty());

    assert_eq!(s.plan(4).unwrap_err(), Error::OperationsPending);
    assert_eq!(
        s.begin_transition(Collapsed, 4).unwrap_err(),
        Error::OperationsPending
    );

    s.mark_applied().unwrap();
    assert_eq!(s.phase(), TransitionPhase::Idle);
    assert_eq!(
        s.mark_applied().unwrap_err(),
        Error::OutOfOrder {
            step: "mark_applied",
            phase: TransitionPhase::Idle,
        }
    );
}

#[test]
fn begin_transition_records_the_previous_count() {
    let mut s: TransitionState = TransitionState::default();
    s.begin_transition(Collapsed, 12).unwrap();
    assert_eq!(s.previous_item_count(), 12);
    assert_eq!(s.expansion_state(), Some(Collapsed));
    assert_eq!(s.phase(), TransitionPhase::Begun);
}

#[test]
fn reconcile_errors_are_wrapped() {
    let mut c = populated(2);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(1, 5, 0, Collapsed)], &mut ())
        .unwrap();
    assert_eq!(
        c.notify_after_data_set(1, &mut discard()).unwrap_err(),
        Error::Reconcile(foldlist::Error::IndexBeforeOutOfRange { index: 5, count: 2 })
    );
}

#[test]
fn completing_an_unknown_anchor_fails() {
    let mut s: TransitionState = TransitionState::default();
    let err = s.complete_anchor(&99).unwrap_err();
    assert_eq!(err, Error::UnknownAnchor("99".to_string()));
    assert_eq!(err.to_string(), "no anchor with id 99");
}

#[test]
fn interrupted_animation_keeps_metadata() {
    let mut c = populated(3);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(5, 2, 0, Collapsed)], &mut ())
        .unwrap();
    c.notify_after_data_set(1, &mut discard()).unwrap();

    let mut item = ItemAnim::default();
    c.bind_item(&mut item, 0);
    let pending = c
        .on_animation_end(&5, &mut item, AnimationEnd::interrupted())
        .unwrap();
    assert_eq!(pending, None);
    assert!(item.is_custom_animated());
    assert_eq!(c.state().anchor_phase(&5), AnchorPhase::Bound);

    let pending = c
        .on_animation_end(&5, &mut item, AnimationEnd::cancelled())
        .unwrap();
    assert_eq!(pending, Some(PendingResync { id: 5, index: 0 }));
}

#[test]
fn finished_item_without_metadata_is_an_error() {
    let mut c = populated(3);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(5, 2, 0, Collapsed)], &mut ())
        .unwrap();
    c.notify_after_data_set(1, &mut discard()).unwrap();

    let mut item = ItemAnim::default();
    assert_eq!(
        c.on_animation_end(&5, &mut item, AnimationEnd::finished())
            .unwrap_err(),
        Error::MissingAnimationMetadata("5".to_string())
    );
}

#[test]
fn completing_position_is_not_rebound_as_animated() {
    let mut c = populated(4);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(
        vec![anchor(1, 0, 0, Collapsed), anchor(2, 3, 1, Collapsed)],
        &mut (),
    )
    .unwrap();
    c.notify_after_data_set(2, &mut discard()).unwrap();

    let mut first = ItemAnim::default();
    let mut second = ItemAnim::default();
    c.bind_item(&mut first, 0);
    c.bind_item(&mut second, 1);

    let pending = c
        .on_animation_end(&1, &mut first, AnimationEnd::finished())
        .unwrap()
        .unwrap();
    // The host re-binds before it gets to apply the deferred resync.
    assert!(!c.bind_item(&mut first, 0));
    assert!(!first.is_custom_animated());

    c.apply_resync(pending, &mut discard()).unwrap();
    let live: Vec<u64> = c.state().anchors().map(|a| a.id).collect();
    assert_eq!(live, vec![2]);
    assert_eq!(c.state().anchor_phase(&2), AnchorPhase::Bound);
}

#[test]
fn unconsumed_suppression_does_not_leak() {
    let mut c = populated(3);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(5, 2, 0, Collapsed)], &mut ())
        .unwrap();
    c.notify_after_data_set(1, &mut discard()).unwrap();
    let mut item = ItemAnim::default();
    c.bind_item(&mut item, 0);
    let pending = c
        .on_animation_end(&5, &mut item, AnimationEnd::finished())
        .unwrap()
        .unwrap();
    c.apply_resync(pending, &mut discard()).unwrap();
    assert!(c.is_suppressed(0));

    c.begin_transition(Expanded).unwrap();
    assert!(!c.is_suppressed(0));
}

#[test]
fn new_anchor_set_discards_unfinished_anchors() {
    let mut c = populated(3);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(5, 2, 0, Collapsed)], &mut ())
        .unwrap();
    c.notify_after_data_set(1, &mut discard()).unwrap();

    c.begin_transition(Expanded).unwrap();
    c.set_anchors(vec![anchor(6, 0, 1, Expanded)], &mut ())
        .unwrap();
    assert_eq!(c.state().anchor_phase(&5), AnchorPhase::Cleared);
    assert_eq!(c.state().anchor_phase(&6), AnchorPhase::Pending);
}

#[test]
fn gap_ids_never_collide_across_directions() {
    assert_eq!(gap_item_id(Expanded, 5, 100), 5);
    assert_eq!(gap_item_id(Collapsed, 5, 100), 105);
    assert_eq!(gap_item_id(Collapsed, 5, u64::MAX), u64::MAX);

    let opts = TransitionOptions::new().with_collapsed_id_offset(1000);
    let mut s: TransitionState = TransitionState::new(opts);
    s.begin_transition(Collapsed, 0).unwrap();
    assert_eq!(s.item_id(3).unwrap(), 1003);
}

#[test]
fn pre_binding_skips_items_that_are_not_displayed() {
    let mut window: BTreeMap<usize, ItemAnim> = BTreeMap::new();
    window.insert(10, ItemAnim::default());

    assert!(!bind_pre_transition(&anchor(1, 3, 0, Collapsed), &mut window));
    assert!(bind_pre_transition(&anchor(2, 10, 1, Collapsed), &mut window));
    assert_eq!(window[&10].expansion_state, Some(Expanded));
}

#[test]
fn replace_all_option_reaches_the_engine() {
    let reconcile = ReconcileOptions::new().with_empty_anchors(EmptyAnchorPolicy::ReplaceAll);
    let opts = TransitionOptions::new().with_reconcile(reconcile);
    let mut c: Controller = Controller::new(opts);
    c.begin_transition(Expanded).unwrap();
    c.set_anchors(Vec::new(), &mut ()).unwrap();
    c.notify_after_data_set(2, &mut discard()).unwrap();

    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(Vec::new(), &mut ()).unwrap();
    let mut ops = Vec::new();
    c.notify_after_data_set(2, &mut ops).unwrap();
    assert_eq!(
        ops,
        vec![
            Op::RemoveRange { start: 0, count: 2 },
            Op::InsertRange { start: 0, count: 2 },
        ]
    );
}

#[test]
fn stale_resync_leaves_the_next_transition_alone() {
    let mut c = populated(6);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(40, 4, 1, Collapsed)], &mut ())
        .unwrap();
    c.notify_after_data_set(3, &mut discard()).unwrap();
    let mut item = ItemAnim::default();
    c.bind_item(&mut item, 1);
    let pending = c
        .on_animation_end(&40, &mut item, AnimationEnd::finished())
        .unwrap()
        .unwrap();

    // The same item is expanded again before the deferred resync runs.
    c.begin_transition(Expanded).unwrap();
    c.set_anchors(vec![anchor(40, 1, 4, Expanded)], &mut ())
        .unwrap();

    let mut resync = discard();
    assert_eq!(
        c.apply_resync(pending, &mut resync).unwrap_err(),
        Error::StaleResync {
            id: "40".to_string(),
            index: 1,
        }
    );
    assert!(resync.is_empty());
    assert!(!c.is_suppressed(1));
    assert_eq!(c.state().anchor_phase(&40), AnchorPhase::Pending);

    let mut ops = discard();
    c.notify_after_data_set(6, &mut ops).unwrap();
    assert_eq!(
        ops,
        foldlist::reconcile(3, 6, &[anchor(40, 1, 4, Expanded)]).unwrap()
    );
    assert!(ops.iter().any(|op| matches!(op, Op::Change { .. })));
    assert_eq!(c.item_id(4).unwrap(), 40);
}

#[test]
fn resync_for_a_re_registered_anchor_is_stale() {
    let mut c = populated(3);
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(5, 2, 0, Collapsed)], &mut ())
        .unwrap();
    c.notify_after_data_set(1, &mut discard()).unwrap();
    let mut item = ItemAnim::default();
    c.bind_item(&mut item, 0);
    let pending = c
        .on_animation_end(&5, &mut item, AnimationEnd::finished())
        .unwrap()
        .unwrap();

    // Same id at the same index, but a fresh anchor of the next transition.
    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(5, 0, 0, Collapsed)], &mut ())
        .unwrap();
    assert!(c.apply_resync(pending, &mut discard()).is_err());
    assert_eq!(c.state().anchor_phase(&5), AnchorPhase::Pending);
    assert!(!c.is_suppressed(0));
}

#[test]
fn completed_anchor_is_left_out_of_the_next_plan() {
    let mut s: TransitionState = TransitionState::default();
    s.begin_transition(Collapsed, 6).unwrap();
    s.set_anchors(
        vec![anchor(1, 1, 0, Collapsed), anchor(2, 4, 2, Collapsed)],
        &mut (),
    )
    .unwrap();
    let done = s.complete_anchor(&1).unwrap();
    assert_eq!(done.index_after, 0);

    s.validate().unwrap();
    let ops = s.plan(3).unwrap();
    assert_eq!(
        ops,
        foldlist::reconcile(6, 3, &[anchor(2, 4, 2, Collapsed)]).unwrap()
    );
    let changes = ops
        .iter()
        .filter(|op| matches!(op, Op::Change { .. }))
        .count();
    assert_eq!(changes, 1);

    let mut shadow = ShadowList::new(6);
    shadow.apply_all(&ops).unwrap();
    assert_eq!(shadow.origin_at(2), Some(Slot::Previous(4)));
    assert_eq!(shadow.position_of_origin(1), None);
}

/// Always replaces the whole list, ignoring anchors.
#[derive(Clone, Copy, Debug, Default)]
struct FullRefresh;

impl Reconciler for FullRefresh {
    fn reconcile<K, D>(
        &self,
        _options: &ReconcileOptions,
        previous_count: usize,
        current_count: usize,
        _anchors: &[Anchor<K, D>],
    ) -> foldlist::Result<Vec<Op>> {
        Ok(vec![
            Op::RemoveRange {
                start: 0,
                count: previous_count,
            },
            Op::InsertRange {
                start: 0,
                count: current_count,
            },
        ])
    }
}

#[test]
fn controller_plans_with_a_custom_reconciler() {
    let mut c: Controller<ItemId, CollapsedSpan, FullRefresh> = Controller::default();
    c.begin_transition(Expanded).unwrap();
    c.set_anchors(Vec::new(), &mut ()).unwrap();
    c.notify_after_data_set(2, &mut discard()).unwrap();

    c.begin_transition(Collapsed).unwrap();
    c.set_anchors(vec![anchor(1, 1, 0, Collapsed)], &mut ())
        .unwrap();
    let mut ops = discard();
    c.notify_after_data_set(1, &mut ops).unwrap();
    assert_eq!(
        ops,
        vec![
            Op::RemoveRange { start: 0, count: 2 },
            Op::InsertRange { start: 0, count: 1 },
        ]
    );
    assert_eq!(c.item_id(0).unwrap(), 1);
}
