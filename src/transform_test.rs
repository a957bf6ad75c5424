#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn machine() -> TransformMachine {
    TransformMachine::default()
}

fn selection_of(ids: &[u64]) -> SelectionSet {
    let mut sel = SelectionSet::new();
    for id in ids {
        sel.toggle(EntityId(*id));
    }
    sel
}

fn drag(dx: f64, dy: f64) -> GestureUpdate {
    GestureUpdate::Drag(Offset::new(dx, dy))
}

// =============================================================
// compose
// =============================================================

#[test]
fn compose_without_deltas_is_identity() {
    let t = CanvasTransform::new(2.0, Offset::new(3.0, 4.0));
    assert_eq!(compose(&t, &[], 0.01), t);
}

#[test]
fn compose_multiplies_zoom_and_adds_pan() {
    let t = CanvasTransform::new(2.0, Offset::new(3.0, 4.0));
    let out = compose(&t, &[GestureDelta::Zoom(1.5), GestureDelta::Pan(Offset::new(10.0, -1.0))], 0.01);
    assert!(approx_eq(out.zoom, 3.0));
    assert_eq!(out.pan, Offset::new(13.0, 3.0));
}

#[test]
fn compose_ignores_selection_drag() {
    let t = CanvasTransform::default();
    assert_eq!(compose(&t, &[GestureDelta::Drag(Offset::new(9.0, 9.0))], 0.01), t);
}

#[test]
fn compose_clamps_zoom() {
    let t = CanvasTransform::default();
    assert_eq!(compose(&t, &[GestureDelta::Zoom(0.0)], 0.05).zoom, 0.05);
    assert_eq!(compose(&t, &[GestureDelta::Zoom(-2.0)], 0.05).zoom, 0.05);
}

#[test]
fn compose_ignores_non_finite_zoom() {
    let t = CanvasTransform::new(2.0, Offset::ZERO);
    assert_eq!(compose(&t, &[GestureDelta::Zoom(f64::NAN)], 0.01).zoom, 2.0);
    assert_eq!(compose(&t, &[GestureDelta::Zoom(f64::INFINITY)], 0.01).zoom, 2.0);
}

#[test]
fn compose_ignores_non_finite_pan() {
    let t = CanvasTransform::new(1.0, Offset::new(3.0, 4.0));
    assert_eq!(compose(&t, &[GestureDelta::Pan(Offset::new(f64::NAN, 1.0))], 0.01), t);
    assert_eq!(compose(&t, &[GestureDelta::Pan(Offset::new(0.0, f64::INFINITY))], 0.01), t);
}

#[test]
fn non_finite_pan_commit_keeps_persisted_pan() {
    let mut m = machine();
    m.restore(CanvasTransform::new(1.0, Offset::new(3.0, 4.0)));
    m.begin(GestureKind::Drag, &SelectionSet::new());
    m.end(drag(f64::NAN, 0.0));
    assert_eq!(m.persisted().pan, Offset::new(3.0, 4.0));
}

// =============================================================
// Target resolution and phases
// =============================================================

#[test]
fn starts_idle() {
    let m = machine();
    assert_eq!(m.phase(), Phase::Idle);
    assert!(m.target().is_none());
    assert!(m.deltas().is_empty());
    assert_eq!(m.persisted(), CanvasTransform::default());
}

#[test]
fn empty_selection_targets_canvas() {
    let mut m = machine();
    assert_eq!(m.begin(GestureKind::Drag, &SelectionSet::new()), &GestureTarget::Canvas);
    assert_eq!(m.phase(), Phase::CanvasGestureActive);
}

#[test]
fn non_empty_selection_targets_selection() {
    let mut m = machine();
    let target = m.begin(GestureKind::Magnify, &selection_of(&[9, 7])).clone();
    assert_eq!(target, GestureTarget::Selection(vec![EntityId(7), EntityId(9)]));
    assert_eq!(m.phase(), Phase::SelectionGestureActive);
}

#[test]
fn second_gesture_joins_captured_target() {
    let mut m = machine();
    m.begin(GestureKind::Drag, &SelectionSet::new());
    let target = m.begin(GestureKind::Magnify, &selection_of(&[1])).clone();
    assert_eq!(target, GestureTarget::Canvas);
}

#[test]
fn end_returns_to_idle() {
    let mut m = machine();
    m.begin(GestureKind::Drag, &SelectionSet::new());
    m.end(drag(1.0, 1.0));
    assert_eq!(m.phase(), Phase::Idle);
}

#[test]
fn stays_active_while_other_gesture_in_flight() {
    let mut m = machine();
    let sel = SelectionSet::new();
    m.begin(GestureKind::Drag, &sel);
    m.begin(GestureKind::Magnify, &sel);
    m.end(drag(5.0, 0.0));
    assert_eq!(m.phase(), Phase::CanvasGestureActive);
    assert!(m.is_active(GestureKind::Magnify));
    assert!(!m.is_active(GestureKind::Drag));
    m.end(GestureUpdate::Magnify(2.0));
    assert_eq!(m.phase(), Phase::Idle);
}

// =============================================================
// Updates
// =============================================================

#[test]
fn update_without_gesture_is_rejected() {
    let mut m = machine();
    assert!(!m.update(drag(1.0, 1.0)));
    assert!(!m.update(GestureUpdate::Magnify(2.0)));
}

#[test]
fn update_of_other_kind_is_rejected() {
    let mut m = machine();
    m.begin(GestureKind::Drag, &SelectionSet::new());
    assert!(!m.update(GestureUpdate::Magnify(2.0)));
    assert!(m.update(drag(1.0, 1.0)));
}

#[test]
fn last_update_wins() {
    let mut m = machine();
    m.begin(GestureKind::Drag, &SelectionSet::new());
    m.update(drag(10.0, 10.0));
    m.update(drag(3.0, -2.0));
    assert_eq!(m.deltas(), vec![GestureDelta::Pan(Offset::new(3.0, -2.0))]);
    assert_eq!(m.live_transform().pan, Offset::new(3.0, -2.0));
}

#[test]
fn live_transform_composes_pan_and_zoom() {
    let mut m = machine();
    let sel = SelectionSet::new();
    m.begin(GestureKind::Drag, &sel);
    m.begin(GestureKind::Magnify, &sel);
    m.update(drag(20.0, 30.0));
    m.update(GestureUpdate::Magnify(3.0));
    let live = m.live_transform();
    assert_eq!(live.zoom, 3.0);
    assert_eq!(live.pan, Offset::new(20.0, 30.0));
    assert_eq!(m.persisted(), CanvasTransform::default());
}

#[test]
fn restarting_resets_delta() {
    let mut m = machine();
    m.begin(GestureKind::Drag, &SelectionSet::new());
    m.update(drag(40.0, 40.0));
    m.begin(GestureKind::Drag, &SelectionSet::new());
    assert_eq!(m.deltas(), vec![GestureDelta::Pan(Offset::ZERO)]);
}

// =============================================================
// Canvas commits
// =============================================================

#[test]
fn pan_end_adds_to_persisted_pan() {
    let mut m = machine();
    m.begin(GestureKind::Drag, &SelectionSet::new());
    m.update(drag(5.0, 5.0));
    let commit = m.end(drag(20.0, 30.0)).unwrap();
    assert_eq!(
        commit,
        Commit::Canvas {
            before: CanvasTransform::default(),
            after: CanvasTransform::new(1.0, Offset::new(20.0, 30.0)),
        }
    );
    assert_eq!(m.persisted().pan, Offset::new(20.0, 30.0));
}

#[test]
fn zoom_end_multiplies_persisted_zoom() {
    let mut m = machine();
    m.restore(CanvasTransform::new(2.0, Offset::ZERO));
    m.begin(GestureKind::Magnify, &SelectionSet::new());
    m.end(GestureUpdate::Magnify(1.5));
    assert!(approx_eq(m.persisted().zoom, 3.0));
}

#[test]
fn zoom_end_with_zero_or_negative_factor_stays_positive() {
    for factor in [0.0, -1.0, -100.0] {
        let mut m = machine();
        m.begin(GestureKind::Magnify, &SelectionSet::new());
        m.end(GestureUpdate::Magnify(factor));
        assert!(m.persisted().zoom > 0.0, "factor {factor} drove zoom to {}", m.persisted().zoom);
    }
}

#[test]
fn end_without_gesture_is_none() {
    let mut m = machine();
    assert!(m.end(drag(1.0, 1.0)).is_none());
    m.begin(GestureKind::Magnify, &SelectionSet::new());
    assert!(m.end(drag(1.0, 1.0)).is_none());
    assert_eq!(m.phase(), Phase::CanvasGestureActive);
}

#[test]
fn restore_clamps_zoom() {
    let mut m = machine();
    m.restore(CanvasTransform::new(-3.0, Offset::new(1.0, 2.0)));
    assert_eq!(m.persisted().zoom, EngineConfig::default().min_zoom);
    assert_eq!(m.persisted().pan, Offset::new(1.0, 2.0));
}

// =============================================================
// Selection commits
// =============================================================

#[test]
fn selection_drag_never_touches_canvas() {
    let mut m = machine();
    m.begin(GestureKind::Drag, &selection_of(&[1, 2, 3]));
    m.update(drag(50.0, 50.0));
    assert_eq!(m.live_transform(), CanvasTransform::default());
    let commit = m.end(drag(10.0, -4.0)).unwrap();
    assert_eq!(
        commit,
        Commit::Selection {
            ids: vec![EntityId(1), EntityId(2), EntityId(3)],
            delta: SelectionDelta::Move(Offset::new(10.0, -4.0)),
        }
    );
    assert_eq!(m.persisted(), CanvasTransform::default());
}

#[test]
fn selection_drag_offset_ignores_zoom() {
    let mut m = machine();
    m.restore(CanvasTransform::new(2.0, Offset::ZERO));
    m.begin(GestureKind::Drag, &selection_of(&[1]));
    let commit = m.end(drag(10.0, -4.0)).unwrap();
    assert_eq!(
        commit,
        Commit::Selection { ids: vec![EntityId(1)], delta: SelectionDelta::Move(Offset::new(10.0, -4.0)) }
    );
}

#[test]
fn selection_resize_forwards_factor_and_keeps_zoom() {
    let mut m = machine();
    m.begin(GestureKind::Magnify, &selection_of(&[7, 9]));
    let commit = m.end(GestureUpdate::Magnify(2.0)).unwrap();
    assert_eq!(
        commit,
        Commit::Selection { ids: vec![EntityId(7), EntityId(9)], delta: SelectionDelta::Resize(2.0) }
    );
    assert_eq!(m.persisted().zoom, 1.0);
}

#[test]
fn selection_resize_clamps_non_positive_factor() {
    let mut m = machine();
    m.begin(GestureKind::Magnify, &selection_of(&[1]));
    let Some(Commit::Selection { delta: SelectionDelta::Resize(f), .. }) = m.end(GestureUpdate::Magnify(-1.0)) else {
        panic!("expected selection resize commit");
    };
    assert_eq!(f, EngineConfig::default().min_resize_factor);
}

#[test]
fn selection_captured_at_start_survives_selection_change() {
    let mut m = machine();
    let mut sel = selection_of(&[1]);
    m.begin(GestureKind::Drag, &sel);
    sel.toggle(EntityId(2));
    m.begin(GestureKind::Magnify, &sel);
    let Some(Commit::Selection { ids, .. }) = m.end(GestureUpdate::Magnify(1.1)) else {
        panic!("expected selection commit");
    };
    assert_eq!(ids, vec![EntityId(1)]);
}

#[test]
fn selection_motion_reports_live_offset_and_scale() {
    let mut m = machine();
    let sel = selection_of(&[4]);
    m.begin(GestureKind::Drag, &sel);
    m.begin(GestureKind::Magnify, &sel);
    m.update(drag(12.0, 8.0));
    m.update(GestureUpdate::Magnify(0.5));
    let motion = m.selection_motion().unwrap();
    assert_eq!(motion.ids, &[EntityId(4)]);
    assert_eq!(motion.offset, Offset::new(12.0, 8.0));
    assert_eq!(motion.scale, 0.5);
    assert_eq!(
        m.deltas(),
        vec![GestureDelta::Drag(Offset::new(12.0, 8.0)), GestureDelta::Zoom(0.5)]
    );
}

#[test]
fn no_selection_motion_during_canvas_gesture() {
    let mut m = machine();
    m.begin(GestureKind::Drag, &SelectionSet::new());
    assert!(m.selection_motion().is_none());
}

// =============================================================
// Cancellation
// =============================================================

#[test]
fn cancel_discards_pan() {
    let mut m = machine();
    m.restore(CanvasTransform::new(1.0, Offset::new(7.0, 7.0)));
    m.begin(GestureKind::Drag, &SelectionSet::new());
    m.update(drag(50.0, 50.0));
    assert!(m.cancel(GestureKind::Drag));
    assert_eq!(m.persisted().pan, Offset::new(7.0, 7.0));
    assert_eq!(m.live_transform().pan, Offset::new(7.0, 7.0));
    assert_eq!(m.phase(), Phase::Idle);
}

#[test]
fn cancel_without_gesture_is_false() {
    let mut m = machine();
    assert!(!m.cancel(GestureKind::Magnify));
}

#[test]
fn cancel_one_keeps_other() {
    let mut m = machine();
    let sel = SelectionSet::new();
    m.begin(GestureKind::Drag, &sel);
    m.begin(GestureKind::Magnify, &sel);
    m.cancel(GestureKind::Magnify);
    assert!(m.is_active(GestureKind::Drag));
    assert_eq!(m.phase(), Phase::CanvasGestureActive);
}

#[test]
fn cancel_all_returns_to_idle() {
    let mut m = machine();
    let sel = selection_of(&[1]);
    m.begin(GestureKind::Drag, &sel);
    m.begin(GestureKind::Magnify, &sel);
    m.cancel_all();
    assert_eq!(m.phase(), Phase::Idle);
    assert!(m.deltas().is_empty());
}
