//! Transform state machine: persisted canvas pan/zoom plus transient gesture
//! deltas.
//!
//! Two layers are kept apart. The persisted [`CanvasTransform`] only changes
//! when a canvas gesture ends. The transient layer holds the in-motion value
//! of each active gesture (at most one drag and one pinch at a time) and is
//! folded in by the pure [`compose`] function for rendering.
//!
//! The first gesture to start captures its [`GestureTarget`] from the
//! selection at that instant. A second, simultaneous gesture joins the same
//! target, so a selection change mid-gesture never retargets anything in
//! flight. Ending a gesture produces a [`Commit`]: canvas commits are applied
//! here, selection commits are handed back for the dispatcher to fan out.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use tracing::debug;

use crate::camera::{CanvasTransform, Offset};
use crate::config::EngineConfig;
use crate::doc::EntityId;
use crate::input::{GestureKind, GestureUpdate};
use crate::selection::SelectionSet;

/// Transient, gesture-scoped value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureDelta {
    /// Pinch scale (canvas zoom or selection resize).
    Zoom(f64),
    /// Canvas pan translation in screen pixels.
    Pan(Offset),
    /// Selection drag translation.
    Drag(Offset),
}

/// What an in-flight gesture acts on, decided once at gesture start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureTarget {
    /// The whole canvas (selection was empty).
    Canvas,
    /// The selected emoji, captured as a sorted id list.
    Selection(Vec<EntityId>),
}

impl GestureTarget {
    /// Decide the target from the current selection.
    #[must_use]
    pub fn resolve(selection: &SelectionSet) -> Self {
        if selection.is_empty() {
            Self::Canvas
        } else {
            Self::Selection(selection.ids())
        }
    }
}

/// Coarse state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No gesture in progress.
    Idle,
    /// Pan and/or zoom of the whole canvas in progress.
    CanvasGestureActive,
    /// Drag and/or resize of the selection in progress.
    SelectionGestureActive,
}

/// Per-emoji command a selection gesture commits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionDelta {
    /// Move by the ending drag translation (screen-oriented, y down).
    Move(Offset),
    /// Scale size by a positive factor.
    Resize(f64),
}

/// Outcome of a gesture end.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// The persisted canvas transform changed.
    Canvas { before: CanvasTransform, after: CanvasTransform },
    /// Every listed emoji must receive `delta` from the document service.
    Selection { ids: Vec<EntityId>, delta: SelectionDelta },
}

/// In-flight selection motion, for rendering selected emoji.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionMotion<'a> {
    /// Ids the gesture will commit to.
    pub ids: &'a [EntityId],
    /// Drag translation applied to each selected emoji, before canvas zoom.
    pub offset: Offset,
    /// Scale applied to each selected emoji around its own center.
    pub scale: f64,
}

#[derive(Debug, Clone)]
struct ActiveGestures {
    target: GestureTarget,
    translation: Option<Offset>,
    scale: Option<f64>,
}

impl ActiveGestures {
    fn is_empty(&self) -> bool {
        self.translation.is_none() && self.scale.is_none()
    }

    fn slot_active(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Drag => self.translation.is_some(),
            GestureKind::Magnify => self.scale.is_some(),
        }
    }
}

/// Persisted canvas transform plus the transient gesture layer.
#[derive(Debug, Clone)]
pub struct TransformMachine {
    persisted: CanvasTransform,
    active: Option<ActiveGestures>,
    min_zoom: f64,
    min_resize_factor: f64,
}

impl Default for TransformMachine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl TransformMachine {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            persisted: CanvasTransform::default(),
            active: None,
            min_zoom: config.min_zoom,
            min_resize_factor: config.min_resize_factor,
        }
    }

    /// The committed canvas transform.
    #[must_use]
    pub fn persisted(&self) -> CanvasTransform {
        self.persisted
    }

    /// Restore a committed transform (e.g. from saved view state). Zoom is
    /// clamped to the configured minimum.
    pub fn restore(&mut self, transform: CanvasTransform) {
        let zoom = if transform.zoom.is_finite() { transform.zoom.max(self.min_zoom) } else { 1.0 };
        self.persisted = CanvasTransform::new(zoom, transform.pan);
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.active.as_ref().map(|a| &a.target) {
            None => Phase::Idle,
            Some(GestureTarget::Canvas) => Phase::CanvasGestureActive,
            Some(GestureTarget::Selection(_)) => Phase::SelectionGestureActive,
        }
    }

    /// The target captured by the gestures in flight, if any.
    #[must_use]
    pub fn target(&self) -> Option<&GestureTarget> {
        self.active.as_ref().map(|a| &a.target)
    }

    /// Whether a gesture of `kind` is in flight.
    #[must_use]
    pub fn is_active(&self, kind: GestureKind) -> bool {
        self.active.as_ref().is_some_and(|a| a.slot_active(kind))
    }

    /// Start a gesture. From `Idle` the target is resolved from `selection`;
    /// otherwise the gesture joins the target already captured. Restarting a
    /// kind that is already in flight resets its delta.
    pub fn begin(&mut self, kind: GestureKind, selection: &SelectionSet) -> &GestureTarget {
        let active = self.active.get_or_insert_with(|| ActiveGestures {
            target: GestureTarget::resolve(selection),
            translation: None,
            scale: None,
        });
        if active.slot_active(kind) {
            debug!(?kind, "gesture restarted; discarding in-flight delta");
        }
        match kind {
            GestureKind::Drag => active.translation = Some(Offset::ZERO),
            GestureKind::Magnify => active.scale = Some(1.0),
        }
        &active.target
    }

    /// Replace the in-motion value of an active gesture. Returns `false` if
    /// no gesture of that kind is in flight.
    pub fn update(&mut self, update: GestureUpdate) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        match update {
            GestureUpdate::Drag(t) if active.translation.is_some() => active.translation = Some(t),
            GestureUpdate::Magnify(s) if active.scale.is_some() => active.scale = Some(s),
            _ => return false,
        }
        true
    }

    /// End a gesture with its final value and commit it.
    ///
    /// Canvas commits are folded into the persisted transform before
    /// returning. Returns `None` if no gesture of that kind is in flight.
    pub fn end(&mut self, update: GestureUpdate) -> Option<Commit> {
        let active = self.active.as_mut()?;
        if !active.slot_active(update.kind()) {
            return None;
        }
        match update.kind() {
            GestureKind::Drag => active.translation = None,
            GestureKind::Magnify => active.scale = None,
        }
        let target = if active.is_empty() {
            self.active.take().map(|a| a.target)?
        } else {
            active.target.clone()
        };

        let commit = match (target, update) {
            (GestureTarget::Canvas, delta) => {
                let before = self.persisted;
                let after = compose(&before, &[canvas_delta(delta)], self.min_zoom);
                self.persisted = after;
                Commit::Canvas { before, after }
            }
            (GestureTarget::Selection(ids), GestureUpdate::Drag(t)) => {
                Commit::Selection { ids, delta: SelectionDelta::Move(t) }
            }
            (GestureTarget::Selection(ids), GestureUpdate::Magnify(s)) => Commit::Selection {
                ids,
                delta: SelectionDelta::Resize(finite_or_identity(s).max(self.min_resize_factor)),
            },
        };
        Some(commit)
    }

    /// Discard an in-flight gesture without committing. Returns `false` if no
    /// gesture of that kind is in flight.
    pub fn cancel(&mut self, kind: GestureKind) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let had = match kind {
            GestureKind::Drag => active.translation.take().is_some(),
            GestureKind::Magnify => active.scale.take().is_some(),
        };
        if active.is_empty() {
            self.active = None;
        }
        had
    }

    /// Discard every in-flight gesture.
    pub fn cancel_all(&mut self) {
        self.active = None;
    }

    /// Transient deltas of the gestures in flight.
    #[must_use]
    pub fn deltas(&self) -> Vec<GestureDelta> {
        let Some(active) = self.active.as_ref() else {
            return Vec::new();
        };
        let on_canvas = active.target == GestureTarget::Canvas;
        let mut deltas = Vec::with_capacity(2);
        if let Some(t) = active.translation {
            deltas.push(if on_canvas { GestureDelta::Pan(t) } else { GestureDelta::Drag(t) });
        }
        if let Some(s) = active.scale {
            deltas.push(GestureDelta::Zoom(s));
        }
        deltas
    }

    /// The transform to render the canvas with right now.
    ///
    /// Selection gestures never touch the canvas, so while one is in flight
    /// this equals the persisted transform.
    #[must_use]
    pub fn live_transform(&self) -> CanvasTransform {
        match self.target() {
            Some(GestureTarget::Canvas) => compose(&self.persisted, &self.deltas(), self.min_zoom),
            _ => self.persisted,
        }
    }

    /// The in-flight selection motion, if a selection gesture is active.
    #[must_use]
    pub fn selection_motion(&self) -> Option<SelectionMotion<'_>> {
        let active = self.active.as_ref()?;
        let GestureTarget::Selection(ids) = &active.target else {
            return None;
        };
        Some(SelectionMotion {
            ids,
            offset: active.translation.unwrap_or(Offset::ZERO),
            scale: finite_or_identity(active.scale.unwrap_or(1.0)).max(self.min_resize_factor),
        })
    }
}

/// Fold canvas deltas into a persisted transform.
///
/// `Zoom` multiplies zoom (never below `min_zoom`). `Pan` adds to pan. Non-finite
/// factors and translations are ignored. `Drag` is a selection delta and leaves
/// the canvas alone.
#[must_use]
pub fn compose(persisted: &CanvasTransform, deltas: &[GestureDelta], min_zoom: f64) -> CanvasTransform {
    let mut out = *persisted;
    for delta in deltas {
        match *delta {
            GestureDelta::Zoom(f) => {
                let zoom = out.zoom * finite_or_identity(f);
                out.zoom = if zoom.is_finite() { zoom.max(min_zoom) } else { out.zoom };
            }
            GestureDelta::Pan(t) if t.is_finite() => out.pan += t,
            GestureDelta::Pan(_) => {}
            GestureDelta::Drag(_) => {}
        }
    }
    out
}

fn canvas_delta(update: GestureUpdate) -> GestureDelta {
    match update {
        GestureUpdate::Drag(t) => GestureDelta::Pan(t),
        GestureUpdate::Magnify(s) => GestureDelta::Zoom(s),
    }
}

fn finite_or_identity(factor: f64) -> f64 {
    if factor.is_finite() { factor } else { 1.0 }
}
