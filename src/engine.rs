use tracing::{debug, info, warn};

use crate::camera::{CanvasTransform, Offset, Point, Viewport};
use crate::config::EngineConfig;
use crate::doc::{BackgroundRef, DocError, DocStore, EmojiDocument, EntityId};
use crate::drop::{self, DropItem, DropOutcome};
use crate::hit;
use crate::input::{GestureKind, GestureUpdate, Modifiers, PointerGesture, PointerRecognizer, TapTarget, WheelDelta};
use crate::render::{self, Scene};
use crate::selection::SelectionSet;
use crate::transform::{Commit, Phase, SelectionDelta, TransformMachine};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Wheel zoom factors closer to 1 than this are ignored.
const WHEEL_ZOOM_DEADBAND: f64 = 0.001;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The live scene changed; redraw.
    RenderNeeded,
    /// A canvas gesture ended and the persisted transform is now this.
    CanvasCommitted(CanvasTransform),
    /// A selection gesture ended and was fanned out across its emoji.
    SelectionCommitted { delta: SelectionDelta, report: BatchReport },
    /// Selection membership changed.
    SelectionChanged,
    EmojiAdded(EntityId),
    EmojiRemoved(EntityId),
    BackgroundChanged(BackgroundRef),
}

/// A per-emoji document failure during a selection commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub id: EntityId,
    pub reason: String,
}

/// Per-emoji accounting of a selection commit.
///
/// Every captured id lands in exactly one list. Ids the document no longer
/// knows are `stale` and are pruned from the selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    pub applied: Vec<EntityId>,
    pub stale: Vec<EntityId>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Whether no document call failed. Stale ids do not count as failures.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Surface failures as an error, for callers that want aggregate accounting.
    ///
    /// # Errors
    ///
    /// Returns `PartialBatch` if any document call failed.
    pub fn into_result(self) -> Result<Vec<EntityId>, EngineError> {
        if self.failed.is_empty() {
            Ok(self.applied)
        } else {
            Err(EngineError::PartialBatch { applied: self.applied, failed: self.failed })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("document error: {0}")]
    Document(#[from] DocError),
    #[error("{} emoji failed to update ({} applied)", .failed.len(), .applied.len())]
    PartialBatch { applied: Vec<EntityId>, failed: Vec<BatchFailure> },
}

/// Interaction core: canvas transform, selection, and gesture dispatch over a
/// document service.
///
/// Everything runs synchronously on the caller's thread. Gestures resolve
/// their target once at start: an empty selection means the canvas pans and
/// zooms, a non-empty one means the selected emoji move and resize.
pub struct EngineCore<D = DocStore> {
    pub doc: D,
    selection: SelectionSet,
    transform: TransformMachine,
    pointer: PointerRecognizer,
    viewport: Viewport,
    config: EngineConfig,
}

impl Default for EngineCore<DocStore> {
    fn default() -> Self {
        Self::with_document(DocStore::new(), EngineConfig::default())
    }
}

impl EngineCore<DocStore> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: EmojiDocument> EngineCore<D> {
    #[must_use]
    pub fn with_document(doc: D, config: EngineConfig) -> Self {
        Self {
            doc,
            selection: SelectionSet::new(),
            transform: TransformMachine::new(&config),
            pointer: PointerRecognizer::new(),
            viewport: Viewport::default(),
            config,
        }
    }

    // --- Setup ---

    /// Update viewport dimensions in screen pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport = Viewport::new(width, height);
        vec![Action::RenderNeeded]
    }

    /// Restore a previously committed canvas transform.
    pub fn restore_transform(&mut self, transform: CanvasTransform) -> Vec<Action> {
        self.transform.restore(transform);
        vec![Action::RenderNeeded]
    }

    // --- Gestures ---

    /// A platform gesture started. Its target is decided here from the
    /// selection as it is right now.
    pub fn on_gesture_start(&mut self, kind: GestureKind) -> Vec<Action> {
        let target = self.transform.begin(kind, &self.selection);
        debug!(?kind, ?target, "gesture started");
        vec![Action::RenderNeeded]
    }

    /// A gesture moved. The value replaces the previous one.
    pub fn on_gesture_update(&mut self, update: GestureUpdate) -> Vec<Action> {
        if self.transform.update(update) {
            vec![Action::RenderNeeded]
        } else {
            debug!(?update, "update for a gesture that is not in flight");
            Vec::new()
        }
    }

    /// A gesture ended with its final value; commit it.
    pub fn on_gesture_end(&mut self, update: GestureUpdate) -> Vec<Action> {
        let Some(commit) = self.transform.end(update) else {
            debug!(?update, "end for a gesture that is not in flight");
            return Vec::new();
        };
        match commit {
            Commit::Canvas { before, after } => {
                info!(
                    zoom = after.zoom,
                    pan_x = after.pan.dx,
                    pan_y = after.pan.dy,
                    prev_zoom = before.zoom,
                    "canvas transform committed"
                );
                vec![Action::CanvasCommitted(after), Action::RenderNeeded]
            }
            Commit::Selection { ids, delta } => {
                let report = self.apply_to_selection(&ids, delta);
                let mut actions = Vec::with_capacity(3);
                if !report.stale.is_empty() {
                    actions.push(Action::SelectionChanged);
                }
                actions.push(Action::SelectionCommitted { delta, report });
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    /// The input source cancelled a gesture; drop its delta.
    pub fn on_gesture_cancel(&mut self, kind: GestureKind) -> Vec<Action> {
        if self.transform.cancel(kind) {
            debug!(?kind, "gesture cancelled");
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Fan a selection commit out to the document, one call per emoji.
    ///
    /// A failure on one emoji never stops the rest. Ids the document no
    /// longer has are skipped and pruned from the selection.
    fn apply_to_selection(&mut self, ids: &[EntityId], delta: SelectionDelta) -> BatchReport {
        let mut report = BatchReport::default();
        for &id in ids {
            if !self.doc.contains(id) {
                report.stale.push(id);
                continue;
            }
            let result = match delta {
                SelectionDelta::Move(by) => self.doc.move_emoji(id, by),
                SelectionDelta::Resize(factor) => self.doc.resize_emoji(id, factor),
            };
            match result {
                Ok(()) => report.applied.push(id),
                Err(DocError::NotFound(_)) => report.stale.push(id),
                Err(e) => {
                    warn!(%id, error = %e, ?delta, "selection commit failed for emoji");
                    report.failed.push(BatchFailure { id, reason: e.to_string() });
                }
            }
        }
        for &id in &report.stale {
            self.selection.remove(id);
        }
        if !report.stale.is_empty() {
            warn!(stale = ?report.stale, "pruned deleted emoji from selection");
        }
        info!(
            applied = report.applied.len(),
            stale = report.stale.len(),
            failed = report.failed.len(),
            ?delta,
            "selection commit"
        );
        report
    }

    // --- Taps and deletion ---

    /// A tap landed on an emoji (toggle it) or on empty canvas (clear).
    pub fn on_tap(&mut self, target: TapTarget) -> Vec<Action> {
        match target {
            TapTarget::Emoji(id) if self.doc.contains(id) => {
                let selected = self.selection.toggle(id);
                debug!(%id, selected, "selection toggled");
            }
            TapTarget::Emoji(id) => {
                debug!(%id, "tap on unknown emoji ignored");
                return Vec::new();
            }
            TapTarget::Canvas => {
                if self.selection.is_empty() {
                    return Vec::new();
                }
                self.selection.clear();
                debug!("selection cleared");
            }
        }
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// A tap at a screen point; hit-tests to find its target.
    pub fn on_tap_at(&mut self, screen_pt: Point) -> Vec<Action> {
        let target = match hit::hit_test(
            screen_pt,
            self.doc.emojis(),
            &self.transform.live_transform(),
            self.viewport.center(),
        ) {
            Some(id) => TapTarget::Emoji(id),
            None => TapTarget::Canvas,
        };
        self.on_tap(target)
    }

    /// Remove an emoji from the document, then from the selection.
    ///
    /// # Errors
    ///
    /// Returns the document's error. An id the document does not know is
    /// still dropped from the selection.
    pub fn delete_emoji(&mut self, id: EntityId) -> Result<Vec<Action>, EngineError> {
        match self.doc.remove_emoji(id) {
            Ok(()) => {
                let was_selected = self.selection.remove(id);
                info!(%id, was_selected, "emoji deleted");
                let mut actions = vec![Action::EmojiRemoved(id)];
                if was_selected {
                    actions.push(Action::SelectionChanged);
                }
                actions.push(Action::RenderNeeded);
                Ok(actions)
            }
            Err(e) => {
                if matches!(e, DocError::NotFound(_)) {
                    self.selection.remove(id);
                }
                Err(e.into())
            }
        }
    }

    /// Drop selected ids that no longer exist in the document.
    pub fn prune_selection(&mut self) -> Vec<EntityId> {
        let doc = &self.doc;
        let pruned = self.selection.retain(|id| doc.contains(id));
        if !pruned.is_empty() {
            warn!(?pruned, "pruned deleted emoji from selection");
        }
        pruned
    }

    // --- Drops ---

    /// Route a drop at a screen location. Returns whether it was handled,
    /// along with the actions for the host.
    ///
    /// # Errors
    ///
    /// Returns the document's error if the routed mutation fails.
    pub fn handle_drop(&mut self, items: &[DropItem], location: Point) -> Result<(bool, Vec<Action>), EngineError> {
        Ok(match self.drop_payload(items, location)? {
            Some(outcome) => (true, drop_actions(&outcome)),
            None => (false, Vec::new()),
        })
    }

    /// Route a drop and report what it did, if anything.
    ///
    /// # Errors
    ///
    /// Returns the document's error if the routed mutation fails.
    pub fn drop_payload(&mut self, items: &[DropItem], location: Point) -> Result<Option<DropOutcome>, EngineError> {
        let outcome = drop::route_drop(
            &mut self.doc,
            items,
            location,
            &self.transform.persisted(),
            &self.viewport,
            self.config.palette_emoji_size,
        )?;
        Ok(outcome)
    }

    // --- Raw pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Vec<Action> {
        self.pointer.down(screen_pt);
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let gesture = self.pointer.moved(screen_pt, self.config.drag_slop_px);
        self.dispatch_pointer(gesture)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        let gesture = self.pointer.up(screen_pt, self.config.drag_slop_px);
        self.dispatch_pointer(gesture)
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        let gesture = self.pointer.cancel();
        self.dispatch_pointer(gesture)
    }

    fn dispatch_pointer(&mut self, gesture: PointerGesture) -> Vec<Action> {
        match gesture {
            PointerGesture::Pending => Vec::new(),
            PointerGesture::DragBegan(t) => {
                let mut actions = self.on_gesture_start(GestureKind::Drag);
                actions.extend(self.on_gesture_update(GestureUpdate::Drag(t)));
                dedup_render(actions)
            }
            PointerGesture::DragChanged(t) => self.on_gesture_update(GestureUpdate::Drag(t)),
            PointerGesture::DragEnded(t) => self.on_gesture_end(GestureUpdate::Drag(t)),
            PointerGesture::Swipe(t) => self.one_shot(GestureUpdate::Drag(t)),
            PointerGesture::Tap(pt) => self.on_tap_at(pt),
            PointerGesture::DragCancelled => self.on_gesture_cancel(GestureKind::Drag),
        }
    }

    /// Wheel input: ctrl/meta zooms, otherwise scrolls. Each event is a
    /// complete gesture routed like any other.
    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let update = if modifiers.zoom() {
            let factor = 1.0 - delta.dy / self.config.wheel_zoom_divisor;
            if (factor - 1.0).abs() <= WHEEL_ZOOM_DEADBAND {
                return Vec::new();
            }
            GestureUpdate::Magnify(factor)
        } else {
            GestureUpdate::Drag(-Offset::new(delta.dx, delta.dy))
        };
        if self.transform.is_active(update.kind()) {
            debug!(kind = ?update.kind(), "wheel ignored while gesture in flight");
            return Vec::new();
        }
        self.one_shot(update)
    }

    fn one_shot(&mut self, update: GestureUpdate) -> Vec<Action> {
        let mut actions = self.on_gesture_start(update.kind());
        actions.extend(self.on_gesture_end(update));
        dedup_render(actions)
    }

    // --- Queries ---

    /// The currently selected ids.
    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// The committed canvas transform.
    #[must_use]
    pub fn canvas_transform(&self) -> CanvasTransform {
        self.transform.persisted()
    }

    /// The canvas transform including in-flight canvas gestures.
    #[must_use]
    pub fn live_transform(&self) -> CanvasTransform {
        self.transform.live_transform()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.transform.phase()
    }

    #[must_use]
    pub fn transform(&self) -> &TransformMachine {
        &self.transform
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The live scene for rendering.
    #[must_use]
    pub fn scene(&self) -> Scene {
        render::scene(&self.doc, &self.transform, &self.selection, &self.viewport)
    }
}

fn drop_actions(outcome: &DropOutcome) -> Vec<Action> {
    match outcome {
        DropOutcome::BackgroundSet(bg) => vec![Action::BackgroundChanged(bg.clone()), Action::RenderNeeded],
        DropOutcome::EmojiAdded { id, .. } => vec![Action::EmojiAdded(*id), Action::RenderNeeded],
    }
}

/// Keep a single trailing `RenderNeeded`.
fn dedup_render(mut actions: Vec<Action>) -> Vec<Action> {
    let needs_render = actions.iter().any(|a| matches!(a, Action::RenderNeeded));
    actions.retain(|a| !matches!(a, Action::RenderNeeded));
    if needs_render {
        actions.push(Action::RenderNeeded);
    }
    actions
}
