//! Render feed: describes the live scene for the host renderer.
//!
//! This module reads document snapshots and the transform machine and
//! produces screen-space sprites. It does not mutate anything. Canvas
//! gestures show up through the live canvas transform. Selection gestures
//! show up only on the emoji they target: translated by the in-flight drag
//! (scaled by canvas zoom, as the committed move will be) and scaled around
//! their own center by the in-flight pinch.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Point, Viewport};
use crate::doc::{BackgroundRef, EmojiDocument, EntityId};
use crate::selection::SelectionSet;
use crate::transform::TransformMachine;

/// Background image layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayer {
    pub reference: BackgroundRef,
    /// Screen point the image center is drawn at.
    pub center: Point,
    /// Scale to draw the image at.
    pub scale: f64,
}

/// One emoji as it should appear on screen right now.
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiSprite {
    pub id: EntityId,
    pub text: String,
    /// Screen point the glyph is centered on.
    pub center: Point,
    /// Font size in screen points.
    pub font_size: f64,
    /// Whether to draw the selection border.
    pub selected: bool,
}

/// The full live scene, bottom layer first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub background: Option<BackgroundLayer>,
    pub emojis: Vec<EmojiSprite>,
}

/// Build the live scene.
#[must_use]
pub fn scene<D: EmojiDocument + ?Sized>(
    doc: &D,
    transform: &TransformMachine,
    selection: &SelectionSet,
    viewport: &Viewport,
) -> Scene {
    let live = transform.live_transform();
    let viewport_center = viewport.center();
    let motion = transform.selection_motion();

    let background = doc.background().map(|reference| BackgroundLayer {
        reference: reference.clone(),
        center: viewport_center + live.pan,
        scale: live.zoom,
    });

    let emojis = doc
        .emojis()
        .iter()
        .map(|emoji| {
            let mut center = live.to_screen(emoji.position, viewport_center);
            let mut font_size = emoji.size * live.zoom;
            if let Some(m) = motion.filter(|m| m.ids.contains(&emoji.id)) {
                center += m.offset * live.zoom;
                font_size *= m.scale;
            }
            EmojiSprite {
                id: emoji.id,
                text: emoji.text.clone(),
                center,
                font_size,
                selected: selection.contains(emoji.id),
            }
        })
        .collect();

    Scene { background, emojis }
}
