//! Hit-testing placed emoji in screen space.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{CanvasTransform, Point};
use crate::doc::{EntityId, Emoji};

/// Return the topmost emoji under `screen_pt`.
///
/// Each emoji is treated as a square of side `size * zoom` centered on its
/// screen position. Later emoji draw above earlier ones, so the search runs
/// back to front.
#[must_use]
pub fn hit_test(
    screen_pt: Point,
    emojis: &[Emoji],
    transform: &CanvasTransform,
    viewport_center: Point,
) -> Option<EntityId> {
    emojis
        .iter()
        .rev()
        .find(|emoji| {
            let center = transform.to_screen(emoji.position, viewport_center);
            let half = emoji.size * transform.zoom * 0.5;
            (screen_pt.x - center.x).abs() <= half && (screen_pt.y - center.y).abs() <= half
        })
        .map(|emoji| emoji.id)
}
