//! Drop routing: classify a drag-and-drop payload and place it in the document.
//!
//! A payload is a list of typed items offered by the drag source. At most one
//! item is acted on. A background image reference wins over a glyph string
//! when both are present; otherwise the first item of the winning kind is
//! used. Emoji land in document space, so the drop location goes through the
//! persisted canvas transform and the size is divided by the current zoom to
//! keep the on-screen size equal to the palette's.

#[cfg(test)]
#[path = "drop_test.rs"]
mod drop_test;

use tracing::{debug, info};

use crate::camera::{CanvasTransform, Point, Position, Viewport};
use crate::doc::{BackgroundRef, DocError, EmojiDocument, EntityId};

/// URL schemes treated as image references when offered as plain text.
const URL_SCHEMES: [&str; 4] = ["http://", "https://", "file://", "data:image/"];

/// One representation offered by a drag source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropItem {
    /// A URL reference (image to use as the background).
    Url(String),
    /// Plain text (an emoji glyph from the palette).
    Text(String),
    /// Raw bytes. Not routable.
    Data(Vec<u8>),
}

/// What a payload resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropRoute {
    Background(BackgroundRef),
    Glyph(String),
}

/// What a handled drop did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    BackgroundSet(BackgroundRef),
    EmojiAdded { id: EntityId, position: Position },
}

/// Resolve a payload to a single route, or `None` if nothing is routable.
#[must_use]
pub fn classify(items: &[DropItem]) -> Option<DropRoute> {
    let background = items.iter().find_map(|item| match item {
        DropItem::Url(url) if !url.trim().is_empty() => Some(url.trim()),
        DropItem::Text(text) if looks_like_url(text) => Some(text.trim()),
        _ => None,
    });
    if let Some(url) = background {
        return Some(DropRoute::Background(BackgroundRef::new(url)));
    }
    items.iter().find_map(|item| match item {
        DropItem::Text(text) if !text.trim().is_empty() => Some(DropRoute::Glyph(text.trim().to_string())),
        _ => None,
    })
}

/// Logical placement and size for a glyph dropped at `location`.
#[must_use]
pub fn glyph_placement(
    location: Point,
    transform: &CanvasTransform,
    viewport: &Viewport,
    palette_emoji_size: f64,
) -> (Position, f64) {
    let position = transform.to_logical(location, viewport.center());
    (position, palette_emoji_size / transform.zoom)
}

/// Classify `items` and apply the drop to `doc`.
///
/// Returns `Ok(None)` if the payload is not routable; nothing is mutated in
/// that case.
///
/// # Errors
///
/// Returns the document's error if the background or emoji cannot be stored.
pub fn route_drop<D: EmojiDocument + ?Sized>(
    doc: &mut D,
    items: &[DropItem],
    location: Point,
    transform: &CanvasTransform,
    viewport: &Viewport,
    palette_emoji_size: f64,
) -> Result<Option<DropOutcome>, DocError> {
    let Some(route) = classify(items) else {
        debug!(items = items.len(), "drop not routable");
        return Ok(None);
    };
    match route {
        DropRoute::Background(background) => {
            doc.set_background(background.clone())?;
            info!(%background, "background replaced by drop");
            Ok(Some(DropOutcome::BackgroundSet(background)))
        }
        DropRoute::Glyph(text) => {
            let (position, size) = glyph_placement(location, transform, viewport, palette_emoji_size);
            let id = doc.add_emoji(&text, position, size)?;
            info!(%id, x = position.x, y = position.y, size, "emoji added by drop");
            Ok(Some(DropOutcome::EmojiAdded { id, position }))
        }
    }
}

fn looks_like_url(text: &str) -> bool {
    let text = text.trim();
    URL_SCHEMES.iter().any(|scheme| text.starts_with(scheme))
}
