//! Shared numeric constants for the canvas engine.

// ── Palette ─────────────────────────────────────────────────────

/// On-screen size of an emoji in the palette, in points. Dropped emoji are
/// placed at this size divided by the current zoom.
pub const DEFAULT_PALETTE_EMOJI_SIZE: f64 = 40.0;

// ── Transform limits ────────────────────────────────────────────

/// Smallest canvas zoom a gesture can commit.
pub const DEFAULT_MIN_ZOOM: f64 = 0.01;

/// Smallest factor a selection resize forwards to the document.
pub const DEFAULT_MIN_RESIZE_FACTOR: f64 = 0.01;

/// Smallest emoji size the in-memory document keeps after a resize.
pub const MIN_EMOJI_SIZE: f64 = 1.0;

// ── Pointer ─────────────────────────────────────────────────────

/// Screen distance a pressed pointer must travel before it becomes a drag.
pub const DEFAULT_DRAG_SLOP_PX: f64 = 4.0;

/// Wheel pixels per unit of zoom change for ctrl/meta wheel zoom.
pub const DEFAULT_WHEEL_ZOOM_DIVISOR: f64 = 500.0;
