//! Engine tuning knobs, loaded from environment variables with defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{
    DEFAULT_DRAG_SLOP_PX, DEFAULT_MIN_RESIZE_FACTOR, DEFAULT_MIN_ZOOM, DEFAULT_PALETTE_EMOJI_SIZE,
    DEFAULT_WHEEL_ZOOM_DIVISOR,
};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Nominal palette emoji size in screen points.
    pub palette_emoji_size: f64,
    /// Smallest canvas zoom a gesture can commit.
    pub min_zoom: f64,
    /// Smallest factor forwarded to the document on a selection resize.
    pub min_resize_factor: f64,
    /// Pointer travel in screen pixels that turns a press into a drag.
    pub drag_slop_px: f64,
    /// Wheel pixels per unit of zoom change.
    pub wheel_zoom_divisor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            palette_emoji_size: DEFAULT_PALETTE_EMOJI_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            min_resize_factor: DEFAULT_MIN_RESIZE_FACTOR,
            drag_slop_px: DEFAULT_DRAG_SLOP_PX,
            wheel_zoom_divisor: DEFAULT_WHEEL_ZOOM_DIVISOR,
        }
    }
}

impl EngineConfig {
    /// Load the configuration from `EMOJI_CANVAS_*` environment variables.
    ///
    /// Missing, unparseable, or non-positive values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse = |key: &str, default: f64| positive_or(lookup(key), default);
        Self {
            palette_emoji_size: parse("EMOJI_CANVAS_PALETTE_SIZE", defaults.palette_emoji_size),
            min_zoom: parse("EMOJI_CANVAS_MIN_ZOOM", defaults.min_zoom),
            min_resize_factor: parse("EMOJI_CANVAS_MIN_RESIZE_FACTOR", defaults.min_resize_factor),
            drag_slop_px: parse("EMOJI_CANVAS_DRAG_SLOP_PX", defaults.drag_slop_px),
            wheel_zoom_divisor: parse("EMOJI_CANVAS_WHEEL_ZOOM_DIVISOR", defaults.wheel_zoom_divisor),
        }
    }
}

fn positive_or(raw: Option<String>, default: f64) -> f64 {
    match raw.map(|v| v.trim().parse::<f64>()) {
        Some(Ok(v)) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}
