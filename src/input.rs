//! Input model: gesture events, tap targets, modifier keys, and the raw
//! pointer recognizer.
//!
//! Platform gesture recognizers feed [`GestureKind`] / [`GestureUpdate`]
//! events straight into the engine. Hosts that only have raw pointer events
//! run them through [`PointerRecognizer`], which decides between a tap and a
//! drag once the pointer travels past the drag slop.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Offset, Point};
use crate::doc::EntityId;

/// The platform primitive behind a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// One-finger drag: pans the canvas or moves the selection.
    Drag,
    /// Pinch: zooms the canvas or resizes the selection.
    Magnify,
}

/// The in-motion (or ending) value of a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureUpdate {
    /// Total translation since the drag started, in screen pixels.
    Drag(Offset),
    /// Total scale since the pinch started (1.0 = unchanged).
    Magnify(f64),
}

impl GestureUpdate {
    #[must_use]
    pub fn kind(self) -> GestureKind {
        match self {
            Self::Drag(_) => GestureKind::Drag,
            Self::Magnify(_) => GestureKind::Magnify,
        }
    }
}

/// What a tap landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapTarget {
    /// A placed emoji.
    Emoji(EntityId),
    /// Empty canvas or the background image.
    Canvas,
}

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform zoom modifier (ctrl or meta) is held.
    #[must_use]
    pub fn zoom(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// What a raw pointer event means once recognized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerGesture {
    /// Nothing to dispatch yet.
    Pending,
    /// The pointer crossed the drag slop: a drag starts with this translation.
    DragBegan(Offset),
    /// An ongoing drag moved to this total translation.
    DragChanged(Offset),
    /// The drag ended with this total translation.
    DragEnded(Offset),
    /// The press crossed the slop and was released in the same event.
    Swipe(Offset),
    /// The press was released without crossing the slop.
    Tap(Point),
    /// An ongoing drag was cancelled by the input source.
    DragCancelled,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    dragging: bool,
}

/// Turns raw pointer down/move/up into taps and drags.
#[derive(Debug, Clone, Default)]
pub struct PointerRecognizer {
    press: Option<Press>,
}

impl PointerRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press is in progress.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Whether the current press has become a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    /// Start a press. A press already in progress is replaced.
    pub fn down(&mut self, screen_pt: Point) {
        self.press = Some(Press { origin: screen_pt, dragging: false });
    }

    pub fn moved(&mut self, screen_pt: Point, slop_px: f64) -> PointerGesture {
        let Some(press) = self.press.as_mut() else {
            return PointerGesture::Pending;
        };
        let translation = screen_pt - press.origin;
        if press.dragging {
            PointerGesture::DragChanged(translation)
        } else if translation.length() > slop_px {
            press.dragging = true;
            PointerGesture::DragBegan(translation)
        } else {
            PointerGesture::Pending
        }
    }

    pub fn up(&mut self, screen_pt: Point, slop_px: f64) -> PointerGesture {
        let Some(press) = self.press.take() else {
            return PointerGesture::Pending;
        };
        let translation = screen_pt - press.origin;
        if press.dragging {
            PointerGesture::DragEnded(translation)
        } else if translation.length() > slop_px {
            PointerGesture::Swipe(translation)
        } else {
            PointerGesture::Tap(press.origin)
        }
    }

    pub fn cancel(&mut self) -> PointerGesture {
        match self.press.take() {
            Some(Press { dragging: true, .. }) => PointerGesture::DragCancelled,
            _ => PointerGesture::Pending,
        }
    }
}
