//! Interaction transform engine for an emoji art canvas.
//!
//! The engine sits between raw pointer/gesture input and a document service
//! holding placed emoji and a background image. It keeps the canvas pan/zoom,
//! the multi-selection, and the in-flight gesture deltas, and turns finished
//! gestures and drops into discrete document commands. Rendering, image
//! loading, and persistence belong to the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Gesture dispatcher, [`engine::EngineCore`] |
//! | [`transform`] | Persisted + transient transform layers and gesture commits |
//! | [`selection`] | The set of selected emoji ids |
//! | [`drop`] | Drop payload classification and placement |
//! | [`camera`] | Value types, [`camera::CanvasTransform`], logical/screen mapping |
//! | [`doc`] | Document service trait and the in-memory [`doc::DocStore`] |
//! | [`input`] | Gesture event types and the raw pointer recognizer |
//! | [`hit`] | Hit-testing placed emoji in screen space |
//! | [`render`] | Live scene description for the host renderer |
//! | [`config`] | Engine tuning loaded from the environment |
//! | [`consts`] | Default numeric constants |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod drop;
pub mod engine;
pub mod hit;
pub mod input;
pub mod render;
pub mod selection;
pub mod transform;
