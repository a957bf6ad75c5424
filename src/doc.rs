//! Document model: placed emoji, the background reference, and the document
//! service the engine issues commands against.
//!
//! The engine never writes emoji fields directly. It reads snapshots through
//! [`EmojiDocument::emojis`] / [`EmojiDocument::background`] and mutates
//! through discrete commands (`add`, `remove`, `move`, `resize`,
//! `set_background`). [`DocStore`] is the in-memory implementation; hosts with
//! their own store implement the trait instead.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::camera::{Offset, Position};
use crate::consts::MIN_EMOJI_SIZE;

/// Unique identifier for a placed emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a background image (a URL string as offered by the drag source).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackgroundRef(pub String);

impl BackgroundRef {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackgroundRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A placed emoji as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    /// Unique identifier.
    pub id: EntityId,
    /// The glyph text.
    #[serde(rename = "string")]
    pub text: String,
    /// Logical position relative to the canvas center.
    pub position: Position,
    /// Font size in logical units.
    pub size: f64,
}

/// Failure reported by a document service.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("emoji not found: {0}")]
    NotFound(EntityId),
    #[error("document unavailable: {0}")]
    Unavailable(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Query and command interface of the document that owns emoji placements.
pub trait EmojiDocument {
    /// Place a new emoji and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot accept the emoji.
    fn add_emoji(&mut self, text: &str, position: Position, size: f64) -> Result<EntityId, DocError>;

    /// Remove an emoji.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no emoji has this id.
    fn remove_emoji(&mut self, id: EntityId) -> Result<(), DocError>;

    /// Move an emoji by a screen-oriented (y down) offset in logical scale.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no emoji has this id.
    fn move_emoji(&mut self, id: EntityId, by: Offset) -> Result<(), DocError>;

    /// Scale an emoji's size by `factor`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no emoji has this id.
    fn resize_emoji(&mut self, id: EntityId, factor: f64) -> Result<(), DocError>;

    /// Replace the background image reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot store the reference.
    fn set_background(&mut self, background: BackgroundRef) -> Result<(), DocError>;

    /// All placed emoji in draw order (bottom first).
    fn emojis(&self) -> &[Emoji];

    /// The current background reference, if any.
    fn background(&self) -> Option<&BackgroundRef>;

    /// Look up an emoji by id.
    fn emoji(&self, id: EntityId) -> Option<&Emoji> {
        self.emojis().iter().find(|e| e.id == id)
    }

    /// Whether an emoji with this id currently exists.
    fn contains(&self, id: EntityId) -> bool {
        self.emoji(id).is_some()
    }
}

/// In-memory emoji art document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocStore {
    background: Option<BackgroundRef>,
    emojis: Vec<Emoji>,
    next_id: u64,
}

impl DocStore {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, DocError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a document from JSON produced by [`DocStore::to_json`].
    ///
    /// Ids issued afterwards never collide with restored ones.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, DocError> {
        let mut doc: DocStore = serde_json::from_str(json)?;
        let max_id = doc.emojis.iter().map(|e| e.id.0 + 1).max().unwrap_or(0);
        doc.next_id = doc.next_id.max(max_id);
        Ok(doc)
    }

    /// Number of placed emoji.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emojis.len()
    }

    /// Returns `true` if no emoji are placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emojis.is_empty()
    }

    fn emoji_mut(&mut self, id: EntityId) -> Result<&mut Emoji, DocError> {
        self.emojis.iter_mut().find(|e| e.id == id).ok_or(DocError::NotFound(id))
    }
}

impl EmojiDocument for DocStore {
    fn add_emoji(&mut self, text: &str, position: Position, size: f64) -> Result<EntityId, DocError> {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.emojis.push(Emoji { id, text: text.to_string(), position, size: size.max(MIN_EMOJI_SIZE) });
        Ok(id)
    }

    fn remove_emoji(&mut self, id: EntityId) -> Result<(), DocError> {
        let index = self
            .emojis
            .iter()
            .position(|e| e.id == id)
            .ok_or(DocError::NotFound(id))?;
        self.emojis.remove(index);
        Ok(())
    }

    fn move_emoji(&mut self, id: EntityId, by: Offset) -> Result<(), DocError> {
        let emoji = self.emoji_mut(id)?;
        emoji.position.x = emoji.position.x.saturating_add(grid_step(by.dx));
        emoji.position.y = emoji.position.y.saturating_sub(grid_step(by.dy));
        Ok(())
    }

    fn resize_emoji(&mut self, id: EntityId, factor: f64) -> Result<(), DocError> {
        let emoji = self.emoji_mut(id)?;
        emoji.size = (emoji.size * factor).max(MIN_EMOJI_SIZE);
        Ok(())
    }

    fn set_background(&mut self, background: BackgroundRef) -> Result<(), DocError> {
        self.background = Some(background);
        Ok(())
    }

    fn emojis(&self) -> &[Emoji] {
        &self.emojis
    }

    fn background(&self) -> Option<&BackgroundRef> {
        self.background.as_ref()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn grid_step(v: f64) -> i32 {
    v.round() as i32
}
