//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A unique identifier for a note, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A note in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Short title, non-empty after trimming at the application boundary
    pub title: String,
    /// Optional body text
    pub content: Option<String>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms), rewritten on every mutation
    pub updated_at: i64,
    /// Favorite flag, stored as 0/1 in the database
    pub is_favorite: bool,
    /// Optional display color, no format validation
    pub color: Option<String>,
}

impl Note {
    /// Create a new note with the given fields
    #[must_use]
    pub fn new(title: impl Into<String>, content: Option<String>, color: Option<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: NoteId::new(),
            title: title.into(),
            content,
            created_at: now,
            updated_at: now,
            is_favorite: false,
            color,
        }
    }
}

/// Input for creating a note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    /// Note title
    pub title: String,
    /// Optional body text
    pub content: Option<String>,
    /// Optional display color
    pub color: Option<String>,
}

impl NoteDraft {
    /// Create a draft with the given title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
            color: None,
        }
    }

    /// Set the body text
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the display color
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Trim the title, rejecting a draft whose title is empty afterwards
    pub fn normalized(mut self) -> Result<Self> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::InvalidInput(
                "Note title cannot be empty".to_string(),
            ));
        }
        self.title = title;
        Ok(self)
    }
}

/// A partial update merged over the current note row
///
/// Unset fields keep their stored values. The nullable fields (`content`,
/// `color`) distinguish "leave as is" from "clear to NULL".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    /// Replacement title
    pub title: Option<String>,
    /// Replacement body text, `Some(None)` clears it
    pub content: Option<Option<String>>,
    /// Replacement favorite flag
    pub is_favorite: Option<bool>,
    /// Replacement display color, `Some(None)` clears it
    pub color: Option<Option<String>>,
}

impl NotePatch {
    /// Create an empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the body text
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(Some(content.into()));
        self
    }

    /// Clear the body text
    #[must_use]
    pub fn clear_content(mut self) -> Self {
        self.content = Some(None);
        self
    }

    /// Replace the favorite flag
    #[must_use]
    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    /// Replace the display color
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(Some(color.into()));
        self
    }

    /// Clear the display color
    #[must_use]
    pub fn clear_color(mut self) -> Self {
        self.color = Some(None);
        self
    }

    /// Merge this patch over the given note, leaving unset fields untouched
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(is_favorite) = self.is_favorite {
            note.is_favorite = is_favorite;
        }
        if let Some(color) = &self.color {
            note.color = color.clone();
        }
    }

    /// Trim a replacement title, rejecting a patch whose title is empty afterwards
    pub fn normalized(mut self) -> Result<Self> {
        if let Some(title) = self.title.take() {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(Error::InvalidInput(
                    "Note title cannot be empty".to_string(),
                ));
            }
            self.title = Some(title);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_note_id_unique() {
        let id1 = NoteId::new();
        let id2 = NoteId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_note_id_parse() {
        let id = NoteId::new();
        let parsed: NoteId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_note_new() {
        let note = Note::new("Groceries", Some("milk, eggs".to_string()), None);
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content.as_deref(), Some("milk, eggs"));
        assert!(!note.is_favorite);
        assert!(note.created_at > 0);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_draft_normalized_trims_title() {
        let draft = NoteDraft::new("  Groceries  ").normalized().unwrap();
        assert_eq!(draft.title, "Groceries");
    }

    #[test]
    fn test_draft_normalized_rejects_empty_title() {
        let err = NoteDraft::new("   ").normalized().unwrap_err();
        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("cannot be empty")),
            other => panic!("expected invalid input error, got {other:?}"),
        }
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut note = Note::new("Original", Some("body".to_string()), Some("red".to_string()));
        let patch = NotePatch::new().title("Renamed").favorite(true);

        patch.apply_to(&mut note);

        assert_eq!(note.title, "Renamed");
        assert_eq!(note.content.as_deref(), Some("body"));
        assert!(note.is_favorite);
        assert_eq!(note.color.as_deref(), Some("red"));
    }

    #[test]
    fn test_patch_clears_nullable_fields() {
        let mut note = Note::new("Note", Some("body".to_string()), Some("red".to_string()));
        let patch = NotePatch::new().clear_content().clear_color();

        patch.apply_to(&mut note);

        assert_eq!(note.content, None);
        assert_eq!(note.color, None);
    }

    #[test]
    fn test_empty_patch_applies_nothing() {
        let mut note = Note::new("Note", Some("body".to_string()), None);
        let before = note.clone();

        NotePatch::new().apply_to(&mut note);

        assert_eq!(note, before);
    }

    #[test]
    fn test_patch_normalized_rejects_whitespace_title() {
        let err = NotePatch::new().title("  ").normalized().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_patch_without_title_normalizes_cleanly() {
        let patch = NotePatch::new().favorite(true).normalized().unwrap();
        assert_eq!(patch.is_favorite, Some(true));
        assert_eq!(patch.title, None);
    }
}
