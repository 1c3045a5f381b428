//! Data models for Noterly

mod note;

pub use note::{Note, NoteDraft, NoteId, NotePatch};
