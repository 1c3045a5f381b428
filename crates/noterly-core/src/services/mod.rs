//! Service layer for Noterly

mod notes;

pub use notes::NoteService;
