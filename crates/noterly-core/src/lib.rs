//! noterly-core - Core library for Noterly
//!
//! This crate contains the note models, the local database layer, and the
//! application state shared by all Noterly interfaces.

pub mod db;
pub mod error;
pub mod models;
pub mod paths;
pub mod services;
pub mod state;

pub use error::{Error, Result};
pub use models::{Note, NoteDraft, NoteId, NotePatch};
pub use services::NoteService;
pub use state::NotesProvider;
