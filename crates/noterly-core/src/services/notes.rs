//! Shared note service wrapper used by the application state layer.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{Database, LibSqlNoteRepository, NoteRepository};
use crate::error::Error;
use crate::models::{Note, NoteDraft, NoteId, NotePatch};

/// Thread-safe, never-raising access to the notes table.
///
/// When the store could not be opened the service holds no database handle
/// and every operation returns its empty form: an empty list, `None`, or
/// `false`. Underlying query failures are logged and degraded the same way,
/// so callers cannot distinguish them from "no results" without the logs.
#[derive(Clone)]
pub struct NoteService {
    db: Option<Arc<Mutex<Database>>>,
}

impl NoteService {
    /// Open the note store at the given filesystem path.
    ///
    /// Open failures are logged and swallowed; the returned service then
    /// degrades every operation instead of failing startup.
    pub async fn open(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                tracing::error!(%error, path = %db_path.display(), "Failed to create note store directory");
                return Self { db: None };
            }
        }

        match Database::open(&db_path).await {
            Ok(db) => Self {
                db: Some(Arc::new(Mutex::new(db))),
            },
            Err(error) => {
                tracing::error!(%error, path = %db_path.display(), "Failed to open note store");
                Self { db: None }
            }
        }
    }

    /// Open an in-memory note store (primarily for tests).
    pub async fn open_in_memory() -> crate::Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Some(Arc::new(Mutex::new(db))),
        })
    }

    /// A service with no backing store, as on platforms without local
    /// database support.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { db: None }
    }

    /// Whether a backing store was opened.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.db.is_some()
    }

    /// List all notes, newest `updated_at` first.
    pub async fn get_all_notes(&self) -> Vec<Note> {
        let Some(db) = &self.db else {
            return Vec::new();
        };

        let db = db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        match repo.list().await {
            Ok(notes) => notes,
            Err(error) => {
                tracing::error!(%error, "Failed to list notes");
                Vec::new()
            }
        }
    }

    /// Fetch a note by id; `None` covers not-found, failure, and
    /// unavailability alike.
    pub async fn get_note_by_id(&self, id: &NoteId) -> Option<Note> {
        let db = self.db.as_ref()?;

        let db = db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        match repo.get(id).await {
            Ok(note) => note,
            Err(error) => {
                tracing::error!(%error, %id, "Failed to fetch note");
                None
            }
        }
    }

    /// Create a note, returning its assigned id.
    pub async fn create_note(&self, draft: &NoteDraft) -> Option<NoteId> {
        let db = self.db.as_ref()?;

        let db = db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        match repo.create(draft).await {
            Ok(note) => Some(note.id),
            Err(error) => {
                tracing::error!(%error, "Failed to create note");
                None
            }
        }
    }

    /// Merge a partial update over a note.
    pub async fn update_note(&self, id: &NoteId, patch: &NotePatch) -> bool {
        let Some(db) = &self.db else {
            return false;
        };

        let db = db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        match repo.update(id, patch).await {
            Ok(_) => true,
            Err(Error::NotFound(missing)) => {
                tracing::debug!(id = %missing, "Update skipped; note not found");
                false
            }
            Err(error) => {
                tracing::error!(%error, %id, "Failed to update note");
                false
            }
        }
    }

    /// Hard-delete a note.
    pub async fn delete_note(&self, id: &NoteId) -> bool {
        let Some(db) = &self.db else {
            return false;
        };

        let db = db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        match repo.delete(id).await {
            Ok(()) => true,
            Err(Error::NotFound(missing)) => {
                tracing::debug!(id = %missing, "Delete skipped; note not found");
                false
            }
            Err(error) => {
                tracing::error!(%error, %id, "Failed to delete note");
                false
            }
        }
    }

    /// Flip a note's favorite flag.
    pub async fn toggle_favorite(&self, id: &NoteId) -> bool {
        let Some(db) = &self.db else {
            return false;
        };

        let db = db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        match repo.toggle_favorite(id).await {
            Ok(_) => true,
            Err(Error::NotFound(missing)) => {
                tracing::debug!(id = %missing, "Toggle skipped; note not found");
                false
            }
            Err(error) => {
                tracing::error!(%error, %id, "Failed to toggle favorite");
                false
            }
        }
    }

    /// List favorite notes, newest first.
    pub async fn get_favorite_notes(&self) -> Vec<Note> {
        let Some(db) = &self.db else {
            return Vec::new();
        };

        let db = db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        match repo.list_favorites().await {
            Ok(notes) => notes,
            Err(error) => {
                tracing::error!(%error, "Failed to list favorite notes");
                Vec::new()
            }
        }
    }

    /// Search notes by substring, with the `favorite:true` token delegating
    /// to the favorites listing.
    pub async fn search_notes(&self, query: &str) -> Vec<Note> {
        let Some(db) = &self.db else {
            return Vec::new();
        };

        let db = db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        match repo.search(query).await {
            Ok(notes) => notes,
            Err(error) => {
                tracing::error!(%error, query, "Failed to search notes");
                Vec::new()
            }
        }
    }
}
