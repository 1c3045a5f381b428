//! Application note state shared across the UI tree.

use crate::models::{Note, NoteDraft, NoteId, NotePatch};
use crate::services::NoteService;

const STORE_UNAVAILABLE: &str = "Note store is unavailable";

/// Single in-memory cache of all notes plus coarse status flags.
///
/// One instance lives for the whole process. The cached list is never
/// patched in place: every successful mutation triggers a full re-query, so
/// the cache always equals the last query result against the store. Failed
/// mutations leave the cache untouched.
pub struct NotesProvider {
    service: NoteService,
    notes: Vec<Note>,
    loading: bool,
    error: Option<String>,
}

impl NotesProvider {
    /// Build the provider and perform the initial full refresh.
    ///
    /// The provider is ready afterwards regardless of store health; an
    /// unavailable store surfaces as an error message and an empty list.
    pub async fn initialize(service: NoteService) -> Self {
        let mut provider = Self {
            service,
            notes: Vec::new(),
            loading: true,
            error: None,
        };
        provider.refresh_notes().await;
        provider
    }

    /// The cached note list, newest `updated_at` first.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Whether a refresh or search is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Human-readable message for the last surfaced failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rebuild the cache from a full store query.
    pub async fn refresh_notes(&mut self) {
        self.loading = true;
        if self.service.is_available() {
            self.notes = self.service.get_all_notes().await;
            self.error = None;
        } else {
            self.notes.clear();
            self.error = Some(STORE_UNAVAILABLE.to_string());
        }
        self.loading = false;
    }

    /// Fetch a single note directly from the store, bypassing the cache.
    pub async fn get_note_by_id(&self, id: &NoteId) -> Option<Note> {
        self.service.get_note_by_id(id).await
    }

    /// Create a note and refresh the cache on success.
    ///
    /// An all-whitespace title is rejected here, before the store is
    /// touched; the message lands in [`error`](Self::error).
    pub async fn create_note(&mut self, draft: NoteDraft) -> Option<NoteId> {
        let draft = match draft.normalized() {
            Ok(draft) => draft,
            Err(error) => {
                self.error = Some(error.to_string());
                return None;
            }
        };

        let id = self.service.create_note(&draft).await?;
        self.refresh_notes().await;
        Some(id)
    }

    /// Merge a partial update over a note and refresh the cache on success.
    ///
    /// A patch carrying an all-whitespace title is rejected like
    /// [`create_note`](Self::create_note).
    pub async fn update_note(&mut self, id: &NoteId, patch: NotePatch) -> bool {
        let patch = match patch.normalized() {
            Ok(patch) => patch,
            Err(error) => {
                self.error = Some(error.to_string());
                return false;
            }
        };

        if !self.service.update_note(id, &patch).await {
            return false;
        }
        self.refresh_notes().await;
        true
    }

    /// Delete a note and refresh the cache on success.
    pub async fn delete_note(&mut self, id: &NoteId) -> bool {
        if !self.service.delete_note(id).await {
            return false;
        }
        self.refresh_notes().await;
        true
    }

    /// Flip a note's favorite flag and refresh the cache on success.
    pub async fn toggle_favorite(&mut self, id: &NoteId) -> bool {
        if !self.service.toggle_favorite(id).await {
            return false;
        }
        self.refresh_notes().await;
        true
    }

    /// Replace the cached list with search results until the next refresh.
    pub async fn search_notes(&mut self, query: &str) {
        self.loading = true;
        if self.service.is_available() {
            self.notes = self.service.search_notes(query).await;
            self.error = None;
        } else {
            self.notes.clear();
            self.error = Some(STORE_UNAVAILABLE.to_string());
        }
        self.loading = false;
    }
}
