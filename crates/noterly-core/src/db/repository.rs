//! Note repository implementation

use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId, NotePatch};
use libsql::{params, Connection, Row};

const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at, is_favorite, color";

/// Trait for note storage operations
#[allow(async_fn_in_trait)]
pub trait NoteRepository {
    /// Create a new note from the given draft
    async fn create(&self, draft: &NoteDraft) -> Result<Note>;

    /// Get a note by ID
    async fn get(&self, id: &NoteId) -> Result<Option<Note>>;

    /// List all notes, newest `updated_at` first
    async fn list(&self) -> Result<Vec<Note>>;

    /// Merge a partial update over a note, rewriting `updated_at`
    async fn update(&self, id: &NoteId, patch: &NotePatch) -> Result<Note>;

    /// Hard-delete a note
    async fn delete(&self, id: &NoteId) -> Result<()>;

    /// Flip a note's favorite flag
    async fn toggle_favorite(&self, id: &NoteId) -> Result<Note>;

    /// List favorite notes, newest first
    async fn list_favorites(&self) -> Result<Vec<Note>>;

    /// Search notes by title or content substring
    async fn search(&self, query: &str) -> Result<Vec<Note>>;
}

/// libSQL implementation of `NoteRepository`
pub struct LibSqlNoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a note from a database row
    fn parse_note(row: &Row) -> Result<Note> {
        let id: String = row.get(0)?;
        Ok(Note {
            id: id.parse().unwrap_or_default(),
            title: row.get(1)?,
            content: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            is_favorite: row.get::<i32>(5)? != 0,
            color: row.get(6)?,
        })
    }

    async fn collect_notes(mut rows: libsql::Rows) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        while let Some(row) = rows.next().await? {
            notes.push(Self::parse_note(&row)?);
        }
        Ok(notes)
    }
}

impl NoteRepository for LibSqlNoteRepository<'_> {
    async fn create(&self, draft: &NoteDraft) -> Result<Note> {
        let note = Note::new(
            draft.title.clone(),
            draft.content.clone(),
            draft.color.clone(),
        );

        self.conn
            .execute(
                "INSERT INTO notes (id, title, content, created_at, updated_at, is_favorite, color)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    note.id.as_str(),
                    note.title.as_str(),
                    note.content.clone(),
                    note.created_at,
                    note.updated_at,
                    i64::from(note.is_favorite),
                    note.color.clone()
                ],
            )
            .await?;

        Ok(note)
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"),
                params![id.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_note(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Note>> {
        let rows = self
            .conn
            .query(
                &format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC"),
                (),
            )
            .await?;

        Self::collect_notes(rows).await
    }

    async fn update(&self, id: &NoteId, patch: &NotePatch) -> Result<Note> {
        // Read-merge-write without a wrapping transaction; concurrent
        // updates to the same note follow last-write-wins per field set.
        let mut note = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        patch.apply_to(&mut note);
        note.updated_at = chrono::Utc::now().timestamp_millis();

        self.conn
            .execute(
                "UPDATE notes SET title = ?, content = ?, updated_at = ?, is_favorite = ?, color = ?
                 WHERE id = ?",
                params![
                    note.title.as_str(),
                    note.content.clone(),
                    note.updated_at,
                    i64::from(note.is_favorite),
                    note.color.clone(),
                    note.id.as_str()
                ],
            )
            .await?;

        Ok(note)
    }

    async fn delete(&self, id: &NoteId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?", params![id.as_str()])
            .await?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn toggle_favorite(&self, id: &NoteId) -> Result<Note> {
        let note = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        self.update(id, &NotePatch::new().favorite(!note.is_favorite))
            .await
    }

    async fn list_favorites(&self) -> Result<Vec<Note>> {
        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {NOTE_COLUMNS} FROM notes WHERE is_favorite = 1 ORDER BY updated_at DESC"
                ),
                (),
            )
            .await?;

        Self::collect_notes(rows).await
    }

    /// Substring containment against title OR content.
    ///
    /// The literal query `favorite:true` (compared ASCII case-insensitively)
    /// delegates to the favorites listing instead. Matching uses SQLite's
    /// default `LIKE` collation, which is ASCII case-insensitive.
    async fn search(&self, query: &str) -> Result<Vec<Note>> {
        if query.eq_ignore_ascii_case("favorite:true") {
            return self.list_favorites().await;
        }

        if query.trim().is_empty() {
            return self.list().await;
        }

        let pattern = format!("%{query}%");
        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {NOTE_COLUMNS} FROM notes
                     WHERE title LIKE ? OR content LIKE ?
                     ORDER BY updated_at DESC"
                ),
                params![pattern.as_str(), pattern.as_str()],
            )
            .await?;

        Self::collect_notes(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::time::Duration;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    // Unix-ms timestamps tie inside a millisecond; space mutations out so
    // ordering and strict-increase asserts hold.
    async fn tick() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_and_get() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let draft = NoteDraft::new("Groceries").content("milk, eggs");
        let note = repo.create(&draft).await.unwrap();
        assert_eq!(note.created_at, note.updated_at);
        assert!(!note.is_favorite);

        let fetched = repo.get(&note.id).await.unwrap().unwrap();
        assert_eq!(fetched, note);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_assigns_unique_ids() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let first = repo.create(&NoteDraft::new("One")).await.unwrap();
        let second = repo.create(&NoteDraft::new("Two")).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_missing_returns_none() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let fetched = repo.get(&NoteId::new()).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_newest_first() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create(&NoteDraft::new("Oldest")).await.unwrap();
        tick().await;
        repo.create(&NoteDraft::new("Middle")).await.unwrap();
        tick().await;
        repo.create(&NoteDraft::new("Newest")).await.unwrap();

        let notes = repo.list().await.unwrap();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_merges_partial_fields() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let draft = NoteDraft::new("Groceries").content("milk, eggs").color("yellow");
        let note = repo.create(&draft).await.unwrap();
        tick().await;

        let updated = repo
            .update(&note.id, &NotePatch::new().title("Groceries v2"))
            .await
            .unwrap();

        assert_eq!(updated.title, "Groceries v2");
        assert_eq!(updated.content.as_deref(), Some("milk, eggs"));
        assert_eq!(updated.color.as_deref(), Some("yellow"));
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at > note.updated_at);

        let fetched = repo.get(&note.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_missing_note_fails() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let err = repo
            .update(&NoteId::new(), &NotePatch::new().title("Nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_patch_still_bumps_updated_at() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create(&NoteDraft::new("Note")).await.unwrap();
        tick().await;

        let updated = repo.update(&note.id, &NotePatch::new()).await.unwrap();
        assert_eq!(updated.title, note.title);
        assert!(updated.updated_at > note.updated_at);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create(&NoteDraft::new("To delete")).await.unwrap();
        repo.delete(&note.id).await.unwrap();

        assert!(repo.get(&note.id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_missing_note_fails() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let err = repo.delete(&NoteId::new()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_toggle_favorite_is_its_own_inverse() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let note = repo.create(&NoteDraft::new("Note")).await.unwrap();
        tick().await;

        let toggled = repo.toggle_favorite(&note.id).await.unwrap();
        assert!(toggled.is_favorite);
        assert!(toggled.updated_at > note.updated_at);
        tick().await;

        let restored = repo.toggle_favorite(&note.id).await.unwrap();
        assert!(!restored.is_favorite);
        assert!(restored.updated_at > toggled.updated_at);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_favorites() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let starred = repo.create(&NoteDraft::new("Starred")).await.unwrap();
        repo.create(&NoteDraft::new("Plain")).await.unwrap();
        repo.toggle_favorite(&starred.id).await.unwrap();

        let favorites = repo.list_favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, starred.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_matches_title_or_content() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create(&NoteDraft::new("Groceries").content("milk, eggs"))
            .await
            .unwrap();
        repo.create(&NoteDraft::new("Ideas").content("buy milk frother"))
            .await
            .unwrap();
        repo.create(&NoteDraft::new("Travel")).await.unwrap();

        let results = repo.search("milk").await.unwrap();
        assert_eq!(results.len(), 2);

        let results = repo.search("Groceries").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_is_ascii_case_insensitive() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create(&NoteDraft::new("Groceries")).await.unwrap();

        let results = repo.search("groceries").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_favorite_token_matches_favorites_listing() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let starred = repo.create(&NoteDraft::new("Starred")).await.unwrap();
        repo.create(&NoteDraft::new("favorite:true in content"))
            .await
            .unwrap();
        repo.toggle_favorite(&starred.id).await.unwrap();

        let via_token = repo.search("FAVORITE:TRUE").await.unwrap();
        let via_listing = repo.list_favorites().await.unwrap();
        assert_eq!(via_token, via_listing);
        assert_eq!(via_token.len(), 1);
        assert_eq!(via_token[0].id, starred.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_blank_query_lists_everything() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create(&NoteDraft::new("One")).await.unwrap();
        repo.create(&NoteDraft::new("Two")).await.unwrap();

        let results = repo.search("   ").await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_newest_first() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        repo.create(&NoteDraft::new("milk old")).await.unwrap();
        tick().await;
        repo.create(&NoteDraft::new("milk new")).await.unwrap();

        let results = repo.search("milk").await.unwrap();
        let titles: Vec<_> = results.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["milk new", "milk old"]);
    }
}
