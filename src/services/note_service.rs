use std::sync::Arc;

use tracing::{debug, info};

use crate::database::manager::DatabaseError;
use crate::database::models::{NewNote, Note, NotePatch};
use crate::database::repository::NoteRepository;

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("Get note error. Note by id = {0} not found.")]
    GetNotFound(i64),
    #[error("Update note error. Note by id = {0} not found.")]
    UpdateNotFound(i64),
    #[error("Delete note error. Note by id = {0} not found.")]
    DeleteNotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// CRUD over notes. Edits and deletes check existence and mutate in one
/// repository call so a missing row is reported rather than silently skipped.
#[derive(Clone)]
pub struct NoteService {
    repository: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repository: Arc<dyn NoteRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_all(&self) -> Result<Vec<Note>, NoteError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Note, NoteError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(NoteError::GetNotFound(id))
    }

    pub async fn create(&self, note: NewNote) -> Result<Note, NoteError> {
        let stored = self.repository.insert(note).await?;
        info!("Created note {}", stored.id);
        Ok(stored)
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), NoteError> {
        if !self.repository.delete(id).await? {
            return Err(NoteError::DeleteNotFound(id));
        }

        info!("Deleted note {}", id);
        Ok(())
    }

    /// Merge-patch: only fields present in `patch` overwrite the stored note.
    pub async fn edit(&self, patch: NotePatch) -> Result<Note, NoteError> {
        let id = patch.id;
        debug!("Applying edit to note {}", id);

        let edited = self
            .repository
            .update(patch)
            .await?
            .ok_or(NoteError::UpdateNotFound(id))?;

        info!("Edited note {}", id);
        Ok(edited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryNoteRepository;

    fn service() -> NoteService {
        NoteService::new(Arc::new(MemoryNoteRepository::default()))
    }

    fn new_note(title: &str, content: &str) -> NewNote {
        NewNote {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_keeps_fields() {
        let service = service();
        let note = service.create(new_note("A", "B")).await.unwrap();

        assert_eq!(note.id, 1);
        assert_eq!(note.title.as_deref(), Some("A"));
        assert_eq!(note.content.as_deref(), Some("B"));
        assert_eq!(service.list_all().await.unwrap(), vec![note]);
    }

    #[tokio::test]
    async fn edit_with_title_only_leaves_content() {
        let service = service();
        let note = service.create(new_note("A", "B")).await.unwrap();

        service
            .edit(NotePatch { id: note.id, title: Some("C".to_string()), content: None })
            .await
            .unwrap();

        let stored = service.get(note.id).await.unwrap();
        assert_eq!(stored.title.as_deref(), Some("C"));
        assert_eq!(stored.content.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn edit_with_both_fields_overwrites_both() {
        let service = service();
        let note = service.create(new_note("A", "B")).await.unwrap();

        let edited = service
            .edit(NotePatch {
                id: note.id,
                title: Some("X".to_string()),
                content: Some("Y".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(edited.title.as_deref(), Some("X"));
        assert_eq!(edited.content.as_deref(), Some("Y"));
        assert_eq!(service.get(note.id).await.unwrap(), edited);
    }

    #[tokio::test]
    async fn edit_missing_note_fails_without_mutation() {
        let service = service();
        let note = service.create(new_note("A", "B")).await.unwrap();

        let err = service
            .edit(NotePatch { id: 42, title: Some("C".to_string()), content: None })
            .await
            .unwrap_err();

        assert!(matches!(err, NoteError::UpdateNotFound(42)));
        assert_eq!(err.to_string(), "Update note error. Note by id = 42 not found.");
        assert_eq!(service.list_all().await.unwrap(), vec![note]);
    }

    #[tokio::test]
    async fn delete_removes_note_then_reports_not_found() {
        let service = service();
        let note = service.create(new_note("A", "B")).await.unwrap();

        service.delete_by_id(note.id).await.unwrap();
        assert!(service.list_all().await.unwrap().is_empty());

        let err = service.delete_by_id(note.id).await.unwrap_err();
        assert!(matches!(err, NoteError::DeleteNotFound(1)));
        assert_eq!(err.to_string(), "Delete note error. Note by id = 1 not found.");
    }

    #[tokio::test]
    async fn list_reflects_creates_and_deletes() {
        let service = service();
        let a = service.create(new_note("a", "1")).await.unwrap();
        let b = service.create(new_note("b", "2")).await.unwrap();
        let c = service.create(new_note("c", "3")).await.unwrap();

        service.delete_by_id(b.id).await.unwrap();
        let d = service.create(new_note("d", "4")).await.unwrap();

        let ids: Vec<i64> = service.list_all().await.unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a.id, c.id, d.id]);
    }

    #[tokio::test]
    async fn concurrent_partial_edits_keep_both_fields() {
        let service = service();
        let note = service.create(new_note("A", "B")).await.unwrap();

        let title_edit = service.edit(NotePatch { id: note.id, title: Some("T".to_string()), content: None });
        let content_edit = service.edit(NotePatch { id: note.id, title: None, content: Some("C".to_string()) });
        let (first, second) = tokio::join!(title_edit, content_edit);
        first.unwrap();
        second.unwrap();

        let stored = service.get(note.id).await.unwrap();
        assert_eq!(stored.title.as_deref(), Some("T"));
        assert_eq!(stored.content.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn get_missing_note_is_not_found() {
        let err = service().get(7).await.unwrap_err();
        assert!(matches!(err, NoteError::GetNotFound(7)));
    }
}
