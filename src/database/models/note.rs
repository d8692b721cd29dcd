use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored note. `id` is assigned by the database on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Submitted fields for a note that has no identity yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewNote {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Merge-patch for an existing note: only `Some` fields are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotePatch {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Note {
    /// Overwrites the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(content) = patch.content {
            self.content = Some(content);
        }
    }
}
