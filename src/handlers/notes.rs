use axum::{
    extract::{Extension, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{NewNote, NotePatch};
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::views;

use super::form::ValidForm;

pub const NOTE_LIST_PATH: &str = "/note/list";

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub id: i64,
}

/// GET / | /note | /note/
pub async fn redirect_to_list() -> Redirect {
    Redirect::to(NOTE_LIST_PATH)
}

/// GET /note/list
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Html<String>, ApiError> {
    tracing::debug!("Listing notes for '{}' ({:?})", user.username, user.authorities);
    let notes = state.notes.list_all().await?;
    Ok(Html(views::note_list(&notes, &user.username)))
}

/// POST /note/add (title, content)
pub async fn add_note(
    State(state): State<AppState>,
    ValidForm(note): ValidForm<NewNote>,
) -> Result<Redirect, ApiError> {
    state.notes.create(note).await?;
    Ok(Redirect::to(NOTE_LIST_PATH))
}

/// POST /note/edit (id, title?, content?)
pub async fn edit_note(
    State(state): State<AppState>,
    ValidForm(patch): ValidForm<NotePatch>,
) -> Result<Redirect, ApiError> {
    state.notes.edit(patch).await?;
    Ok(Redirect::to(NOTE_LIST_PATH))
}

/// POST /note/delete (id)
pub async fn delete_note(
    State(state): State<AppState>,
    ValidForm(form): ValidForm<DeleteForm>,
) -> Result<Redirect, ApiError> {
    state.notes.delete_by_id(form.id).await?;
    Ok(Redirect::to(NOTE_LIST_PATH))
}

/// Fallback for unknown paths (only reached once authenticated)
pub async fn not_found() -> ApiError {
    ApiError::not_found("No handler for this path")
}
