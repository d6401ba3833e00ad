use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::Note;
use crate::error::ApiResult;
use crate::services::NoteInput;

use super::utils::{rejected, Created};

/// GET /api/notes - all notes sorted by title
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Note>>> {
    Ok(Json(state.notes.list().await?))
}

/// GET /api/notes/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Note>> {
    Ok(Json(state.notes.get(&id).await?))
}

/// POST /api/notes - body `{ title, content?, folderId?, tags? }`
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<NoteInput>, JsonRejection>,
) -> ApiResult<Created<Note>> {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(JsonRejection::MissingJsonContentType(_)) => NoteInput::default(),
        Err(rejection) => return Err(rejected(rejection)),
    };
    let note = state.notes.create(input).await?;
    Ok(Created::at(&uri, note.id, note))
}
