use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::StatusCode,
    Json,
};

use crate::app::AppState;
use crate::database::models::Folder;
use crate::error::ApiResult;

use super::utils::{name_from, Created, NamePayload};

/// GET /api/folders - all folders sorted by name
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Folder>>> {
    Ok(Json(state.folders.list().await?))
}

/// GET /api/folders/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Folder>> {
    Ok(Json(state.folders.get(&id).await?))
}

/// POST /api/folders
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> ApiResult<Created<Folder>> {
    let name = name_from(payload)?;
    let folder = state.folders.create(name.as_deref()).await?;
    Ok(Created::at(&uri, folder.id, folder))
}

/// PUT /api/folders/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> ApiResult<Json<Folder>> {
    let name = name_from(payload)?;
    Ok(Json(state.folders.update(&id, name.as_deref()).await?))
}

/// DELETE /api/folders/:id - removes the folder and detaches it from notes
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.cleanup.delete_folder(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
