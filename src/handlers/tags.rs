use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::StatusCode,
    Json,
};

use crate::app::AppState;
use crate::database::models::Tag;
use crate::error::ApiResult;

use super::utils::{name_from, Created, NamePayload};

/// GET /api/tags - all tags sorted by name
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.tags.list().await?))
}

/// GET /api/tags/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Tag>> {
    Ok(Json(state.tags.get(&id).await?))
}

/// POST /api/tags
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> ApiResult<Created<Tag>> {
    let name = name_from(payload)?;
    let tag = state.tags.create(name.as_deref()).await?;
    Ok(Created::at(&uri, tag.id, tag))
}

/// PUT /api/tags/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> ApiResult<Json<Tag>> {
    let name = name_from(payload)?;
    Ok(Json(state.tags.update(&id, name.as_deref()).await?))
}

/// DELETE /api/tags/:id - removes the tag and pulls it from the configured reference list
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.cleanup.delete_tag(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
