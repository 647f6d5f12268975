use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use roster_core::roster::{Group, NameQuery, NewGroup};

use crate::{
    handlers::{
        extract::{Id, ValidJson, ValidQuery},
        AppError,
    },
    state::AppState,
};

/// List groups (GET /groups?name&sort).
pub async fn list_groups(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<NameQuery>,
) -> Result<Json<Vec<Group>>, AppError> {
    Ok(Json(state.groups.list(&query).await?))
}

/// Get a group by ID (GET /groups/{id}).
pub async fn get_group(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<Json<Group>, AppError> {
    Ok(Json(state.groups.get(id).await?))
}

/// Get a group by name (GET /groups/name/{name}).
pub async fn get_group_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Group>, AppError> {
    Ok(Json(state.groups.get_by_name(&name).await?))
}

/// Create a group, optionally moving students into it (POST /groups).
pub async fn create_group(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewGroup>,
) -> Result<impl IntoResponse, AppError> {
    let group = state.groups.create(&payload).await?;

    tracing::info!(group_id = group.id, name = %group.name, "Created new group");

    Ok((StatusCode::CREATED, Json(group)))
}

/// Delete a group by ID (DELETE /groups/{id}).
pub async fn delete_group(
    State(state): State<AppState>,
    Id(id): Id,
) -> Result<StatusCode, AppError> {
    state.groups.delete(id).await?;
    Ok(StatusCode::OK)
}

/// Delete a group by name (DELETE /groups/name/{name}).
pub async fn delete_group_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.groups.delete_by_name(&name).await?;
    Ok(StatusCode::OK)
}
