/// Task mutation endpoints
///
/// - `POST   /v1/lists/:id/tasks/:task_id/toggle` — flip the done flag
/// - `DELETE /v1/lists/:id/tasks/:task_id` — delete one task
///
/// Both publish a change for the parent list so every open task subscription
/// re-queries and re-delivers the full task set. Neither handler updates any
/// cached state optimistically; the new state is observed through the store.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use sharelist_shared::{
    auth::identity::Identity,
    models::{list::TodoList, task::Task},
    notify::ChangeKind,
};
use uuid::Uuid;

use super::lists::load_accessible;

/// Delete-task response
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    /// Whether deleting the last task cascaded into deleting the list
    pub list_deleted: bool,
}

/// Flip a task's done flag, returning the updated task
///
/// # Errors
///
/// - `404 Not Found`: list or task does not exist
/// - `403 Forbidden`: the caller is neither owner nor collaborator
pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((list_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Task>> {
    load_accessible(&state, &identity, list_id).await?;

    let task = Task::toggle_done(&state.db, list_id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    state.hub.publish(list_id, ChangeKind::TasksChanged);

    Ok(Json(task))
}

/// Delete one task; deleting the last task deletes the list too
///
/// The task delete and the remaining-count query are two independent
/// statements, not a transaction: a concurrent insert between them keeps the
/// list alive, a concurrent delete can still cascade. The count is taken
/// exactly once.
///
/// # Errors
///
/// - `404 Not Found`: list or task does not exist
/// - `403 Forbidden`: the caller is neither owner nor collaborator
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((list_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    load_accessible(&state, &identity, list_id).await?;

    let deleted = Task::delete(&state.db, list_id, task_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    let remaining = Task::count_for_list(&state.db, list_id).await?;
    if remaining == 0 {
        TodoList::delete(&state.db, list_id).await?;
        state.hub.publish(list_id, ChangeKind::ListDeleted);

        tracing::info!(list_id = %list_id, "Deleted list after its last task was removed");

        return Ok(Json(DeleteTaskResponse { list_deleted: true }));
    }

    state.hub.publish(list_id, ChangeKind::TasksChanged);

    Ok(Json(DeleteTaskResponse {
        list_deleted: false,
    }))
}
