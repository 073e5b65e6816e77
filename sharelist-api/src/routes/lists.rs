/// List endpoints
///
/// - `GET    /v1/lists` — the merged owned + shared listing view
/// - `POST   /v1/lists` — create a list with its initial task set
/// - `GET    /v1/lists/:id` — load one list for the edit form
/// - `PUT    /v1/lists/:id` — save the edit form
/// - `DELETE /v1/lists/:id` — owner-only list delete
///
/// Create applies the create-form rules (per task, in order, first failure
/// wins) plus collaborator normalization and the directory existence check.
/// Update applies the edit-form rules (all fields checked, every failure
/// reported). Both write inside a single transaction so a failed save leaves
/// nothing behind.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use sharelist_shared::{
    aggregator::{aggregate_for, ListView},
    auth::identity::Identity,
    draft,
    models::{
        list::{Collaborator, CreateTodoList, TodoList},
        task::{CreateTask, Task},
    },
    notify::ChangeKind,
};
use uuid::Uuid;

/// One pending task on the create form
#[derive(Debug, Deserialize)]
pub struct NewTaskRequest {
    pub title: String,
    pub description: String,
}

/// Create-list request body
#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    /// List title
    pub title: String,

    /// Pending tasks, in submission order; at least one required
    pub tasks: Vec<NewTaskRequest>,

    /// Collaborator emails to grant access to, raw as typed
    #[serde(default)]
    pub collaborators: Vec<String>,
}

/// One task row on the edit form
#[derive(Debug, Deserialize)]
pub struct EditTaskRequest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
}

/// Update-list request body
#[derive(Debug, Deserialize)]
pub struct UpdateListRequest {
    pub title: String,
    pub tasks: Vec<EditTaskRequest>,
}

/// Merged listing view: owned lists, then lists shared with the user
///
/// Runs the aggregation once. The streaming variant of this view lives at
/// `GET /v1/lists/stream`.
pub async fn list_lists(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<ListView>>> {
    let views = aggregate_for(&state.db, &identity).await?;

    Ok(Json(views))
}

/// Create a list with its initial task set
///
/// Validation order matches the create form: list title first, then each
/// pending task in order (empty title, short description, duplicate title),
/// then each collaborator email. The first failing check blocks the whole
/// submission.
///
/// The list row and all task rows are written in one transaction.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: any form rule failed
pub async fn create_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateListRequest>,
) -> ApiResult<(StatusCode, Json<ListView>)> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::invalid_field("title", "Enter a name for the list"));
    }

    if req.tasks.is_empty() {
        return Err(ApiError::invalid_field(
            "tasks",
            "Add at least one task to the list",
        ));
    }

    let pending: Vec<(String, String)> = req
        .tasks
        .iter()
        .map(|t| (t.title.clone(), t.description.clone()))
        .collect();
    let drafts = draft::validate_draft_tasks(&pending)
        .map_err(|e| ApiError::ValidationError(vec![e]))?;

    let collaborators = validate_collaborators(&state, &req.collaborators).await?;

    let mut tx = state.db.begin().await?;

    let list = TodoList::create(
        &mut *tx,
        CreateTodoList {
            title: title.to_string(),
            owner_id: identity.user_id,
            collaborators,
        },
    )
    .await?;

    let mut tasks = Vec::with_capacity(drafts.len());
    for d in drafts {
        let task = Task::create(
            &mut *tx,
            list.id,
            CreateTask {
                title: d.title,
                description: d.description,
                done: false,
            },
        )
        .await?;
        tasks.push(task);
    }

    tx.commit().await?;

    tracing::info!(list_id = %list.id, owner_id = %identity.user_id, "Created list");

    // No change is published: nobody can hold a subscription to a list that
    // did not exist yet, and the owned/shared queries are not live.
    Ok((StatusCode::CREATED, Json(ListView::new(list, tasks))))
}

/// Load one list with its tasks, as the edit form does
///
/// # Errors
///
/// - `404 Not Found`: no such list (the edit screen redirects home on this)
/// - `403 Forbidden`: the caller is neither owner nor collaborator
pub async fn get_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListView>> {
    let list = load_accessible(&state, &identity, id).await?;
    let tasks = Task::list_for_list(&state.db, id).await?;

    Ok(Json(ListView::new(list, tasks)))
}

/// Save the edit form: list title plus title/description of every task
///
/// All fields are checked and every failure is reported at once, unlike the
/// create form's first-failure rule. The title update and every task update
/// run in one transaction.
///
/// # Errors
///
/// - `404 Not Found`: list or one of the tasks no longer exists
/// - `403 Forbidden`: the caller is neither owner nor collaborator
/// - `422 Unprocessable Entity`: field errors, all collected
pub async fn update_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateListRequest>,
) -> ApiResult<Json<ListView>> {
    load_accessible(&state, &identity, id).await?;

    let pending: Vec<(String, String)> = req
        .tasks
        .iter()
        .map(|t| (t.title.clone(), t.description.clone()))
        .collect();
    let errors = draft::validate_edit(&req.title, &pending);
    if !errors.is_empty() {
        return Err(ApiError::ValidationError(errors));
    }

    let mut tx = state.db.begin().await?;

    let list = TodoList::update_title(&mut *tx, id, req.title.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    for t in &req.tasks {
        Task::update(&mut *tx, id, t.id, t.title.trim(), t.description.trim())
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    }

    tx.commit().await?;

    state.hub.publish(id, ChangeKind::TasksChanged);

    let tasks = Task::list_for_list(&state.db, id).await?;

    Ok(Json(ListView::new(list, tasks)))
}

/// Delete a list; owner only
///
/// Removes only the list document. Task rows are not touched (current
/// application policy), which also means live task subscriptions for this
/// list would keep re-querying successfully if not told to stop — the
/// published `ListDeleted` change is what ends them.
///
/// # Errors
///
/// - `404 Not Found`: no such list
/// - `403 Forbidden`: the caller is not the owner
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let list = load_accessible(&state, &identity, id).await?;

    if !list.owned_by(&identity) {
        return Err(ApiError::Forbidden(
            "Only the owner can delete a list".to_string(),
        ));
    }

    TodoList::delete(&state.db, id).await?;

    state.hub.publish(id, ChangeKind::ListDeleted);

    tracing::info!(list_id = %id, "Deleted list");

    Ok(StatusCode::NO_CONTENT)
}

/// Fetches a list and checks the caller may touch it
pub(crate) async fn load_accessible(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
) -> ApiResult<TodoList> {
    let list = TodoList::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    if !list.accessible_by(identity) {
        return Err(ApiError::Forbidden(
            "You do not have access to this list".to_string(),
        ));
    }

    Ok(list)
}

/// Normalizes and checks the collaborator emails of a create submission
///
/// Per email, in order: must be non-empty after trimming, must not repeat an
/// earlier entry, and must belong to an existing account (the directory
/// check). The normalized form is what gets stored; it is never re-checked
/// afterward.
async fn validate_collaborators(
    state: &AppState,
    raw: &[String],
) -> ApiResult<Vec<Collaborator>> {
    let mut collaborators: Vec<Collaborator> = Vec::with_capacity(raw.len());

    for (i, entry) in raw.iter().enumerate() {
        let field = format!("collaborators[{i}]");

        let email = draft::normalize_collaborator_email(entry)
            .ok_or_else(|| ApiError::invalid_field(&field, "Please enter an email"))?;

        if collaborators.iter().any(|c| c.email == email) {
            return Err(ApiError::invalid_field(
                &field,
                "This email is already added as viewer",
            ));
        }

        let exists =
            sharelist_shared::models::user::User::exists_by_email(&state.db, &email).await?;
        if !exists {
            return Err(ApiError::invalid_field(
                &field,
                "User with this email does not exist",
            ));
        }

        collaborators.push(Collaborator { email });
    }

    Ok(collaborators)
}
