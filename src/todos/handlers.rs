use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument};

use super::{
    dto::{TodoAddRequest, TodoUpdateRequest},
    merge::merge_todo,
    model::{NewTodo, Todo, TodoStatus},
};
use crate::{
    auth::{extractors::AuthUser, policy::Operation},
    error::AppError,
    state::AppState,
    users::services::resolve_owner,
    validation::{char_len_within, is_stale, require, DESCRIPTION_LEN, TITLE_LEN},
};

const MISSING_TODO: &str = "this todo does not exist";

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/:username/todo", get(list_todos).post(create_todo))
        .route(
            "/api/user/:username/todo/:todo",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
}

#[instrument(skip(state, principal), fields(principal = %principal.username))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let owner = resolve_owner(state.store.as_ref(), &principal, &username, Operation::ListTodos).await?;
    let todos = state.store.list_todos(owner.id).await.map_err(|e| {
        error!(error = %e, owner_id = owner.id, "list_todos failed");
        AppError::from(e)
    })?;
    Ok(Json(todos))
}

#[instrument(skip(state, principal, payload), fields(principal = %principal.username))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(username): Path<String>,
    payload: Result<Json<TodoAddRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<Todo>), AppError> {
    let owner = resolve_owner(state.store.as_ref(), &principal, &username, Operation::CreateTodo).await?;
    let Json(payload) = payload?;

    let title = payload.title.trim().to_string();
    let description = payload.description.trim().to_string();
    require(char_len_within(&title, &TITLE_LEN), "title")?;
    require(char_len_within(&description, &DESCRIPTION_LEN), "description")?;
    require(!is_stale(payload.due_date, OffsetDateTime::now_utc()), "dueDate")?;

    let new_todo = NewTodo {
        owner_id: owner.id,
        title,
        description,
        status: TodoStatus::Open,
        due_date: payload.due_date,
    };
    let todo = state.store.insert_todo(&new_todo).await.map_err(|e| {
        error!(error = %e, owner_id = owner.id, "insert_todo failed");
        AppError::from(e)
    })?;

    let mut headers = HeaderMap::new();
    if let Ok(location) =
        HeaderValue::from_str(&format!("/api/user/{}/todo/{}", owner.username, todo.id))
    {
        headers.insert(header::LOCATION, location);
    }

    info!(todo_id = todo.id, owner = %owner.username, "todo created");
    Ok((StatusCode::CREATED, headers, Json(todo)))
}

#[instrument(skip(state, principal, path), fields(principal = %principal.username))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<Json<Todo>, AppError> {
    let Path((username, todo_id)) = path?;
    let owner = resolve_owner(state.store.as_ref(), &principal, &username, Operation::ReadTodo).await?;
    let todo = state
        .store
        .get_todo(todo_id, owner.id)
        .await
        .map_err(|e| AppError::from_store(e, MISSING_TODO))?;
    Ok(Json(todo))
}

#[instrument(skip(state, principal, path, payload), fields(principal = %principal.username))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    path: Result<Path<(String, i64)>, PathRejection>,
    payload: Result<Json<TodoUpdateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let Path((username, todo_id)) = path?;
    let owner = resolve_owner(state.store.as_ref(), &principal, &username, Operation::UpdateTodo).await?;
    let Json(payload) = payload?;

    let existing = state
        .store
        .get_todo(todo_id, owner.id)
        .await
        .map_err(|e| AppError::from_store(e, MISSING_TODO))?;

    let todo = merge_todo(existing, &payload, OffsetDateTime::now_utc()).into_changed()?;

    state.store.update_todo(&todo).await.map_err(|e| {
        error!(error = %e, todo_id, "update_todo failed");
        AppError::from_store(e, MISSING_TODO)
    })?;

    info!(todo_id, owner = %owner.username, "todo updated");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(state, principal, path), fields(principal = %principal.username))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path((username, todo_id)) = path?;
    let owner = resolve_owner(state.store.as_ref(), &principal, &username, Operation::DeleteTodo).await?;
    state
        .store
        .delete_todo(todo_id, owner.id)
        .await
        .map_err(|e| AppError::from_store(e, MISSING_TODO))?;

    info!(todo_id, owner = %owner.username, by = %principal.username, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
