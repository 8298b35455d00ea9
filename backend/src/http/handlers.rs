//! HTTP handlers for the REST API.
//!
//! Each handler decodes its input, then acquires the request's session and
//! runs exactly one store operation on it before mapping the outcome to a
//! response.

use axum::{extract::State, Json};

use super::dto::{
    CreateTodoRequest, HealthResponse, MessageResponse, TodoView, UpdateTodoRequest,
};
use super::error::AppError;
use super::extract::{AppJson, AppPath, StoreSession};
use super::state::AppState;
use crate::api::{Todo, TodoId};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const NO_TODOS: &str = "No todos found";
const TODO_NOT_FOUND: &str = "Todo not found";

fn todo_not_found() -> AppError {
    AppError::NotFound(TODO_NOT_FOUND.to_string())
}

/// Listings that match nothing are reported as 404.
fn listing(todos: Vec<Todo>) -> HandlerResult<Vec<TodoView>> {
    if todos.is_empty() {
        return Err(AppError::NotFound(NO_TODOS.to_string()));
    }
    Ok(Json(todos.into_iter().map(TodoView::from).collect()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Listings
// =============================================================================

/// GET /
pub async fn list_todos(mut store: StoreSession) -> HandlerResult<Vec<TodoView>> {
    listing(store.get().await?.get_all().await?)
}

/// GET /complete-todos
pub async fn list_complete_todos(mut store: StoreSession) -> HandlerResult<Vec<TodoView>> {
    listing(store.get().await?.get_by_completion(true).await?)
}

/// GET /incomplete-todos
pub async fn list_incomplete_todos(mut store: StoreSession) -> HandlerResult<Vec<TodoView>> {
    listing(store.get().await?.get_by_completion(false).await?)
}

// =============================================================================
// Mutations
// =============================================================================

/// POST /create-todo
pub async fn create_todo(
    mut store: StoreSession,
    AppJson(request): AppJson<CreateTodoRequest>,
) -> HandlerResult<TodoView> {
    let todo = store.get().await?.create(request.into()).await?;
    tracing::info!(id = %todo.id, "todo created");
    Ok(Json(todo.into()))
}

/// PUT /check-todo/{id}
///
/// Flips the completion flag of one item.
pub async fn check_todo(
    mut store: StoreSession,
    AppPath(id): AppPath<i32>,
) -> HandlerResult<TodoView> {
    let todo = store
        .get()
        .await?
        .toggle_complete(TodoId::new(id))
        .await?
        .ok_or_else(todo_not_found)?;
    tracing::info!(id, is_complete = todo.is_complete, "todo toggled");
    Ok(Json(todo.into()))
}

/// PUT /update-todo/{id}
pub async fn update_todo(
    mut store: StoreSession,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<UpdateTodoRequest>,
) -> HandlerResult<TodoView> {
    if request.id != id {
        tracing::debug!(path_id = id, body_id = request.id, "ignoring body id");
    }
    let todo = store
        .get()
        .await?
        .update(TodoId::new(id), request.into_changes())
        .await?
        .ok_or_else(todo_not_found)?;
    tracing::info!(id, "todo updated");
    Ok(Json(todo.into()))
}

/// DELETE /del/{id}
pub async fn delete_todo(
    mut store: StoreSession,
    AppPath(id): AppPath<i32>,
) -> HandlerResult<MessageResponse> {
    if !store.get().await?.delete(TodoId::new(id)).await? {
        return Err(todo_not_found());
    }
    tracing::info!(id, "todo deleted");
    Ok(Json(MessageResponse::new("Todo deleted successfully")))
}

/// DELETE /delete-all
pub async fn delete_all_todos(mut store: StoreSession) -> HandlerResult<MessageResponse> {
    let removed = store.get().await?.delete_all().await?;
    tracing::info!(removed, "all todos deleted");
    Ok(Json(MessageResponse::new(format!(
        "{} todos deleted successfully",
        removed
    ))))
}
