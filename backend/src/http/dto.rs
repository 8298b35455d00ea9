//! Data Transfer Objects for the HTTP API.
//!
//! These shapes exist only at the boundary and convert into and out of the
//! store types in [`crate::api`].

use serde::{Deserialize, Serialize};

use crate::api::{NewTodo, Todo, TodoChanges};

/// Request body for `POST /create-todo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
    #[serde(default)]
    pub is_complete: bool,
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(request: CreateTodoRequest) -> Self {
        NewTodo::new(request.text).completed(request.is_complete)
    }
}

/// Public view of a stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoView {
    pub id: i32,
    pub text: String,
    pub is_complete: bool,
}

impl From<Todo> for TodoView {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id.value(),
            text: todo.text,
            is_complete: todo.is_complete,
        }
    }
}

/// Request body for `PUT /update-todo/{id}`.
///
/// `id` is part of the payload but the path id decides which row changes.
/// `is_complete` is only applied when the client sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: i32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

impl UpdateTodoRequest {
    /// Fields this request actually supplies.
    pub fn into_changes(self) -> TodoChanges {
        let changes = TodoChanges::default().with_text(self.text);
        match self.is_complete {
            Some(flag) => changes.with_is_complete(flag),
            None => changes,
        }
    }
}

/// Confirmation body for delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
