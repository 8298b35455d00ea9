//! Public API surface for the to-do service.
//!
//! Holds the persisted entity and the inputs accepted by the record store.
//! HTTP request/response shapes live in [`crate::http::dto`] and convert
//! into and out of these types.

use serde::{Deserialize, Serialize};

/// To-do identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TodoId(pub i32);

impl TodoId {
    pub fn new(value: i32) -> Self {
        TodoId(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TodoId> for i32 {
    fn from(id: TodoId) -> Self {
        id.0
    }
}

/// A stored to-do item.
///
/// `id` is assigned by the store on creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub is_complete: bool,
}

/// Input for creating an item. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTodo {
    pub text: String,
    pub is_complete: bool,
}

impl NewTodo {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_complete: false,
        }
    }

    pub fn completed(mut self, is_complete: bool) -> Self {
        self.is_complete = is_complete;
        self
    }
}

/// Partial update of an item.
///
/// Each field is `Some` only when the caller supplied it; `None` fields are
/// left untouched by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub is_complete: Option<bool>,
}

impl TodoChanges {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_is_complete(mut self, is_complete: bool) -> Self {
        self.is_complete = Some(is_complete);
        self
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.is_complete.is_none()
    }

    /// Apply the supplied fields to `todo` in place.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        if let Some(is_complete) = self.is_complete {
            todo.is_complete = is_complete;
        }
    }
}
