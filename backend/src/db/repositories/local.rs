//! In-memory repository for development and tests.
//!
//! Items live in an id-ordered map behind a `parking_lot::RwLock`. Ids come
//! from a counter that starts at 1 and is never rewound, so deleted ids are
//! not reused, matching a `SERIAL` column. Like a sequence, it refuses to
//! wrap once `i32::MAX` has been handed out.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{NewTodo, Todo, TodoChanges, TodoId};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, TodoRepository, TodoSession,
};

#[derive(Debug, Default)]
struct LocalState {
    /// Last id handed out; 0 before the first insert.
    last_id: i32,
    todos: BTreeMap<TodoId, Todo>,
}

/// In-memory `TodoRepository`.
///
/// Cloning shares the underlying table.
#[derive(Debug, Clone, Default)]
pub struct LocalRepository {
    state: Arc<RwLock<LocalState>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.state.read().todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open a session with its concrete type, for direct use in tests.
    pub fn session(&self) -> LocalSession {
        LocalSession {
            state: Arc::clone(&self.state),
        }
    }
}

#[async_trait]
impl TodoRepository for LocalRepository {
    async fn initialize_schema(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn acquire(&self) -> RepositoryResult<Box<dyn TodoSession>> {
        Ok(Box::new(self.session()))
    }
}

/// Session over a [`LocalRepository`].
///
/// Each operation takes the lock for its own duration only.
#[derive(Debug)]
pub struct LocalSession {
    state: Arc<RwLock<LocalState>>,
}

#[async_trait]
impl TodoSession for LocalSession {
    async fn create(&mut self, new: NewTodo) -> RepositoryResult<Todo> {
        let mut state = self.state.write();
        let next = state.last_id.checked_add(1).ok_or_else(|| {
            RepositoryError::query("todo id sequence exhausted")
                .with_context(ErrorContext::new("create").with_entity("todo"))
        })?;
        state.last_id = next;
        let id = TodoId::new(next);

        let todo = Todo {
            id,
            text: new.text,
            is_complete: new.is_complete,
        };
        state.todos.insert(id, todo.clone());
        log::debug!("local: created todo {}", id);
        Ok(todo)
    }

    async fn get_all(&mut self) -> RepositoryResult<Vec<Todo>> {
        Ok(self.state.read().todos.values().cloned().collect())
    }

    async fn get_by_completion(&mut self, is_complete: bool) -> RepositoryResult<Vec<Todo>> {
        Ok(self
            .state
            .read()
            .todos
            .values()
            .filter(|todo| todo.is_complete == is_complete)
            .cloned()
            .collect())
    }

    async fn get_by_id(&mut self, id: TodoId) -> RepositoryResult<Option<Todo>> {
        Ok(self.state.read().todos.get(&id).cloned())
    }

    async fn update(
        &mut self,
        id: TodoId,
        changes: TodoChanges,
    ) -> RepositoryResult<Option<Todo>> {
        let mut state = self.state.write();
        Ok(state.todos.get_mut(&id).map(|todo| {
            changes.apply_to(todo);
            todo.clone()
        }))
    }

    async fn toggle_complete(&mut self, id: TodoId) -> RepositoryResult<Option<Todo>> {
        let mut state = self.state.write();
        Ok(state.todos.get_mut(&id).map(|todo| {
            todo.is_complete = !todo.is_complete;
            todo.clone()
        }))
    }

    async fn delete(&mut self, id: TodoId) -> RepositoryResult<bool> {
        Ok(self.state.write().todos.remove(&id).is_some())
    }

    async fn delete_all(&mut self) -> RepositoryResult<usize> {
        let mut state = self.state.write();
        let removed = state.todos.len();
        state.todos.clear();
        log::debug!("local: deleted {} todos", removed);
        Ok(removed)
    }
}
