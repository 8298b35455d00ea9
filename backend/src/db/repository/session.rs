//! Per-request session trait carrying the record store operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewTodo, Todo, TodoChanges, TodoId};

/// Store handle scoped to one request.
///
/// Every mutating operation is committed before it returns. Absence of a
/// row is reported through `Option`/`bool`, never as an error, so callers
/// decide how "not found" surfaces.
#[async_trait]
pub trait TodoSession: Send {
    /// Insert a new item and return the stored record with its assigned id.
    async fn create(&mut self, new: NewTodo) -> RepositoryResult<Todo>;

    /// All items ordered by ascending id. An empty vector is a valid result.
    async fn get_all(&mut self) -> RepositoryResult<Vec<Todo>>;

    /// Items whose completion flag equals `is_complete`, by ascending id.
    async fn get_by_completion(&mut self, is_complete: bool) -> RepositoryResult<Vec<Todo>>;

    /// Point lookup.
    async fn get_by_id(&mut self, id: TodoId) -> RepositoryResult<Option<Todo>>;

    /// Apply the supplied fields of `changes` to the item.
    ///
    /// # Returns
    /// * `Ok(Some(todo))` - The refreshed record
    /// * `Ok(None)` - No item with this id
    async fn update(&mut self, id: TodoId, changes: TodoChanges)
        -> RepositoryResult<Option<Todo>>;

    /// Flip the completion flag of the item.
    async fn toggle_complete(&mut self, id: TodoId) -> RepositoryResult<Option<Todo>>;

    /// Remove the item. Returns whether a row was removed.
    async fn delete(&mut self, id: TodoId) -> RepositoryResult<bool>;

    /// Remove every item. Returns the number of rows removed.
    async fn delete_all(&mut self) -> RepositoryResult<usize>;
}
