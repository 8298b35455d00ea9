use diesel::prelude::*;

use super::schema::todo;
use crate::api::{Todo, TodoChanges, TodoId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todo)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TodoRow {
    pub id: i32,
    pub text: String,
    pub is_complete: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: TodoId::new(row.id),
            text: row.text,
            is_complete: row.is_complete,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todo)]
pub struct NewTodoRow {
    pub text: String,
    pub is_complete: bool,
}

/// `None` fields are skipped by Diesel, so only supplied columns are written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = todo)]
pub struct TodoChangeset {
    pub text: Option<String>,
    pub is_complete: Option<bool>,
}

impl From<TodoChanges> for TodoChangeset {
    fn from(changes: TodoChanges) -> Self {
        Self {
            text: changes.text,
            is_complete: changes.is_complete,
        }
    }
}
