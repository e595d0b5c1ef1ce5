use crate::schema::*;
use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "todos"]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
}

#[cfg(test)]
impl NewTodo {
    pub fn from_title<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            completed: false,
        }
    }
}

/// Full replacement of every mutable column, `None` clears the column
#[derive(Debug, Clone, AsChangeset)]
#[table_name = "todos"]
#[changeset_options(treat_none_as_null = "true")]
pub struct TodoReplacement {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
}

/// Partial update, `None` leaves the column untouched
#[derive(Debug, Clone, Default, AsChangeset)]
#[table_name = "todos"]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}

#[cfg(test)]
impl Todo {
    pub fn replace_with(&mut self, changes: TodoReplacement) {
        self.title = changes.title;
        self.description = changes.description;
        self.due_date = changes.due_date;
        self.completed = changes.completed;
    }

    pub fn apply(&mut self, changes: TodoPatch) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
    }
}
