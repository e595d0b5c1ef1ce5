use std::sync::Mutex;

use super::todo_model::{NewTodo, Todo, TodoPatch, TodoReplacement};
use super::todo_store::TodoStore;
use crate::api::errors::TodoApiError;

/// In-process `TodoStore` with the same observable behaviour as `PgTodoStore`
#[derive(Default)]
pub struct MemoryTodoStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i32,
    todos: Vec<Todo>,
}

impl MemoryTodoStore {
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().todos.len()
    }

    fn with_todo<F>(&self, todo_id: i32, f: F) -> Result<Todo, TodoApiError>
    where
        F: FnOnce(&mut Todo),
    {
        let mut inner = self.inner.lock().unwrap();
        let todo = inner
            .todos
            .iter_mut()
            .find(|t| t.id == todo_id)
            .ok_or_else(TodoApiError::todo_not_found)?;
        f(todo);
        Ok(todo.clone())
    }
}

impl TodoStore for MemoryTodoStore {
    fn create(&self, todo: NewTodo) -> Result<Todo, TodoApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.last_id += 1;

        let created = Todo {
            id: inner.last_id,
            title: todo.title,
            description: todo.description,
            due_date: todo.due_date,
            completed: todo.completed,
            created_at: chrono::Utc::now().naive_utc(),
        };
        inner.todos.push(created.clone());

        Ok(created)
    }

    fn get(&self, todo_id: i32) -> Result<Todo, TodoApiError> {
        self.with_todo(todo_id, |_| {})
    }

    fn list(&self, completed: Option<bool>) -> Result<Vec<Todo>, TodoApiError> {
        let inner = self.inner.lock().unwrap();

        Ok(inner
            .todos
            .iter()
            .filter(|t| completed.map_or(true, |flag| t.completed == flag))
            .cloned()
            .collect())
    }

    fn replace(&self, todo_id: i32, changes: TodoReplacement) -> Result<Todo, TodoApiError> {
        self.with_todo(todo_id, |todo| todo.replace_with(changes))
    }

    fn patch(&self, todo_id: i32, changes: TodoPatch) -> Result<Todo, TodoApiError> {
        self.with_todo(todo_id, |todo| todo.apply(changes))
    }

    fn delete(&self, todo_id: i32) -> Result<(), TodoApiError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.todos.len();
        inner.todos.retain(|t| t.id != todo_id);

        if inner.todos.len() < before {
            Ok(())
        } else {
            Err(TodoApiError::todo_not_found())
        }
    }
}
