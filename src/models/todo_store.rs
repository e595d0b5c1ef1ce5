use diesel::prelude::*;

use super::todo_model::{NewTodo, Todo, TodoPatch, TodoReplacement};
use super::Pool;
use crate::api::errors::TodoApiError;

/// Persistence for todos.
///
/// Every call is a blocking single-row operation (apart from `list`),
/// handlers run them on the blocking pool with `web::block`.
pub trait TodoStore: Send + Sync {
    fn create(&self, todo: NewTodo) -> Result<Todo, TodoApiError>;

    fn get(&self, todo_id: i32) -> Result<Todo, TodoApiError>;

    /// All todos ordered by id, optionally only those with the given `completed` flag
    fn list(&self, completed: Option<bool>) -> Result<Vec<Todo>, TodoApiError>;

    fn replace(&self, todo_id: i32, changes: TodoReplacement) -> Result<Todo, TodoApiError>;

    fn patch(&self, todo_id: i32, changes: TodoPatch) -> Result<Todo, TodoApiError>;

    fn delete(&self, todo_id: i32) -> Result<(), TodoApiError>;
}

/// `TodoStore` backed by the `todos` table in postgres
pub struct PgTodoStore {
    pool: Pool,
}

impl PgTodoStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl TodoStore for PgTodoStore {
    fn create(&self, todo: NewTodo) -> Result<Todo, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let inserted = diesel::insert_into(todos)
            .values(&todo)
            .get_result::<Todo>(conn)?;

        log::debug!("Created todo {}", inserted.id);

        Ok(inserted)
    }

    fn get(&self, todo_id: i32) -> Result<Todo, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        Ok(todos.find(todo_id).first::<Todo>(conn)?)
    }

    fn list(&self, only_completed: Option<bool>) -> Result<Vec<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let mut query = todos.order(id.asc()).into_boxed();

        if let Some(flag) = only_completed {
            query = query.filter(completed.eq(flag));
        }

        Ok(query.load::<Todo>(conn)?)
    }

    fn replace(&self, todo_id: i32, changes: TodoReplacement) -> Result<Todo, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        Ok(diesel::update(todos.find(todo_id))
            .set(&changes)
            .get_result::<Todo>(conn)?)
    }

    fn patch(&self, todo_id: i32, changes: TodoPatch) -> Result<Todo, TodoApiError> {
        use crate::schema::todos::dsl::*;

        // diesel refuses an UPDATE without any SET clause
        if changes.is_empty() {
            return self.get(todo_id);
        }

        let conn = &self.pool.get()?;

        Ok(diesel::update(todos.find(todo_id))
            .set(&changes)
            .get_result::<Todo>(conn)?)
    }

    fn delete(&self, todo_id: i32) -> Result<(), TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let deleted = diesel::delete(todos.find(todo_id)).execute(conn)?;

        if deleted > 0 {
            Ok(())
        } else {
            Err(TodoApiError::todo_not_found())
        }
    }
}
