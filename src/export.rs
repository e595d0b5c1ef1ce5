use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::dtos::todo::ExportResponseDTO;
use crate::api::errors::TodoApiError;
use crate::models::todo_model::Todo;
use crate::models::todo_store::TodoStore;
use crate::storage::ExportStorage;

pub const CSV_HEADER: [&str; 4] = ["id", "title", "description", "completed"];

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i32,
    title: &'a str,
    description: Option<&'a str>,
    completed: bool,
}

impl<'a> From<&'a Todo> for CsvRow<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            id: todo.id,
            title: &todo.title,
            description: todo.description.as_deref(),
            completed: todo.completed,
        }
    }
}

/// Encodes `todos` as CSV, the header row is always present
pub fn todos_to_csv(todos: &[Todo]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for todo in todos {
        writer.serialize(CsvRow::from(todo))?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Object name of an export taken at `at`
pub fn export_name(at: DateTime<Utc>) -> String {
    format!("todos_{}.csv", at.format("%Y%m%dT%H%M%S%.3fZ"))
}

/// Snapshots every todo, uploads it as CSV and returns the signed download URL
pub fn export_todos(
    store: &dyn TodoStore,
    storage: &dyn ExportStorage,
    at: DateTime<Utc>,
) -> Result<ExportResponseDTO, TodoApiError> {
    let todos = store.list(None)?;
    let content = todos_to_csv(&todos)?;
    let name = export_name(at);

    let url = storage.upload(&name, content)?;

    log::info!("Exported {} todos as {}", todos.len(), name);

    Ok(ExportResponseDTO { url })
}
