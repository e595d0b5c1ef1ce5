use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::errors::TodoApiError;
use crate::models::todo_model::{NewTodo, TodoPatch, TodoReplacement};

fn validate_title(title: &str) -> Result<(), TodoApiError> {
    if title.trim().is_empty() {
        return Err(TodoApiError::BadRequest(String::from(
            "Title cannot be empty",
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateTodoDTO {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed: bool,
}

impl TryFrom<CreateTodoDTO> for NewTodo {
    type Error = TodoApiError;

    fn try_from(dto: CreateTodoDTO) -> Result<Self, Self::Error> {
        validate_title(&dto.title)?;

        Ok(NewTodo {
            title: dto.title,
            description: dto.description,
            due_date: dto.due_date,
            completed: dto.completed,
        })
    }
}

/// Body of `PUT /todos/{id}`, every mutable field is replaced
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTodoDTO {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
}

impl TryFrom<UpdateTodoDTO> for TodoReplacement {
    type Error = TodoApiError;

    fn try_from(dto: UpdateTodoDTO) -> Result<Self, Self::Error> {
        validate_title(&dto.title)?;

        Ok(TodoReplacement {
            title: dto.title,
            description: dto.description,
            due_date: dto.due_date,
            completed: dto.completed,
        })
    }
}

/// Body of `PATCH /todos/{id}`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PatchTodoDTO {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: Option<bool>,
}

impl TryFrom<PatchTodoDTO> for TodoPatch {
    type Error = TodoApiError;

    fn try_from(dto: PatchTodoDTO) -> Result<Self, Self::Error> {
        if let Some(title) = &dto.title {
            validate_title(title)?;
        }

        Ok(TodoPatch {
            title: dto.title,
            description: dto.description,
            due_date: dto.due_date,
            completed: dto.completed,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TodoListQuery {
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExportResponseDTO {
    pub url: String,
}
