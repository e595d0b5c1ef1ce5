use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::api::dtos::todo::{CreateTodoDTO, PatchTodoDTO, TodoListQuery, UpdateTodoDTO};
use crate::models::todo_model::{NewTodo, TodoPatch, TodoReplacement};
use crate::models::todo_store::TodoStore;

/// Create a new todo
pub async fn create_todo(
    request_data: web::Json<CreateTodoDTO>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let new_todo = NewTodo::try_from(request_data.into_inner())?;

    let inserted = web::block(move || store.create(new_todo)).await??;

    Ok(HttpResponse::Created().json(&inserted))
}

/// Api handler for getting all todos, `?completed=` narrows the list
pub async fn get_todos(
    query: web::Query<TodoListQuery>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let completed = query.completed;

    let list = web::block(move || store.list(completed)).await??;

    Ok(HttpResponse::Ok().json(&list))
}

pub async fn get_todo(
    todo_id: web::Path<i32>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let todo_id = todo_id.into_inner();

    let todo = web::block(move || store.get(todo_id)).await??;

    Ok(HttpResponse::Ok().json(&todo))
}

/// Replace every mutable field of a todo
pub async fn update_todo(
    todo_id: web::Path<i32>,
    request_data: web::Json<UpdateTodoDTO>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let todo_id = todo_id.into_inner();
    let changes = TodoReplacement::try_from(request_data.into_inner())?;

    let updated = web::block(move || store.replace(todo_id, changes)).await??;

    Ok(HttpResponse::Ok().json(&updated))
}

/// Update only the fields present in the body
pub async fn patch_todo(
    todo_id: web::Path<i32>,
    request_data: web::Json<PatchTodoDTO>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let todo_id = todo_id.into_inner();
    let changes = TodoPatch::try_from(request_data.into_inner())?;

    let updated = web::block(move || store.patch(todo_id, changes)).await??;

    Ok(HttpResponse::Ok().json(&updated))
}

/// Api to Delete a TODO
pub async fn delete_todo(
    todo_id: web::Path<i32>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let todo_id = todo_id.into_inner();

    web::block(move || store.delete(todo_id)).await??;

    Ok(HttpResponse::Ok().json(json!({ "detail": "Deleted" })))
}
