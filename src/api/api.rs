use std::sync::Arc;

use actix_web::{self, middleware::Logger, web, App, HttpResponse, HttpServer};
use serde_json::json;

use crate::models::todo_store::TodoStore;
use crate::storage::ExportStorage;

use super::{
    errors::TodoApiError, export_handler, middlewares::auth::ApiKeyAuth, todos_handler,
};

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Todo API is running" }))
}

/// Extractor failures answer with the same JSON error body as the handlers
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| TodoApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default().error_handler(|_, _| {
            TodoApiError::BadRequest(String::from("Invalid Todo Id")).into()
        }),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| TodoApiError::BadRequest(err.to_string()).into()),
    );
}

/// Registers every route, all but `/` sit behind the API key check
pub fn configure(cfg: &mut web::ServiceConfig, api_key: &str) {
    extractor_configs(cfg);

    cfg.route("/", web::get().to(health)).service(
        web::scope("")
            .wrap(ApiKeyAuth::new(api_key))
            .route("/todos", web::get().to(todos_handler::get_todos))
            .route("/todos", web::post().to(todos_handler::create_todo))
            .route("/todos/{id}", web::get().to(todos_handler::get_todo))
            .route("/todos/{id}", web::put().to(todos_handler::update_todo))
            .route("/todos/{id}", web::patch().to(todos_handler::patch_todo))
            .route("/todos/{id}", web::delete().to(todos_handler::delete_todo))
            .route("/export", web::get().to(export_handler::export_todos)),
    );
}

pub async fn start_server(
    bind: String,
    api_key: String,
    store: Arc<dyn TodoStore>,
    storage: Arc<dyn ExportStorage>,
) -> std::io::Result<()> {
    let store = web::Data::from(store);
    let storage = web::Data::from(storage);

    log::info!("Serving todos on {}", bind);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(storage.clone())
            .configure(|cfg| configure(cfg, &api_key))
    })
    .bind(bind)?
    .run()
    .await
}
