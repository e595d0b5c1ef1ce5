use std::sync::Arc;

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

use anyhow::Context;
use clap::Parser;

use crate::config::Config;
use crate::models::todo_store::{PgTodoStore, TodoStore};
use crate::storage::{AzureBlobStorage, ExportStorage, UnconfiguredStorage};

mod api;
mod config;
mod db;
mod export;
mod models;
mod schema;
mod storage;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        "todo_export_api=debug,actix_web=info,actix_server=info",
    ))
    .init();

    let config = Config::parse();

    let pool = db::build_pool(&config.database_url, config.pool_size)?;
    db::run_migrations(&pool)?;
    let store: Arc<dyn TodoStore> = Arc::new(PgTodoStore::new(pool));

    let storage: Arc<dyn ExportStorage> = match &config.storage_connection_string {
        Some(connection_string) => {
            let azure = AzureBlobStorage::from_connection_string(
                connection_string,
                config.container.clone(),
                chrono::Duration::minutes(config.export_url_ttl_minutes),
            )
            .context("Invalid AZURE_STORAGE_CONNECTION_STRING")?;

            log::info!(
                "Exports go to container {} of account {}",
                config.container,
                azure.account_name()
            );

            Arc::new(azure)
        }
        None => {
            log::warn!("AZURE_STORAGE_CONNECTION_STRING is not set, /export is disabled");
            Arc::new(UnconfiguredStorage)
        }
    };

    actix_web::rt::System::new()
        .block_on(api::api::start_server(
            config.bind,
            config.api_key,
            store,
            storage,
        ))
        .context("HTTP server failed")
}
