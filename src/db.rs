use anyhow::Context;
use diesel::{r2d2::ConnectionManager, PgConnection};

use crate::models::Pool;

embed_migrations!("migrations");

/// Builds the connection pool, failing fast when the database is unreachable
pub fn build_pool(database_url: &str, max_size: u32) -> anyhow::Result<Pool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .context("Failed to connect to PG database")
}

/// Brings the schema up to date, applying any pending migration
pub fn run_migrations(pool: &Pool) -> anyhow::Result<()> {
    let conn = pool.get().context("Failed to check out a connection for migrations")?;

    embedded_migrations::run(&*conn).context("Failed to run database migrations")?;

    log::info!("Database schema is up to date");

    Ok(())
}
