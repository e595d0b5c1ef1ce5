pub mod todo_model;
pub mod todo_store;

#[cfg(test)]
pub mod memory_store;

use diesel::{r2d2::ConnectionManager, PgConnection};

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;
