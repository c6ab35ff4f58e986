use postgres::{Client, NoTls};
use r2d2::Pool;
use r2d2_postgres::PostgresConnectionManager;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod registration;
pub mod schema;
pub mod store;

use crate::config::Config;
use crate::error::StoreError;

pub type DbPool = Pool<PostgresConnectionManager<NoTls>>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Opens a single connection, for the command line tools.
pub fn establish_connection() -> Result<Client, BoxError> {
    let config = Config::load()?;
    Ok(Client::connect(&config.database_url, NoTls)?)
}

pub fn create_db_pool(config: &Config) -> Result<DbPool, StoreError> {
    let manager = PostgresConnectionManager::new(config.database_url.parse()?, NoTls);
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .build(manager)?;
    Ok(pool)
}
