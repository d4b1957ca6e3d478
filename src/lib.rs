use std::sync::Arc;

use diesel::{
    SqliteConnection,
    r2d2::{ConnectionManager, Pool},
};

pub mod config;
pub mod data;
pub mod features;
pub mod handlers;
pub mod routes;
pub mod schema;
pub mod srs;
pub mod utils;

use crate::config::AppConfig;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Shared router state: the connection pool and the loaded settings.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
