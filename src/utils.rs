use chrono::{NaiveDateTime, Utc};
use diesel::{
    SqliteConnection,
    r2d2::{ConnectionManager, PooledConnection},
};

use crate::{DbPool, data::models::WordError};

pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub fn get_conn(pool: &DbPool) -> Result<DbConn, WordError> {
    pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        WordError::from(e)
    })
}

/// Current time as stored in the database (naive UTC).
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
