use diesel::{
    QueryResult, SqliteConnection,
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection, Pool},
    sql_types::Text,
};

use crate::{DbPool, config::AppConfig};

const CREATE_WORDS: &str = include_str!("../../migrations/2026-01-01-000000_create_words/up.sql");

diesel::define_sql_function! {
    /// Unicode lowercasing. SQLite's own `lower()` only folds ASCII.
    fn fold_case(text: Text) -> Text;
}

/// Installs the Rust-backed SQL functions; needed once per connection.
pub fn register_functions(conn: &mut SqliteConnection) -> QueryResult<()> {
    fold_case_utils::register_impl(conn, |text: String| text.to_lowercase())
}

/// Per-connection pragmas applied as the pool hands connections out.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;",
            self.busy_timeout_ms
        ))
        .and_then(|_| register_functions(conn))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_pool(config: &AppConfig) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    Pool::builder()
        .max_size(config.pool_size.max(1))
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout_ms: 5_000,
        }))
        .build(manager)
}

/// Creates the tables if they are missing. Safe to run on every start.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    conn.batch_execute(CREATE_WORDS)
}
