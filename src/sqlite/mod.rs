//! `SQLite` storage backends.
//!
//! Enable the `sqlx_sqlite` feature to use these implementations.

pub mod migrations;
mod profile;
mod session;

pub use profile::SqliteProfileRepository;
pub use session::SqliteSessionStore;
use sqlx::SqlitePool;

/// Creates both `SQLite`-backed stores from one connection pool.
pub fn create_stores(pool: SqlitePool) -> (SqliteProfileRepository, SqliteSessionStore) {
    (
        SqliteProfileRepository::new(pool.clone()),
        SqliteSessionStore::new(pool),
    )
}
