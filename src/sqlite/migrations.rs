//! Embedded database migrations for `SQLite`.
//!
//! Migrations are embedded at compile time and run programmatically,
//! tracked in the `_volunhub_migrations` table.
//!
//! # Example
//!
//! ```rust,ignore
//! use volunhub::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const CORE_MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250801000001_create_profiles_table",
        include_str!("../../migrations_sqlite/core/20250801000001_create_profiles_table.sql"),
    ),
    (
        "20250801000002_create_sessions_table",
        include_str!("../../migrations_sqlite/core/20250801000002_create_sessions_table.sql"),
    ),
];

/// Runs all pending migrations.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _volunhub_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    run_migrations(pool, CORE_MIGRATIONS).await
}

/// Statements are split on semicolons; the bundled migrations keep
/// semicolons out of string literals so the naive split holds.
async fn run_migrations(pool: &SqlitePool, migrations: &[(&str, &str)]) -> Result<(), sqlx::Error> {
    for (name, sql) in migrations {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _volunhub_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;

        if !applied {
            for statement in sql.split(';') {
                let trimmed = statement.trim();
                if !trimmed.is_empty() {
                    pool.execute(trimmed).await?;
                }
            }

            sqlx::query("INSERT INTO _volunhub_migrations (name) VALUES (?)")
                .bind(*name)
                .execute(pool)
                .await?;
        }
    }
    Ok(())
}
