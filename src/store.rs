//! SQLite pool setup and table DDL for `director`, `genre` and `movie`.

use crate::config::Settings;
use crate::error::{AppError, ConfigError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Tables in dependency order: `movie` references the other two.
const TABLES: &[(&str, &str)] = &[
    (
        "director",
        r#"
        CREATE TABLE IF NOT EXISTS "director" (
            "id" INTEGER PRIMARY KEY AUTOINCREMENT,
            "name" VARCHAR(255)
        )
        "#,
    ),
    (
        "genre",
        r#"
        CREATE TABLE IF NOT EXISTS "genre" (
            "id" INTEGER PRIMARY KEY AUTOINCREMENT,
            "name" VARCHAR(255)
        )
        "#,
    ),
    (
        "movie",
        r#"
        CREATE TABLE IF NOT EXISTS "movie" (
            "id" INTEGER PRIMARY KEY AUTOINCREMENT,
            "title" VARCHAR(255),
            "description" VARCHAR(255),
            "trailer" VARCHAR(255),
            "year" INTEGER,
            "rating" INTEGER,
            "genre_id" INTEGER REFERENCES "genre" ("id"),
            "director_id" INTEGER REFERENCES "director" ("id")
        )
        "#,
    ),
];

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Open the pool, creating the database file if missing. Foreign keys are enforced.
///
/// An in-memory database lives only as long as its connection, so it gets a
/// single connection that is never recycled.
pub async fn connect(settings: &Settings) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(&settings.database_url)
        .map_err(|e| ConfigError::InvalidSetting {
            key: "DATABASE_URL",
            message: e.to_string(),
        })?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = if is_in_memory(&settings.database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(opts)
            .await?
    };
    Ok(pool)
}

/// Create the entity tables if they do not exist yet.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<(), AppError> {
    for (name, ddl) in TABLES {
        tracing::debug!(table = %name, "ensure table");
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:catalog?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://movies.db"));
    }

    #[tokio::test]
    async fn ensure_tables_is_idempotent() {
        let settings = Settings {
            database_url: "sqlite::memory:".into(),
            ..Settings::default()
        };
        let pool = connect(&settings).await.unwrap();
        ensure_tables(&pool).await.unwrap();
        ensure_tables(&pool).await.unwrap();
        let (n,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('director', 'genre', 'movie')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(n, 3);
    }
}
