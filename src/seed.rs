//! Fixture loading. Movies are read-only over HTTP, so this is how they get into the store.
//!
//! The fixture is one JSON document:
//!
//! ```json
//! { "directors": [{"id": 1, "name": "..."}], "genres": [...], "movies": [...] }
//! ```

use crate::error::{AppError, ConfigError};
use crate::model::{Director, Genre, Movie};
use crate::service::CrudService;
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;

type Rows = Vec<HashMap<String, Value>>;

#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub directors: Rows,
    #[serde(default)]
    pub genres: Rows,
    #[serde(default)]
    pub movies: Rows,
}

impl Fixture {
    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub directors: u64,
    pub genres: u64,
    pub movies: u64,
}

async fn is_empty(pool: &SqlitePool) -> Result<bool, AppError> {
    let (n,): (i64,) = sqlx::query_as(
        r#"SELECT (SELECT COUNT(*) FROM "director") + (SELECT COUNT(*) FROM "genre") + (SELECT COUNT(*) FROM "movie")"#,
    )
    .fetch_one(pool)
    .await?;
    Ok(n == 0)
}

/// Insert the fixture in one transaction, referenced tables first.
pub async fn apply(pool: &SqlitePool, fixture: &Fixture) -> Result<SeedReport, AppError> {
    let mut tx = pool.begin().await?;
    let directors = CrudService::bulk_insert::<Director>(&mut tx, &fixture.directors).await?;
    let genres = CrudService::bulk_insert::<Genre>(&mut tx, &fixture.genres).await?;
    let movies = CrudService::bulk_insert::<Movie>(&mut tx, &fixture.movies).await?;
    tx.commit().await?;
    Ok(SeedReport {
        directors,
        genres,
        movies,
    })
}

/// Load the fixture at `path` unless the store already holds rows.
pub async fn seed_from_path(pool: &SqlitePool, path: &Path) -> Result<Option<SeedReport>, AppError> {
    if !is_empty(pool).await? {
        tracing::info!(path = %path.display(), "store not empty, skipping fixture");
        return Ok(None);
    }
    let fixture = Fixture::from_path(path).await?;
    let report = apply(pool, &fixture).await?;
    tracing::info!(
        directors = report.directors,
        genres = report.genres,
        movies = report.movies,
        "fixture loaded"
    );
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::store::{connect, ensure_tables};
    use std::io::Write;

    async fn memory_pool() -> SqlitePool {
        let settings = Settings {
            database_url: "sqlite::memory:".into(),
            ..Settings::default()
        };
        let pool = connect(&settings).await.unwrap();
        ensure_tables(&pool).await.unwrap();
        pool
    }

    const FIXTURE: &str = r#"{
        "directors": [{"id": 1, "name": "Ridley Scott"}],
        "genres": [{"id": 2, "name": "Sci-Fi"}],
        "movies": [{"id": 3, "title": "Alien", "year": 1979, "rating": 8, "genre_id": 2, "director_id": 1}]
    }"#;

    #[tokio::test]
    async fn seeds_once_from_file() {
        let pool = memory_pool().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let report = seed_from_path(&pool, file.path()).await.unwrap();
        assert_eq!(
            report,
            Some(SeedReport {
                directors: 1,
                genres: 1,
                movies: 1
            })
        );
        let movie = CrudService::read::<Movie>(&pool, 3).await.unwrap().unwrap();
        assert_eq!(movie.title.as_deref(), Some("Alien"));
        assert_eq!(movie.description, None);

        assert_eq!(seed_from_path(&pool, file.path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn dangling_reference_rolls_back() {
        let pool = memory_pool().await;
        let fixture: Fixture = serde_json::from_str(
            r#"{"directors": [{"id": 1, "name": "A"}], "movies": [{"id": 1, "title": "X", "director_id": 99}]}"#,
        )
        .unwrap();
        assert!(apply(&pool, &fixture).await.is_err());
        assert!(CrudService::read::<Director>(&pool, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_file_is_a_config_error() {
        let pool = memory_pool().await;
        let err = seed_from_path(&pool, Path::new("/nonexistent/fixture.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Io(_))));
    }
}
