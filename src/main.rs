//! Server binary: reads settings, prepares the store, optionally loads the fixture, serves the API.

use movie_catalog::{app, connect, ensure_tables, seed, AppState, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_catalog=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let pool = connect(&settings).await?;
    ensure_tables(&pool).await?;
    if let Some(path) = &settings.seed_path {
        seed::seed_from_path(&pool, path).await?;
    }

    let state = AppState { pool };
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(database = %settings.database_url, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
