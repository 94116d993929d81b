//! Common routes: health, readiness, version, OpenAPI document.

use crate::model::{Director, Entity, Genre, Movie};
use crate::openapi::api_doc;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    if let Err(e) = sqlx::query("SELECT 1").fetch_optional(&state.pool).await {
        tracing::warn!(error = %e, "readiness check failed");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: "ok",
    }))
}

#[derive(Serialize)]
struct VersionBody {
    name: &'static str,
    version: &'static str,
    resources: [&'static str; 3],
    docs: &'static str,
}

async fn version() -> Json<VersionBody> {
    Json(VersionBody {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        resources: [Movie::PATH, Director::PATH, Genre::PATH],
        docs: "/swagger.json",
    })
}

async fn swagger() -> Json<utoipa::openapi::OpenApi> {
    Json(api_doc())
}

/// GET /health, GET /ready (pings the store), GET /version, GET /swagger.json.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/swagger.json", get(swagger))
        .with_state(state)
}
