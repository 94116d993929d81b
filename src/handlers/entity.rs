//! Entity CRUD handlers: list, read, create, update, delete. Instantiated per entity by the router.

use crate::error::AppError;
use crate::model::{Entity, PK};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

/// Path ids that are not integers cannot name a row.
fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::NotFound(id_str.to_string()))
}

fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Query filters for list: only the entity's filter columns; other keys are ignored.
/// Integer text binds as an integer, anything else binds as text and matches no row.
fn list_filters<E: Entity>(params: &HashMap<String, String>) -> Vec<(String, Value)> {
    let mut filters = Vec::new();
    for col in E::FILTERS {
        if let Some(raw) = params.get(*col) {
            let val = match raw.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::String(raw.clone()),
            };
            filters.push((col.to_string(), val));
        }
    }
    filters
}

pub async fn list<E: Entity>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<E>>, AppError> {
    let filters = list_filters::<E>(&params);
    let rows = CrudService::list::<E>(&state.pool, &filters).await?;
    Ok(Json(rows))
}

/// Any failure during lookup answers 404 with an empty body.
pub async fn read<E: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<E>, AppError> {
    let id = parse_id(&id_str)?;
    match CrudService::read::<E>(&state.pool, id).await {
        Ok(Some(row)) => Ok(Json(row)),
        Ok(None) => Err(AppError::NotFound(format!("{}/{}", E::PATH, id))),
        Err(e) => {
            tracing::debug!(error = %e, entity = E::TABLE, id, "lookup failed");
            Err(AppError::NotFound(format!("{}/{}", E::PATH, id)))
        }
    }
}

/// Body keys must be mutable columns or `id`; a supplied `id` is inserted as-is.
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    if let Some(key) = body.keys().find(|k| k.as_str() != PK && !E::MUTABLE.contains(&k.as_str())) {
        return Err(AppError::BadRequest(format!("unknown field '{}'", key)));
    }
    if let Some(id) = body.get(PK) {
        if !id.is_i64() {
            return Err(AppError::BadRequest(format!("{} must be an integer", PK)));
        }
    }
    let id = CrudService::create::<E>(&state.pool, &body).await?;
    tracing::info!(entity = E::TABLE, id, "created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/{}/{}", E::PATH, id))],
    ))
}

/// POST on the id-bearing route creates a row. The path id must be an integer but is otherwise ignored.
pub async fn create_ignoring_id<E: Entity>(
    state: State<AppState>,
    Path(id_str): Path<String>,
    body: Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    parse_id(&id_str)?;
    create::<E>(state, body).await
}

/// Full replacement of the mutable columns; keys missing from the body become null.
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    CrudService::update::<E>(&state.pool, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{}/{}", E::PATH, id)))?;
    tracing::info!(entity = E::TABLE, id, "updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id_str)?;
    CrudService::delete::<E>(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{}/{}", E::PATH, id)))?;
    tracing::info!(entity = E::TABLE, id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Director, Movie};

    #[test]
    fn filters_parse_integers_and_ignore_unknown_keys() {
        let params: HashMap<String, String> = [
            ("director_id".to_string(), "1".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
        .into();
        let filters = list_filters::<Movie>(&params);
        assert_eq!(filters, vec![("director_id".to_string(), Value::from(1))]);
    }

    #[test]
    fn non_integer_filter_binds_as_text() {
        let params: HashMap<String, String> = [("genre_id".to_string(), "drama".to_string())].into();
        assert_eq!(
            list_filters::<Movie>(&params),
            vec![("genre_id".to_string(), Value::from("drama"))]
        );
    }

    #[test]
    fn entities_without_filters_ignore_query() {
        let params: HashMap<String, String> = [("director_id".to_string(), "x".to_string())].into();
        assert!(list_filters::<Director>(&params).is_empty());
    }

    #[test]
    fn non_integer_path_id_is_not_found() {
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
        assert_eq!(parse_id("12").unwrap(), 12);
    }
}
