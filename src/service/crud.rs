//! Generic CRUD execution against SQLite.

use crate::error::AppError;
use crate::model::Entity;
use crate::sql::{delete, insert, insert_all_columns, select_by_id, select_list, update, BindValue, QueryBuf};
use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;
use std::collections::HashMap;

pub struct CrudService;

type SqliteQueryAs<'q, O> = sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>;

impl CrudService {
    /// List rows matching every filter (exact match), ordered by id.
    pub async fn list<E: Entity>(pool: &SqlitePool, filters: &[(String, Value)]) -> Result<Vec<E>, AppError> {
        let q = select_list::<E>(filters);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query_as::<_, E>(&q.sql), &q.params)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Fetch one row by primary key.
    pub async fn read<E: Entity>(pool: &SqlitePool, id: i64) -> Result<Option<E>, AppError> {
        let q = select_by_id::<E>(id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query_as::<_, E>(&q.sql), &q.params)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Insert one row; body may carry the pk, in which case it is used as-is. Returns the new id.
    pub async fn create<E: Entity>(pool: &SqlitePool, body: &HashMap<String, Value>) -> Result<i64, AppError> {
        let include_pk = body.contains_key(crate::model::PK);
        let q = insert::<E>(body, include_pk);
        let id = Self::returning_id(pool, &q).await?.ok_or(sqlx::Error::RowNotFound)?;
        Ok(id)
    }

    /// Replace the mutable columns of one row. Returns the id, or None when no row matched.
    pub async fn update<E: Entity>(
        pool: &SqlitePool,
        id: i64,
        body: &HashMap<String, Value>,
    ) -> Result<Option<i64>, AppError> {
        let q = update::<E>(id, body);
        Self::returning_id(pool, &q).await
    }

    /// Delete one row by id. Returns the id, or None when no row matched.
    pub async fn delete<E: Entity>(pool: &SqlitePool, id: i64) -> Result<Option<i64>, AppError> {
        let q = delete::<E>(id);
        Self::returning_id(pool, &q).await
    }

    /// Insert rows with explicit ids inside an open transaction.
    pub async fn bulk_insert<E: Entity>(
        tx: &mut sqlx::SqliteConnection,
        items: &[HashMap<String, Value>],
    ) -> Result<u64, AppError> {
        let mut inserted = 0;
        for body in items {
            let q = insert_all_columns::<E>(body);
            tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
            let mut query = sqlx::query(&q.sql);
            for p in &q.params {
                query = query.bind(BindValue::from_json(p));
            }
            inserted += query.execute(&mut *tx).await?.rows_affected();
        }
        Ok(inserted)
    }

    async fn returning_id(pool: &SqlitePool, q: &QueryBuf) -> Result<Option<i64>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row: Option<(i64,)> = bind_all(sqlx::query_as(&q.sql), &q.params)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }
}

fn bind_all<'q, O>(mut query: SqliteQueryAs<'q, O>, params: &[Value]) -> SqliteQueryAs<'q, O> {
    for p in params {
        query = query.bind(BindValue::from_json(p));
    }
    query
}
