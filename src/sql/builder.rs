//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity's field list.

use crate::model::{Entity, PK};
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for SQLite (safe: only from static field lists).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

fn select_column_list<E: Entity>() -> String {
    E::COLUMNS
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT by primary key. Param ?1 is the id.
pub fn select_by_id<E: Entity>(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?{}",
        select_column_list::<E>(),
        quoted(E::TABLE),
        quoted(PK),
        n
    );
    q
}

/// SELECT list with exact-match filters joined by AND, ORDER BY pk.
/// Filters on columns outside `E::FILTERS` are skipped; params bound in filter order.
pub fn select_list<E: Entity>(filters: &[(String, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in filters {
        if !E::FILTERS.contains(&col.as_str()) {
            continue;
        }
        let n = q.push_param(val.clone());
        where_parts.push(format!("{} = ?{}", quoted(col), n));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        select_column_list::<E>(),
        quoted(E::TABLE),
        where_clause,
        quoted(PK)
    );
    q
}

/// INSERT one row. Columns are the mutable ones (absent keys bind NULL) plus the pk when `include_pk`.
pub fn insert<E: Entity>(body: &HashMap<String, Value>, include_pk: bool) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in E::COLUMNS {
        let writable = if *c == PK { include_pk } else { E::MUTABLE.contains(c) };
        if !writable {
            continue;
        }
        let n = q.push_param(body.get(*c).cloned().unwrap_or(Value::Null));
        cols.push(quoted(c));
        placeholders.push(format!("?{}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(E::TABLE),
        cols.join(", "),
        placeholders.join(", "),
        quoted(PK)
    );
    q
}

/// INSERT one row with every column taken from the body, pk included. Used for fixtures.
pub fn insert_all_columns<E: Entity>(body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut placeholders = Vec::new();
    for c in E::COLUMNS {
        let n = q.push_param(body.get(*c).cloned().unwrap_or(Value::Null));
        placeholders.push(format!("?{}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(E::TABLE),
        select_column_list::<E>(),
        placeholders.join(", ")
    );
    q
}

/// UPDATE by id: full replacement of every mutable column. Keys missing from body are set to NULL.
/// Only entities with at least one mutable column are updatable.
pub fn update<E: Entity>(id: i64, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in E::MUTABLE {
        let n = q.push_param(body.get(*c).cloned().unwrap_or(Value::Null));
        sets.push(format!("{} = ?{}", quoted(c), n));
    }
    let id_param = q.push_param(Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?{} RETURNING {}",
        quoted(E::TABLE),
        sets.join(", "),
        quoted(PK),
        id_param,
        quoted(PK)
    );
    q
}

/// DELETE by id, returning the removed pk.
pub fn delete<E: Entity>(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ?{} RETURNING {}",
        quoted(E::TABLE),
        quoted(PK),
        n,
        quoted(PK)
    );
    q
}
