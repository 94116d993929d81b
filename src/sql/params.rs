//! Convert serde_json::Value to types that sqlx can bind.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::Database;

/// A value that can be bound to a SQLite query. Converts from serde_json::Value.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Text(String),
}

impl BindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => BindValue::I64(i),
                None => BindValue::F64(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => BindValue::Text(s.clone()),
            // Nested documents are stored as their JSON text.
            Value::Array(_) | Value::Object(_) => BindValue::Text(v.to_string()),
        }
    }
}

impl<'q> Encode<'q, Sqlite> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::Null => <Option<i64> as Encode<Sqlite>>::encode_by_ref(&None, buf),
            BindValue::Bool(b) => <bool as Encode<Sqlite>>::encode_by_ref(b, buf),
            BindValue::I64(n) => <i64 as Encode<Sqlite>>::encode_by_ref(n, buf),
            BindValue::F64(n) => <f64 as Encode<Sqlite>>::encode_by_ref(n, buf),
            BindValue::Text(s) => <String as Encode<Sqlite>>::encode_by_ref(s, buf),
        }
    }
}

impl sqlx::Type<Sqlite> for BindValue {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_prefer_integers() {
        assert_eq!(BindValue::from_json(&json!(42)), BindValue::I64(42));
        assert_eq!(BindValue::from_json(&json!(2.5)), BindValue::F64(2.5));
    }

    #[test]
    fn scalars_map_directly() {
        assert_eq!(BindValue::from_json(&Value::Null), BindValue::Null);
        assert_eq!(BindValue::from_json(&json!(true)), BindValue::Bool(true));
        assert_eq!(
            BindValue::from_json(&json!("Nolan")),
            BindValue::Text("Nolan".into())
        );
    }

    #[test]
    fn documents_become_json_text() {
        assert_eq!(
            BindValue::from_json(&json!({"a": 1})),
            BindValue::Text("{\"a\":1}".into())
        );
    }
}
