//! Entity records and their declarative field lists.

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Static description of one table exposed over HTTP.
///
/// `COLUMNS` is the wire order of the JSON object and always starts with the
/// primary key `id`. Only `MUTABLE` columns are accepted in create/update
/// bodies; only `FILTERS` are honored as list query parameters.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Unpin + 'static {
    const TABLE: &'static str;
    const PATH: &'static str;
    const COLUMNS: &'static [&'static str];
    const MUTABLE: &'static [&'static str];
    const FILTERS: &'static [&'static str] = &[];
}

pub const PK: &str = "id";

#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Movie {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub trailer: Option<String>,
    pub year: Option<i64>,
    pub rating: Option<i64>,
    pub genre_id: Option<i64>,
    pub director_id: Option<i64>,
}

impl Entity for Movie {
    const TABLE: &'static str = "movie";
    const PATH: &'static str = "movies";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "trailer",
        "year",
        "rating",
        "genre_id",
        "director_id",
    ];
    // Read-only over HTTP; rows come from the seed fixture.
    const MUTABLE: &'static [&'static str] = &[];
    const FILTERS: &'static [&'static str] = &["director_id", "genre_id"];
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Director {
    pub id: i64,
    pub name: Option<String>,
}

impl Entity for Director {
    const TABLE: &'static str = "director";
    const PATH: &'static str = "directors";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const MUTABLE: &'static [&'static str] = &["name"];
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i64,
    pub name: Option<String>,
}

impl Entity for Genre {
    const TABLE: &'static str = "genre";
    const PATH: &'static str = "genres";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const MUTABLE: &'static [&'static str] = &["name"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_serializes_fixed_field_set() {
        let movie = Movie {
            id: 3,
            title: Some("Heat".into()),
            description: None,
            trailer: Some("https://example.com/heat".into()),
            year: Some(1995),
            rating: Some(8),
            genre_id: Some(1),
            director_id: None,
        };
        let v = serde_json::to_value(&movie).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        let mut expected = Movie::COLUMNS.to_vec();
        expected.sort_unstable();
        let mut keys_sorted = keys.clone();
        keys_sorted.sort_unstable();
        assert_eq!(keys_sorted, expected);
        assert_eq!(v["description"], serde_json::Value::Null);
        assert_eq!(v["year"], 1995);
    }

    #[test]
    fn columns_start_with_primary_key() {
        assert_eq!(Movie::COLUMNS[0], PK);
        assert_eq!(Director::COLUMNS[0], PK);
        assert_eq!(Genre::COLUMNS[0], PK);
    }
}
