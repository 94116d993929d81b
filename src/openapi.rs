//! OpenAPI document for the entity routes, built from the same field lists the router uses.

use crate::model::{Director, Entity, Genre, Movie};
use utoipa::openapi::content::ContentBuilder;
use utoipa::openapi::info::InfoBuilder;
use utoipa::openapi::path::{
    HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder, PathsBuilder,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::response::ResponseBuilder;
use utoipa::openapi::schema::{ArrayBuilder, ComponentsBuilder, ObjectBuilder, Ref, Schema, Type};
use utoipa::openapi::{OpenApi, OpenApiBuilder, RefOr, Required};
use utoipa::{PartialSchema, ToSchema};

const JSON: &str = "application/json";

fn integer() -> RefOr<Schema> {
    RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(Type::Integer).build()))
}

fn entity_ref<E: ToSchema>() -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(E::name()))
}

/// Create/update body: the entity's mutable properties only.
fn body_schema<E: Entity + ToSchema>() -> RefOr<Schema> {
    let mut body = ObjectBuilder::new().schema_type(Type::Object);
    if let RefOr::T(Schema::Object(obj)) = E::schema() {
        for col in E::MUTABLE {
            if let Some(prop) = obj.properties.get(*col) {
                body = body.property(*col, prop.clone());
            }
        }
    }
    RefOr::T(Schema::Object(body.build()))
}

fn json_response(description: &str, schema: RefOr<Schema>) -> RefOr<utoipa::openapi::Response> {
    RefOr::T(
        ResponseBuilder::new()
            .description(description)
            .content(JSON, ContentBuilder::new().schema(Some(schema)).build())
            .build(),
    )
}

fn empty_response(description: &str) -> RefOr<utoipa::openapi::Response> {
    RefOr::T(ResponseBuilder::new().description(description).build())
}

fn id_param() -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(integer()))
        .build()
}

fn write_op<E: Entity + ToSchema>(summary: String, with_id: bool, status: &str, description: &str) -> Operation {
    let mut op = OperationBuilder::new()
        .tag(E::PATH)
        .summary(Some(summary))
        .request_body(Some(
            RequestBodyBuilder::new()
                .content(JSON, ContentBuilder::new().schema(Some(body_schema::<E>())).build())
                .required(Some(Required::True))
                .build(),
        ))
        .response(status, empty_response(description));
    if with_id {
        op = op.parameter(id_param());
    }
    op.build()
}

/// Collection path `/<path>/` and item path `/<path>/{id}`; write operations only when the entity has mutable columns.
fn entity_paths<E: Entity + ToSchema>(paths: PathsBuilder) -> PathsBuilder {
    let writable = !E::MUTABLE.is_empty();
    let entity = E::name();

    let mut list = OperationBuilder::new()
        .tag(E::PATH)
        .summary(Some(format!("List {}", E::PATH)))
        .response(
            "200",
            json_response(
                "All matching rows",
                RefOr::T(Schema::Array(ArrayBuilder::new().items(entity_ref::<E>()).build())),
            ),
        );
    for col in E::FILTERS {
        list = list.parameter(
            ParameterBuilder::new()
                .name(*col)
                .parameter_in(ParameterIn::Query)
                .required(Required::False)
                .schema(Some(integer()))
                .build(),
        );
    }
    let mut collection = PathItemBuilder::new().operation(HttpMethod::Get, list.build());
    if writable {
        collection = collection.operation(
            HttpMethod::Post,
            write_op::<E>(format!("Create {}", entity), false, "201", "Created"),
        );
    }

    let read = OperationBuilder::new()
        .tag(E::PATH)
        .summary(Some(format!("Get {} by id", entity)))
        .parameter(id_param())
        .response("200", json_response("The row", entity_ref::<E>()))
        .response("404", empty_response("No such row"))
        .build();
    let mut item = PathItemBuilder::new().operation(HttpMethod::Get, read);
    if writable {
        let delete = OperationBuilder::new()
            .tag(E::PATH)
            .summary(Some(format!("Delete {}", entity)))
            .parameter(id_param())
            .response("204", empty_response("Deleted"))
            .response("404", empty_response("No such row"))
            .build();
        item = item
            .operation(
                HttpMethod::Post,
                write_op::<E>(format!("Create {} (path id ignored)", entity), true, "201", "Created"),
            )
            .operation(
                HttpMethod::Put,
                write_op::<E>(format!("Replace {}", entity), true, "204", "Updated"),
            )
            .operation(HttpMethod::Delete, delete);
    }

    paths
        .path(format!("/{}/", E::PATH), collection.build())
        .path(format!("/{}/{{id}}", E::PATH), item.build())
}

/// The document served at `/swagger.json`.
pub fn api_doc() -> OpenApi {
    let paths = PathsBuilder::new();
    let paths = entity_paths::<Movie>(paths);
    let paths = entity_paths::<Director>(paths);
    let paths = entity_paths::<Genre>(paths);
    let components = ComponentsBuilder::new()
        .schema(Movie::name(), Movie::schema())
        .schema(Director::name(), Director::schema())
        .schema(Genre::name(), Genre::schema())
        .build();
    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title(env!("CARGO_PKG_NAME"))
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some(env!("CARGO_PKG_DESCRIPTION")))
                .build(),
        )
        .paths(paths.build())
        .components(Some(components))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> serde_json::Value {
        serde_json::to_value(api_doc()).unwrap()
    }

    #[test]
    fn movies_are_documented_read_only() {
        let doc = doc();
        let item = &doc["paths"]["/movies/{id}"];
        assert!(item["get"].is_object());
        assert!(item.get("put").is_none());
        assert!(item.get("delete").is_none());
        assert!(doc["paths"]["/movies/"].get("post").is_none());

        let params = doc["paths"]["/movies/"]["get"]["parameters"].as_array().unwrap();
        let names: Vec<&str> = params.iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["director_id", "genre_id"]);
    }

    #[test]
    fn resources_document_every_write() {
        let doc = doc();
        for path in ["directors", "genres"] {
            let item = &doc["paths"][format!("/{}/{{id}}", path)];
            for method in ["get", "post", "put", "delete"] {
                assert!(item[method].is_object(), "{} {}", method, path);
            }
            assert!(doc["paths"][format!("/{}/", path)]["post"].is_object());
        }
        let body = &doc["paths"]["/directors/"]["post"]["requestBody"]["content"]["application/json"]["schema"];
        assert!(body["properties"]["name"].is_object());
        assert!(body["properties"].get("id").is_none());
    }

    #[test]
    fn components_carry_entity_schemas() {
        let doc = doc();
        for name in ["Movie", "Director", "Genre"] {
            assert!(doc["components"]["schemas"][name].is_object(), "{}", name);
        }
        assert!(doc["components"]["schemas"]["Movie"]["properties"]["trailer"].is_object());
    }
}
