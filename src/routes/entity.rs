//! Entity routes. Each entity is served under `/<path>` and `/<path>/` (collection)
//! and `/<path>/:id` (single row); the same generic handlers back every entity.

use crate::handlers::entity::{create, create_ignoring_id, delete as delete_handler, list, read, update};
use crate::model::{Director, Entity, Genre, Movie};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET list and GET by id only.
fn read_only<E: Entity>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/{}", E::PATH);
    router
        .route(&base, get(list::<E>))
        .route(&format!("{}/", base), get(list::<E>))
        .route(&format!("{}/:id", base), get(read::<E>))
}

/// Collection route: GET list, POST create. Id route: GET, PUT, DELETE, plus POST create with the id ignored.
fn resource<E: Entity>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/{}", E::PATH);
    router
        .route(&base, get(list::<E>).post(create::<E>))
        .route(&format!("{}/", base), get(list::<E>).post(create::<E>))
        .route(
            &format!("{}/:id", base),
            get(read::<E>)
                .post(create_ignoring_id::<E>)
                .put(update::<E>)
                .delete(delete_handler::<E>),
        )
}

pub fn entity_routes(state: AppState) -> Router {
    let router = Router::new();
    let router = read_only::<Movie>(router);
    let router = resource::<Director>(router);
    let router = resource::<Genre>(router);
    router.with_state(state)
}
