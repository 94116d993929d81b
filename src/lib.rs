//! Movie catalog: REST backend for movies, directors and genres on SQLite.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod routes;
pub mod seed;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use model::{Director, Entity, Genre, Movie};
pub use routes::{app, common_routes, entity_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{connect, ensure_tables};
