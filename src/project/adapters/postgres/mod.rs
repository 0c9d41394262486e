//! `PostgreSQL` adapters for the project catalog.

mod models;
mod repository;
mod schema;

pub use repository::PostgresProjectRepository;
