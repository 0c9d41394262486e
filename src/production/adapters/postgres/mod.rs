//! `PostgreSQL` adapters for production tracking.

mod models;
mod repository;
mod schema;

pub use repository::PostgresProductionRepository;
