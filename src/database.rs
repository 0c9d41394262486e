//! `PostgreSQL` connection pooling shared by the Diesel adapters.

use crate::config::DatabaseConfig;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool type used by all Diesel adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool from configuration.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot establish its initial
/// connections.
pub fn build_pool(config: &DatabaseConfig) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
    Pool::builder()
        .max_size(config.max_connections)
        .build(manager)
}
