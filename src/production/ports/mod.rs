//! Port contracts for production tracking.

pub mod repository;

pub use repository::{
    ProductionRepository, ProductionRepositoryError, ProductionRepositoryResult,
};
