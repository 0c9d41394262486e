//! In-memory production adapters.

mod production;

pub use production::InMemoryProductionRepository;
