//! Project catalog for Shopfloor.
//!
//! A project groups parts and carries a default step template that is shown
//! when a part is created. The template never binds a part's own step plan.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
