//! Work-order production tracking.
//!
//! Parts move through their own step plans one process instance at a time.
//! Each instance is started and completed by scanning its single-purpose
//! start and end tokens. Progress and duration views are derived from the
//! instance set on every query.
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
