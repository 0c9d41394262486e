//! Identity resolution for scan operators and catalog managers.
//!
//! The identity check itself is an external collaborator: this module
//! defines the principal and role model the rest of the crate relies on, the
//! [`ports::IdentityProvider`] contract, an in-memory provider backed by
//! argon2id password hashes and signed session tokens, and the
//! [`services::ActorResolver`] that turns an explicit [`domain::AuthMode`]
//! into an acting principal. The module follows hexagonal architecture:
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
