//! Port contracts for identity resolution.

pub mod provider;

pub use provider::{IdentityProvider, IdentityResult};

#[cfg(test)]
pub use provider::MockIdentityProvider;
